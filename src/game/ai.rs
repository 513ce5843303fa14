//! # Monster AI
//!
//! Per-monster state machine run once per turn after the player acts.
//!
//! Every turn a monster first updates its awareness:
//! - player within detection range: `Chasing`, memory refreshed
//! - player out of sight but memory left: stays `Chasing` toward the last
//!   known position while the memory counter runs down
//! - otherwise `Patrolling` if it has waypoints, else `Wandering`
//!
//! and then acts on the resulting state.

use crate::utils::pathfinding::next_step_toward;
use crate::{
    is_blocked, monster_damage, AiState, Direction, LevelState, Monster, MonsterBehavior,
    Player, Position, TileGrid, TileKind,
};
use rand::rngs::StdRng;
use rand::Rng;

/// Chance per turn that a wandering monster takes a step.
pub const WANDER_CHANCE: f64 = 0.5;

/// Number of waypoints generated for a guard, including its post.
pub const PATROL_POINTS: usize = 3;

/// How far from its post a guard's waypoints may lie.
pub const PATROL_RADIUS: i32 = 4;

/// A monster's blow against the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonsterAttack {
    pub attacker: String,
    pub damage: i32,
}

/// What a monster decided to do this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Attack,
    Approach(Position),
    Wander,
    Idle,
}

/// Sets up a freshly placed monster's AI.
///
/// Guards get a patrol route around their spawn point and start
/// `Patrolling`; everything else starts `Wandering`.
pub fn initialize_ai(monster: &mut Monster, grid: &TileGrid, rng: &mut StdRng) {
    monster.last_known_player_pos = None;
    monster.memory_counter = 0;
    monster.patrol_index = 0;
    if monster.behavior == MonsterBehavior::Guard {
        monster.patrol_points = patrol_route(monster.position, grid, rng);
    }
    monster.ai_state = if monster.patrol_points.is_empty() {
        AiState::Wandering
    } else {
        AiState::Patrolling
    };
}

/// Samples waypoints on floor tiles near `post`. The post itself comes first.
fn patrol_route(post: Position, grid: &TileGrid, rng: &mut StdRng) -> Vec<Position> {
    let mut route = vec![post];
    for _ in 0..(PATROL_POINTS * 10) {
        if route.len() == PATROL_POINTS {
            break;
        }
        let candidate = Position::new(
            post.x + rng.gen_range(-PATROL_RADIUS..=PATROL_RADIUS),
            post.y + rng.gen_range(-PATROL_RADIUS..=PATROL_RADIUS),
        );
        if grid.kind_at(candidate) == Some(TileKind::Floor) && !route.contains(&candidate) {
            route.push(candidate);
        }
    }
    if route.len() == 1 {
        // Nowhere to walk; a single-point route would only jitter in place.
        route.clear();
    }
    route
}

/// Runs every monster's turn against the player.
///
/// Monsters act in list order. Once the player is dead the remaining
/// monsters do nothing. Returns the attacks that landed.
pub fn run_monster_turns(
    level: &mut LevelState,
    player: &mut Player,
    rng: &mut StdRng,
) -> Vec<MonsterAttack> {
    let mut attacks = Vec::new();

    for index in 0..level.monsters.len() {
        if !player.is_alive() {
            break;
        }

        let intent = update_awareness(&mut level.monsters[index], player.position);
        log::trace!(
            "{} at {} is {:?}, intends {:?}",
            level.monsters[index].name,
            level.monsters[index].position,
            level.monsters[index].ai_state,
            intent
        );

        match intent {
            Intent::Attack => {
                let monster = &level.monsters[index];
                let damage = monster_damage(monster, player, rng);
                player.hp -= damage;
                attacks.push(MonsterAttack {
                    attacker: monster.name.clone(),
                    damage,
                });
            }
            Intent::Approach(goal) => {
                if let Some(step) = plan_step(level, index, goal, player.position) {
                    level.monsters[index].position = step;
                }
            }
            Intent::Wander => {
                if rng.gen_bool(WANDER_CHANCE) {
                    let step = level.monsters[index].position + Direction::random(rng).to_delta();
                    if !is_blocked(&level.grid, &level.monsters, player.position, step, None) {
                        level.monsters[index].position = step;
                    }
                }
            }
            Intent::Idle => {}
        }
    }

    attacks
}

/// Updates state, memory and patrol progress, and picks an intent.
fn update_awareness(monster: &mut Monster, player: Position) -> Intent {
    let sees_player = monster.position.within_radius(player, monster.detection_range);

    if sees_player {
        monster.ai_state = AiState::Chasing;
        monster.last_known_player_pos = Some(player);
        monster.memory_counter = monster.behavior.memory_turns();
        return if monster.position.chebyshev_distance(player) <= 1 {
            Intent::Attack
        } else {
            Intent::Approach(player)
        };
    }

    if monster.has_memory() {
        monster.ai_state = AiState::Chasing;
        let target = monster.last_known_player_pos;
        monster.memory_counter -= 1;
        if monster.memory_counter == 0 {
            monster.last_known_player_pos = None;
        }
        return match target {
            Some(target) if target != monster.position => Intent::Approach(target),
            _ => Intent::Idle,
        };
    }

    monster.last_known_player_pos = None;
    if monster.patrol_points.is_empty() {
        monster.ai_state = AiState::Wandering;
        return Intent::Wander;
    }

    monster.ai_state = AiState::Patrolling;
    let len = monster.patrol_points.len();
    monster.patrol_index %= len;
    if monster
        .position
        .chebyshev_distance(monster.patrol_points[monster.patrol_index])
        <= 1
    {
        monster.patrol_index = (monster.patrol_index + 1) % len;
    }
    Intent::Approach(monster.patrol_points[monster.patrol_index])
}

/// First step along an A* path toward `goal`, if it is free right now.
fn plan_step(level: &LevelState, index: usize, goal: Position, player: Position) -> Option<Position> {
    let start = level.monsters[index].position;
    let passable = |pos: Position| !is_blocked(&level.grid, &level.monsters, player, pos, None);
    let step = next_step_toward(start, goal, passable)?;
    if is_blocked(&level.grid, &level.monsters, player, step, None) {
        None
    } else {
        Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{new_entity_id, CharacterClass, Difficulty, MonsterTemplate};
    use rand::SeedableRng;

    fn room(width: i32, height: i32) -> TileGrid {
        let mut grid = TileGrid::new(width as u32, height as u32);
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                grid.set_kind(Position::new(x, y), TileKind::Floor).unwrap();
            }
        }
        grid
    }

    fn monster(behavior: MonsterBehavior, pos: Position) -> Monster {
        let template = MonsterTemplate {
            name: "Orc",
            hp: 10,
            attack: 4,
            xp_value: 4,
            behavior,
            min_depth: 1,
        };
        let mut rng = StdRng::seed_from_u64(pos.x as u64 * 100 + pos.y as u64);
        Monster::from_template(new_entity_id(&mut rng), &template, pos, Difficulty::Normal)
    }

    fn player_at(pos: Position) -> Player {
        Player::new(CharacterClass::Warrior, Difficulty::Normal, pos)
    }

    #[test]
    fn test_adjacent_monster_attacks() {
        let mut level = LevelState::new(room(10, 10), vec![monster(MonsterBehavior::Wanderer, Position::new(4, 4))], Vec::new());
        let mut player = player_at(Position::new(5, 5));
        let hp = player.hp;
        let mut rng = StdRng::seed_from_u64(1);

        let attacks = run_monster_turns(&mut level, &mut player, &mut rng);

        assert_eq!(attacks.len(), 1);
        assert!(attacks[0].damage >= 1);
        assert_eq!(player.hp, hp - attacks[0].damage);
        assert_eq!(level.monsters[0].position, Position::new(4, 4));
        assert_eq!(level.monsters[0].ai_state, AiState::Chasing);
    }

    #[test]
    fn test_chasing_monster_closes_distance() {
        let start = Position::new(2, 5);
        let mut level = LevelState::new(room(20, 10), vec![monster(MonsterBehavior::Wanderer, start)], Vec::new());
        let mut player = player_at(Position::new(7, 5));
        let mut rng = StdRng::seed_from_u64(1);

        run_monster_turns(&mut level, &mut player, &mut rng);

        let moved = level.monsters[0].position;
        assert_eq!(level.monsters[0].ai_state, AiState::Chasing);
        assert_eq!(level.monsters[0].last_known_player_pos, Some(player.position));
        assert!(moved.chebyshev_distance(player.position) < start.chebyshev_distance(player.position));
    }

    #[test]
    fn test_memory_decays_to_fallback_state() {
        let mut level = LevelState::new(room(40, 10), vec![monster(MonsterBehavior::Wanderer, Position::new(2, 5))], Vec::new());
        let mut player = player_at(Position::new(6, 5));
        let mut rng = StdRng::seed_from_u64(5);

        run_monster_turns(&mut level, &mut player, &mut rng);
        assert_eq!(level.monsters[0].memory_counter, MonsterBehavior::Wanderer.memory_turns());

        // The player vanishes far out of range.
        player.position = Position::new(38, 8);
        level.grid.set_kind(player.position, TileKind::Floor).unwrap();
        let memory = MonsterBehavior::Wanderer.memory_turns();
        for turn in 1..=memory {
            run_monster_turns(&mut level, &mut player, &mut rng);
            assert_eq!(level.monsters[0].ai_state, AiState::Chasing, "turn {}", turn);
        }
        assert!(!level.monsters[0].has_memory());

        run_monster_turns(&mut level, &mut player, &mut rng);
        assert_eq!(level.monsters[0].ai_state, AiState::Wandering);
    }

    #[test]
    fn test_guard_patrols_its_route() {
        let grid = room(30, 20);
        let mut guard = monster(MonsterBehavior::Guard, Position::new(10, 10));
        let mut rng = StdRng::seed_from_u64(3);
        initialize_ai(&mut guard, &grid, &mut rng);

        assert_eq!(guard.ai_state, AiState::Patrolling);
        assert_eq!(guard.patrol_points.len(), PATROL_POINTS);
        assert_eq!(guard.patrol_points[0], Position::new(10, 10));
        for point in &guard.patrol_points {
            assert!(point.chebyshev_distance(Position::new(10, 10)) <= PATROL_RADIUS as u32);
            assert_eq!(grid.kind_at(*point), Some(TileKind::Floor));
        }

        let mut level = LevelState::new(grid, vec![guard], Vec::new());
        let mut player = player_at(Position::new(1, 1));
        // Out of detection range (9² + 9² > 6²)
        let mut visited_index = std::collections::HashSet::new();
        for _ in 0..40 {
            run_monster_turns(&mut level, &mut player, &mut rng);
            assert_eq!(level.monsters[0].ai_state, AiState::Patrolling);
            visited_index.insert(level.monsters[0].patrol_index);
        }
        assert!(visited_index.len() > 1);
    }

    #[test]
    fn test_wanderer_stays_on_passable_tiles() {
        let grid = room(8, 8);
        let mut level = LevelState::new(grid, vec![monster(MonsterBehavior::Wanderer, Position::new(3, 3))], Vec::new());
        let mut player = player_at(Position::new(1, 1));
        level.monsters[0].detection_range = 0;
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..50 {
            run_monster_turns(&mut level, &mut player, &mut rng);
            let pos = level.monsters[0].position;
            assert!(level.grid.is_passable(pos));
            assert_ne!(pos, player.position);
        }
    }

    #[test]
    fn test_dead_player_stops_the_pass() {
        let mut level = LevelState::new(
            room(10, 10),
            vec![
                monster(MonsterBehavior::Wanderer, Position::new(4, 4)),
                monster(MonsterBehavior::Wanderer, Position::new(6, 6)),
            ],
            Vec::new(),
        );
        let mut player = player_at(Position::new(5, 5));
        player.hp = 1;
        let mut rng = StdRng::seed_from_u64(2);
        let attacks = run_monster_turns(&mut level, &mut player, &mut rng);
        assert_eq!(attacks.len(), 1);
        assert!(!player.is_alive());
    }
}
