//! Scenario tests for turn resolution on hand-built and generated levels.

mod common;

use delve::{
    Action, ActionOutcome, CharacterClass, Difficulty, Direction, GameConfig, GameEvent, GameState,
    GroundItem, ItemId, LevelState, Monster, MonsterBehavior, MonsterTemplate, Outcome, Player,
    Position, RunState, TileGrid, TileKind,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashSet;

/// A walled 16x12 room.
fn room_grid() -> TileGrid {
    let mut grid = TileGrid::new(16, 12);
    for y in 1..11 {
        for x in 1..15 {
            grid.set_kind(Position::new(x, y), TileKind::Floor).unwrap();
        }
    }
    grid
}

fn game(grid: TileGrid, monsters: Vec<Monster>, player_at: Position) -> GameState {
    let player = Player::new(CharacterClass::Warrior, Difficulty::Normal, player_at);
    GameState::from_parts(
        GameConfig::for_testing(5),
        LevelState::new(grid, monsters, Vec::new()),
        Vec::new(),
        player,
        StdRng::seed_from_u64(5),
    )
    .unwrap()
}

fn monster(name: &'static str, hp: i32, xp: u32, at: Position) -> Monster {
    let template = MonsterTemplate {
        name,
        hp,
        attack: 2,
        xp_value: xp,
        behavior: MonsterBehavior::Wanderer,
        min_depth: 1,
    };
    let mut rng = StdRng::seed_from_u64(u64::from(xp));
    Monster::from_template(delve::new_entity_id(&mut rng), &template, at, Difficulty::Normal)
}

#[test]
fn test_level_up_after_kill() {
    let mut state = game(
        room_grid(),
        vec![monster("Goblin", 1, 5, Position::new(6, 5))],
        Position::new(5, 5),
    );
    state.player_mut().xp = 9;
    let before = state.player().clone();

    assert_eq!(
        state.perform(Action::Move(Direction::East)).unwrap(),
        ActionOutcome::TurnTaken
    );

    let player = state.player();
    assert_eq!(player.level, 2);
    assert_eq!(player.xp, 14);
    assert_eq!(player.max_hp, before.max_hp + 5);
    assert_eq!(player.hp, player.max_hp);
    assert_eq!(player.attack, before.attack + 2);
    assert_eq!(player.defense, before.defense + 1);
    assert!(state.monsters().is_empty());
}

#[test]
fn test_locked_door_needs_key() {
    let mut grid = room_grid();
    grid.set_kind(Position::new(6, 5), TileKind::LockedDoor).unwrap();
    let mut state = game(grid, Vec::new(), Position::new(5, 5));

    // Walking into it is refused without a turn.
    assert_eq!(
        state.perform(Action::Move(Direction::East)).unwrap(),
        ActionOutcome::Rejected
    );
    assert_eq!(state.messages().latest(), Some("The door is locked."));

    // Opening without a key does nothing.
    assert_eq!(state.perform(Action::OpenDoor).unwrap(), ActionOutcome::Rejected);
    assert_eq!(state.grid().kind_at(Position::new(6, 5)), Some(TileKind::LockedDoor));

    state.player_mut().inventory.push(ItemId::Key);
    assert_eq!(state.perform(Action::OpenDoor).unwrap(), ActionOutcome::Free);
    assert_eq!(state.grid().kind_at(Position::new(6, 5)), Some(TileKind::Exit));
    assert!(!state.player().has_item(ItemId::Key));
    assert_eq!(state.turn(), 0);
    assert!(state
        .drain_events()
        .contains(&GameEvent::DoorUnlocked {
            at: Position::new(6, 5)
        }));

    // The unlocked door is now the way down.
    state.perform(Action::Move(Direction::East)).unwrap();
    assert_eq!(state.depth(), 2);
}

#[test]
fn test_open_door_ignores_diagonals() {
    let mut grid = room_grid();
    grid.set_kind(Position::new(6, 6), TileKind::LockedDoor).unwrap();
    let mut state = game(grid, Vec::new(), Position::new(5, 5));
    state.player_mut().inventory.push(ItemId::Key);

    assert_eq!(state.perform(Action::OpenDoor).unwrap(), ActionOutcome::Rejected);
    assert!(state.player().has_item(ItemId::Key));
}

#[test]
fn test_final_depth_exit_wins() {
    let mut grid = room_grid();
    grid.set_kind(Position::new(6, 5), TileKind::Exit).unwrap();
    let player = Player::new(CharacterClass::Warrior, Difficulty::Normal, Position::new(5, 5));
    let mut config = GameConfig::for_testing(5);
    config.final_depth = 1;
    let mut state = GameState::from_parts(
        config,
        LevelState::new(grid, Vec::new(), Vec::new()),
        Vec::new(),
        player,
        StdRng::seed_from_u64(5),
    )
    .unwrap();

    state.perform(Action::Move(Direction::East)).unwrap();

    assert_eq!(
        state.run_state(),
        RunState::GameOver {
            outcome: Outcome::Won
        }
    );
    assert!(state.drain_events().contains(&GameEvent::Victory));
    assert_eq!(state.perform(Action::Wait).unwrap(), ActionOutcome::Rejected);
}

#[test]
fn test_ironskin_expires_on_its_turn() {
    let mut state = game(room_grid(), Vec::new(), Position::new(5, 5));
    state.player_mut().inventory = vec![ItemId::PotionOfIronskin];
    state.perform(Action::Wait).unwrap();
    state.perform(Action::Wait).unwrap();
    let defense = state.player().defense;

    // Used on turn 2, so it lasts until turn 22.
    state.perform(Action::UseSelectedItem).unwrap();
    while state.turn() < 21 {
        state.perform(Action::Wait).unwrap();
    }
    assert_eq!(state.player().defense, defense + 3);

    state.perform(Action::Wait).unwrap();
    assert_eq!(state.turn(), 22);
    assert_eq!(state.player().defense, defense);
    assert!(state
        .drain_events()
        .contains(&GameEvent::EffectExpired {
            item: ItemId::PotionOfIronskin
        }));
}

#[test]
fn test_gold_goes_to_the_purse() {
    let mut state = game(room_grid(), Vec::new(), Position::new(5, 5));
    state
        .active_level_mut()
        .items
        .push(GroundItem::new(ItemId::Gold, Position::new(5, 6)));

    state.perform(Action::Move(Direction::South)).unwrap();

    assert!((1..=10).contains(&state.player().gold));
    assert!(!state.player().has_item(ItemId::Gold));
    assert!(state.items().is_empty());
}

/// Random command streams on generated levels: the turn counter moves exactly
/// when a turn is taken, and no two bodies ever share a cell.
#[test]
fn test_turn_counter_and_blocking_hold_under_random_play() {
    let actions = [
        Action::Move(Direction::North),
        Action::Move(Direction::South),
        Action::Move(Direction::East),
        Action::Move(Direction::West),
        Action::Move(Direction::Northeast),
        Action::Move(Direction::Southwest),
        Action::Wait,
        Action::Rest,
        Action::ToggleInventory,
        Action::SelectItem(0),
        Action::UseSelectedItem,
        Action::OpenDoor,
    ];

    for seed in 0..10 {
        let mut state = common::started_game(GameConfig::for_testing(seed));
        let mut rng = StdRng::seed_from_u64(seed + 1000);

        for _ in 0..300 {
            if !state.is_playing() {
                break;
            }
            let before = state.turn();
            let action = actions[rng.gen_range(0..actions.len())];
            let outcome = state.perform(action).unwrap();

            let expected = if outcome.took_turn() { before + 1 } else { before };
            assert_eq!(state.turn(), expected, "seed {} after {:?}", seed, action);

            let level = state.active_level();
            let mut occupied = HashSet::new();
            occupied.insert(state.player().position);
            assert!(level.grid.is_passable(state.player().position));
            for monster in &level.monsters {
                assert!(level.grid.is_passable(monster.position));
                assert!(
                    occupied.insert(monster.position),
                    "seed {}: two bodies on {}",
                    seed,
                    monster.position
                );
            }
        }
    }
}
