//! # Encounter Generation
//!
//! Monster templates and the randomized, collision-checked scattering of
//! monsters and items into a room.

use crate::{
    initialize_ai, is_blocked, new_entity_id, Difficulty, GroundItem, ItemPool, Monster,
    MonsterBehavior, MonsterTemplate, Position, Room, TileGrid, TileKind,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Attempts at finding a free cell for one entity before it is skipped.
pub const PLACEMENT_ATTEMPTS: usize = 10;

/// Every monster the dungeon can spawn.
pub const MONSTER_TEMPLATES: &[MonsterTemplate] = &[
    MonsterTemplate {
        name: "Rat",
        hp: 4,
        attack: 2,
        xp_value: 1,
        behavior: MonsterBehavior::Wanderer,
        min_depth: 1,
    },
    MonsterTemplate {
        name: "Goblin",
        hp: 8,
        attack: 3,
        xp_value: 3,
        behavior: MonsterBehavior::Wanderer,
        min_depth: 1,
    },
    MonsterTemplate {
        name: "Goblin Guard",
        hp: 10,
        attack: 4,
        xp_value: 4,
        behavior: MonsterBehavior::Guard,
        min_depth: 1,
    },
    MonsterTemplate {
        name: "Orc",
        hp: 14,
        attack: 5,
        xp_value: 6,
        behavior: MonsterBehavior::Wanderer,
        min_depth: 2,
    },
    MonsterTemplate {
        name: "Orc Sentry",
        hp: 16,
        attack: 5,
        xp_value: 7,
        behavior: MonsterBehavior::Guard,
        min_depth: 3,
    },
    MonsterTemplate {
        name: "Goblin Warlord",
        hp: 28,
        attack: 7,
        xp_value: 20,
        behavior: MonsterBehavior::Boss,
        min_depth: 3,
    },
    MonsterTemplate {
        name: "Troll",
        hp: 24,
        attack: 7,
        xp_value: 12,
        behavior: MonsterBehavior::Wanderer,
        min_depth: 4,
    },
    MonsterTemplate {
        name: "Dragon",
        hp: 50,
        attack: 10,
        xp_value: 50,
        behavior: MonsterBehavior::Boss,
        min_depth: 6,
    },
];

/// Templates that may appear at `depth`.
pub fn templates_for_depth(depth: u32) -> Vec<&'static MonsterTemplate> {
    MONSTER_TEMPLATES
        .iter()
        .filter(|template| template.min_depth <= depth.max(1))
        .collect()
}

/// How a room should be populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementOptions {
    pub depth: u32,
    pub difficulty: Difficulty,
    /// Special rooms hold more monsters and draw from the enhanced item pool.
    pub is_special: bool,
}

impl PlacementOptions {
    pub fn normal(depth: u32, difficulty: Difficulty) -> Self {
        Self {
            depth,
            difficulty,
            is_special: false,
        }
    }

    pub fn special(depth: u32, difficulty: Difficulty) -> Self {
        Self {
            is_special: true,
            ..Self::normal(depth, difficulty)
        }
    }
}

/// Scatters monsters and items into `room`.
///
/// Each entity gets up to [`PLACEMENT_ATTEMPTS`] random interior cells; a cell
/// is taken only if it is plain floor and the blocking query, items included,
/// reports it free. Entities that find no cell are skipped.
pub fn place_entities(
    grid: &TileGrid,
    monsters: &mut Vec<Monster>,
    items: &mut Vec<GroundItem>,
    player: Position,
    room: &Room,
    options: PlacementOptions,
    rng: &mut StdRng,
) {
    let monster_count = if options.is_special {
        rng.gen_range(0..=3)
    } else {
        rng.gen_range(0..=2)
    };
    let item_count = if options.is_special {
        rng.gen_range(2..=4)
    } else {
        rng.gen_range(0..=2)
    };

    let templates = templates_for_depth(options.depth);
    for _ in 0..monster_count {
        let Some(position) = find_free_cell(grid, monsters, items, player, room, rng) else {
            continue;
        };
        let Some(template) = templates.choose(rng) else {
            break;
        };
        let mut monster =
            Monster::from_template(new_entity_id(rng), template, position, options.difficulty);
        initialize_ai(&mut monster, grid, rng);
        monsters.push(monster);
    }

    let pool = if options.is_special {
        ItemPool::Enhanced
    } else {
        ItemPool::Basic
    };
    for _ in 0..item_count {
        if let Some(position) = find_free_cell(grid, monsters, items, player, room, rng) {
            items.push(GroundItem::new(pool.roll(rng), position));
        }
    }
}

/// Samples a free interior floor cell of `room`, giving up after
/// [`PLACEMENT_ATTEMPTS`] tries.
pub fn find_free_cell(
    grid: &TileGrid,
    monsters: &[Monster],
    items: &[GroundItem],
    player: Position,
    room: &Room,
    rng: &mut StdRng,
) -> Option<Position> {
    if room.inner_area() == 0 {
        return None;
    }
    let bottom_right = room.bottom_right();
    for _ in 0..PLACEMENT_ATTEMPTS {
        let pos = Position::new(
            rng.gen_range(room.top_left.x + 1..bottom_right.x),
            rng.gen_range(room.top_left.y + 1..bottom_right.y),
        );
        if grid.kind_at(pos) == Some(TileKind::Floor)
            && !is_blocked(grid, monsters, player, pos, Some(items))
        {
            return Some(pos);
        }
    }
    None
}

/// Picks a free interior floor cell of `room` uniformly among all of them.
///
/// Used for keys, which must not be lost to unlucky sampling.
pub fn any_free_cell(
    grid: &TileGrid,
    monsters: &[Monster],
    items: &[GroundItem],
    player: Position,
    room: &Room,
    rng: &mut StdRng,
) -> Option<Position> {
    let candidates: Vec<Position> = room
        .floor_positions()
        .into_iter()
        .filter(|&pos| {
            grid.kind_at(pos) == Some(TileKind::Floor)
                && !is_blocked(grid, monsters, player, pos, Some(items))
        })
        .collect();
    candidates.choose(rng).copied()
}
