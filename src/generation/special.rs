//! # Special Room Generation
//!
//! Builds the self-contained map behind a special door: one room on an
//! otherwise solid grid, a way back out, and richer loot than the main level.

use crate::{
    place_entities, Difficulty, DelveError, DelveResult, Direction, GenerationConfig, Generator,
    GroundItem, Monster, PlacementOptions, Position, Room, TileGrid, TileKind,
};
use rand::rngs::StdRng;

/// A special door and the rectangle it leads into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialRoomPlan {
    /// Wall cell carrying the SpecialDoor on the main level
    pub door: Position,
    pub room: Room,
}

impl SpecialRoomPlan {
    /// Direction pointing from the door into the room.
    pub fn inward(&self) -> Direction {
        let bottom_right = self.room.bottom_right();
        if self.door.x == self.room.top_left.x {
            Direction::East
        } else if self.door.x == bottom_right.x {
            Direction::West
        } else if self.door.y == self.room.top_left.y {
            Direction::South
        } else {
            Direction::North
        }
    }
}

/// Content of a freshly generated special room.
#[derive(Debug, Clone)]
pub struct GeneratedSpecialRoom {
    pub grid: TileGrid,
    pub room: Room,
    pub monsters: Vec<Monster>,
    pub items: Vec<GroundItem>,
    /// The SpecialExit tile, just inside the door
    pub exit: Position,
    /// Where the player appears on entry
    pub entry: Position,
}

/// Generator for the map behind one special door.
///
/// The room keeps its main-level coordinates on a grid of the same size, so a
/// renderer can draw either map with one camera.
#[derive(Debug, Clone)]
pub struct SpecialRoomGenerator {
    pub plan: SpecialRoomPlan,
    pub depth: u32,
    pub difficulty: Difficulty,
}

impl SpecialRoomGenerator {
    pub fn new(plan: SpecialRoomPlan, depth: u32, difficulty: Difficulty) -> Self {
        Self {
            plan,
            depth,
            difficulty,
        }
    }
}

impl Generator<GeneratedSpecialRoom> for SpecialRoomGenerator {
    fn generate(
        &self,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> DelveResult<GeneratedSpecialRoom> {
        let room = self.plan.room;
        let mut grid = TileGrid::new(config.width, config.height);
        for pos in room.floor_positions() {
            grid.set_kind(pos, TileKind::Floor)?;
        }

        let inward = self.plan.inward().to_delta();
        let exit = self.plan.door + inward;
        let entry = exit + inward;
        grid.set_kind(exit, TileKind::SpecialExit)?;

        let mut monsters = Vec::new();
        let mut items = Vec::new();
        place_entities(
            &grid,
            &mut monsters,
            &mut items,
            entry,
            &room,
            PlacementOptions::special(self.depth, self.difficulty),
            rng,
        );

        let special = GeneratedSpecialRoom {
            grid,
            room,
            monsters,
            items,
            exit,
            entry,
        };
        self.validate(&special, config)?;
        log::debug!(
            "generated special room behind {}: {} monsters, {} items",
            self.plan.door,
            special.monsters.len(),
            special.items.len()
        );
        Ok(special)
    }

    fn validate(&self, content: &GeneratedSpecialRoom, _config: &GenerationConfig) -> DelveResult<()> {
        if !content.room.contains_interior(content.entry) {
            return Err(DelveError::GenerationFailed(format!(
                "special room entry {} lies outside the room",
                content.entry
            )));
        }
        if content.grid.kind_at(content.exit) != Some(TileKind::SpecialExit) {
            return Err(DelveError::GenerationFailed(
                "special room has no exit".to_string(),
            ));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "SpecialRoomGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ENHANCED_ITEM_POOL;
    use rand::SeedableRng;

    fn plan() -> SpecialRoomPlan {
        SpecialRoomPlan {
            door: Position::new(10, 13),
            room: Room::new(Position::new(10, 10), 8, 7),
        }
    }

    #[test]
    fn test_inward_direction_per_wall() {
        let room = Room::new(Position::new(10, 10), 8, 7);
        let at = |door| SpecialRoomPlan { door, room }.inward();
        assert_eq!(at(Position::new(10, 13)), Direction::East);
        assert_eq!(at(Position::new(17, 13)), Direction::West);
        assert_eq!(at(Position::new(13, 10)), Direction::South);
        assert_eq!(at(Position::new(13, 16)), Direction::North);
    }

    #[test]
    fn test_special_room_layout() {
        let config = GenerationConfig::for_testing(1);
        let mut rng = StdRng::seed_from_u64(1);
        let special = SpecialRoomGenerator::new(plan(), 2, Difficulty::Normal)
            .generate(&config, &mut rng)
            .unwrap();

        assert_eq!(special.exit, Position::new(11, 13));
        assert_eq!(special.entry, Position::new(12, 13));
        assert_eq!(special.grid.kind_at(special.exit), Some(TileKind::SpecialExit));
        assert_eq!(special.grid.kind_at(Position::new(10, 13)), Some(TileKind::Wall));
        assert!(special.items.len() <= 4);
        assert!(special.items.iter().all(|i| ENHANCED_ITEM_POOL.contains(&i.item)));
        assert!(special.monsters.len() <= 3);
        for monster in &special.monsters {
            assert!(special.room.contains_interior(monster.position));
            assert_ne!(monster.position, special.entry);
        }

        // Nothing outside the rectangle is walkable.
        for pos in special.grid.positions() {
            if special.grid.is_passable(pos) {
                assert!(special.room.contains_interior(pos));
            }
        }
    }

    #[test]
    fn test_special_room_is_deterministic() {
        let config = GenerationConfig::for_testing(1);
        let generator = SpecialRoomGenerator::new(plan(), 3, Difficulty::Hard);
        let a = generator.generate(&config, &mut StdRng::seed_from_u64(77)).unwrap();
        let b = generator.generate(&config, &mut StdRng::seed_from_u64(77)).unwrap();
        assert_eq!(a.monsters, b.monsters);
        assert_eq!(a.items, b.items);
    }
}
