//! # Generation Module
//!
//! Procedural content generation for dungeon levels, special rooms and the
//! monsters and items scattered through them.
//!
//! Generation is driven entirely by the caller's `StdRng`; the same seed and
//! the same sequence of calls always reproduce the same dungeon.

pub mod dungeon;
pub mod encounters;
pub mod loot;
pub mod special;

pub use dungeon::*;
pub use encounters::*;
pub use loot::*;
pub use special::*;

use crate::{config, DelveResult, Position};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Configuration for procedural generation.
///
/// Controls map size, room dimensions and the odds of the optional
/// features. Missing fields in a JSON document fall back to [`GenerationConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Map width in tiles
    pub width: u32,
    /// Map height in tiles
    pub height: u32,
    /// Minimum room side, wall ring included
    pub min_room_size: u32,
    /// Maximum room side, wall ring included
    pub max_room_size: u32,
    /// Room placement attempts per level
    pub max_rooms: u32,
    /// Probability that a level gets a keyed special room (0.0 to 1.0)
    pub special_room_chance: f64,
    /// Probability that the exit sits behind a locked door (0.0 to 1.0)
    pub locked_exit_chance: f64,
    /// Probability that a corridor opening becomes a door (0.0 to 1.0)
    pub door_chance: f64,
}

impl GenerationConfig {
    /// Creates the default generation configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert!(config.min_room_size >= 3);
    /// assert!(config.max_room_size >= config.min_room_size);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: config::MAP_WIDTH,
            height: config::MAP_HEIGHT,
            min_room_size: config::ROOM_MIN_SIZE,
            max_room_size: config::ROOM_MAX_SIZE,
            max_rooms: config::MAX_ROOMS,
            special_room_chance: config::SPECIAL_ROOM_CHANCE,
            locked_exit_chance: config::LOCKED_EXIT_CHANCE,
            door_chance: config::DOOR_CHANCE,
        }
    }

    /// Creates a configuration for testing with smaller, simpler levels.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            width: 40,
            height: 30,
            min_room_size: 5,
            max_room_size: 8,
            max_rooms: 8,
            ..Self::new(seed)
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// A rectangular room in the dungeon.
///
/// The rectangle includes the room's wall ring; the walkable interior is the
/// rectangle shrunk by one cell on every side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    /// Top-left corner of the room
    pub top_left: Position,
    /// Width of the room (including walls)
    pub width: u32,
    /// Height of the room (including walls)
    pub height: u32,
}

impl Room {
    /// Creates a new room with the given parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Position, Room};
    ///
    /// let room = Room::new(Position::new(5, 5), 10, 8);
    /// assert_eq!(room.width, 10);
    /// assert_eq!(room.center(), Position::new(10, 9));
    /// ```
    pub fn new(top_left: Position, width: u32, height: u32) -> Self {
        Self {
            top_left,
            width,
            height,
        }
    }

    /// Gets the bottom-right corner of the room.
    pub fn bottom_right(&self) -> Position {
        Position::new(
            self.top_left.x + self.width as i32 - 1,
            self.top_left.y + self.height as i32 - 1,
        )
    }

    /// Gets the center position of the room.
    pub fn center(&self) -> Position {
        Position::new(
            self.top_left.x + self.width as i32 / 2,
            self.top_left.y + self.height as i32 / 2,
        )
    }

    /// Gets the inner area (excluding walls) of the room.
    pub fn inner_area(&self) -> u32 {
        if self.width >= 2 && self.height >= 2 {
            (self.width - 2) * (self.height - 2)
        } else {
            0
        }
    }

    /// Checks if a position is inside this room, walls included.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.top_left.x
            && pos.y >= self.top_left.y
            && pos.x < self.top_left.x + self.width as i32
            && pos.y < self.top_left.y + self.height as i32
    }

    /// Checks if a position lies strictly inside the wall ring.
    pub fn contains_interior(&self, pos: Position) -> bool {
        let bottom_right = self.bottom_right();
        pos.x > self.top_left.x
            && pos.y > self.top_left.y
            && pos.x < bottom_right.x
            && pos.y < bottom_right.y
    }

    /// Checks if a position is on the border of this room.
    pub fn is_border(&self, pos: Position) -> bool {
        self.contains(pos) && !self.contains_interior(pos)
    }

    /// Checks if a position is one of the four corners.
    pub fn is_corner(&self, pos: Position) -> bool {
        let bottom_right = self.bottom_right();
        (pos.x == self.top_left.x || pos.x == bottom_right.x)
            && (pos.y == self.top_left.y || pos.y == bottom_right.y)
    }

    /// Checks if this room overlaps with another room.
    pub fn overlaps(&self, other: &Room) -> bool {
        !(self.top_left.x >= other.top_left.x + other.width as i32
            || other.top_left.x >= self.top_left.x + self.width as i32
            || self.top_left.y >= other.top_left.y + other.height as i32
            || other.top_left.y >= self.top_left.y + self.height as i32)
    }

    /// Returns the room grown by `margin` cells on every side.
    pub fn expanded(&self, margin: u32) -> Room {
        Room::new(
            Position::new(
                self.top_left.x - margin as i32,
                self.top_left.y - margin as i32,
            ),
            self.width + 2 * margin,
            self.height + 2 * margin,
        )
    }

    /// Checks overlap after growing this room by `margin` cells.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Position, Room};
    ///
    /// let a = Room::new(Position::new(1, 1), 5, 5);
    /// let touching = Room::new(Position::new(6, 1), 5, 5);
    /// assert!(!a.overlaps(&touching));
    /// assert!(a.intersects(&touching, 1));
    /// ```
    pub fn intersects(&self, other: &Room, margin: u32) -> bool {
        self.expanded(margin).overlaps(other)
    }

    /// Gets all floor positions within this room.
    pub fn floor_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();

        for y in (self.top_left.y + 1)..(self.top_left.y + self.height as i32 - 1) {
            for x in (self.top_left.x + 1)..(self.top_left.x + self.width as i32 - 1) {
                positions.push(Position::new(x, y));
            }
        }

        positions
    }

    /// Gets all wall positions of this room.
    pub fn wall_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();

        // Top and bottom walls
        for x in self.top_left.x..(self.top_left.x + self.width as i32) {
            positions.push(Position::new(x, self.top_left.y));
            positions.push(Position::new(x, self.top_left.y + self.height as i32 - 1));
        }

        // Left and right walls (excluding corners already added)
        for y in (self.top_left.y + 1)..(self.top_left.y + self.height as i32 - 1) {
            positions.push(Position::new(self.top_left.x, y));
            positions.push(Position::new(self.top_left.x + self.width as i32 - 1, y));
        }

        positions
    }
}

/// Trait for procedural generators.
///
/// All generation systems implement this trait, so callers can drive them and
/// check their output the same way.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> DelveResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use crate::{DelveError, TileGrid};
    use ::pathfinding::prelude::bfs_reach;

    /// Every cell reachable from `start` over passable tiles, 8-connected.
    pub fn reachable_from(grid: &TileGrid, start: Position) -> std::collections::HashSet<Position> {
        bfs_reach(start, |&pos: &Position| {
            pos.adjacent_positions()
                .into_iter()
                .filter(|&next| grid.is_passable(next))
                .collect::<Vec<_>>()
        })
        .collect()
    }

    /// Validates that every room interior can be walked to from `spawn`.
    pub fn validate_level(grid: &TileGrid, spawn: Position, rooms: &[Room]) -> DelveResult<()> {
        if !grid.is_passable(spawn) {
            return Err(DelveError::GenerationFailed(format!(
                "spawn {} is not walkable",
                spawn
            )));
        }

        let reachable = reachable_from(grid, spawn);
        for (index, room) in rooms.iter().enumerate() {
            if let Some(cut_off) = room
                .floor_positions()
                .into_iter()
                .find(|pos| grid.is_passable(*pos) && !reachable.contains(pos))
            {
                return Err(DelveError::GenerationFailed(format!(
                    "room {} is not connected to the spawn (cell {})",
                    index, cut_off
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TileGrid, TileKind};
    use std::collections::HashSet;

    #[test]
    fn test_generation_config_creation() {
        let config = GenerationConfig::new(12345);
        assert_eq!(config.seed, 12345);
        assert_eq!(config.width, 60);
        assert_eq!(config.height, 40);
        assert!(config.min_room_size >= 3);
        assert!(config.max_room_size >= config.min_room_size);
    }

    #[test]
    fn test_room_geometry() {
        let room = Room::new(Position::new(5, 5), 10, 8);

        assert_eq!(room.bottom_right(), Position::new(14, 12));
        assert_eq!(room.center(), Position::new(10, 9));
        assert_eq!(room.inner_area(), 48); // (10-2) * (8-2)

        assert!(room.contains(Position::new(5, 5)));
        assert!(room.contains(Position::new(14, 12)));
        assert!(!room.contains(Position::new(15, 12)));

        assert!(room.is_border(Position::new(10, 5)));
        assert!(!room.is_border(Position::new(7, 7)));
        assert!(room.is_corner(Position::new(14, 5)));
        assert!(!room.is_corner(Position::new(10, 5)));
    }

    #[test]
    fn test_room_margin_intersection() {
        let room1 = Room::new(Position::new(5, 5), 6, 6);
        let gap_of_one = Room::new(Position::new(12, 5), 6, 6);
        let adjacent = Room::new(Position::new(11, 5), 6, 6);
        let far = Room::new(Position::new(30, 30), 5, 5);

        assert!(!room1.intersects(&gap_of_one, 1));
        assert!(room1.intersects(&adjacent, 1));
        assert!(!room1.overlaps(&adjacent));
        assert!(!room1.intersects(&far, 1));
    }

    #[test]
    fn test_room_positions() {
        let room = Room::new(Position::new(5, 5), 4, 4);

        let floor_positions = room.floor_positions();
        let wall_positions = room.wall_positions();

        // 4x4 room should have 2x2 = 4 floor tiles
        assert_eq!(floor_positions.len(), 4);

        // Should have 4*4 - 2*2 = 12 wall tiles
        assert_eq!(wall_positions.len(), 12);

        let floor_set: HashSet<_> = floor_positions.into_iter().collect();
        let wall_set: HashSet<_> = wall_positions.into_iter().collect();
        assert!(floor_set.is_disjoint(&wall_set));
        assert!(floor_set.iter().all(|&pos| room.contains_interior(pos)));
    }

    #[test]
    fn test_validate_level_detects_isolated_room() {
        let mut grid = TileGrid::new(20, 10);
        let left = Room::new(Position::new(1, 1), 5, 5);
        let right = Room::new(Position::new(10, 1), 5, 5);
        for pos in left.floor_positions().into_iter().chain(right.floor_positions()) {
            grid.set_kind(pos, TileKind::Floor).unwrap();
        }

        let result = utils::validate_level(&grid, left.center(), &[left, right]);
        assert!(result.is_err());

        for x in 5..=10 {
            grid.set_kind(Position::new(x, 3), TileKind::Floor).unwrap();
        }
        assert!(utils::validate_level(&grid, left.center(), &[left, right]).is_ok());
    }
}
