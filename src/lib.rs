//! # Delve
//!
//! A turn-based dungeon crawler engine: procedural room/corridor levels,
//! field of view, monster AI and a turn-ordered interaction loop.
//!
//! ## Architecture Overview
//!
//! The engine core is headless. A presentation layer drives it through a small
//! command surface and reads structured state back:
//!
//! - **Game State**: [`GameState`] owns the run and resolves one [`Action`] per call
//! - **World**: [`TileGrid`] of typed cells plus a [`FieldOfView`] per map
//! - **Entities**: [`Player`], [`Monster`] and [`GroundItem`]
//! - **Generation**: [`RoomCorridorGenerator`] and [`SpecialRoomGenerator`]
//! - **Systems**: the [`is_blocked`] query, monster AI, combat and item effects
//!
//! Every random decision flows through a single seeded `StdRng`, so a run is
//! fully reproducible from its seed.

pub mod game;
pub mod generation;
pub mod input;
pub mod utils;

pub use game::*;
pub use generation::*;
pub use input::*;

/// Core error type for the Delve engine.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default map width in tiles
    pub const MAP_WIDTH: u32 = 60;

    /// Default map height in tiles
    pub const MAP_HEIGHT: u32 = 40;

    /// Attempts at placing a room per level
    pub const MAX_ROOMS: u32 = 10;

    /// Smallest room side, wall ring included
    pub const ROOM_MIN_SIZE: u32 = 6;

    /// Largest room side, wall ring included
    pub const ROOM_MAX_SIZE: u32 = 12;

    /// Chance that a level gets a keyed special room
    pub const SPECIAL_ROOM_CHANCE: f64 = 0.5;

    /// Chance that the exit is behind a locked door
    pub const LOCKED_EXIT_CHANCE: f64 = 0.25;

    /// Chance that a corridor opening in a room wall becomes a door
    pub const DOOR_CHANCE: f64 = 0.3;

    /// Player sight radius
    pub const FOV_RADIUS: i32 = 8;

    /// Messages kept in the log
    pub const MESSAGE_LOG_CAPACITY: usize = 6;

    /// Descending past this depth wins the run
    pub const FINAL_DEPTH: u32 = 10;

    /// Experience per level: reaching level `n + 1` needs `n * XP_PER_LEVEL`
    pub const XP_PER_LEVEL: u32 = 10;

    pub const LEVEL_UP_HP: i32 = 5;
    pub const LEVEL_UP_ATTACK: i32 = 2;
    pub const LEVEL_UP_DEFENSE: i32 = 1;

    /// Monster sight radius
    pub const DETECTION_RANGE: i32 = 6;

    pub const BOSS_DETECTION_RANGE: i32 = 10;

    /// Turns a monster keeps chasing after losing sight of the player
    pub const MEMORY_TURNS: u32 = 5;

    pub const BOSS_MEMORY_TURNS: u32 = 10;
}
