//! # Game Settings
//!
//! Runtime configuration, difficulty and character classes.

use crate::{config, DelveError, DelveResult, GenerationConfig, ItemId};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Runtime configuration for a run.
///
/// Every field has a default, so a JSON file only needs to list the values it
/// overrides.
///
/// # Examples
///
/// ```
/// use delve::GameConfig;
///
/// let config = GameConfig::from_json_str(r#"{ "fov_radius": 5 }"#).unwrap();
/// assert_eq!(config.fov_radius, 5);
/// assert_eq!(config.message_capacity, 6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Dungeon generation parameters
    pub generation: GenerationConfig,
    /// Player sight radius in tiles
    pub fov_radius: i32,
    /// Number of messages kept in the log
    pub message_capacity: usize,
    /// Descending past this depth wins the game
    pub final_depth: u32,
}

impl GameConfig {
    /// Creates the default configuration with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            generation: GenerationConfig::new(seed),
            fov_radius: config::FOV_RADIUS,
            message_capacity: config::MESSAGE_LOG_CAPACITY,
            final_depth: config::FINAL_DEPTH,
        }
    }

    /// Creates a configuration with smaller levels for tests.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            generation: GenerationConfig::for_testing(seed),
            ..Self::new(seed)
        }
    }

    /// Parses a configuration from JSON and validates it.
    pub fn from_json_str(json: &str) -> DelveResult<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    pub fn load(path: &Path) -> DelveResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Rejects configurations the generator or FOV engine cannot honour.
    pub fn validate(&self) -> DelveResult<()> {
        let gen = &self.generation;
        if gen.min_room_size < 3 {
            return Err(DelveError::Config(
                "min_room_size must leave room for a floor (>= 3)".to_string(),
            ));
        }
        if gen.max_room_size < gen.min_room_size {
            return Err(DelveError::Config(
                "max_room_size must be >= min_room_size".to_string(),
            ));
        }
        if gen.max_room_size + 2 >= gen.width.min(gen.height) {
            return Err(DelveError::Config(format!(
                "rooms of size {} do not fit a {}x{} map",
                gen.max_room_size, gen.width, gen.height
            )));
        }
        for (name, chance) in [
            ("special_room_chance", gen.special_room_chance),
            ("locked_exit_chance", gen.locked_exit_chance),
            ("door_chance", gen.door_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(DelveError::Config(format!("{} must be within 0..=1", name)));
            }
        }
        if self.fov_radius < 1 {
            return Err(DelveError::Config("fov_radius must be positive".to_string()));
        }
        if self.message_capacity == 0 {
            return Err(DelveError::Config(
                "message_capacity must be positive".to_string(),
            ));
        }
        if self.final_depth == 0 {
            return Err(DelveError::Config("final_depth must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Difficulty chosen when a new game starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Percentage applied to monster hit points.
    pub fn monster_hp_percent(self) -> u32 {
        match self {
            Difficulty::Easy => 75,
            Difficulty::Normal => 100,
            Difficulty::Hard => 150,
        }
    }

    /// Flat bonus added to monster attack.
    pub fn monster_attack_bonus(self) -> i32 {
        match self {
            Difficulty::Easy => -1,
            Difficulty::Normal => 0,
            Difficulty::Hard => 2,
        }
    }

    /// Extra starting hit points for the player.
    pub fn player_hp_bonus(self) -> i32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Normal => 0,
            Difficulty::Hard => -5,
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = DelveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(DelveError::Config(format!("unknown difficulty '{}'", other))),
        }
    }
}

/// Starting stats and kit for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CharacterClass {
    #[default]
    Warrior,
    Rogue,
    Cleric,
}

/// Base stats of a character class at level 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassStats {
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
}

impl CharacterClass {
    pub fn base_stats(self) -> ClassStats {
        match self {
            CharacterClass::Warrior => ClassStats {
                max_hp: 30,
                attack: 5,
                defense: 2,
            },
            CharacterClass::Rogue => ClassStats {
                max_hp: 24,
                attack: 6,
                defense: 1,
            },
            CharacterClass::Cleric => ClassStats {
                max_hp: 26,
                attack: 4,
                defense: 2,
            },
        }
    }

    pub fn starting_inventory(self) -> Vec<ItemId> {
        match self {
            CharacterClass::Warrior => vec![ItemId::HealingPotion],
            CharacterClass::Rogue => vec![ItemId::HealingPotion, ItemId::ScrollOfTeleport],
            CharacterClass::Cleric => vec![ItemId::HealingPotion, ItemId::HealingPotion],
        }
    }
}

impl std::str::FromStr for CharacterClass {
    type Err = DelveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "warrior" => Ok(CharacterClass::Warrior),
            "rogue" => Ok(CharacterClass::Rogue),
            "cleric" => Ok(CharacterClass::Cleric),
            other => Err(DelveError::Config(format!("unknown class '{}'", other))),
        }
    }
}
