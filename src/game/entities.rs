//! # Entities
//!
//! The player, monsters and items lying on the ground.

use crate::{config, CharacterClass, Difficulty, EntityId, ItemId, Position};
use serde::{Deserialize, Serialize};

/// The player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub position: Position,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub gold: u32,
    pub xp: u32,
    pub level: u32,
    pub class: CharacterClass,
    /// Carried items in pickup order.
    pub inventory: Vec<ItemId>,
}

impl Player {
    /// Creates a level 1 player of the given class.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{CharacterClass, Difficulty, Player, Position};
    ///
    /// let player = Player::new(CharacterClass::Warrior, Difficulty::Normal, Position::new(3, 4));
    /// assert_eq!(player.level, 1);
    /// assert_eq!(player.hp, player.max_hp);
    /// assert!(player.is_alive());
    /// ```
    pub fn new(class: CharacterClass, difficulty: Difficulty, position: Position) -> Self {
        let stats = class.base_stats();
        let max_hp = (stats.max_hp + difficulty.player_hp_bonus()).max(1);
        Self {
            position,
            hp: max_hp,
            max_hp,
            attack: stats.attack,
            defense: stats.defense,
            gold: 0,
            xp: 0,
            level: 1,
            class,
            inventory: class.starting_inventory(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Restores hit points without exceeding the maximum, returning the
    /// amount actually healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        self.hp - before
    }

    pub fn has_item(&self, item: ItemId) -> bool {
        self.inventory.contains(&item)
    }

    /// Removes the first instance of `item`, returning whether one was found.
    pub fn take_item(&mut self, item: ItemId) -> bool {
        match self.inventory.iter().position(|&carried| carried == item) {
            Some(index) => {
                self.inventory.remove(index);
                true
            }
            None => false,
        }
    }

    /// Experience needed to reach the next level.
    pub fn xp_to_next_level(&self) -> u32 {
        self.level * config::XP_PER_LEVEL
    }
}

/// Behaviour state of a monster's AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiState {
    Wandering,
    Patrolling,
    Chasing,
}

/// Behaviour class assigned from a monster's template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterBehavior {
    /// Roams randomly until it spots the player.
    Wanderer,
    /// Walks a loop of waypoints around its spawn point.
    Guard,
    /// Long sight and long memory.
    Boss,
}

impl MonsterBehavior {
    pub fn detection_range(self) -> i32 {
        match self {
            MonsterBehavior::Boss => config::BOSS_DETECTION_RANGE,
            MonsterBehavior::Wanderer | MonsterBehavior::Guard => config::DETECTION_RANGE,
        }
    }

    pub fn memory_turns(self) -> u32 {
        match self {
            MonsterBehavior::Boss => config::BOSS_MEMORY_TURNS,
            MonsterBehavior::Wanderer | MonsterBehavior::Guard => config::MEMORY_TURNS,
        }
    }
}

/// A hostile creature on the current level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub id: EntityId,
    pub name: String,
    pub position: Position,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub xp_value: u32,
    pub behavior: MonsterBehavior,
    pub ai_state: AiState,
    pub detection_range: i32,
    pub last_known_player_pos: Option<Position>,
    pub memory_counter: u32,
    pub patrol_points: Vec<Position>,
    pub patrol_index: usize,
}

impl Monster {
    /// Creates a monster from a template, scaled for difficulty.
    pub fn from_template(
        id: EntityId,
        template: &MonsterTemplate,
        position: Position,
        difficulty: Difficulty,
    ) -> Self {
        let max_hp = (template.hp * difficulty.monster_hp_percent() as i32 / 100).max(1);
        Self {
            id,
            name: template.name.to_string(),
            position,
            hp: max_hp,
            max_hp,
            attack: (template.attack + difficulty.monster_attack_bonus()).max(1),
            xp_value: template.xp_value,
            behavior: template.behavior,
            ai_state: AiState::Wandering,
            detection_range: template.behavior.detection_range(),
            last_known_player_pos: None,
            memory_counter: 0,
            patrol_points: Vec::new(),
            patrol_index: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Whether the monster still remembers where it last saw the player.
    pub fn has_memory(&self) -> bool {
        self.memory_counter > 0 && self.last_known_player_pos.is_some()
    }
}

/// Static description a monster is stamped from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonsterTemplate {
    pub name: &'static str,
    pub hp: i32,
    pub attack: i32,
    pub xp_value: u32,
    pub behavior: MonsterBehavior,
    /// Shallowest dungeon depth the monster appears at
    pub min_depth: u32,
}

/// An item lying on the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundItem {
    pub position: Position,
    pub item: ItemId,
}

impl GroundItem {
    pub fn new(item: ItemId, position: Position) -> Self {
        Self { position, item }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::new_entity_id;
    use rand::{rngs::StdRng, SeedableRng};

    fn template() -> MonsterTemplate {
        MonsterTemplate {
            name: "Goblin",
            hp: 8,
            attack: 3,
            xp_value: 3,
            behavior: MonsterBehavior::Wanderer,
            min_depth: 1,
        }
    }

    #[test]
    fn test_player_heal_is_capped() {
        let mut player = Player::new(CharacterClass::Warrior, Difficulty::Normal, Position::new(0, 0));
        player.hp = player.max_hp - 2;
        assert_eq!(player.heal(10), 2);
        assert_eq!(player.hp, player.max_hp);
        assert_eq!(player.heal(-5), 0);
    }

    #[test]
    fn test_player_inventory_take() {
        let mut player = Player::new(CharacterClass::Cleric, Difficulty::Normal, Position::new(0, 0));
        assert_eq!(player.inventory, vec![ItemId::HealingPotion, ItemId::HealingPotion]);
        assert!(player.take_item(ItemId::HealingPotion));
        assert_eq!(player.inventory.len(), 1);
        assert!(!player.take_item(ItemId::Key));
    }

    #[test]
    fn test_difficulty_scales_monsters() {
        let mut rng = StdRng::seed_from_u64(1);
        let easy = Monster::from_template(new_entity_id(&mut rng), &template(), Position::new(1, 1), Difficulty::Easy);
        let hard = Monster::from_template(new_entity_id(&mut rng), &template(), Position::new(1, 1), Difficulty::Hard);
        assert_eq!(easy.max_hp, 6);
        assert_eq!(hard.max_hp, 12);
        assert_eq!(easy.attack, 2);
        assert_eq!(hard.attack, 5);
        assert_eq!(hard.ai_state, AiState::Wandering);
        assert!(!hard.has_memory());
    }

    #[test]
    fn test_boss_sees_further() {
        assert!(MonsterBehavior::Boss.detection_range() > MonsterBehavior::Guard.detection_range());
        assert!(MonsterBehavior::Boss.memory_turns() > MonsterBehavior::Wanderer.memory_turns());
    }
}
