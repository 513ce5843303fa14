//! # Actions
//!
//! Player commands and how a command resolved.

use crate::Direction;
use serde::{Deserialize, Serialize};

/// A command issued by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Step, attack, pick up, or use a doorway in a direction.
    Move(Direction),
    Wait,
    /// Recover a little health.
    Rest,
    ToggleInventory,
    /// Moves the inventory cursor to a slot.
    SelectItem(usize),
    UseSelectedItem,
    /// Tries every orthogonally adjacent door.
    OpenDoor,
}

/// How an action resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    /// The action happened and the world advanced one turn.
    TurnTaken,
    /// The action happened without spending a turn.
    Free,
    /// Nothing changed apart from a message.
    Rejected,
}

impl ActionOutcome {
    pub fn took_turn(self) -> bool {
        self == ActionOutcome::TurnTaken
    }
}
