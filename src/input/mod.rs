//! # Input Module
//!
//! Turns typed commands into player inputs and game actions.

pub mod commands;

pub use commands::*;

use crate::{Action, DelveError, DelveResult, Direction};

/// Input handler for processing player commands.
///
/// Reads one command word per line, so the headless driver can be scripted
/// from a file as easily as typed at a terminal.
pub struct InputHandler {
    /// Whether to enable Vi-style movement keys (hjkl yubn)
    pub vi_keys_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Action, Direction, InputHandler, PlayerInput};
    ///
    /// let input = InputHandler::new();
    /// assert_eq!(
    ///     input.parse("k").unwrap(),
    ///     Some(PlayerInput::Act(Action::Move(Direction::North)))
    /// );
    /// ```
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: true,
        }
    }

    /// Parses one line of input.
    ///
    /// Blank lines yield `Ok(None)`. Unknown words are an
    /// [`DelveError::InvalidAction`] so the driver can tell the player.
    pub fn parse(&self, line: &str) -> DelveResult<Option<PlayerInput>> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Ok(None);
        };
        let word = word.to_ascii_lowercase();

        if let Some(direction) = self.direction_for(&word) {
            return Ok(Some(PlayerInput::Act(Action::Move(direction))));
        }

        let input = match word.as_str() {
            "." | "wait" => PlayerInput::Act(Action::Wait),
            "r" | "rest" => PlayerInput::Act(Action::Rest),
            "i" | "inv" | "inventory" => PlayerInput::Act(Action::ToggleInventory),
            "e" | "use" => PlayerInput::Act(Action::UseSelectedItem),
            "o" | "open" => PlayerInput::Act(Action::OpenDoor),
            "sel" | "select" => {
                let slot = words.next().ok_or_else(|| {
                    DelveError::InvalidAction("select needs a slot number".to_string())
                })?;
                PlayerInput::Act(Action::SelectItem(parse_slot(slot)?))
            }
            "m" | "map" => PlayerInput::ShowMap,
            "?" | "help" => PlayerInput::Help,
            "new" => PlayerInput::NewGame,
            "q" | "quit" | "exit" => PlayerInput::Quit,
            digit if digit.len() == 1 && digit.as_bytes()[0].is_ascii_digit() => {
                PlayerInput::Act(Action::SelectItem(parse_slot(digit)?))
            }
            other => {
                return Err(DelveError::InvalidAction(format!(
                    "unknown command '{}', type ? for help",
                    other
                )))
            }
        };
        Ok(Some(input))
    }

    fn direction_for(&self, word: &str) -> Option<Direction> {
        let direction = match word {
            "n" | "north" | "w" => Direction::North,
            "s" | "south" => Direction::South,
            "east" | "d" => Direction::East,
            "west" | "a" => Direction::West,
            "ne" | "northeast" => Direction::Northeast,
            "nw" | "northwest" => Direction::Northwest,
            "se" | "southeast" => Direction::Southeast,
            "sw" | "southwest" => Direction::Southwest,
            _ if self.vi_keys_enabled => match word {
                "k" => Direction::North,
                "j" => Direction::South,
                "l" => Direction::East,
                "h" => Direction::West,
                "u" => Direction::Northeast,
                "y" => Direction::Northwest,
                "b" => Direction::Southwest,
                // vi's "n" already means north here
                _ => return None,
            },
            _ => return None,
        };
        Some(direction)
    }
}

/// Slots are shown to the player starting at 1.
fn parse_slot(text: &str) -> DelveResult<usize> {
    match text.parse::<usize>() {
        Ok(slot) if slot >= 1 => Ok(slot - 1),
        _ => Err(DelveError::InvalidAction(format!(
            "'{}' is not an inventory slot",
            text
        ))),
    }
}

/// Player input types that can be processed by the input handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerInput {
    /// A game action
    Act(Action),
    /// Print the map again
    ShowMap,
    /// Show help information
    Help,
    /// Start a new game (when game has ended)
    NewGame,
    /// Quit the game
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_words() {
        let input = InputHandler::new();
        assert_eq!(
            input.parse("north").unwrap(),
            Some(PlayerInput::Act(Action::Move(Direction::North)))
        );
        assert_eq!(
            input.parse("  SE ").unwrap(),
            Some(PlayerInput::Act(Action::Move(Direction::Southeast)))
        );
        assert_eq!(
            input.parse("h").unwrap(),
            Some(PlayerInput::Act(Action::Move(Direction::West)))
        );
    }

    #[test]
    fn test_vi_keys_can_be_disabled() {
        let input = InputHandler {
            vi_keys_enabled: false,
        };
        assert!(input.parse("h").is_err());
        assert!(input.parse("west").is_ok());
    }

    #[test]
    fn test_slots_are_one_based() {
        let input = InputHandler::new();
        assert_eq!(
            input.parse("3").unwrap(),
            Some(PlayerInput::Act(Action::SelectItem(2)))
        );
        assert_eq!(
            input.parse("select 1").unwrap(),
            Some(PlayerInput::Act(Action::SelectItem(0)))
        );
        assert!(input.parse("0").is_err());
        assert!(input.parse("select").is_err());
    }

    #[test]
    fn test_meta_commands() {
        let input = InputHandler::new();
        assert_eq!(input.parse("").unwrap(), None);
        assert_eq!(input.parse("q").unwrap(), Some(PlayerInput::Quit));
        assert_eq!(input.parse("?").unwrap(), Some(PlayerInput::Help));
        assert!(matches!(
            input.parse("dance"),
            Err(DelveError::InvalidAction(_))
        ));
    }
}
