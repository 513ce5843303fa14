//! # Events and Messages
//!
//! Structured events emitted by turn resolution, the bounded message log the
//! player reads, and the fire-and-forget sound sink.

use crate::{ItemId, Position};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Something that happened during a turn.
///
/// Events are queued on the game state and drained by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerMoved { from: Position, to: Position },
    PlayerBumped { at: Position },
    PlayerAttacked { target: String, damage: i32 },
    PlayerHit { attacker: String, damage: i32 },
    MonsterKilled { name: String, xp: u32, gold: u32 },
    ItemPickedUp { item: ItemId },
    GoldPickedUp { amount: u32 },
    ItemUsed { item: ItemId },
    EffectExpired { item: ItemId },
    DoorUnlocked { at: Position },
    EnteredSpecialRoom { door: Position },
    LeftSpecialRoom { door: Position },
    Descended { depth: u32 },
    LevelUp { level: u32 },
    PlayerDied,
    Victory,
}

impl GameEvent {
    /// The sound cue that accompanies this event, if any.
    pub fn sound(&self) -> Option<SoundEvent> {
        match self {
            GameEvent::PlayerAttacked { .. } => Some(SoundEvent::Hit),
            GameEvent::PlayerHit { .. } => Some(SoundEvent::Hurt),
            GameEvent::MonsterKilled { .. } => Some(SoundEvent::MonsterDeath),
            GameEvent::ItemPickedUp { .. } | GameEvent::GoldPickedUp { .. } => {
                Some(SoundEvent::Pickup)
            }
            GameEvent::ItemUsed { .. } => Some(SoundEvent::UseItem),
            GameEvent::DoorUnlocked { .. }
            | GameEvent::EnteredSpecialRoom { .. }
            | GameEvent::LeftSpecialRoom { .. } => Some(SoundEvent::Door),
            GameEvent::Descended { .. } => Some(SoundEvent::Stairs),
            GameEvent::LevelUp { .. } => Some(SoundEvent::LevelUp),
            GameEvent::PlayerDied => Some(SoundEvent::GameOver),
            GameEvent::Victory => Some(SoundEvent::Victory),
            GameEvent::PlayerBumped { .. } => Some(SoundEvent::Bump),
            GameEvent::PlayerMoved { .. } | GameEvent::EffectExpired { .. } => None,
        }
    }
}

/// Named sound cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEvent {
    Bump,
    Hit,
    Hurt,
    MonsterDeath,
    Pickup,
    UseItem,
    Door,
    Stairs,
    LevelUp,
    GameOver,
    Victory,
}

impl SoundEvent {
    pub fn name(self) -> &'static str {
        match self {
            SoundEvent::Bump => "bump",
            SoundEvent::Hit => "hit",
            SoundEvent::Hurt => "hurt",
            SoundEvent::MonsterDeath => "monster_death",
            SoundEvent::Pickup => "pickup",
            SoundEvent::UseItem => "use_item",
            SoundEvent::Door => "door",
            SoundEvent::Stairs => "stairs",
            SoundEvent::LevelUp => "level_up",
            SoundEvent::GameOver => "game_over",
            SoundEvent::Victory => "victory",
        }
    }
}

/// Receiver for sound cues. The engine never waits on it.
pub trait SoundSink {
    fn play(&mut self, sound: SoundEvent);
}

/// Sink that discards every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSoundSink;

impl SoundSink for NullSoundSink {
    fn play(&mut self, _sound: SoundEvent) {}
}

/// Ring buffer of player-facing messages; the oldest drop silently.
///
/// # Examples
///
/// ```
/// use delve::MessageLog;
///
/// let mut log = MessageLog::new(2);
/// log.push("one");
/// log.push("two");
/// log.push("three");
/// assert_eq!(log.iter().collect::<Vec<_>>(), vec!["two", "three"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    capacity: usize,
    messages: VecDeque<String>,
    /// Messages pushed over the log's lifetime, dropped ones included
    #[serde(default)]
    total: u64,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            messages: VecDeque::with_capacity(capacity),
            total: 0,
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("message: {}", message);
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
        self.total += 1;
    }

    /// Count of every message ever pushed. Lets a reader find out how many of
    /// the retained messages it has not seen yet.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Retained messages pushed after the reader had seen `seen` in total.
    pub fn since(&self, seen: u64) -> impl Iterator<Item = &str> {
        let fresh = usize::try_from(self.total.saturating_sub(seen))
            .unwrap_or(usize::MAX)
            .min(self.messages.len());
        self.messages
            .iter()
            .skip(self.messages.len() - fresh)
            .map(String::as_str)
    }

    /// Messages from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn latest(&self) -> Option<&str> {
        self.messages.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_drops_oldest_at_capacity() {
        let mut log = MessageLog::new(6);
        for i in 0..10 {
            log.push(format!("message {}", i));
        }
        assert_eq!(log.len(), 6);
        assert_eq!(log.iter().next(), Some("message 4"));
        assert_eq!(log.latest(), Some("message 9"));
        assert_eq!(log.total(), 10);
    }

    #[test]
    fn test_since_returns_unseen_tail() {
        let mut log = MessageLog::new(3);
        log.push("a");
        log.push("b");
        let seen = log.total();
        log.push("c");
        log.push("d");
        assert_eq!(log.since(seen).collect::<Vec<_>>(), vec!["c", "d"]);
        assert_eq!(log.since(0).collect::<Vec<_>>(), vec!["b", "c", "d"]);
        assert_eq!(log.since(log.total()).count(), 0);
    }

    #[test]
    fn test_sound_cues() {
        assert_eq!(
            GameEvent::Descended { depth: 2 }.sound(),
            Some(SoundEvent::Stairs)
        );
        assert_eq!(
            GameEvent::PlayerMoved {
                from: Position::new(0, 0),
                to: Position::new(1, 0)
            }
            .sound(),
            None
        );
        assert_eq!(SoundEvent::LevelUp.name(), "level_up");
    }
}
