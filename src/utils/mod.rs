//! # Utilities Module
//!
//! Distance math and grid pathfinding.

pub mod math;
pub mod pathfinding;

pub use self::pathfinding::*;
