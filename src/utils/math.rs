//! # Game Mathematics
//!
//! Distance metrics shared by the FOV engine, monster AI and pathfinding.

use crate::Position;

/// Squared Euclidean distance, `dx² + dy²`.
pub fn squared_distance(a: Position, b: Position) -> i32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Chebyshev (king-move) distance.
pub fn chebyshev_distance(a: Position, b: Position) -> u32 {
    a.x.abs_diff(b.x).max(a.y.abs_diff(b.y))
}

/// Circular radius test without taking a square root.
pub fn within_radius(center: Position, other: Position, radius: i32) -> bool {
    squared_distance(center, other) <= radius * radius
}

/// Cost of an orthogonal step in scaled path units.
pub const STEP_COST: u32 = 10;

/// Cost of a diagonal step in scaled path units.
pub const DIAGONAL_STEP_COST: u32 = 14;
