//! # Pathfinding Algorithms
//!
//! A* over the 8-connected tile grid for monster movement.

use super::math::{DIAGONAL_STEP_COST, STEP_COST};
use crate::Position;
use ::pathfinding::prelude::astar;

/// Finds a path from `start` to `goal` with A*.
///
/// Neighbours are the 8 surrounding cells, kept only when `passable` accepts
/// them. The goal itself is always accepted so that a path can end on an
/// occupied cell such as the player's. Step costs are scaled integers (10
/// orthogonal, 14 diagonal) and the heuristic is the Euclidean distance scaled
/// by `14 / √2`, which never exceeds the cheapest octile cost.
///
/// The returned path excludes `start` and ends with `goal`. Returns `None` if
/// the goal is unreachable or equal to the start.
pub fn find_path<F>(start: Position, goal: Position, passable: F) -> Option<Vec<Position>>
where
    F: Fn(Position) -> bool,
{
    if start == goal {
        return None;
    }

    let (mut path, _cost) = astar(
        &start,
        |&current| {
            current
                .adjacent_positions()
                .into_iter()
                .filter(|&next| next == goal || passable(next))
                .map(move |next| (next, step_cost(current, next)))
                .collect::<Vec<_>>()
        },
        |&current| euclidean_heuristic(current, goal),
        |&current| current == goal,
    )?;

    path.remove(0);
    Some(path)
}

/// Returns the first step of a path toward `goal`, if one exists.
pub fn next_step_toward<F>(start: Position, goal: Position, passable: F) -> Option<Position>
where
    F: Fn(Position) -> bool,
{
    find_path(start, goal, passable).and_then(|path| path.first().copied())
}

fn step_cost(from: Position, to: Position) -> u32 {
    if from.x != to.x && from.y != to.y {
        DIAGONAL_STEP_COST
    } else {
        STEP_COST
    }
}

fn euclidean_heuristic(from: Position, to: Position) -> u32 {
    let scale = DIAGONAL_STEP_COST as f64 / std::f64::consts::SQRT_2;
    (from.euclidean_distance(to) * scale).floor() as u32
}
