//! # Field of View
//!
//! Radius-limited visibility with a persistent explored mask.
//!
//! Visibility is a plain circle: every cell with `dx² + dy² ≤ r²` is seen,
//! walls do not occlude. The explored mask only ever gains cells, so a
//! renderer can dim tiles that were seen before but are not visible now.

use crate::Position;
use serde::{Deserialize, Serialize};

/// A boolean flag per grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityMask {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl VisibilityMask {
    /// Creates a mask with every cell cleared.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; (width * height) as usize],
        }
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i32 && pos.y < self.height as i32 {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Out-of-bounds cells read as false.
    pub fn get(&self, pos: Position) -> bool {
        self.index(pos).map(|idx| self.cells[idx]).unwrap_or(false)
    }

    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: Position, value: bool) {
        if let Some(idx) = self.index(pos) {
            self.cells[idx] = value;
        }
    }

    pub fn fill(&mut self, value: bool) {
        self.cells.iter_mut().for_each(|cell| *cell = value);
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Clears the square of `radius` around `center`.
    fn clear_box(&mut self, center: Position, radius: i32) {
        for y in (center.y - radius)..=(center.y + radius) {
            for x in (center.x - radius)..=(center.x + radius) {
                self.set(Position::new(x, y), false);
            }
        }
    }
}

/// Visible and explored masks for one map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOfView {
    pub visible: VisibilityMask,
    pub explored: VisibilityMask,
    last_origin: Option<(Position, i32)>,
}

impl FieldOfView {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            visible: VisibilityMask::new(width, height),
            explored: VisibilityMask::new(width, height),
            last_origin: None,
        }
    }

    /// Recomputes visibility from `center`.
    ///
    /// Only the bounding boxes of the previous and the new radius are cleared,
    /// so cells made visible by [`FieldOfView::reveal_all`] or
    /// [`FieldOfView::reveal_area`] outside those boxes stay visible.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{FieldOfView, Position};
    ///
    /// let mut fov = FieldOfView::new(30, 30);
    /// fov.update(Position::new(5, 5), 3);
    /// assert!(fov.visible.get(Position::new(8, 5)));
    /// assert!(!fov.visible.get(Position::new(9, 5)));
    ///
    /// fov.update(Position::new(20, 20), 3);
    /// assert!(!fov.visible.get(Position::new(8, 5)));
    /// assert!(fov.explored.get(Position::new(8, 5)));
    /// ```
    pub fn update(&mut self, center: Position, radius: i32) {
        if let Some((previous, previous_radius)) = self.last_origin {
            self.visible.clear_box(previous, previous_radius);
        }
        self.visible.clear_box(center, radius);

        for y in (center.y - radius)..=(center.y + radius) {
            for x in (center.x - radius)..=(center.x + radius) {
                let pos = Position::new(x, y);
                if center.within_radius(pos, radius) && self.visible.index(pos).is_some() {
                    self.visible.set(pos, true);
                    self.explored.set(pos, true);
                }
            }
        }

        self.last_origin = Some((center, radius));
    }

    /// Marks the entire map visible and explored.
    pub fn reveal_all(&mut self) {
        self.visible.fill(true);
        self.explored.fill(true);
    }

    /// Marks every cell in the inclusive rectangle visible and explored.
    pub fn reveal_area(&mut self, top_left: Position, bottom_right: Position) {
        for y in top_left.y..=bottom_right.y {
            for x in top_left.x..=bottom_right.x {
                let pos = Position::new(x, y);
                self.visible.set(pos, true);
                self.explored.set(pos, true);
            }
        }
    }

    pub fn is_visible(&self, pos: Position) -> bool {
        self.visible.get(pos)
    }

    pub fn is_explored(&self, pos: Position) -> bool {
        self.explored.get(pos)
    }
}
