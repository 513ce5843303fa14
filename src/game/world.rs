//! # World Module
//!
//! The tile grid a dungeon level is carved into.
//!
//! Tiles carry their kind plus render metadata (glyph and colour). The engine
//! only ever reads the kind; the metadata is passed through untouched for the
//! presentation layer.

use crate::{DelveError, DelveResult, Position};
use serde::{Deserialize, Serialize};

/// The kinds of cell a level is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Floor,
    /// Plain open doorway between a room and a corridor.
    Door,
    /// Exit gate that needs a Key before it turns into an [`TileKind::Exit`].
    LockedDoor,
    /// Entrance to a special room; needs a Special Key the first time.
    SpecialDoor,
    /// Stairway down to the next dungeon level.
    Exit,
    /// Way back out of a special room.
    SpecialExit,
}

impl TileKind {
    /// Whether entities may stand on this kind of tile.
    pub fn is_passable(self) -> bool {
        matches!(
            self,
            TileKind::Floor | TileKind::Door | TileKind::Exit | TileKind::SpecialExit
        )
    }

    /// Default glyph for render metadata.
    pub fn glyph(self) -> char {
        match self {
            TileKind::Wall => '#',
            TileKind::Floor => '.',
            TileKind::Door => '+',
            TileKind::LockedDoor => 'L',
            TileKind::SpecialDoor => 'S',
            TileKind::Exit => '>',
            TileKind::SpecialExit => '<',
        }
    }

    /// Default colour for render metadata.
    pub fn color(self) -> Rgb {
        match self {
            TileKind::Wall => Rgb::new(90, 90, 110),
            TileKind::Floor => Rgb::new(50, 50, 60),
            TileKind::Door => Rgb::new(150, 100, 40),
            TileKind::LockedDoor => Rgb::new(200, 160, 40),
            TileKind::SpecialDoor => Rgb::new(200, 60, 200),
            TileKind::Exit => Rgb::new(240, 240, 240),
            TileKind::SpecialExit => Rgb::new(120, 220, 240),
        }
    }
}

/// 24-bit colour passed through to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A single cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub glyph: char,
    pub color: Rgb,
}

impl Tile {
    /// Creates a tile with the default metadata for its kind.
    pub fn new(kind: TileKind) -> Self {
        Self {
            kind,
            glyph: kind.glyph(),
            color: kind.color(),
        }
    }

    pub fn wall() -> Self {
        Self::new(TileKind::Wall)
    }

    pub fn is_passable(&self) -> bool {
        self.kind.is_passable()
    }
}

/// Fixed-size, row-major grid of tiles.
///
/// # Examples
///
/// ```
/// use delve::{Position, TileGrid, TileKind};
///
/// let mut grid = TileGrid::new(10, 8);
/// assert_eq!(grid.kind_at(Position::new(3, 3)), Some(TileKind::Wall));
///
/// grid.set_kind(Position::new(3, 3), TileKind::Floor).unwrap();
/// assert!(grid.is_passable(Position::new(3, 3)));
/// assert_eq!(grid.kind_at(Position::new(20, 3)), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Creates a grid filled with walls.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::wall(); (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Checks whether a position lies on the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i32 && pos.y < self.height as i32
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).map(|idx| &self.tiles[idx])
    }

    pub fn kind_at(&self, pos: Position) -> Option<TileKind> {
        self.get(pos).map(|tile| tile.kind)
    }

    /// Out-of-bounds positions are never passable.
    pub fn is_passable(&self, pos: Position) -> bool {
        self.get(pos).map(Tile::is_passable).unwrap_or(false)
    }

    /// Replaces the tile at `pos`, resetting its render metadata.
    pub fn set_kind(&mut self, pos: Position, kind: TileKind) -> DelveResult<()> {
        let idx = self.index(pos).ok_or_else(|| {
            DelveError::InvalidState(format!("Tile position {} is out of bounds", pos))
        })?;
        self.tiles[idx] = Tile::new(kind);
        Ok(())
    }

    /// Iterates every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
    }

    /// Iterates the positions of every tile of the given kind.
    pub fn positions_of(&self, kind: TileKind) -> impl Iterator<Item = Position> + '_ {
        self.positions()
            .filter(move |&pos| self.kind_at(pos) == Some(kind))
    }

    /// Row slices for renderers that draw line by line.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.width as usize)
    }
}
