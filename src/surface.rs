//! Grid surface: integer cell coordinates, board bounds and the sparse tile store.

use crate::tiles::Tile;
use std::collections::HashMap;
use std::ops::{Add, Sub};

/// Cell coordinate. `y` increases upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const UP: Self = Self::new(0, 1);
    pub const DOWN: Self = Self::new(0, -1);
    pub const LEFT: Self = Self::new(-1, 0);
    pub const RIGHT: Self = Self::new(1, 0);

    /// Orthogonal neighbour offsets in scan order: +x, -x, +y, -y.
    pub const NEIGHBOURS_4: [Self; 4] = [Self::RIGHT, Self::LEFT, Self::UP, Self::DOWN];

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Coord {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coord {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Board rectangle centred on the origin. Derived from (width, height) on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardBounds {
    pub min: Coord,
    pub width: i32,
    pub height: i32,
}

impl BoardBounds {
    /// Min corner is `(-(w/2), -(h/2))` (truncating); the rect spans exactly `w x h` cells.
    pub fn centered(width: i32, height: i32) -> Self {
        Self {
            min: Coord::new(-width / 2, -height / 2),
            width,
            height,
        }
    }

    /// Exclusive upper corner.
    #[inline]
    pub fn max(&self) -> Coord {
        Coord::new(self.min.x + self.width, self.min.y + self.height)
    }

    #[inline]
    pub fn contains(&self, at: Coord) -> bool {
        let max = self.max();
        at.x >= self.min.x && at.x < max.x && at.y >= self.min.y && at.y < max.y
    }

    pub fn columns(&self) -> std::ops::Range<i32> {
        self.min.x..self.max().x
    }

    /// Rows bottom to top.
    pub fn rows(&self) -> std::ops::Range<i32> {
        self.min.y..self.max().y
    }
}

/// Tile storage capability the board core needs. A cell holds at most one tile.
pub trait GridSurface {
    fn get_tile(&self, at: Coord) -> Option<Tile>;

    /// `None` empties the cell.
    fn set_tile(&mut self, at: Coord, tile: Option<Tile>);

    fn has_tile(&self, at: Coord) -> bool {
        self.get_tile(at).is_some()
    }
}

/// Sparse tile store keyed by coordinate. Accepts any coordinate, bounded or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileMap {
    tiles: HashMap<Coord, Tile>,
}

impl TileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, Tile)> + '_ {
        self.tiles.iter().map(|(&at, &tile)| (at, tile))
    }
}

impl GridSurface for TileMap {
    #[inline]
    fn get_tile(&self, at: Coord) -> Option<Tile> {
        self.tiles.get(&at).copied()
    }

    fn set_tile(&mut self, at: Coord, tile: Option<Tile>) {
        match tile {
            Some(t) => {
                self.tiles.insert(at, t);
            }
            None => {
                self.tiles.remove(&at);
            }
        }
    }

    #[inline]
    fn has_tile(&self, at: Coord) -> bool {
        self.tiles.contains_key(&at)
    }
}
