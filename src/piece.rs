//! Tetromino kinds, shapes and the piece value (type tag + anchor + relative cells).

use crate::surface::Coord;
use std::fmt;

/// Tetromino kinds. `ALL[0]` is the fallback kind for unresolvable tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoKind {
    I,
    O,
    T,
    J,
    L,
    S,
    Z,
}

impl TetrominoKind {
    pub const ALL: [Self; 7] = [Self::I, Self::O, Self::T, Self::J, Self::L, Self::S, Self::Z];

    /// 4 cells relative to the anchor; each (dx, dy), y up.
    pub fn cells(&self) -> [Coord; 4] {
        let raw: [(i32, i32); 4] = match self {
            Self::I => [(-1, 1), (0, 1), (1, 1), (2, 1)],
            Self::O => [(0, 1), (1, 1), (0, 0), (1, 0)],
            Self::T => [(0, 1), (-1, 0), (0, 0), (1, 0)],
            Self::J => [(-1, 1), (-1, 0), (0, 0), (1, 0)],
            Self::L => [(1, 1), (-1, 0), (0, 0), (1, 0)],
            Self::S => [(0, 1), (1, 1), (-1, 0), (0, 0)],
            Self::Z => [(-1, 1), (0, 1), (0, 0), (1, 0)],
        };
        raw.map(Coord::from)
    }

    /// I and O turn about the corner shared by their middle cells, the rest about the anchor.
    fn pivots_on_corner(&self) -> bool {
        matches!(self, Self::I | Self::O)
    }

    pub fn letter(&self) -> char {
        match self {
            Self::I => 'I',
            Self::O => 'O',
            Self::T => 'T',
            Self::J => 'J',
            Self::L => 'L',
            Self::S => 'S',
            Self::Z => 'Z',
        }
    }

    /// Parse a single kind letter (case-insensitive).
    pub fn from_letter(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| s.len() == 1 && s.eq_ignore_ascii_case(&k.letter().to_string()))
    }
}

impl fmt::Display for TetrominoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

/// A placed or falling piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: TetrominoKind,
    pub position: Coord,
    pub cells: [Coord; 4],
}

impl Piece {
    pub fn new(kind: TetrominoKind, position: Coord) -> Self {
        Self {
            kind,
            position,
            cells: kind.cells(),
        }
    }

    /// Absolute cells if the anchor were at `position`.
    pub fn cells_at(&self, position: Coord) -> [Coord; 4] {
        self.cells.map(|c| c + position)
    }

    /// Absolute cells at the current anchor.
    pub fn absolute_cells(&self) -> [Coord; 4] {
        self.cells_at(self.position)
    }

    /// Relative cells after one quarter turn; does not mutate.
    pub fn rotated_cells(&self, rotation: Rotation) -> [Coord; 4] {
        let corner = self.kind.pivots_on_corner();
        self.cells.map(|c| rotate_cell(c, rotation, corner))
    }
}

fn rotate_cell(c: Coord, rotation: Rotation, corner: bool) -> Coord {
    // Doubled coordinates keep the half-cell pivot integral.
    let (x, y) = if corner {
        (2 * c.x - 1, 2 * c.y - 1)
    } else {
        (c.x, c.y)
    };
    let (x, y) = match rotation {
        Rotation::Clockwise => (y, -x),
        Rotation::CounterClockwise => (-y, x),
    };
    if corner {
        Coord::new((x + 1) / 2, (y + 1) / 2)
    } else {
        Coord::new(x, y)
    }
}
