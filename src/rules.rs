//! Match rule: which piece kinds clear each other when they touch.
//!
//! Kinds fall into three buckets. A locked piece clears a neighbour whose bucket its own
//! bucket beats; the relation is directed, so `should_clear(a, b)` does not imply
//! `should_clear(b, a)`.

use crate::piece::TetrominoKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// I, J, S
    Ijs,
    /// O, L
    Ol,
    /// T, Z
    Tz,
}

impl Bucket {
    pub fn of(kind: TetrominoKind) -> Self {
        match kind {
            TetrominoKind::I | TetrominoKind::J | TetrominoKind::S => Self::Ijs,
            TetrominoKind::O | TetrominoKind::L => Self::Ol,
            TetrominoKind::T | TetrominoKind::Z => Self::Tz,
        }
    }

    /// The bucket this one clears.
    pub fn clears(self) -> Self {
        match self {
            Self::Ijs => Self::Tz,
            Self::Ol => Self::Ijs,
            Self::Tz => Self::Ol,
        }
    }
}

/// True when a `current` tile clears an adjacent `neighbor` tile.
pub fn should_clear(current: TetrominoKind, neighbor: TetrominoKind) -> bool {
    Bucket::of(current).clears() == Bucket::of(neighbor)
}
