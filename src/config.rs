//! Board configuration: size, spawn anchor and the game-over fill threshold.

use crate::surface::{BoardBounds, Coord};
use thiserror::Error;

pub const DEFAULT_WIDTH: i32 = 10;
pub const DEFAULT_HEIGHT: i32 = 20;
pub const DEFAULT_SPAWN: Coord = Coord::new(-1, 8);
/// Game over once the free height above the bottom stack is at most this share of the board.
pub const DEFAULT_FILL_THRESHOLD_PERCENT: u32 = 70;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board size must be positive, got {width}x{height}")]
    InvalidSize { width: i32, height: i32 },
    #[error("fill threshold must be in 1..=100 percent, got {0}")]
    InvalidThreshold(u32),
    #[error("spawn anchor ({x}, {y}) is outside the {width}x{height} board")]
    SpawnOutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
}

/// Immutable once a board is built from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    pub width: i32,
    pub height: i32,
    pub spawn: Coord,
    pub fill_threshold_percent: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            spawn: DEFAULT_SPAWN,
            fill_threshold_percent: DEFAULT_FILL_THRESHOLD_PERCENT,
        }
    }
}

impl BoardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        if !BoardBounds::centered(self.width, self.height).contains(self.spawn) {
            return Err(ConfigError::SpawnOutOfBounds {
                x: self.spawn.x,
                y: self.spawn.y,
                width: self.width,
                height: self.height,
            });
        }
        if !(1..=100).contains(&self.fill_threshold_percent) {
            return Err(ConfigError::InvalidThreshold(self.fill_threshold_percent));
        }
        Ok(())
    }

    /// `ceil(percent * height / 100)` in integers.
    pub fn threshold_height(&self) -> i32 {
        let scaled = i64::from(self.fill_threshold_percent) * i64::from(self.height);
        ((scaled + 99) / 100) as i32
    }
}
