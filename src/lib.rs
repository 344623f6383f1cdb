//! Matchtrix — playfield core for a falling-block puzzle where touching pieces of
//! rival kinds clear each other, columns settle into the gaps, and the game ends once
//! the bottom stack fills a set share of the board.
//!
//! The [`Board`] owns the tile surface and does all placement, clearing, compaction and
//! game-over work; [`GameState`] drives the active piece on top of it.

pub mod board;
pub mod config;
pub mod game;
pub mod piece;
pub mod rules;
pub mod selector;
pub mod surface;
pub mod tiles;

pub use board::{Board, ClearReport, GameOverCause, GameOverCheck, SpawnOutcome};
pub use config::{BoardConfig, ConfigError};
pub use game::{GameState, LockReport};
pub use piece::{Piece, Rotation, TetrominoKind};
pub use rules::should_clear;
pub use selector::{Bag, Fixed, Lcg, PieceSelector, UniformSelector};
pub use surface::{BoardBounds, Coord, GridSurface, TileMap};
pub use tiles::{Tile, TileSet, TileSetError};
