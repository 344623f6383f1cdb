//! Game state: board, active piece, movement and the lock step.

use crate::board::{Board, ClearReport, GameOverCause, SpawnOutcome};
use crate::piece::{Piece, Rotation, TetrominoKind};
use crate::surface::Coord;

/// Result of locking the active piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockReport {
    pub kind: TetrominoKind,
    pub position: Coord,
    pub clear: ClearReport,
}

/// Game state: board, current piece and running totals.
#[derive(Debug)]
pub struct GameState {
    pub board: Board,
    pub piece: Option<Piece>,
    pub pieces_locked: u32,
    /// Distinct cells removed by match clears.
    pub tiles_cleared: u32,
    pub game_over: Option<GameOverCause>,
}

impl GameState {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            piece: None,
            pieces_locked: 0,
            tiles_cleared: 0,
            game_over: None,
        }
    }

    /// First spawn. Call once after construction; later calls are ignored.
    pub fn start(&mut self) {
        if self.piece.is_none() && self.game_over.is_none() && self.pieces_locked == 0 {
            self.spawn_next();
        }
    }

    pub fn is_over(&self) -> bool {
        self.game_over.is_some()
    }

    fn spawn_next(&mut self) {
        match self.board.spawn_piece() {
            SpawnOutcome::Spawned(piece) => self.piece = Some(piece),
            SpawnOutcome::GameOver(cause) => {
                self.piece = None;
                self.game_over = Some(cause);
            }
        }
    }

    /// Shift the piece by `delta` if the target is free. Un-draws, checks, redraws.
    pub fn try_move(&mut self, delta: Coord) -> bool {
        let Some(piece) = self.piece.as_mut() else {
            return false;
        };
        self.board.clear(piece);
        let target = piece.position + delta;
        let valid = self.board.is_valid_position(piece, target);
        if valid {
            piece.position = target;
        }
        self.board.set(piece);
        valid
    }

    pub fn move_left(&mut self) -> bool {
        self.try_move(Coord::LEFT)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_move(Coord::RIGHT)
    }

    pub fn soft_drop(&mut self) -> bool {
        self.try_move(Coord::DOWN)
    }

    /// Quarter turn in place; reverted if the turned shape does not fit.
    pub fn rotate(&mut self, rotation: Rotation) -> bool {
        let Some(piece) = self.piece.as_mut() else {
            return false;
        };
        self.board.clear(piece);
        let turned = Piece {
            cells: piece.rotated_cells(rotation),
            ..piece.clone()
        };
        let valid = self.board.is_valid_position(&turned, turned.position);
        if valid {
            *piece = turned;
        }
        self.board.set(piece);
        valid
    }

    pub fn rotate_cw(&mut self) -> bool {
        self.rotate(Rotation::Clockwise)
    }

    pub fn rotate_ccw(&mut self) -> bool {
        self.rotate(Rotation::CounterClockwise)
    }

    /// One gravity step: fall one row, or lock if resting.
    pub fn tick_gravity(&mut self) -> Option<LockReport> {
        if self.piece.is_none() || self.soft_drop() {
            return None;
        }
        self.lock_piece()
    }

    /// Drop to the lowest free row and lock.
    pub fn hard_drop(&mut self) -> Option<LockReport> {
        self.piece.as_ref()?;
        while self.soft_drop() {}
        self.lock_piece()
    }

    /// Commit, match-clear and compact, then spawn the next piece (or stop).
    fn lock_piece(&mut self) -> Option<LockReport> {
        let piece = self.piece.take()?;
        self.board.set(&piece);
        let clear = self.board.check_and_clear_tiles(&piece);
        self.pieces_locked += 1;
        self.tiles_cleared += clear.distinct as u32;
        self.spawn_next();
        Some(LockReport {
            kind: piece.kind,
            position: piece.position,
            clear,
        })
    }
}
