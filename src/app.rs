//! App: headless autoplay loop and the end-of-run summary.

use crate::Args;
use anyhow::Result;
use matchtrix::{GameOverCause, GameState, Lcg, LockReport};
use std::io::{self, Write};

/// Why the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    GameOver(GameOverCause),
    PieceLimit,
}

pub struct App {
    args: Args,
    state: GameState,
    /// Drives the autoplayer's column and rotation choices.
    rng: Lcg,
}

impl App {
    pub fn new(args: Args, state: GameState) -> Self {
        let rng = Lcg::new(args.seed.rotate_left(16) ^ 0x9E37_79B9);
        Self { args, state, rng }
    }

    pub fn run(&mut self) -> Result<StopReason> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_to(&mut out)
    }

    /// Play until game over or the piece limit, writing progress and the summary to `out`.
    pub fn run_to(&mut self, out: &mut impl Write) -> Result<StopReason> {
        self.state.start();
        let reason = loop {
            if let Some(cause) = self.state.game_over {
                break StopReason::GameOver(cause);
            }
            if self.state.pieces_locked >= self.args.max_pieces {
                break StopReason::PieceLimit;
            }
            if let Some(report) = self.play_one() {
                if self.args.verbose {
                    write_lock(out, self.state.pieces_locked, &report)?;
                }
            }
        };
        self.write_summary(out, reason)?;
        Ok(reason)
    }

    /// Random rotation and column, then hard drop.
    fn play_one(&mut self) -> Option<LockReport> {
        for _ in 0..self.rng.below(4) {
            self.state.rotate_cw();
        }
        let width = self.state.board.config().width;
        let shift = self.rng.below(width as u32) as i32 - width / 2;
        for _ in 0..shift.unsigned_abs() {
            let moved = if shift < 0 {
                self.state.move_left()
            } else {
                self.state.move_right()
            };
            if !moved {
                break;
            }
        }
        self.state.hard_drop()
    }

    fn write_summary(&self, out: &mut impl Write, reason: StopReason) -> io::Result<()> {
        match reason {
            StopReason::GameOver(GameOverCause::FillThreshold) => {
                writeln!(out, "Game ended: bottom stack reached the fill threshold")?;
            }
            StopReason::GameOver(GameOverCause::SpawnBlocked(kind)) => {
                writeln!(out, "Game ended: no room to spawn {kind}")?;
            }
            StopReason::PieceLimit => {
                writeln!(out, "Stopped after {} pieces", self.args.max_pieces)?;
            }
        }
        writeln!(out, "pieces locked: {}", self.state.pieces_locked)?;
        writeln!(out, "tiles cleared: {}", self.state.tiles_cleared)?;
        if self.args.verbose {
            let check = self.state.board.game_over_check();
            writeln!(out, "total height: {}", check.total_height)?;
            writeln!(out, "threshold height: {}", check.threshold_height)?;
            writeln!(out, "remaining height from the top: {}", check.remaining_height)?;
        }
        if self.args.print_board {
            write!(out, "{}", self.state.board)?;
        }
        Ok(())
    }
}

fn write_lock(out: &mut impl Write, n: u32, report: &LockReport) -> io::Result<()> {
    writeln!(
        out,
        "#{n} {} at ({}, {}): cleared {}, moved {}",
        report.kind,
        report.position.x,
        report.position.y,
        report.clear.distinct,
        report.clear.moved
    )
}
