//! Random piece selection: uniform draw or 7-bag, both seeded.

use crate::piece::TetrominoKind;
use std::fmt::Debug;

/// Source of the next piece kind to spawn.
pub trait PieceSelector: Debug {
    fn next_kind(&mut self) -> TetrominoKind;
}

/// Small linear congruential generator; deterministic for a given seed.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1103515245).wrapping_add(12345);
        self.state >> 16
    }

    /// Uniform-ish value in `0..bound`. `bound` must be non-zero.
    pub fn below(&mut self, bound: u32) -> u32 {
        self.next_u32() % bound
    }
}

/// Every kind equally likely on every draw.
#[derive(Debug, Clone)]
pub struct UniformSelector {
    rng: Lcg,
}

impl UniformSelector {
    pub fn new(seed: u32) -> Self {
        Self { rng: Lcg::new(seed) }
    }
}

impl PieceSelector for UniformSelector {
    fn next_kind(&mut self) -> TetrominoKind {
        TetrominoKind::ALL[self.rng.below(TetrominoKind::ALL.len() as u32) as usize]
    }
}

/// Bag of 7 tetrominoes (random order, then refill).
#[derive(Debug, Clone)]
pub struct Bag {
    queue: Vec<TetrominoKind>,
    rng: Lcg,
}

impl Bag {
    pub fn new(seed: u32) -> Self {
        let mut b = Self {
            queue: Vec::with_capacity(14),
            rng: Lcg::new(seed),
        };
        b.refill();
        b
    }

    fn refill(&mut self) {
        let mut all = TetrominoKind::ALL.to_vec();
        // Fisher–Yates shuffle
        for i in (1..all.len()).rev() {
            let j = self.rng.below(i as u32 + 1) as usize;
            all.swap(i, j);
        }
        self.queue.extend(all);
    }
}

impl PieceSelector for Bag {
    fn next_kind(&mut self) -> TetrominoKind {
        if self.queue.len() < 2 {
            self.refill();
        }
        self.queue.remove(0)
    }
}

/// Always hands out the same kind. Handy for scripted boards.
#[derive(Debug, Clone, Copy)]
pub struct Fixed(pub TetrominoKind);

impl PieceSelector for Fixed {
    fn next_kind(&mut self) -> TetrominoKind {
        self.0
    }
}
