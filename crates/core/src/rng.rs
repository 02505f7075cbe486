//! RNG module - 7-bag random piece generation
//!
//! Implements the "7-bag" randomization algorithm. Each bag contains one of
//! each piece (I, O, T, S, Z, J, L), shuffled. Draws pop from the bag until it
//! is empty, then a new bag is shuffled.
//!
//! The shuffle is driven by a seeded PCG generator, so a seed fully determines
//! the piece sequence.

use arrayvec::ArrayVec;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::types::PieceKind;

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct PieceBag {
    /// Remaining pieces of the current bag; draws pop from the end
    bag: ArrayVec<PieceKind, 7>,
    rng: Pcg32,
    seed: u64,
}

impl PieceBag {
    /// Create an empty bag with the given seed; the first draw shuffles
    pub fn new(seed: u64) -> Self {
        Self {
            bag: ArrayVec::new(),
            rng: Pcg32::seed_from_u64(seed),
            seed,
        }
    }

    /// Generate a new shuffled bag
    fn refill(&mut self) {
        self.bag.clear();
        self.bag.extend(PieceKind::ALL);
        self.bag.shuffle(&mut self.rng);
    }

    /// Draw the next piece, refilling the bag when empty
    pub fn draw_next(&mut self) -> PieceKind {
        if self.bag.is_empty() {
            self.refill();
        }
        match self.bag.pop() {
            Some(kind) => kind,
            // refill() always leaves seven kinds behind
            None => unreachable!("bag empty right after refill"),
        }
    }

    /// Throw away the rest of the current bag.
    ///
    /// The generator keeps running, so a restarted game gets a fresh but
    /// still reproducible sequence.
    pub fn reset(&mut self) {
        self.bag.clear();
    }

    /// Pieces left before the next refill
    pub fn remaining(&self) -> usize {
        self.bag.len()
    }

    /// Seed the bag was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new(1)
    }
}
