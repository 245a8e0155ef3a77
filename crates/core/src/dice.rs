//! Seeded die rolls so simulated games replay identically.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

use crate::rules::DieRange;

pub struct DiceRoller {
    rng: ChaCha8Rng,
    range: DieRange,
}

impl DiceRoller {
    pub fn new(seed: u64, range: DieRange) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed), range }
    }

    pub fn range(&self) -> DieRange {
        self.range
    }

    pub fn roll(&mut self) -> u32 {
        let faces = u64::from(self.range.max - self.range.min + 1);
        self.range.min + (self.rng.next_u64() % faces) as u32
    }
}
