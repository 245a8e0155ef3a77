//! Per-turn step allowance derived from a die roll.

use crate::error::MoveError;
use crate::rules::DieRange;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveBudget {
    roll: u32,
    remaining: u32,
}

impl MoveBudget {
    pub fn new(roll: u32, die: DieRange) -> Result<Self, MoveError> {
        die.check(roll)?;
        Ok(Self { roll, remaining: roll })
    }

    pub fn roll(&self) -> u32 {
        self.roll
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn spent(&self) -> u32 {
        self.roll - self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Removes `n` steps. Leaves the budget untouched when `n` exceeds what remains.
    pub fn consume(&mut self, n: u32) -> Result<(), MoveError> {
        if n > self.remaining {
            return Err(MoveError::BudgetExhausted { requested: n, remaining: self.remaining });
        }
        self.remaining -= n;
        Ok(())
    }

    pub fn step(&mut self) -> Result<(), MoveError> {
        self.consume(1)
    }
}
