//! Game-configured movement rules.

use serde::{Deserialize, Serialize};

use crate::error::MoveError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieRange {
    pub min: u32,
    pub max: u32,
}

impl Default for DieRange {
    fn default() -> Self {
        Self { min: 1, max: 6 }
    }
}

impl DieRange {
    pub fn new(min: u32, max: u32) -> Result<Self, MoveError> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<(), MoveError> {
        if self.min == 0 || self.min > self.max {
            return Err(MoveError::InvalidDieRange { min: self.min, max: self.max });
        }
        Ok(())
    }

    pub fn contains(&self, roll: u32) -> bool {
        (self.min..=self.max).contains(&roll)
    }

    pub fn check(&self, roll: u32) -> Result<(), MoveError> {
        if self.contains(roll) {
            Ok(())
        } else {
            Err(MoveError::InvalidRoll { roll, min: self.min, max: self.max })
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementRules {
    pub die: DieRange,
    /// Occupied corridor cells can be neither crossed nor entered.
    pub block_occupied_corridors: bool,
    pub secret_passages: bool,
    /// Invalid requests tolerated from a decider before its turn is ended.
    pub max_rejected_requests: u8,
}

impl Default for MovementRules {
    fn default() -> Self {
        Self {
            die: DieRange::default(),
            block_occupied_corridors: true,
            secret_passages: true,
            max_rejected_requests: 3,
        }
    }
}

impl MovementRules {
    pub fn validate(&self) -> Result<(), MoveError> {
        self.die.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_die_is_a_single_six_sided_die() {
        let die = DieRange::default();
        assert!(die.contains(1));
        assert!(die.contains(6));
        assert!(!die.contains(0));
        assert!(!die.contains(7));
    }

    #[test]
    fn die_range_rejects_zero_and_inverted_bounds() {
        assert!(matches!(DieRange::new(0, 6), Err(MoveError::InvalidDieRange { .. })));
        assert!(matches!(DieRange::new(5, 2), Err(MoveError::InvalidDieRange { .. })));
        assert!(DieRange::new(2, 12).is_ok());
    }

    #[test]
    fn check_reports_the_offending_roll() {
        let err = DieRange::default().check(9).unwrap_err();
        assert!(matches!(err, MoveError::InvalidRoll { roll: 9, min: 1, max: 6 }));
    }

    #[test]
    fn partial_rules_fall_back_to_defaults() {
        let rules: MovementRules =
            serde_json::from_str(r#"{"block_occupied_corridors": false}"#).unwrap();
        assert!(!rules.block_occupied_corridors);
        assert_eq!(rules.die, DieRange::default());
        assert_eq!(rules.max_rejected_requests, 3);
    }
}
