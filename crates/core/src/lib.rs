pub mod board;
pub mod budget;
pub mod dice;
pub mod error;
pub mod movement;
pub mod rules;
pub mod session;
pub mod types;

#[cfg(test)]
mod test_support;

pub use board::{BoardGraph, BoardSpec, CellSpec, Occupancy, RoomSpec};
pub use budget::MoveBudget;
pub use dice::DiceRoller;
pub use error::{BoardError, MoveError};
pub use movement::*;
pub use rules::{DieRange, MovementRules};
pub use session::{Session, SessionSnapshot, Token, TokenRecord};
pub use types::*;
