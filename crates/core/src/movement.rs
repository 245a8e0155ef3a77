//! Turn resolution: planning, AI decisions and the per-turn movement loop.

mod ai;
mod controller;
mod decider;
mod events;
mod planner;

pub use ai::{AiDecision, AiMover, AiState};
pub use controller::TurnMovementController;
pub use decider::{
    AiMoveDecider, HumanInput, HumanMoveDecider, MoveDecider, MoveRequest, ScriptedInput, TurnView,
};
pub use events::{MoveEvent, RejectReason, TurnOutcome, TurnResult};
pub use planner::{Path, PathPlanner};
