//! What a turn reports back to the game loop.

use serde::{Deserialize, Serialize};

use crate::types::{CellId, Direction, Location, RoomId, TokenId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    NotAdjacent(CellId),
    Blocked(CellId),
    NoCellInDirection(Direction),
    NoSecretPassage,
    PassagesDisabled,
    PassageAfterMoving,
    EmptyWalk,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveEvent {
    MovedTo(CellId),
    RoomEntered(RoomId),
    SecretPassageUsed { from: RoomId, to: RoomId },
    StepRejected(RejectReason),
    BudgetExhausted,
    Stalled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcome {
    RoomEntered(RoomId),
    BudgetExhausted,
    Stalled,
    /// The decider ended the turn, or ran out of rejected requests.
    Stopped,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnResult {
    pub token: TokenId,
    pub roll: u32,
    pub start: Location,
    pub final_location: Location,
    pub budget_remaining: u32,
    pub events: Vec<MoveEvent>,
    pub outcome: TurnOutcome,
    /// The AI's committed room when the turn ended, if any.
    pub target: Option<RoomId>,
}

impl TurnResult {
    /// Cells walked this turn, in order.
    pub fn path(&self) -> Vec<CellId> {
        self.events
            .iter()
            .filter_map(|event| match event {
                MoveEvent::MovedTo(cell) => Some(*cell),
                _ => None,
            })
            .collect()
    }

    pub fn entered_room(&self) -> Option<RoomId> {
        match self.outcome {
            TurnOutcome::RoomEntered(room) => Some(room),
            _ => None,
        }
    }

    pub fn rejections(&self) -> usize {
        self.events.iter().filter(|event| matches!(event, MoveEvent::StepRejected(_))).count()
    }
}
