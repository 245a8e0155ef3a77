//! Where move requests come from: a human input collaborator or the AI.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::ai::{AiDecision, AiMover};
use super::events::MoveEvent;
use super::planner::PathPlanner;
use crate::board::{BoardGraph, Occupancy};
use crate::budget::MoveBudget;
use crate::error::MoveError;
use crate::rules::MovementRules;
use crate::types::{CellId, Direction, Location, RoomId, TokenId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveRequest {
    Step(CellId),
    Toward(Direction),
    /// Several steps at once; cut short when the budget runs out.
    Walk(Vec<CellId>),
    SecretPassage,
    EndTurn,
    /// End the turn here; stalled when the token has not moved.
    Hold,
}

/// Read-only picture of the moving token's turn, handed to deciders.
#[derive(Clone, Copy)]
pub struct TurnView<'a> {
    pub board: &'a BoardGraph,
    pub occupancy: &'a Occupancy,
    pub rules: &'a MovementRules,
    pub token: TokenId,
    pub location: Location,
    pub budget: MoveBudget,
    /// Whether a step has been taken this turn.
    pub moved: bool,
}

impl<'a> TurnView<'a> {
    pub fn planner(&self) -> PathPlanner<'a> {
        PathPlanner::new(self.board, self.occupancy, self.rules)
    }
}

pub trait MoveDecider {
    fn begin_turn(&mut self, _view: &TurnView<'_>) -> Result<(), MoveError> {
        Ok(())
    }

    fn next_request(&mut self, view: &TurnView<'_>) -> Result<MoveRequest, MoveError>;

    fn observe(&mut self, _event: &MoveEvent) {}

    fn target(&self) -> Option<RoomId> {
        None
    }
}

/// The game's input collaborator for a human-controlled token.
pub trait HumanInput {
    fn next_request(&mut self, view: &TurnView<'_>) -> MoveRequest;

    fn observe(&mut self, _event: &MoveEvent) {}
}

pub struct HumanMoveDecider<'i> {
    input: &'i mut dyn HumanInput,
}

impl<'i> HumanMoveDecider<'i> {
    pub fn new(input: &'i mut dyn HumanInput) -> Self {
        Self { input }
    }
}

impl MoveDecider for HumanMoveDecider<'_> {
    fn next_request(&mut self, view: &TurnView<'_>) -> Result<MoveRequest, MoveError> {
        Ok(self.input.next_request(view))
    }

    fn observe(&mut self, event: &MoveEvent) {
        self.input.observe(event);
    }
}

/// Feeds an [`AiMover`]'s plan to the controller one step at a time.
pub struct AiMoveDecider<'m> {
    mover: &'m mut AiMover,
    queued: VecDeque<CellId>,
    planned: bool,
}

impl<'m> AiMoveDecider<'m> {
    pub fn new(mover: &'m mut AiMover) -> Self {
        Self { mover, queued: VecDeque::new(), planned: false }
    }
}

impl MoveDecider for AiMoveDecider<'_> {
    fn begin_turn(&mut self, _view: &TurnView<'_>) -> Result<(), MoveError> {
        self.mover.begin_turn();
        self.queued.clear();
        self.planned = false;
        Ok(())
    }

    fn next_request(&mut self, view: &TurnView<'_>) -> Result<MoveRequest, MoveError> {
        if !self.planned {
            self.planned = true;
            match self.mover.plan_turn(&view.planner(), view.location, &view.budget)? {
                AiDecision::Walk { path, .. } => self.queued = path.into_steps().into(),
                AiDecision::SecretPassage { .. } => return Ok(MoveRequest::SecretPassage),
                AiDecision::Stalled => return Ok(MoveRequest::Hold),
            }
        }
        Ok(self.queued.pop_front().map_or(MoveRequest::EndTurn, MoveRequest::Step))
    }

    fn observe(&mut self, event: &MoveEvent) {
        if let MoveEvent::StepRejected(_) = event {
            // The board changed under the plan; plan again from where we stand.
            self.queued.clear();
            self.planned = false;
        }
        self.mover.observe(event);
    }

    fn target(&self) -> Option<RoomId> {
        self.mover.target()
    }
}

/// Replays a fixed list of requests, then ends the turn.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    requests: VecDeque<MoveRequest>,
    seen: Vec<MoveEvent>,
}

impl ScriptedInput {
    pub fn new(requests: impl IntoIterator<Item = MoveRequest>) -> Self {
        Self { requests: requests.into_iter().collect(), seen: Vec::new() }
    }

    pub fn seen(&self) -> &[MoveEvent] {
        &self.seen
    }
}

impl HumanInput for ScriptedInput {
    fn next_request(&mut self, _view: &TurnView<'_>) -> MoveRequest {
        self.requests.pop_front().unwrap_or(MoveRequest::EndTurn)
    }

    fn observe(&mut self, event: &MoveEvent) {
        self.seen.push(*event);
    }
}
