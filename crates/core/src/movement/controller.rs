//! One token's movement for one turn.
//!
//! The controller owns the loop: ask the decider for a request, validate it
//! against adjacency, occupancy and the budget, apply it, report the event.
//! The loop ends on room entry, an empty budget, a hold, an explicit end of
//! turn, or too many rejected requests.

use super::decider::{MoveDecider, MoveRequest, TurnView};
use super::events::{MoveEvent, RejectReason, TurnOutcome, TurnResult};
use crate::board::{BoardGraph, Occupancy};
use crate::budget::MoveBudget;
use crate::error::MoveError;
use crate::rules::MovementRules;
use crate::types::{CellId, Direction, Location, TokenId};

enum Applied {
    Continue,
    Rejected(RejectReason),
    Finished(TurnOutcome),
}

struct Turn {
    token: TokenId,
    location: Location,
    budget: MoveBudget,
    moved: bool,
    events: Vec<MoveEvent>,
}

impl Turn {
    fn emit(&mut self, decider: &mut dyn MoveDecider, event: MoveEvent) {
        decider.observe(&event);
        self.events.push(event);
    }
}

pub struct TurnMovementController<'a> {
    board: &'a BoardGraph,
    rules: &'a MovementRules,
    occupancy: &'a mut Occupancy,
}

impl<'a> TurnMovementController<'a> {
    pub fn new(
        board: &'a BoardGraph,
        rules: &'a MovementRules,
        occupancy: &'a mut Occupancy,
    ) -> Self {
        Self { board, rules, occupancy }
    }

    /// Resolves one turn for `token` standing at `start`.
    ///
    /// On error the token is put back at `start`; the caller keeps its
    /// location unchanged.
    pub fn run(
        &mut self,
        token: TokenId,
        start: Location,
        roll: u32,
        decider: &mut dyn MoveDecider,
    ) -> Result<TurnResult, MoveError> {
        let budget = MoveBudget::new(roll, self.rules.die)?;
        let mut turn = Turn { token, location: start, budget, moved: false, events: Vec::new() };

        let outcome = match self.drive(&mut turn, decider) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.occupancy.shift(token, turn.location, start);
                return Err(err);
            }
        };

        match outcome {
            TurnOutcome::Stalled => {
                tracing::warn!(?token, at = %turn.location, roll, "token stalled");
            }
            _ => {
                tracing::info!(
                    ?token,
                    from = %start,
                    to = %turn.location,
                    roll,
                    remaining = turn.budget.remaining(),
                    ?outcome,
                    "turn resolved"
                );
            }
        }

        Ok(TurnResult {
            token,
            roll,
            start,
            final_location: turn.location,
            budget_remaining: turn.budget.remaining(),
            events: turn.events,
            outcome,
            target: decider.target(),
        })
    }

    fn view(&self, turn: &Turn) -> TurnView<'_> {
        TurnView {
            board: self.board,
            occupancy: self.occupancy,
            rules: self.rules,
            token: turn.token,
            location: turn.location,
            budget: turn.budget,
            moved: turn.moved,
        }
    }

    fn drive(
        &mut self,
        turn: &mut Turn,
        decider: &mut dyn MoveDecider,
    ) -> Result<TurnOutcome, MoveError> {
        decider.begin_turn(&self.view(turn))?;
        let max_rejected = self.rules.max_rejected_requests.max(1);
        let mut rejected = 0u8;

        loop {
            if turn.budget.is_exhausted() {
                turn.emit(decider, MoveEvent::BudgetExhausted);
                return Ok(TurnOutcome::BudgetExhausted);
            }
            let request = decider.next_request(&self.view(turn))?;
            match self.apply(turn, decider, request)? {
                Applied::Continue => {}
                Applied::Finished(outcome) => return Ok(outcome),
                Applied::Rejected(reason) => {
                    tracing::debug!(token = ?turn.token, ?reason, "move request rejected");
                    turn.emit(decider, MoveEvent::StepRejected(reason));
                    rejected += 1;
                    if rejected >= max_rejected {
                        return Ok(TurnOutcome::Stopped);
                    }
                }
            }
        }
    }

    fn apply(
        &mut self,
        turn: &mut Turn,
        decider: &mut dyn MoveDecider,
        request: MoveRequest,
    ) -> Result<Applied, MoveError> {
        match request {
            MoveRequest::Step(cell) => self.step(turn, decider, cell),
            MoveRequest::Toward(direction) => match self.cell_toward(turn.location, direction)? {
                Some(cell) => self.step(turn, decider, cell),
                None => Ok(Applied::Rejected(RejectReason::NoCellInDirection(direction))),
            },
            MoveRequest::Walk(cells) => {
                if cells.is_empty() {
                    return Ok(Applied::Rejected(RejectReason::EmptyWalk));
                }
                let requested = cells.len();
                for (taken, cell) in cells.into_iter().enumerate() {
                    if turn.budget.is_exhausted() {
                        tracing::debug!(token = ?turn.token, requested, taken, "walk truncated");
                        break;
                    }
                    match self.step(turn, decider, cell)? {
                        Applied::Continue => {}
                        other => return Ok(other),
                    }
                }
                Ok(Applied::Continue)
            }
            MoveRequest::SecretPassage => self.secret_passage(turn, decider),
            MoveRequest::EndTurn => Ok(Applied::Finished(TurnOutcome::Stopped)),
            MoveRequest::Hold if turn.moved => Ok(Applied::Finished(TurnOutcome::Stopped)),
            MoveRequest::Hold => {
                turn.emit(decider, MoveEvent::Stalled);
                Ok(Applied::Finished(TurnOutcome::Stalled))
            }
        }
    }

    /// The adjacent cell in `direction`; from a room, the first exit in that
    /// direction from any entry cell.
    fn cell_toward(
        &self,
        location: Location,
        direction: Direction,
    ) -> Result<Option<CellId>, MoveError> {
        for source in self.board.sources(location)? {
            if let Some(next) = self.board.step_toward(source, direction)?
                && self.board.is_adjacent(location, next)?
            {
                return Ok(Some(next));
            }
        }
        Ok(None)
    }

    fn step(
        &mut self,
        turn: &mut Turn,
        decider: &mut dyn MoveDecider,
        cell: CellId,
    ) -> Result<Applied, MoveError> {
        self.board.cell(cell)?;
        if !self.board.is_adjacent(turn.location, cell)? {
            return Ok(Applied::Rejected(RejectReason::NotAdjacent(cell)));
        }
        let exclusive = self.rules.block_occupied_corridors;
        let to = match self.board.room_of(cell) {
            Some(room) => Location::Room(room),
            None => Location::Cell(cell),
        };
        if exclusive && to.cell().is_some() && self.occupancy.is_blocked_for(cell, turn.token) {
            return Ok(Applied::Rejected(RejectReason::Blocked(cell)));
        }

        turn.budget.step()?;
        self.occupancy.relocate(turn.token, turn.location, to, exclusive)?;
        turn.location = to;
        turn.moved = true;
        turn.emit(decider, MoveEvent::MovedTo(cell));

        if let Location::Room(room) = to {
            tracing::debug!(token = ?turn.token, room = self.board.room_name(room), "room entered");
            turn.emit(decider, MoveEvent::RoomEntered(room));
            return Ok(Applied::Finished(TurnOutcome::RoomEntered(room)));
        }
        Ok(Applied::Continue)
    }

    fn secret_passage(
        &mut self,
        turn: &mut Turn,
        decider: &mut dyn MoveDecider,
    ) -> Result<Applied, MoveError> {
        if !self.rules.secret_passages {
            return Ok(Applied::Rejected(RejectReason::PassagesDisabled));
        }
        if turn.moved {
            return Ok(Applied::Rejected(RejectReason::PassageAfterMoving));
        }
        let Some((from, to)) = turn
            .location
            .room()
            .and_then(|from| self.board.secret_passage(from).map(|to| (from, to)))
        else {
            return Ok(Applied::Rejected(RejectReason::NoSecretPassage));
        };

        self.occupancy.shift(turn.token, turn.location, Location::Room(to));
        turn.location = Location::Room(to);
        turn.moved = true;
        turn.emit(decider, MoveEvent::SecretPassageUsed { from, to });
        turn.emit(decider, MoveEvent::RoomEntered(to));
        Ok(Applied::Finished(TurnOutcome::RoomEntered(to)))
    }
}
