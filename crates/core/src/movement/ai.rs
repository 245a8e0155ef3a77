//! Target selection and path following for AI-controlled tokens.
//!
//! The mover keeps only its destination between turns. Paths are re-planned
//! every turn because other tokens may have moved into the way.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::events::MoveEvent;
use super::planner::{Path, PathPlanner};
use crate::budget::MoveBudget;
use crate::error::MoveError;
use crate::types::{Location, RoomId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    NoTarget,
    TargetChosen(RoomId),
    EnRoute(RoomId),
    ArrivedAtRoom(RoomId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AiDecision {
    Walk { target: RoomId, path: Path },
    SecretPassage { to: RoomId },
    Stalled,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiMover {
    state: AiState,
    /// Rooms still worth visiting. Empty means every room.
    #[serde(default)]
    candidates: BTreeSet<RoomId>,
    /// Room the token last moved out of. Picked again only when nothing
    /// else is reachable.
    #[serde(default)]
    left_room: Option<RoomId>,
}

impl AiMover {
    pub fn state(&self) -> AiState {
        self.state
    }

    pub fn target(&self) -> Option<RoomId> {
        match self.state {
            AiState::NoTarget => None,
            AiState::TargetChosen(room) | AiState::EnRoute(room) | AiState::ArrivedAtRoom(room) => {
                Some(room)
            }
        }
    }

    /// Steers the token toward `room` from its next turn on.
    pub fn commit_target(&mut self, room: RoomId) {
        self.state = AiState::TargetChosen(room);
    }

    pub fn set_candidate_rooms(&mut self, rooms: impl IntoIterator<Item = RoomId>) {
        self.candidates = rooms.into_iter().collect();
    }

    pub fn candidate_rooms(&self) -> &BTreeSet<RoomId> {
        &self.candidates
    }

    pub fn left_room(&self) -> Option<RoomId> {
        self.left_room
    }

    pub fn begin_turn(&mut self) {
        if let AiState::ArrivedAtRoom(_) = self.state {
            self.state = AiState::NoTarget;
        }
    }

    pub fn observe(&mut self, event: &MoveEvent) {
        match *event {
            MoveEvent::RoomEntered(room) => self.state = AiState::ArrivedAtRoom(room),
            MoveEvent::SecretPassageUsed { to, .. } => self.state = AiState::ArrivedAtRoom(to),
            _ => {}
        }
    }

    /// Nearest room reachable right now, lowest `RoomId` on ties.
    ///
    /// The current room and `excluded` are never picked. A secret passage out
    /// of the current room makes its destination distance 0 when passages are
    /// enabled. When no candidate room is reachable the search widens to every
    /// room. The room the token just left comes back into play last, so two
    /// rooms joined by a passage cannot trap it.
    pub fn choose_target(
        &self,
        planner: &PathPlanner<'_>,
        location: Location,
        excluded: &BTreeSet<RoomId>,
    ) -> Result<Option<RoomId>, MoveError> {
        if let Some(left) = self.left_room
            && !excluded.contains(&left)
        {
            let mut avoided = excluded.clone();
            avoided.insert(left);
            if let Some(room) = self.choose_among(planner, location, &avoided)? {
                return Ok(Some(room));
            }
        }
        self.choose_among(planner, location, excluded)
    }

    fn choose_among(
        &self,
        planner: &PathPlanner<'_>,
        location: Location,
        excluded: &BTreeSet<RoomId>,
    ) -> Result<Option<RoomId>, MoveError> {
        let narrowed = self.nearest_room(planner, location, excluded, true)?;
        if narrowed.is_some() || self.candidates.is_empty() {
            return Ok(narrowed);
        }
        self.nearest_room(planner, location, excluded, false)
    }

    fn nearest_room(
        &self,
        planner: &PathPlanner<'_>,
        location: Location,
        excluded: &BTreeSet<RoomId>,
        use_candidates: bool,
    ) -> Result<Option<RoomId>, MoveError> {
        let board = planner.board();
        let current = location.room();
        let passage = current
            .filter(|_| planner.rules().secret_passages)
            .and_then(|room| board.secret_passage(room));

        let mut best: Option<(u32, RoomId)> = None;
        for room in board.rooms() {
            let id = room.id();
            if Some(id) == current || excluded.contains(&id) {
                continue;
            }
            if use_candidates && !self.candidates.is_empty() && !self.candidates.contains(&id) {
                continue;
            }
            let distance =
                if passage == Some(id) { Some(0) } else { planner.distance(location, id)? };
            let Some(distance) = distance else {
                continue;
            };
            if best.is_none_or(|(best_distance, _)| distance < best_distance) {
                best = Some((distance, id));
            }
        }
        Ok(best.map(|(_, room)| room))
    }

    /// Decides this turn's movement.
    ///
    /// A committed target that has become unreachable is dropped and one
    /// replacement is chosen; if that fails as well the token stalls.
    pub fn plan_turn(
        &mut self,
        planner: &PathPlanner<'_>,
        location: Location,
        budget: &MoveBudget,
    ) -> Result<AiDecision, MoveError> {
        let board = planner.board();
        let mut excluded = BTreeSet::new();

        for _ in 0..2 {
            let committed = self.target().filter(|&room| Some(room) != location.room());
            let target = match committed {
                Some(room) => room,
                None => match self.choose_target(planner, location, &excluded)? {
                    Some(room) => {
                        tracing::debug!(
                            room = board.room_name(room),
                            from = %location,
                            "ai chose target"
                        );
                        room
                    }
                    None => break,
                },
            };
            self.state = AiState::TargetChosen(target);

            if planner.rules().secret_passages
                && let Some(current) = location.room()
                && board.secret_passage(current) == Some(target)
            {
                self.state = AiState::EnRoute(target);
                self.left_room = Some(current);
                return Ok(AiDecision::SecretPassage { to: target });
            }

            match planner.plan(location, target, budget) {
                Ok(path) => {
                    self.state = AiState::EnRoute(target);
                    if let Some(current) = location.room()
                        && !path.is_empty()
                    {
                        self.left_room = Some(current);
                    }
                    return Ok(AiDecision::Walk { target, path });
                }
                Err(MoveError::NoPath { .. }) => {
                    tracing::debug!(
                        room = board.room_name(target),
                        from = %location,
                        "ai target unreachable"
                    );
                    excluded.insert(target);
                    self.state = AiState::NoTarget;
                }
                Err(err) => return Err(err),
            }
        }

        self.state = AiState::NoTarget;
        Ok(AiDecision::Stalled)
    }
}
