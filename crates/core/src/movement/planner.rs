//! Budget-aware shortest paths toward a room.

use crate::board::{BoardGraph, Occupancy, shortest_path_to_room};
use crate::budget::MoveBudget;
use crate::error::MoveError;
use crate::rules::MovementRules;
use crate::types::{CellId, Location, RoomId};

/// Cells to walk, start exclusive. `full_length` is the length of the whole
/// route, which is longer than `steps` when the budget cut it short.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    steps: Vec<CellId>,
    full_length: usize,
}

impl Path {
    pub fn steps(&self) -> &[CellId] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<CellId> {
        self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn full_length(&self) -> usize {
        self.full_length
    }

    pub fn is_partial(&self) -> bool {
        self.steps.len() < self.full_length
    }

    pub fn last(&self) -> Option<CellId> {
        self.steps.last().copied()
    }
}

#[derive(Clone, Copy)]
pub struct PathPlanner<'a> {
    board: &'a BoardGraph,
    occupancy: &'a Occupancy,
    rules: &'a MovementRules,
}

impl<'a> PathPlanner<'a> {
    pub fn new(board: &'a BoardGraph, occupancy: &'a Occupancy, rules: &'a MovementRules) -> Self {
        Self { board, occupancy, rules }
    }

    pub fn board(&self) -> &'a BoardGraph {
        self.board
    }

    pub fn rules(&self) -> &'a MovementRules {
        self.rules
    }

    fn is_blocked(&self, cell: CellId) -> bool {
        self.rules.block_occupied_corridors && self.occupancy.is_occupied(cell)
    }

    fn route(&self, start: Location, target: RoomId) -> Result<Option<Vec<CellId>>, MoveError> {
        self.board.room(target)?;
        let sources = self.board.sources(start)?;
        Ok(shortest_path_to_room(self.board, &sources, target, |cell| self.is_blocked(cell)))
    }

    /// Hop count to `target` given current occupancy; `None` when no route is open.
    pub fn distance(&self, start: Location, target: RoomId) -> Result<Option<u32>, MoveError> {
        Ok(self.route(start, target)?.map(|steps| steps.len() as u32))
    }

    /// Shortest route to `target`, cut to what `budget` can still pay for.
    pub fn plan(
        &self,
        start: Location,
        target: RoomId,
        budget: &MoveBudget,
    ) -> Result<Path, MoveError> {
        let Some(mut steps) = self.route(start, target)? else {
            return Err(MoveError::NoPath { from: start, room: target });
        };
        let full_length = steps.len();
        steps.truncate(budget.remaining() as usize);
        tracing::debug!(
            from = %start,
            room = self.board.room_name(target),
            steps = steps.len(),
            full_length,
            "planned path"
        );
        Ok(Path { steps, full_length })
    }
}
