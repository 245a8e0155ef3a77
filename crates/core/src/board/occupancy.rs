//! Which token stands where.
//!
//! Rooms hold any number of tokens. Corridor cells hold one token under the
//! blocking rule; callers pass `exclusive = false` when the rule is off and
//! tokens may share a cell.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::MoveError;
use crate::types::{CellId, Location, RoomId, TokenId};

#[derive(Clone, Debug, Default)]
pub struct Occupancy {
    corridor: BTreeMap<CellId, BTreeSet<TokenId>>,
    rooms: BTreeMap<RoomId, u16>,
}

impl Occupancy {
    /// Lowest-keyed token on `cell`.
    pub fn occupant(&self, cell: CellId) -> Option<TokenId> {
        self.corridor.get(&cell).and_then(|tokens| tokens.first().copied())
    }

    pub fn occupants(&self, cell: CellId) -> impl Iterator<Item = TokenId> + '_ {
        self.corridor.get(&cell).into_iter().flatten().copied()
    }

    pub fn is_occupied(&self, cell: CellId) -> bool {
        self.corridor.contains_key(&cell)
    }

    /// Occupied by a token other than `token`.
    pub fn is_blocked_for(&self, cell: CellId, token: TokenId) -> bool {
        self.occupants(cell).any(|occupant| occupant != token)
    }

    pub fn room_count(&self, room: RoomId) -> u16 {
        self.rooms.get(&room).copied().unwrap_or(0)
    }

    pub fn occupied_cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.corridor.keys().copied()
    }

    pub(crate) fn enter(
        &mut self,
        token: TokenId,
        location: Location,
        exclusive: bool,
    ) -> Result<(), MoveError> {
        if exclusive
            && let Location::Cell(cell) = location
            && self.is_blocked_for(cell, token)
        {
            return Err(MoveError::CellOccupied(cell));
        }
        self.place(token, location);
        Ok(())
    }

    fn place(&mut self, token: TokenId, location: Location) {
        match location {
            Location::Cell(cell) => {
                self.corridor.entry(cell).or_default().insert(token);
            }
            Location::Room(room) => {
                *self.rooms.entry(room).or_insert(0) += 1;
            }
        }
    }

    fn leave(&mut self, token: TokenId, location: Location) {
        match location {
            Location::Cell(cell) => {
                if let Some(tokens) = self.corridor.get_mut(&cell) {
                    tokens.remove(&token);
                    if tokens.is_empty() {
                        self.corridor.remove(&cell);
                    }
                }
            }
            Location::Room(room) => {
                if let Some(count) = self.rooms.get_mut(&room) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        self.rooms.remove(&room);
                    }
                }
            }
        }
    }

    pub(crate) fn relocate(
        &mut self,
        token: TokenId,
        from: Location,
        to: Location,
        exclusive: bool,
    ) -> Result<(), MoveError> {
        if exclusive
            && let Location::Cell(cell) = to
            && self.is_blocked_for(cell, token)
        {
            return Err(MoveError::CellOccupied(cell));
        }
        self.shift(token, from, to);
        Ok(())
    }

    /// Moves `token` without checking the destination.
    pub(crate) fn shift(&mut self, token: TokenId, from: Location, to: Location) {
        self.leave(token, from);
        self.place(token, to);
    }
}
