//! One game's board, rules and tokens.
//!
//! Every query and mutation goes through a [`Session`]; there is no
//! process-wide board. The game loop calls [`Session::resolve_turn`] once per
//! active token per round.

use serde::{Deserialize, Serialize};
use slotmap::{SecondaryMap, SlotMap};

use crate::board::{BoardGraph, Occupancy, STARTING_POSITIONS};
use crate::dice::DiceRoller;
use crate::error::{BoardError, MoveError};
use crate::movement::{
    AiMoveDecider, AiMover, HumanInput, HumanMoveDecider, TurnMovementController, TurnResult,
};
use crate::rules::MovementRules;
use crate::types::{Location, PlayerKind, RoomId, TokenId};

mod hash;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub name: String,
    pub kind: PlayerKind,
    pub location: Location,
    /// Cleared when the player is eliminated. The token stays on the board.
    pub active: bool,
}

/// Serializable token state for an external save/load collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub name: String,
    pub kind: PlayerKind,
    pub location: Location,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<AiMover>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub tokens: Vec<TokenRecord>,
}

pub struct Session {
    board: BoardGraph,
    rules: MovementRules,
    tokens: SlotMap<TokenId, Token>,
    occupancy: Occupancy,
    ai: SecondaryMap<TokenId, AiMover>,
}

impl Session {
    pub fn new(board: BoardGraph, rules: MovementRules) -> Result<Self, MoveError> {
        rules.validate()?;
        Ok(Self {
            board,
            rules,
            tokens: SlotMap::with_key(),
            occupancy: Occupancy::default(),
            ai: SecondaryMap::new(),
        })
    }

    /// The classic board with the six suspects on their starting tiles, all
    /// controlled by the AI.
    pub fn classic(rules: MovementRules) -> Result<Self, MoveError> {
        let mut session = Self::new(BoardGraph::classic()?, rules)?;
        for (name, coord) in STARTING_POSITIONS {
            let cell = session
                .board
                .cell_at(coord)
                .ok_or(BoardError::NoCellAt { row: coord.row, col: coord.col })?;
            session.add_token(name, PlayerKind::Ai, Location::Cell(cell))?;
        }
        Ok(session)
    }

    pub fn board(&self) -> &BoardGraph {
        &self.board
    }

    pub fn rules(&self) -> &MovementRules {
        &self.rules
    }

    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    /// Places a new token. An entry cell puts the token in that cell's room.
    pub fn add_token(
        &mut self,
        name: impl Into<String>,
        kind: PlayerKind,
        location: Location,
    ) -> Result<TokenId, MoveError> {
        let location = self.normalize(location)?;
        if let Location::Cell(cell) = location
            && self.rules.block_occupied_corridors
            && self.occupancy.is_occupied(cell)
        {
            return Err(MoveError::CellOccupied(cell));
        }

        let name = name.into();
        tracing::debug!(%name, ?kind, at = %location, "token placed");
        let id = self.tokens.insert(Token { name, kind, location, active: true });
        self.occupancy.enter(id, location, false)?;
        if kind == PlayerKind::Ai {
            self.ai.insert(id, AiMover::default());
        }
        Ok(id)
    }

    fn normalize(&self, location: Location) -> Result<Location, MoveError> {
        match location {
            Location::Cell(cell) => {
                self.board.cell(cell)?;
                Ok(self.board.room_of(cell).map_or(location, Location::Room))
            }
            Location::Room(room) => {
                self.board.room(room)?;
                Ok(location)
            }
        }
    }

    pub fn token(&self, id: TokenId) -> Result<&Token, MoveError> {
        self.tokens.get(id).ok_or(MoveError::UnknownToken(id))
    }

    /// Tokens in the order they were added.
    pub fn tokens(&self) -> impl Iterator<Item = (TokenId, &Token)> {
        self.tokens.iter()
    }

    pub fn token_by_name(&self, name: &str) -> Option<TokenId> {
        self.tokens.iter().find(|(_, token)| token.name == name).map(|(id, _)| id)
    }

    /// Active tokens in turn order.
    pub fn turn_order(&self) -> Vec<TokenId> {
        self.tokens.iter().filter(|(_, token)| token.active).map(|(id, _)| id).collect()
    }

    pub fn ai_mover(&self, id: TokenId) -> Option<&AiMover> {
        self.ai.get(id)
    }

    /// For the deduction collaborator: commit targets, narrow candidate rooms.
    pub fn ai_mover_mut(&mut self, id: TokenId) -> Option<&mut AiMover> {
        self.ai.get_mut(id)
    }

    /// Moves `id` for one turn with the given die `roll`.
    ///
    /// Human tokens draw their requests from `human`; AI tokens ignore it.
    pub fn resolve_turn(
        &mut self,
        id: TokenId,
        roll: u32,
        human: Option<&mut dyn HumanInput>,
    ) -> Result<TurnResult, MoveError> {
        let token = self.token(id)?;
        if !token.active {
            return Err(MoveError::InactiveToken(id));
        }
        let (kind, start) = (token.kind, token.location);

        let mut controller =
            TurnMovementController::new(&self.board, &self.rules, &mut self.occupancy);
        let result = match kind {
            PlayerKind::Human => {
                let input = human.ok_or(MoveError::MissingHumanInput(id))?;
                controller.run(id, start, roll, &mut HumanMoveDecider::new(input))?
            }
            PlayerKind::Ai => {
                let mover = self.ai.get_mut(id).ok_or(MoveError::UnknownToken(id))?;
                controller.run(id, start, roll, &mut AiMoveDecider::new(mover))?
            }
        };

        if let Some(token) = self.tokens.get_mut(id) {
            token.location = result.final_location;
        }
        Ok(result)
    }

    /// One turn for every active AI token, in turn order, rolling `dice` for each.
    pub fn play_ai_round(&mut self, dice: &mut DiceRoller) -> Result<Vec<TurnResult>, MoveError> {
        let mut results = Vec::new();
        for id in self.turn_order() {
            if self.token(id)?.kind != PlayerKind::Ai {
                continue;
            }
            results.push(self.resolve_turn(id, dice.roll(), None)?);
        }
        Ok(results)
    }

    /// Moves a token straight into `room`, as when a suggestion summons a suspect.
    pub fn place_in_room(&mut self, id: TokenId, room: RoomId) -> Result<(), MoveError> {
        self.board.room(room)?;
        let token = self.tokens.get_mut(id).ok_or(MoveError::UnknownToken(id))?;
        let to = Location::Room(room);
        self.occupancy.shift(id, token.location, to);
        tracing::debug!(name = %token.name, room = self.board.room_name(room), "token summoned");
        token.location = to;
        Ok(())
    }

    /// Takes an eliminated player's token out of the turn order.
    pub fn deactivate(&mut self, id: TokenId) -> Result<(), MoveError> {
        let token = self.tokens.get_mut(id).ok_or(MoveError::UnknownToken(id))?;
        token.active = false;
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let tokens = self
            .tokens
            .iter()
            .map(|(id, token)| TokenRecord {
                name: token.name.clone(),
                kind: token.kind,
                location: token.location,
                active: token.active,
                ai: self.ai.get(id).cloned(),
            })
            .collect();
        SessionSnapshot { tokens }
    }

    /// Rebuilds a session from `snapshot`. Tokens come back in their saved
    /// order, so turn order survives the round trip.
    pub fn restore(
        board: BoardGraph,
        rules: MovementRules,
        snapshot: &SessionSnapshot,
    ) -> Result<Self, MoveError> {
        let mut session = Self::new(board, rules)?;
        for record in &snapshot.tokens {
            let id = session.add_token(record.name.clone(), record.kind, record.location)?;
            if !record.active {
                session.deactivate(id)?;
            }
            if let Some(ai) = &record.ai
                && let Some(mover) = session.ai.get_mut(id)
            {
                *mover = ai.clone();
            }
        }
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::{MoveEvent, MoveRequest, ScriptedInput, TurnOutcome};
    use crate::rules::DieRange;
    use crate::test_support::*;
    use crate::types::CellId;

    #[test]
    fn entry_cell_start_is_normalized_to_its_room() {
        let board = two_room_board();
        let hall = board.room_by_name("Hall").unwrap();
        let mut session = Session::new(board, MovementRules::default()).unwrap();
        let id = session.add_token("Plum", PlayerKind::Ai, Location::Cell(CellId(1))).unwrap();
        assert_eq!(session.token(id).unwrap().location, Location::Room(hall));
        assert_eq!(session.occupancy().room_count(hall), 1);
    }

    #[test]
    fn corridor_starts_must_be_free() {
        let mut session = Session::new(linear_board(), MovementRules::default()).unwrap();
        session.add_token("Scarlet", PlayerKind::Ai, Location::Cell(CellId(1))).unwrap();
        assert!(matches!(
            session.add_token("Mustard", PlayerKind::Ai, Location::Cell(CellId(1))),
            Err(MoveError::CellOccupied(CellId(1)))
        ));
        assert!(matches!(
            session.add_token("Green", PlayerKind::Ai, Location::Cell(CellId(50))),
            Err(MoveError::Board(_))
        ));
    }

    #[test]
    fn human_turn_requires_input() {
        let mut session = Session::new(linear_board(), MovementRules::default()).unwrap();
        let id =
            session.add_token("Scarlet", PlayerKind::Human, Location::Cell(CellId(1))).unwrap();
        assert!(matches!(
            session.resolve_turn(id, 3, None),
            Err(MoveError::MissingHumanInput(_))
        ));

        let mut input = ScriptedInput::new([MoveRequest::Walk(cells(&[2, 3, 4]))]);
        let result = session.resolve_turn(id, 3, Some(&mut input)).unwrap();
        let r = session.board().room_by_name("R").unwrap();
        assert_eq!(result.outcome, TurnOutcome::RoomEntered(r));
        assert_eq!(session.token(id).unwrap().location, Location::Room(r));
        assert_eq!(input.seen().last(), Some(&MoveEvent::RoomEntered(r)));
    }

    #[test]
    fn failed_turn_keeps_the_token_where_it_was() {
        let mut session = Session::new(linear_board(), MovementRules::default()).unwrap();
        let id =
            session.add_token("Scarlet", PlayerKind::Human, Location::Cell(CellId(1))).unwrap();
        let mut input = ScriptedInput::new([MoveRequest::Step(CellId(2))]);
        assert!(matches!(
            session.resolve_turn(id, 9, Some(&mut input)),
            Err(MoveError::InvalidRoll { roll: 9, .. })
        ));
        assert_eq!(session.token(id).unwrap().location, Location::Cell(CellId(1)));
    }

    #[test]
    fn deactivated_tokens_keep_their_place_but_lose_their_turn() {
        let mut session = Session::new(linear_board(), MovementRules::default()).unwrap();
        let id = session.add_token("Scarlet", PlayerKind::Ai, Location::Cell(CellId(2))).unwrap();
        session.deactivate(id).unwrap();
        assert!(matches!(session.resolve_turn(id, 2, None), Err(MoveError::InactiveToken(_))));
        assert!(session.turn_order().is_empty());
        assert_eq!(session.occupancy().occupant(CellId(2)), Some(id));
    }

    #[test]
    fn summoned_token_frees_its_corridor_cell() {
        let board = two_room_board();
        let study = board.room_by_name("Study").unwrap();
        let mut session = Session::new(board, MovementRules::default()).unwrap();
        let id = session.add_token("Green", PlayerKind::Ai, Location::Cell(CellId(3))).unwrap();
        session.place_in_room(id, study).unwrap();
        assert!(!session.occupancy().is_occupied(CellId(3)));
        assert_eq!(session.occupancy().room_count(study), 1);
        assert!(session.place_in_room(id, RoomId(40)).is_err());
    }

    #[test]
    fn snapshot_restores_locations_and_ai_state() {
        let board = two_room_board();
        let study = board.room_by_name("Study").unwrap();
        let mut session = Session::new(board.clone(), MovementRules::default()).unwrap();
        let ai = session.add_token("White", PlayerKind::Ai, Location::Cell(CellId(2))).unwrap();
        let human =
            session.add_token("Peacock", PlayerKind::Human, Location::Cell(CellId(5))).unwrap();
        session.ai_mover_mut(ai).unwrap().commit_target(study);
        session.deactivate(human).unwrap();

        let snapshot = session.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: SessionSnapshot = serde_json::from_str(&json).unwrap();
        let restored = Session::restore(board, MovementRules::default(), &decoded).unwrap();

        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.snapshot_hash(), session.snapshot_hash());
        let white = restored.token_by_name("White").unwrap();
        assert_eq!(restored.ai_mover(white).unwrap().target(), Some(study));
    }

    #[test]
    fn classic_session_seats_six_suspects() {
        let mut session = Session::classic(MovementRules::default()).unwrap();
        assert_eq!(session.turn_order().len(), 6);
        let mustard = session.token_by_name("Colonel Mustard").unwrap();
        assert_eq!(session.token(mustard).unwrap().location, Location::Cell(CellId(5 * 22)));

        let mut dice = DiceRoller::new(3, DieRange::default());
        let results = session.play_ai_round(&mut dice).unwrap();
        assert_eq!(results.len(), 6);
        for result in &results {
            assert!(result.budget_remaining <= result.roll);
            assert_eq!(result.final_location, session.token(result.token).unwrap().location);
        }
    }
}
