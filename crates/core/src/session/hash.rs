//! Stable fingerprint of token state for determinism checks.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use super::Session;
use crate::movement::AiState;
use crate::types::{Location, PlayerKind, RoomId};

impl Session {
    /// Hashes every token's name, kind, location, active flag and AI state,
    /// in turn order. Independent of slot keys, so a restored session hashes
    /// the same as the one it was saved from.
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        for (id, token) in self.tokens() {
            hasher.write(token.name.as_bytes());
            hasher.write_u8(0xff);
            hasher.write_u8(match token.kind {
                PlayerKind::Human => 0,
                PlayerKind::Ai => 1,
            });
            match token.location {
                Location::Cell(cell) => {
                    hasher.write_u8(0);
                    hasher.write_u32(cell.0);
                }
                Location::Room(room) => {
                    hasher.write_u8(1);
                    hasher.write_u16(room.0);
                }
            }
            hasher.write_u8(u8::from(token.active));
            if let Some(mover) = self.ai_mover(id) {
                let (tag, room) = match mover.state() {
                    AiState::NoTarget => (0, RoomId(0)),
                    AiState::TargetChosen(room) => (1, room),
                    AiState::EnRoute(room) => (2, room),
                    AiState::ArrivedAtRoom(room) => (3, room),
                };
                hasher.write_u8(tag);
                hasher.write_u16(room.0);
                match mover.left_room() {
                    Some(room) => {
                        hasher.write_u8(1);
                        hasher.write_u16(room.0);
                    }
                    None => hasher.write_u8(0),
                }
            }
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::board::BoardGraph;
    use crate::rules::MovementRules;
    use crate::session::Session;
    use crate::types::{CellId, Location, PlayerKind};

    #[test]
    fn hash_tracks_token_moves() {
        let board = BoardGraph::classic().unwrap();
        let mut session = Session::new(board, MovementRules::default()).unwrap();
        let id = session.add_token("Mustard", PlayerKind::Ai, Location::Cell(CellId(110))).unwrap();
        let before = session.snapshot_hash();
        assert_eq!(before, session.snapshot_hash());

        session.resolve_turn(id, 3, None).unwrap();
        assert_ne!(before, session.snapshot_hash());
    }
}
