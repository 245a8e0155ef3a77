//! Declarative board description consumed once at board construction.
//! The schema (cell id, neighbor ids, room name, entry flag) is stable; the
//! on-disk format is JSON.

use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::types::{CellId, Coord};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSpec {
    pub cells: Vec<CellSpec>,
    pub rooms: Vec<RoomSpec>,
    /// Rooms listed here rank first, in order; unlisted rooms follow alphabetically.
    #[serde(default)]
    pub room_priority: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSpec {
    pub id: CellId,
    #[serde(default)]
    pub neighbors: Vec<CellId>,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub entry: bool,
    #[serde(default)]
    pub coord: Option<Coord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSpec {
    pub name: String,
    #[serde(default)]
    pub secret_passage: Option<String>,
}

impl BoardSpec {
    pub fn from_json_str(json: &str) -> Result<Self, BoardError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, BoardError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl CellSpec {
    pub fn corridor(id: u32, neighbors: &[u32]) -> Self {
        Self {
            id: CellId(id),
            neighbors: neighbors.iter().copied().map(CellId).collect(),
            room: None,
            entry: false,
            coord: None,
        }
    }

    pub fn entry(id: u32, room: &str, neighbors: &[u32]) -> Self {
        Self { room: Some(room.to_string()), entry: true, ..Self::corridor(id, neighbors) }
    }
}

impl RoomSpec {
    pub fn named(name: &str) -> Self {
        Self { name: name.to_string(), secret_passage: None }
    }
}
