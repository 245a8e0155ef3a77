//! Shared board fixtures for the unit test suites.

use slotmap::SlotMap;

use crate::board::{BoardGraph, BoardSpec, CellSpec, RoomSpec};
use crate::types::{CellId, TokenId};

pub(crate) fn cells(raw: &[u32]) -> Vec<CellId> {
    raw.iter().copied().map(CellId).collect()
}

pub(crate) fn token_ids(count: usize) -> Vec<TokenId> {
    let mut keys: SlotMap<TokenId, ()> = SlotMap::with_key();
    (0..count).map(|_| keys.insert(())).collect()
}

fn build(cells: Vec<CellSpec>, rooms: &[&str]) -> BoardGraph {
    let spec = BoardSpec {
        cells,
        rooms: rooms.iter().map(|name| RoomSpec::named(name)).collect(),
        room_priority: Vec::new(),
    };
    BoardGraph::from_spec(&spec).expect("fixture board is valid")
}

/// 1 - 2 - 3 - 4(R)
pub(crate) fn linear_board() -> BoardGraph {
    build(
        vec![
            CellSpec::corridor(1, &[2]),
            CellSpec::corridor(2, &[1, 3]),
            CellSpec::corridor(3, &[2, 4]),
            CellSpec::entry(4, "R", &[3]),
        ],
        &["R"],
    )
}

/// 1 - 2    3 - 4(R), with no bridge between the halves.
pub(crate) fn split_board() -> BoardGraph {
    build(
        vec![
            CellSpec::corridor(1, &[2]),
            CellSpec::corridor(2, &[1]),
            CellSpec::corridor(3, &[4]),
            CellSpec::entry(4, "R", &[3]),
        ],
        &["R"],
    )
}

/// 1(Hall) - 2 - 3 - 4(Study), with a side corridor 5 hanging off 3.
pub(crate) fn two_room_board() -> BoardGraph {
    build(
        vec![
            CellSpec::entry(1, "Hall", &[2]),
            CellSpec::corridor(2, &[1, 3]),
            CellSpec::corridor(3, &[2, 4, 5]),
            CellSpec::entry(4, "Study", &[3]),
            CellSpec::corridor(5, &[3]),
        ],
        &["Hall", "Study"],
    )
}

/// Two routes from 1 into R: 1-2-3-4(R) and 1-5-6-4(R).
pub(crate) fn ring_board() -> BoardGraph {
    build(
        vec![
            CellSpec::corridor(1, &[2, 5]),
            CellSpec::corridor(2, &[1, 3]),
            CellSpec::corridor(3, &[2, 4]),
            CellSpec::entry(4, "R", &[3, 6]),
            CellSpec::corridor(5, &[1, 6]),
            CellSpec::corridor(6, &[5, 4]),
        ],
        &["R"],
    )
}
