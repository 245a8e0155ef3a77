//! Error types for board construction and movement resolution.

use crate::types::{CellId, Location, RoomId, TokenId};

/// Errors raised while building or querying a [`BoardGraph`](crate::BoardGraph).
///
/// Any of these at runtime means the board specification or the caller is
/// wrong; none of them are gameplay conditions.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("unknown cell {0}")]
    UnknownCell(CellId),

    #[error("unknown room {0:?}")]
    UnknownRoom(String),

    #[error("{0} is not on this board")]
    UnknownRoomId(RoomId),

    #[error("cell {0} is declared more than once")]
    DuplicateCell(CellId),

    #[error("room {0:?} is declared more than once")]
    DuplicateRoom(String),

    #[error("cell {cell} lists undeclared neighbor {neighbor}")]
    DanglingNeighbor { cell: CellId, neighbor: CellId },

    #[error("cell {0} lists itself as a neighbor")]
    SelfLoop(CellId),

    #[error("cell {from} lists {to} as a neighbor but not the other way round")]
    AsymmetricAdjacency { from: CellId, to: CellId },

    #[error("entry cell {0} does not belong to a room")]
    EntryWithoutRoom(CellId),

    #[error("cell {0} belongs to a room but is not flagged as an entry")]
    RoomCellNotEntry(CellId),

    #[error("room {0:?} has no entry cells")]
    RoomWithoutEntries(String),

    #[error("coordinate ({row}, {col}) is used by more than one cell")]
    DuplicateCoord { row: i32, col: i32 },

    #[error("no cell at ({row}, {col})")]
    NoCellAt { row: i32, col: i32 },

    #[error("too many rooms on one board")]
    TooManyRooms,

    #[error("malformed board specification: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors surfaced by movement resolution.
///
/// `NoPath` and `BudgetExhausted` are expected during play and are recovered
/// inside the engine; the rest propagate to the game loop.
#[derive(Debug, thiserror::Error)]
pub enum MoveError {
    #[error("roll {roll} is outside the die range {min}..={max}")]
    InvalidRoll { roll: u32, min: u32, max: u32 },

    #[error("die range {min}..={max} is empty or starts below 1")]
    InvalidDieRange { min: u32, max: u32 },

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("no path from {from} to {room}")]
    NoPath { from: Location, room: RoomId },

    #[error("requested {requested} steps but only {remaining} remain")]
    BudgetExhausted { requested: u32, remaining: u32 },

    #[error("token {0:?} is not in this session")]
    UnknownToken(TokenId),

    #[error("token {0:?} has been eliminated")]
    InactiveToken(TokenId),

    #[error("human token {0:?} needs an input provider to move")]
    MissingHumanInput(TokenId),

    #[error("cell {0} is already occupied")]
    CellOccupied(CellId),
}
