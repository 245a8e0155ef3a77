//! Static board topology: corridor cells, room entry cells and the rooms
//! they open onto.
//!
//! A [`BoardGraph`] is built once from a [`BoardSpec`] and never changes
//! afterwards. Token positions live in [`Occupancy`], which the session owns
//! next to the graph.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::BoardError;
use crate::types::{CellId, CellKind, Coord, Direction, Location, RoomId};

mod classic;
mod occupancy;
mod search;
mod spec;

pub use classic::{CLASSIC_HEIGHT, CLASSIC_WIDTH, STARTING_POSITIONS, classic_spec};
pub use occupancy::Occupancy;
pub(crate) use search::shortest_path_to_room;
pub use spec::{BoardSpec, CellSpec, RoomSpec};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    id: CellId,
    kind: CellKind,
    coord: Option<Coord>,
    neighbors: BTreeSet<CellId>,
    room: Option<RoomId>,
}

impl Cell {
    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn coord(&self) -> Option<Coord> {
        self.coord
    }

    pub fn neighbors(&self) -> &BTreeSet<CellId> {
        &self.neighbors
    }

    pub fn room(&self) -> Option<RoomId> {
        self.room
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
    id: RoomId,
    name: String,
    entries: BTreeSet<CellId>,
    secret_passage: Option<RoomId>,
}

impl Room {
    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &BTreeSet<CellId> {
        &self.entries
    }

    pub fn secret_passage(&self) -> Option<RoomId> {
        self.secret_passage
    }
}

#[derive(Clone, Debug)]
pub struct BoardGraph {
    cells: BTreeMap<CellId, Cell>,
    /// Indexed by `RoomId`, so iteration order is priority order.
    rooms: Vec<Room>,
    by_coord: BTreeMap<Coord, CellId>,
}

impl BoardGraph {
    pub fn from_json_str(json: &str) -> Result<Self, BoardError> {
        Self::from_spec(&BoardSpec::from_json_str(json)?)
    }

    /// The built-in 22x22 manor board.
    pub fn classic() -> Result<Self, BoardError> {
        Self::from_spec(&classic_spec())
    }

    pub fn from_spec(spec: &BoardSpec) -> Result<Self, BoardError> {
        let room_ids = rank_rooms(spec)?;

        let mut cells = BTreeMap::new();
        let mut by_coord = BTreeMap::new();
        for cell_spec in &spec.cells {
            let room = match (&cell_spec.room, cell_spec.entry) {
                (Some(name), true) => Some(
                    *room_ids.get(name).ok_or_else(|| BoardError::UnknownRoom(name.clone()))?,
                ),
                (Some(_), false) => return Err(BoardError::RoomCellNotEntry(cell_spec.id)),
                (None, true) => return Err(BoardError::EntryWithoutRoom(cell_spec.id)),
                (None, false) => None,
            };
            let kind = if room.is_some() { CellKind::RoomEntry } else { CellKind::Corridor };
            if let Some(coord) = cell_spec.coord
                && by_coord.insert(coord, cell_spec.id).is_some()
            {
                return Err(BoardError::DuplicateCoord { row: coord.row, col: coord.col });
            }
            let cell = Cell {
                id: cell_spec.id,
                kind,
                coord: cell_spec.coord,
                neighbors: cell_spec.neighbors.iter().copied().collect(),
                room,
            };
            if cells.insert(cell_spec.id, cell).is_some() {
                return Err(BoardError::DuplicateCell(cell_spec.id));
            }
        }

        for cell in cells.values() {
            for &neighbor in &cell.neighbors {
                if neighbor == cell.id {
                    return Err(BoardError::SelfLoop(cell.id));
                }
                let Some(other) = cells.get(&neighbor) else {
                    return Err(BoardError::DanglingNeighbor { cell: cell.id, neighbor });
                };
                if !other.neighbors.contains(&cell.id) {
                    return Err(BoardError::AsymmetricAdjacency { from: cell.id, to: neighbor });
                }
            }
        }

        let mut rooms: Vec<Room> = Vec::with_capacity(room_ids.len());
        let mut ranked: Vec<(&String, &RoomId)> = room_ids.iter().collect();
        ranked.sort_by_key(|(_, id)| **id);
        for (name, &id) in ranked {
            let entries: BTreeSet<CellId> = cells
                .values()
                .filter(|cell| cell.room == Some(id))
                .map(|cell| cell.id)
                .collect();
            if entries.is_empty() {
                return Err(BoardError::RoomWithoutEntries(name.clone()));
            }
            rooms.push(Room { id, name: name.clone(), entries, secret_passage: None });
        }

        for room_spec in &spec.rooms {
            let Some(to) = &room_spec.secret_passage else {
                continue;
            };
            let from = room_ids[&room_spec.name];
            let to = *room_ids.get(to).ok_or_else(|| BoardError::UnknownRoom(to.clone()))?;
            rooms[from.index()].secret_passage = Some(to);
        }

        Ok(Self { cells, rooms, by_coord })
    }

    pub fn cell(&self, id: CellId) -> Result<&Cell, BoardError> {
        self.cells.get(&id).ok_or(BoardError::UnknownCell(id))
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.cells.contains_key(&id)
    }

    pub fn neighbors(&self, id: CellId) -> Result<&BTreeSet<CellId>, BoardError> {
        Ok(&self.cell(id)?.neighbors)
    }

    pub fn is_room_entry(&self, id: CellId) -> Result<bool, BoardError> {
        Ok(self.cell(id)?.kind == CellKind::RoomEntry)
    }

    pub fn room_of(&self, id: CellId) -> Option<RoomId> {
        self.cells.get(&id).and_then(|cell| cell.room)
    }

    pub fn room(&self, id: RoomId) -> Result<&Room, BoardError> {
        self.rooms.get(id.index()).ok_or(BoardError::UnknownRoomId(id))
    }

    /// Rooms in priority order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room_by_name(&self, name: &str) -> Option<RoomId> {
        self.rooms.iter().find(|room| room.name == name).map(|room| room.id)
    }

    pub fn room_name(&self, id: RoomId) -> &str {
        self.rooms.get(id.index()).map_or("?", |room| room.name.as_str())
    }

    pub fn secret_passage(&self, id: RoomId) -> Option<RoomId> {
        self.rooms.get(id.index()).and_then(|room| room.secret_passage)
    }

    pub fn cell_at(&self, coord: Coord) -> Option<CellId> {
        self.by_coord.get(&coord).copied()
    }

    /// The adjacent cell one grid step away, for boards that declare coordinates.
    pub fn step_toward(
        &self,
        from: CellId,
        direction: Direction,
    ) -> Result<Option<CellId>, BoardError> {
        let cell = self.cell(from)?;
        let Some(coord) = cell.coord else {
            return Ok(None);
        };
        Ok(self
            .cell_at(coord.offset(direction))
            .filter(|candidate| cell.neighbors.contains(candidate)))
    }

    /// Cells a token inside `room` can step onto when it leaves.
    pub fn exits(&self, room: RoomId) -> Result<BTreeSet<CellId>, BoardError> {
        let mut exits = BTreeSet::new();
        for &entry in self.room(room)?.entries() {
            for &neighbor in self.neighbors(entry)? {
                if self.room_of(neighbor) != Some(room) {
                    exits.insert(neighbor);
                }
            }
        }
        Ok(exits)
    }

    /// Cells a token search starts from: its corridor cell, or every entry of its room.
    pub fn sources(&self, location: Location) -> Result<BTreeSet<CellId>, BoardError> {
        match location {
            Location::Cell(cell) => {
                self.cell(cell)?;
                Ok(BTreeSet::from([cell]))
            }
            Location::Room(room) => Ok(self.room(room)?.entries.clone()),
        }
    }

    /// Whether `cell` is one step from `location`.
    pub fn is_adjacent(&self, location: Location, cell: CellId) -> Result<bool, BoardError> {
        self.cell(cell)?;
        match location {
            Location::Cell(from) => Ok(self.neighbors(from)?.contains(&cell)),
            Location::Room(room) => Ok(self.exits(room)?.contains(&cell)),
        }
    }

    /// Hop count from `from` to the nearest entry of `to`, ignoring tokens.
    /// `None` when the room cannot be reached.
    pub fn distance(&self, from: CellId, to: RoomId) -> Result<Option<u32>, BoardError> {
        self.room(to)?;
        let sources = self.sources(Location::Cell(from))?;
        Ok(shortest_path_to_room(self, &sources, to, |_| false).map(|path| path.len() as u32))
    }
}

fn rank_rooms(spec: &BoardSpec) -> Result<BTreeMap<String, RoomId>, BoardError> {
    let mut declared = BTreeSet::new();
    for room in &spec.rooms {
        if !declared.insert(room.name.as_str()) {
            return Err(BoardError::DuplicateRoom(room.name.clone()));
        }
    }

    let mut order: Vec<&str> = Vec::with_capacity(declared.len());
    for name in &spec.room_priority {
        if !declared.contains(name.as_str()) {
            return Err(BoardError::UnknownRoom(name.clone()));
        }
        if !order.contains(&name.as_str()) {
            order.push(name);
        }
    }
    for name in &declared {
        if !order.contains(name) {
            order.push(*name);
        }
    }

    order
        .into_iter()
        .enumerate()
        .map(|(rank, name)| {
            let id = u16::try_from(rank).map_err(|_| BoardError::TooManyRooms)?;
            Ok((name.to_string(), RoomId(id)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn neighbors_of_unknown_cell_is_an_error() {
        let board = linear_board();
        assert!(matches!(board.neighbors(CellId(99)), Err(BoardError::UnknownCell(CellId(99)))));
        assert!(matches!(board.is_room_entry(CellId(0)), Err(BoardError::UnknownCell(_))));
    }

    #[test]
    fn entry_cells_report_their_room() {
        let board = linear_board();
        let r = board.room_by_name("R").unwrap();
        assert!(board.is_room_entry(CellId(4)).unwrap());
        assert!(!board.is_room_entry(CellId(3)).unwrap());
        assert_eq!(board.room_of(CellId(4)), Some(r));
        assert_eq!(board.room(r).unwrap().entries(), &BTreeSet::from([CellId(4)]));
    }

    #[test]
    fn distance_counts_hops_to_nearest_entry() {
        let board = linear_board();
        let r = board.room_by_name("R").unwrap();
        assert_eq!(board.distance(CellId(1), r).unwrap(), Some(3));
        assert_eq!(board.distance(CellId(3), r).unwrap(), Some(1));
        assert_eq!(board.distance(CellId(4), r).unwrap(), Some(0));
    }

    #[test]
    fn disconnected_room_is_unreachable() {
        let board = split_board();
        let r = board.room_by_name("R").unwrap();
        assert_eq!(board.distance(CellId(1), r).unwrap(), None);
    }

    #[test]
    fn asymmetric_adjacency_is_rejected() {
        let spec = BoardSpec {
            cells: vec![CellSpec::corridor(1, &[2]), CellSpec::corridor(2, &[])],
            rooms: vec![],
            room_priority: vec![],
        };
        assert!(matches!(
            BoardGraph::from_spec(&spec),
            Err(BoardError::AsymmetricAdjacency { from: CellId(1), to: CellId(2) })
        ));
    }

    #[test]
    fn malformed_specs_are_rejected() {
        let dangling = BoardSpec {
            cells: vec![CellSpec::corridor(1, &[7])],
            rooms: vec![],
            room_priority: vec![],
        };
        assert!(matches!(
            BoardGraph::from_spec(&dangling),
            Err(BoardError::DanglingNeighbor { .. })
        ));

        let duplicate = BoardSpec {
            cells: vec![CellSpec::corridor(1, &[]), CellSpec::corridor(1, &[])],
            rooms: vec![],
            room_priority: vec![],
        };
        assert!(matches!(BoardGraph::from_spec(&duplicate), Err(BoardError::DuplicateCell(_))));

        let orphan_entry = BoardSpec {
            cells: vec![CellSpec { room: None, ..CellSpec::entry(1, "R", &[]) }],
            rooms: vec![RoomSpec::named("R")],
            room_priority: vec![],
        };
        assert!(matches!(
            BoardGraph::from_spec(&orphan_entry),
            Err(BoardError::EntryWithoutRoom(_))
        ));

        let empty_room = BoardSpec {
            cells: vec![CellSpec::corridor(1, &[])],
            rooms: vec![RoomSpec::named("Cellar")],
            room_priority: vec![],
        };
        assert!(matches!(
            BoardGraph::from_spec(&empty_room),
            Err(BoardError::RoomWithoutEntries(_))
        ));

        let unknown_passage = BoardSpec {
            cells: vec![CellSpec::entry(1, "R", &[])],
            rooms: vec![RoomSpec { name: "R".into(), secret_passage: Some("Attic".into()) }],
            room_priority: vec![],
        };
        assert!(matches!(
            BoardGraph::from_spec(&unknown_passage),
            Err(BoardError::UnknownRoom(name)) if name == "Attic"
        ));
    }

    #[test]
    fn room_ids_follow_priority_then_name() {
        let spec = BoardSpec {
            cells: vec![
                CellSpec::entry(1, "Lounge", &[]),
                CellSpec::entry(2, "Attic", &[]),
                CellSpec::entry(3, "Hall", &[]),
            ],
            rooms: vec![
                RoomSpec::named("Lounge"),
                RoomSpec::named("Attic"),
                RoomSpec::named("Hall"),
            ],
            room_priority: vec!["Hall".into()],
        };
        let board = BoardGraph::from_spec(&spec).unwrap();
        let names: Vec<&str> = board.rooms().iter().map(Room::name).collect();
        assert_eq!(names, ["Hall", "Attic", "Lounge"]);
        assert_eq!(board.room_by_name("Hall"), Some(RoomId(0)));
    }

    #[test]
    fn exits_are_the_corridor_side_of_each_entry() {
        let board = two_room_board();
        let study = board.room_by_name("Study").unwrap();
        assert_eq!(board.exits(study).unwrap(), BTreeSet::from([CellId(3)]));
        assert!(board.is_adjacent(Location::Room(study), CellId(3)).unwrap());
        assert!(!board.is_adjacent(Location::Room(study), CellId(2)).unwrap());
    }

    #[test]
    fn step_toward_uses_coordinates_and_adjacency() {
        let board = BoardGraph::classic().unwrap();
        let start = board.cell_at(Coord { row: 5, col: 0 }).unwrap();
        let below = board.step_toward(start, Direction::Down).unwrap();
        assert_eq!(below, board.cell_at(Coord { row: 6, col: 0 }));
        // (4, 0) is the Kitchen's wall.
        assert_eq!(board.step_toward(start, Direction::Up).unwrap(), None);
    }

    #[test]
    fn spec_round_trips_through_json() {
        let json = classic_spec().to_json_string().unwrap();
        let board = BoardGraph::from_json_str(&json).unwrap();
        assert_eq!(board.rooms().len(), 9);
    }
}
