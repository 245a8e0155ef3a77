//! The built-in manor board.
//!
//! Room footprints are stamped onto a 22x22 hallway grid. Hallway tiles
//! (`.`) become corridor cells, door tiles (`d`) become entry cells of the
//! room that stamped them; walls and room interiors are not cells. Cell ids
//! are row-major (`row * 22 + col`), so lowest-id tie-breaks prefer the
//! upper-left.

use super::spec::{BoardSpec, CellSpec, RoomSpec};
use crate::types::{CellId, Coord, Direction};

pub const CLASSIC_WIDTH: usize = 22;
pub const CLASSIC_HEIGHT: usize = 22;

/// Suspects and the hallway tile each one starts on.
pub const STARTING_POSITIONS: [(&str, Coord); 6] = [
    ("Miss Scarlet", Coord { row: 0, col: 9 }),
    ("Colonel Mustard", Coord { row: 5, col: 0 }),
    ("Mrs. White", Coord { row: 3, col: 21 }),
    ("Mr. Green", Coord { row: 14, col: 0 }),
    ("Mrs. Peacock", Coord { row: 21, col: 7 }),
    ("Professor Plum", Coord { row: 18, col: 21 }),
];

const SECRET_PASSAGES: [(&str, &str); 4] = [
    ("Kitchen", "Study"),
    ("Study", "Kitchen"),
    ("Lounge", "Conservatory"),
    ("Conservatory", "Lounge"),
];

struct RoomLayout {
    name: &'static str,
    origin: Coord,
    rows: &'static [&'static str],
}

const LAYOUTS: [RoomLayout; 9] = [
    RoomLayout {
        name: "Kitchen",
        origin: Coord { row: 0, col: 0 },
        rows: &["######", "#KKKK#", "#KKKK#", "#KKKK#", "####d#"],
    },
    RoomLayout {
        name: "Ballroom",
        origin: Coord { row: 0, col: 8 },
        rows: &["..###..", "##BBB##", "#BBBBB#", "#BBBBB#", "#BBBBB#", "dBBBBBd", "#d##d##"],
    },
    RoomLayout {
        name: "Conservatory",
        origin: Coord { row: 0, col: 16 },
        rows: &["######", "#CCCC#", "dCCCC#", ".####."],
    },
    RoomLayout {
        name: "Dining Room",
        origin: Coord { row: 7, col: 0 },
        rows: &[
            "#####...", "#DDDD###", "#DDDDDD#", "#DDDDDD#", "#DDDDDDd", "#DDDDDD#", "####d###",
        ],
    },
    RoomLayout {
        name: "Lounge",
        origin: Coord { row: 17, col: 0 },
        rows: &["######d", "#OOOOO#", "#OOOOO#", "#OOOOO#", "#######"],
    },
    RoomLayout {
        name: "Hall",
        origin: Coord { row: 16, col: 9 },
        rows: &["##dd##", "#HHHH#", "#HHHH#", "#HHHHd", "#HHHH#", "######"],
    },
    RoomLayout {
        name: "Study",
        origin: Coord { row: 19, col: 16 },
        rows: &["#d####", "#SSSS#", "######"],
    },
    RoomLayout {
        name: "Library",
        origin: Coord { row: 12, col: 16 },
        rows: &[".###d#", "#LLLL#", "dLLLL#", "#LLLL#", ".#####"],
    },
    RoomLayout {
        name: "Billiard Room",
        origin: Coord { row: 6, col: 17 },
        rows: &["###d#", "dIII#", "#III#", "#III#", "#####"],
    },
];

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tile {
    Hallway,
    Door(usize),
    Blocked,
}

fn stamp_grid() -> Vec<Vec<Tile>> {
    let mut grid = vec![vec![Tile::Hallway; CLASSIC_WIDTH]; CLASSIC_HEIGHT];
    for (index, layout) in LAYOUTS.iter().enumerate() {
        for (dr, row) in layout.rows.iter().enumerate() {
            for (dc, symbol) in row.chars().enumerate() {
                let r = layout.origin.row as usize + dr;
                let c = layout.origin.col as usize + dc;
                if r >= CLASSIC_HEIGHT || c >= CLASSIC_WIDTH {
                    continue;
                }
                grid[r][c] = match symbol {
                    '.' => Tile::Hallway,
                    'd' => Tile::Door(index),
                    _ => Tile::Blocked,
                };
            }
        }
    }
    grid
}

fn cell_id(coord: Coord) -> CellId {
    CellId(coord.row as u32 * CLASSIC_WIDTH as u32 + coord.col as u32)
}

fn tile_at(grid: &[Vec<Tile>], coord: Coord) -> Tile {
    if coord.row < 0 || coord.col < 0 {
        return Tile::Blocked;
    }
    grid.get(coord.row as usize)
        .and_then(|row| row.get(coord.col as usize))
        .copied()
        .unwrap_or(Tile::Blocked)
}

pub fn classic_spec() -> BoardSpec {
    let grid = stamp_grid();
    let mut cells = Vec::new();

    for row in 0..CLASSIC_HEIGHT as i32 {
        for col in 0..CLASSIC_WIDTH as i32 {
            let coord = Coord { row, col };
            let tile = tile_at(&grid, coord);
            if tile == Tile::Blocked {
                continue;
            }
            let neighbors = Direction::ALL
                .iter()
                .map(|&direction| coord.offset(direction))
                .filter(|&next| tile_at(&grid, next) != Tile::Blocked)
                .map(cell_id)
                .collect();
            let room = match tile {
                Tile::Door(index) => Some(LAYOUTS[index].name.to_string()),
                _ => None,
            };
            cells.push(CellSpec {
                id: cell_id(coord),
                neighbors,
                entry: room.is_some(),
                room,
                coord: Some(coord),
            });
        }
    }

    let rooms = LAYOUTS
        .iter()
        .map(|layout| RoomSpec {
            name: layout.name.to_string(),
            secret_passage: SECRET_PASSAGES
                .iter()
                .find(|(from, _)| *from == layout.name)
                .map(|(_, to)| (*to).to_string()),
        })
        .collect();

    BoardSpec { cells, rooms, room_priority: Vec::new() }
}
