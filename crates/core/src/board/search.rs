//! Breadth-first room search over the board graph.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::BoardGraph;
use crate::types::{CellId, RoomId};

/// Shortest cell sequence from any of `sources` (exclusive) to an entry cell
/// of `target` (inclusive).
///
/// Neighbors expand in ascending id order and equidistant entry cells resolve
/// to the lowest id, so the result depends only on the graph and `is_blocked`.
/// Entry cells of other rooms end movement and are never crossed. Returns an
/// empty path when a source already belongs to `target`.
pub(crate) fn shortest_path_to_room<Blocked>(
    board: &BoardGraph,
    sources: &BTreeSet<CellId>,
    target: RoomId,
    is_blocked: Blocked,
) -> Option<Vec<CellId>>
where
    Blocked: Fn(CellId) -> bool,
{
    let mut visited: BTreeMap<CellId, (u32, Option<CellId>)> = BTreeMap::new();
    let mut queue = VecDeque::new();

    for &source in sources {
        if board.room_of(source) == Some(target) {
            return Some(Vec::new());
        }
        visited.insert(source, (0, None));
        queue.push_back(source);
    }

    let mut best: Option<(u32, CellId)> = None;

    while let Some(current) = queue.pop_front() {
        let Some(&(dist, _)) = visited.get(&current) else {
            continue;
        };

        if let Some((best_dist, _)) = best
            && dist > best_dist
        {
            break;
        }

        let Some(cell) = board.cells.get(&current) else {
            continue;
        };

        if !sources.contains(&current) && cell.room == Some(target) {
            let is_better = match best {
                None => true,
                Some((best_dist, best_cell)) => {
                    dist < best_dist || (dist == best_dist && current < best_cell)
                }
            };
            if is_better {
                best = Some((dist, current));
            }
            continue;
        }

        for &next in &cell.neighbors {
            if visited.contains_key(&next) {
                continue;
            }
            let Some(next_cell) = board.cells.get(&next) else {
                continue;
            };
            match next_cell.room {
                Some(room) if room == target => {}
                Some(_) => continue,
                None if is_blocked(next) => continue,
                None => {}
            }
            visited.insert(next, (dist + 1, Some(current)));
            queue.push_back(next);
        }
    }

    let (_, goal) = best?;
    let mut steps = Vec::new();
    let mut cursor = goal;
    while let Some(&(_, Some(parent))) = visited.get(&cursor) {
        steps.push(cursor);
        cursor = parent;
    }
    steps.reverse();
    Some(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardSpec, CellSpec, RoomSpec};

    fn ids(raw: &[u32]) -> Vec<CellId> {
        raw.iter().copied().map(CellId).collect()
    }

    fn sources(raw: &[u32]) -> BTreeSet<CellId> {
        raw.iter().copied().map(CellId).collect()
    }

    // 1 - 2 - 3(R)
    // |
    // 4 - 5 - 6(R)
    fn forked_board() -> BoardGraph {
        BoardGraph::from_spec(&BoardSpec {
            cells: vec![
                CellSpec::corridor(1, &[2, 4]),
                CellSpec::corridor(2, &[1, 3]),
                CellSpec::entry(3, "Study", &[2]),
                CellSpec::corridor(4, &[1, 5]),
                CellSpec::corridor(5, &[4, 6]),
                CellSpec::entry(6, "Study", &[5]),
            ],
            rooms: vec![RoomSpec::named("Study")],
            room_priority: vec![],
        })
        .unwrap()
    }

    #[test]
    fn equidistant_entries_resolve_to_lowest_cell_id() {
        let board = forked_board();
        let study = board.room_by_name("Study").unwrap();
        let path = shortest_path_to_room(&board, &sources(&[1]), study, |_| false).unwrap();
        assert_eq!(path, ids(&[2, 3]));
    }

    #[test]
    fn blocked_corridor_forces_the_long_way_round() {
        let board = forked_board();
        let study = board.room_by_name("Study").unwrap();
        let path =
            shortest_path_to_room(&board, &sources(&[1]), study, |cell| cell == CellId(2)).unwrap();
        assert_eq!(path, ids(&[4, 5, 6]));
    }

    #[test]
    fn source_inside_target_room_needs_no_steps() {
        let board = forked_board();
        let study = board.room_by_name("Study").unwrap();
        let path = shortest_path_to_room(&board, &sources(&[3, 6]), study, |_| false).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn other_rooms_are_never_crossed() {
        // 1 - 2(Hall) - 3 - 4(Study); the only route runs through the Hall.
        let board = BoardGraph::from_spec(&BoardSpec {
            cells: vec![
                CellSpec::corridor(1, &[2]),
                CellSpec::entry(2, "Hall", &[1, 3]),
                CellSpec::corridor(3, &[2, 4]),
                CellSpec::entry(4, "Study", &[3]),
            ],
            rooms: vec![RoomSpec::named("Hall"), RoomSpec::named("Study")],
            room_priority: vec![],
        })
        .unwrap();
        let study = board.room_by_name("Study").unwrap();
        let hall = board.room_by_name("Hall").unwrap();
        assert!(shortest_path_to_room(&board, &sources(&[1]), study, |_| false).is_none());
        assert_eq!(
            shortest_path_to_room(&board, &sources(&[1]), hall, |_| false),
            Some(ids(&[2]))
        );
        let from_hall = board.room(hall).unwrap().entries().clone();
        assert_eq!(
            shortest_path_to_room(&board, &from_hall, study, |_| false),
            Some(ids(&[3, 4]))
        );
    }
}
