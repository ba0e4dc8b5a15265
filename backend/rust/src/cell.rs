// cell.rs - Per-position wall state plus solution/entry/exit markers

use crate::types::{Coord, Direction, WallState};
use serde::{Deserialize, Serialize};

/// One square of the maze.
///
/// Every four-element array is indexed by [`Direction::index`]
/// (North, East, South, West).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    coord: Coord,
    walls: [WallState; 4],
    /// Sides the solved path crosses
    pub solution: [bool; 4],
    /// Side that is the maze entry, at most one true across the grid
    pub entry: [bool; 4],
    /// Side that is the maze exit, at most one true across the grid
    pub exit: [bool; 4],
}

impl Cell {
    /// Cell with every wall up
    pub fn new(x: usize, y: usize) -> Self {
        Self::with_walls(x, y, [WallState::Up; 4])
    }

    pub fn with_walls(x: usize, y: usize, walls: [WallState; 4]) -> Self {
        Self {
            coord: Coord::new(x, y),
            walls,
            solution: [false; 4],
            entry: [false; 4],
            exit: [false; 4],
        }
    }

    #[inline]
    pub fn coord(&self) -> Coord {
        self.coord
    }

    #[inline]
    pub fn x(&self) -> usize {
        self.coord.x
    }

    #[inline]
    pub fn y(&self) -> usize {
        self.coord.y
    }

    #[inline]
    pub fn wall(&self, dir: Direction) -> WallState {
        self.walls[dir.index()]
    }

    pub fn walls(&self) -> &[WallState; 4] {
        &self.walls
    }

    /// Sets one side only. The grid is responsible for mirroring it onto the neighbour.
    pub fn set_wall(&mut self, dir: Direction, state: WallState) {
        self.walls[dir.index()] = state;
    }

    pub(crate) fn relocate(&mut self, coord: Coord) {
        self.coord = coord;
    }

    pub fn is_open(&self, dir: Direction) -> bool {
        self.wall(dir).is_passable()
    }

    /// Number of sides that block movement (markers count as up)
    pub fn closed_sides(&self) -> usize {
        self.walls.iter().filter(|w| !w.is_passable()).count()
    }

    pub fn is_dead_end(&self) -> bool {
        self.closed_sides() == 3
    }

    pub fn entry_side(&self) -> Option<Direction> {
        marked_side(&self.entry)
    }

    pub fn exit_side(&self) -> Option<Direction> {
        marked_side(&self.exit)
    }

    pub fn on_solution(&self) -> bool {
        self.solution.iter().any(|s| *s)
    }

    pub fn clear_solution(&mut self) {
        self.solution = [false; 4];
    }
}

fn marked_side(markers: &[bool; 4]) -> Option<Direction> {
    markers
        .iter()
        .position(|m| *m)
        .and_then(Direction::from_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cell_is_closed() {
        let cell = Cell::new(2, 3);
        assert_eq!(cell.coord(), Coord::new(2, 3));
        assert_eq!(cell.closed_sides(), 4);
        assert!(!cell.is_dead_end());
        assert!(!cell.on_solution());
        assert_eq!(cell.entry_side(), None);
    }

    #[test]
    fn test_dead_end_counts_markers_as_up() {
        let cell = Cell::with_walls(
            0,
            0,
            [WallState::Down, WallState::StartMarker, WallState::Up, WallState::EndMarker],
        );
        assert!(cell.is_dead_end());
        assert!(cell.is_open(Direction::North));
        assert!(!cell.is_open(Direction::East));
    }

    #[test]
    fn test_marker_sides() {
        let mut cell = Cell::new(0, 0);
        cell.entry[Direction::West.index()] = true;
        cell.exit[Direction::South.index()] = true;
        assert_eq!(cell.entry_side(), Some(Direction::West));
        assert_eq!(cell.exit_side(), Some(Direction::South));
    }

    #[test]
    fn test_clear_solution() {
        let mut cell = Cell::new(1, 1);
        cell.solution = [true, false, true, false];
        assert!(cell.on_solution());
        cell.clear_solution();
        assert!(!cell.on_solution());
    }
}
