// grid.rs - Cell ownership, neighbour queries and mirrored wall mutation

use crate::cell::Cell;
use crate::error_handling::{MazeError, Result};
use crate::types::{Coord, CoordSet, Direction, WallState};
use std::collections::VecDeque;

/// Row-major rectangle of cells.
///
/// Invariant: the wall a cell holds on side `d` always equals the wall its
/// neighbour across `d` holds on `d.opposite()`. Every mutation path goes
/// through [`Grid::set_wall`] or [`Grid::replace_cell`] to keep it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidDimensions { width, height });
        }
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| Cell::new(x, y)))
            .collect();
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Rebuilds a grid from row-major cells, e.g. when loading a snapshot
    pub fn from_cells(width: usize, height: usize, mut cells: Vec<Cell>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidDimensions { width, height });
        }
        let expected = width
            .checked_mul(height)
            .ok_or_else(|| MazeError::snapshot(format!("{}x{} grid is too large", width, height)))?;
        if cells.len() != expected {
            return Err(MazeError::snapshot(format!(
                "expected {} cells for {}x{}, got {}",
                expected,
                width,
                height,
                cells.len()
            )));
        }
        for (i, cell) in cells.iter_mut().enumerate() {
            cell.relocate(Coord::new(i % width, i / width));
        }
        let grid = Self {
            width,
            height,
            cells,
        };
        if let Some((coord, dir)) = grid.first_mirror_violation() {
            return Err(MazeError::snapshot(format!(
                "wall {:?} of ({}, {}) does not match its neighbour",
                dir, coord.x, coord.y
            )));
        }
        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    fn index(&self, x: usize, y: usize) -> Result<usize> {
        if x < self.width && y < self.height {
            Ok(y * self.width + x)
        } else {
            Err(MazeError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn cell_at(&self, x: usize, y: usize) -> Result<&Cell> {
        let i = self.index(x, y)?;
        Ok(&self.cells[i])
    }

    pub(crate) fn cell_at_mut(&mut self, x: usize, y: usize) -> Result<&mut Cell> {
        let i = self.index(x, y)?;
        Ok(&mut self.cells[i])
    }

    pub fn cell(&self, coord: Coord) -> Result<&Cell> {
        self.cell_at(coord.x, coord.y)
    }

    pub(crate) fn cell_mut(&mut self, coord: Coord) -> Result<&mut Cell> {
        self.cell_at_mut(coord.x, coord.y)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.iter().map(Cell::coord)
    }

    pub fn wall(&self, x: usize, y: usize, dir: Direction) -> Result<WallState> {
        Ok(self.cell_at(x, y)?.wall(dir))
    }

    /// Sets the wall on side `dir` of (x, y) and the facing wall of the
    /// neighbour across it, when that neighbour is on the grid.
    pub fn set_wall(&mut self, x: usize, y: usize, dir: Direction, state: WallState) -> Result<()> {
        let here = self.index(x, y)?;
        self.cells[here].set_wall(dir, state);
        if let Some(next) = self.neighbor(Coord::new(x, y), dir) {
            let there = next.y * self.width + next.x;
            self.cells[there].set_wall(dir.opposite(), state);
        }
        Ok(())
    }

    /// Swaps in a whole cell and copies its walls onto the four neighbours
    pub fn replace_cell(&mut self, x: usize, y: usize, mut cell: Cell) -> Result<()> {
        let here = self.index(x, y)?;
        let coord = Coord::new(x, y);
        cell.relocate(coord);
        for dir in Direction::ALL {
            if let Some(next) = self.neighbor(coord, dir) {
                let there = next.y * self.width + next.x;
                self.cells[there].set_wall(dir.opposite(), cell.wall(dir));
            }
        }
        self.cells[here] = cell;
        Ok(())
    }

    /// Neighbour across `dir`, `None` when that side is the grid boundary
    pub fn neighbor(&self, coord: Coord, dir: Direction) -> Option<Coord> {
        coord.step(dir).filter(|c| self.contains(*c))
    }

    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = (Direction, Coord)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.neighbor(coord, dir).map(|n| (dir, n)))
    }

    /// Neighbours reachable through a passable wall
    pub fn open_neighbors(&self, coord: Coord) -> Vec<(Direction, Coord)> {
        let Ok(cell) = self.cell(coord) else {
            return Vec::new();
        };
        self.neighbors(coord)
            .filter(|(dir, _)| cell.is_open(*dir))
            .collect()
    }

    /// Direction from `a` to an adjacent `b`
    pub fn direction_between(a: Coord, b: Coord) -> Option<Direction> {
        Direction::ALL.into_iter().find(|dir| a.step(*dir) == Some(b))
    }

    /// Opens the shared wall between two adjacent cells
    pub fn carve_between(&mut self, a: Coord, b: Coord) -> Result<()> {
        let dir = Self::direction_between(a, b).ok_or_else(|| {
            MazeError::generation(format!(
                "cells ({}, {}) and ({}, {}) are not adjacent",
                a.x, a.y, b.x, b.y
            ))
        })?;
        self.set_wall(a.x, a.y, dir, WallState::Down)
    }

    /// Grid boundary side of `coord`, checked West, East, North, South
    pub fn boundary_side(&self, coord: Coord) -> Option<Direction> {
        if !self.contains(coord) {
            return None;
        }
        if coord.x == 0 {
            Some(Direction::West)
        } else if coord.x == self.width - 1 {
            Some(Direction::East)
        } else if coord.y == 0 {
            Some(Direction::North)
        } else if coord.y == self.height - 1 {
            Some(Direction::South)
        } else {
            None
        }
    }

    pub fn is_boundary_side(&self, coord: Coord, dir: Direction) -> bool {
        self.contains(coord) && self.neighbor(coord, dir).is_none()
    }

    pub fn clear_solution(&mut self) {
        for cell in &mut self.cells {
            cell.clear_solution();
        }
    }

    pub fn dead_end_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_dead_end()).count()
    }

    /// Number of passable walls shared by two cells that both satisfy `include`
    pub fn open_internal_edges<F>(&self, include: F) -> usize
    where
        F: Fn(Coord) -> bool,
    {
        let mut count = 0;
        for cell in &self.cells {
            let here = cell.coord();
            if !include(here) {
                continue;
            }
            for dir in [Direction::East, Direction::South] {
                if let Some(next) = self.neighbor(here, dir) {
                    if include(next) && cell.is_open(dir) {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    /// Connected components of the cells accepted by `include`.
    ///
    /// With `through_walls` the search ignores wall state (pure adjacency);
    /// otherwise it only crosses passable walls.
    pub fn components<F>(&self, include: F, through_walls: bool) -> usize
    where
        F: Fn(Coord) -> bool,
    {
        let mut seen = CoordSet::default();
        let mut count = 0;
        let mut queue = VecDeque::new();
        for start in self.coords() {
            if !include(start) || seen.contains(&start) {
                continue;
            }
            count += 1;
            seen.insert(start);
            queue.push_back(start);
            while let Some(here) = queue.pop_front() {
                let cell = &self.cells[here.y * self.width + here.x];
                for (dir, next) in self.neighbors(here) {
                    if !include(next) || seen.contains(&next) {
                        continue;
                    }
                    if through_walls || cell.is_open(dir) {
                        seen.insert(next);
                        queue.push_back(next);
                    }
                }
            }
        }
        count
    }

    /// First side whose wall differs from the facing wall of its neighbour
    pub fn first_mirror_violation(&self) -> Option<(Coord, Direction)> {
        for cell in &self.cells {
            for dir in [Direction::East, Direction::South] {
                if let Some(next) = self.neighbor(cell.coord(), dir) {
                    let other = &self.cells[next.y * self.width + next.x];
                    if cell.wall(dir) != other.wall(dir.opposite()) {
                        return Some((cell.coord(), dir));
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_grid() {
        assert!(matches!(
            Grid::new(0, 4),
            Err(MazeError::InvalidDimensions { width: 0, height: 4 })
        ));
    }

    #[test]
    fn test_cell_at_out_of_bounds() {
        let grid = Grid::new(3, 2).unwrap();
        assert!(grid.cell_at(2, 1).is_ok());
        assert!(matches!(
            grid.cell_at(3, 0),
            Err(MazeError::OutOfBounds { x: 3, y: 0, .. })
        ));
        assert!(grid.cell_at(0, 2).is_err());
    }

    #[test]
    fn test_set_wall_mirrors_neighbor() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set_wall(1, 1, Direction::South, WallState::Down).unwrap();
        assert_eq!(grid.wall(1, 1, Direction::South).unwrap(), WallState::Down);
        assert_eq!(grid.wall(1, 2, Direction::North).unwrap(), WallState::Down);
        grid.set_wall(1, 2, Direction::North, WallState::Up).unwrap();
        assert_eq!(grid.wall(1, 1, Direction::South).unwrap(), WallState::Up);
        assert!(grid.first_mirror_violation().is_none());
    }

    #[test]
    fn test_set_wall_on_boundary_only_touches_one_cell() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set_wall(0, 0, Direction::West, WallState::Down).unwrap();
        assert_eq!(grid.wall(0, 0, Direction::West).unwrap(), WallState::Down);
        assert_eq!(grid.wall(1, 0, Direction::West).unwrap(), WallState::Up);
    }

    #[test]
    fn test_replace_cell_updates_all_neighbors() {
        let mut grid = Grid::new(3, 3).unwrap();
        let replacement = Cell::with_walls(
            0,
            0,
            [WallState::Down, WallState::StartMarker, WallState::EndMarker, WallState::Down],
        );
        grid.replace_cell(1, 1, replacement).unwrap();
        assert_eq!(grid.cell_at(1, 1).unwrap().coord(), Coord::new(1, 1));
        assert_eq!(grid.wall(1, 0, Direction::South).unwrap(), WallState::Down);
        assert_eq!(grid.wall(2, 1, Direction::West).unwrap(), WallState::StartMarker);
        assert_eq!(grid.wall(1, 2, Direction::North).unwrap(), WallState::EndMarker);
        assert_eq!(grid.wall(0, 1, Direction::East).unwrap(), WallState::Down);
        assert!(grid.first_mirror_violation().is_none());
    }

    #[test]
    fn test_boundary_side_order() {
        let grid = Grid::new(5, 5).unwrap();
        assert_eq!(grid.boundary_side(Coord::new(0, 0)), Some(Direction::West));
        assert_eq!(grid.boundary_side(Coord::new(4, 4)), Some(Direction::East));
        assert_eq!(grid.boundary_side(Coord::new(2, 0)), Some(Direction::North));
        assert_eq!(grid.boundary_side(Coord::new(2, 4)), Some(Direction::South));
        assert_eq!(grid.boundary_side(Coord::new(2, 2)), None);
    }

    #[test]
    fn test_components_with_and_without_walls() {
        let mut grid = Grid::new(3, 1).unwrap();
        assert_eq!(grid.components(|_| true, true), 1);
        assert_eq!(grid.components(|_| true, false), 3);
        grid.carve_between(Coord::new(0, 0), Coord::new(1, 0)).unwrap();
        assert_eq!(grid.components(|_| true, false), 2);
        assert_eq!(grid.open_internal_edges(|_| true), 1);
        assert_eq!(grid.components(|c| c.x != 1, true), 2);
    }

    #[test]
    fn test_carve_between_requires_adjacency() {
        let mut grid = Grid::new(3, 3).unwrap();
        assert!(grid.carve_between(Coord::new(0, 0), Coord::new(2, 0)).is_err());
    }

    #[test]
    fn test_from_cells_detects_mirror_violation() {
        let mut cells: Vec<Cell> = Grid::new(2, 1).unwrap().cells().cloned().collect();
        cells[0].set_wall(Direction::East, WallState::Down);
        assert!(matches!(
            Grid::from_cells(2, 1, cells),
            Err(MazeError::Snapshot { .. })
        ));
    }
}
