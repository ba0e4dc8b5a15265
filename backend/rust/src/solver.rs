// solver.rs - Randomised backtracking walk from the entry to the exit

use crate::error_handling::{MazeError, Result};
use crate::grid::Grid;
use crate::openings::Opening;
use crate::types::{Coord, CoordSet, Direction};
use rand::seq::IndexedRandom;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    Walking,
    Finished,
}

/// Depth-first walker that leaves solution bits only on the final path
pub struct Solver<'g> {
    grid: &'g mut Grid,
    exit: Coord,
    path: Vec<Coord>,
    visited: CoordSet,
    state: SolverState,
    backtracks: usize,
}

impl<'g> Solver<'g> {
    /// Clears stale solution bits and marks the two opening sides
    pub fn new(grid: &'g mut Grid, entry: Opening, exit: Opening) -> Result<Self> {
        grid.clear_solution();
        grid.cell_mut(entry.cell)?.solution[entry.side.index()] = true;
        grid.cell_mut(exit.cell)?.solution[exit.side.index()] = true;

        let mut visited = CoordSet::default();
        visited.insert(entry.cell);
        let state = if entry.cell == exit.cell {
            SolverState::Finished
        } else {
            SolverState::Walking
        };
        Ok(Self {
            grid,
            exit: exit.cell,
            path: vec![entry.cell],
            visited,
            state,
            backtracks: 0,
        })
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    /// One move forward or one step back
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<SolverState> {
        if self.state == SolverState::Finished {
            return Ok(self.state);
        }
        let Some(&here) = self.path.last() else {
            return Err(MazeError::Unsolvable {
                reason: "walk has no current cell".into(),
            });
        };

        let options: Vec<(Direction, Coord)> = self
            .grid
            .open_neighbors(here)
            .into_iter()
            .filter(|(_, n)| !self.visited.contains(n))
            .collect();

        if let Some(&(dir, next)) = options.choose(rng) {
            self.grid.cell_mut(here)?.solution[dir.index()] = true;
            self.grid.cell_mut(next)?.solution[dir.opposite().index()] = true;
            self.visited.insert(next);
            self.path.push(next);
            if next == self.exit {
                self.state = SolverState::Finished;
            }
            return Ok(self.state);
        }

        // Dead end: retreat and erase the bits that led here
        self.path.pop();
        self.backtracks += 1;
        self.grid.cell_mut(here)?.clear_solution();
        let Some(&back) = self.path.last() else {
            return Err(MazeError::Unsolvable {
                reason: format!(
                    "exhausted every cell reachable from ({}, {})",
                    here.x, here.y
                ),
            });
        };
        if let Some(dir) = Grid::direction_between(back, here) {
            self.grid.cell_mut(back)?.solution[dir.index()] = false;
        }
        Ok(self.state)
    }

    /// Walks until the exit is reached and returns the path, entry first
    pub fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<Vec<Coord>> {
        while self.step(rng)? == SolverState::Walking {}
        log::debug!(
            "Solved: {} cells on path, {} visited, {} backtracks",
            self.path.len(),
            self.visited.len(),
            self.backtracks
        );
        Ok(self.path)
    }
}

/// Solves from `entry` to `exit`, rewriting every solution bit in the grid
pub fn solve<R: Rng + ?Sized>(grid: &mut Grid, entry: Opening, exit: Opening, rng: &mut R) -> Result<Vec<Coord>> {
    Solver::new(grid, entry, exit)?.run(rng)
}

/// Share of the grid covered by `path`, truncated to a whole percent
pub fn percent_used(path_len: usize, grid: &Grid) -> usize {
    if grid.is_empty() {
        return 0;
    }
    100 * path_len / grid.len()
}
