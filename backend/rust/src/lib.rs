//! Perfect-maze generation and solving.
//!
//! A [`Maze`] is built in one pass: reserved regions are placed, a spanning
//! tree is carved over the remaining cells by loop-erased random walks, the
//! entry and exit are opened and the unique path between them is found.

pub mod cell;
pub mod error_handling;
pub mod generator;
pub mod grid;
pub mod maze;
pub mod openings;
pub mod placement;
pub mod shape;
pub mod snapshot;
pub mod solver;
pub mod types;

pub use cell::Cell;
pub use error_handling::{MazeError, Result};
pub use grid::Grid;
pub use maze::{Maze, MazeConfig};
pub use openings::{Opening, Relocation};
pub use placement::Regions;
pub use shape::{Region, RegionKind, RegionShape, Scale};
pub use snapshot::{InMemoryRepository, MazeRepository, MazeSnapshot, RegionImage, RepositoryError};
pub use types::{Coord, CoordSet, Direction, WallState};
