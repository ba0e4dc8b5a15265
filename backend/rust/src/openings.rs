// openings.rs - Carving, sealing and relocating the single entry and exit

use crate::error_handling::{MazeError, Result};
use crate::grid::Grid;
use crate::placement::block_openings;
use crate::shape::Region;
use crate::types::{Coord, CoordSet, Direction, WallState};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A passable side of one cell that leads into or out of the maze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    pub cell: Coord,
    pub side: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Entry,
    Exit,
}

/// How `change_entry_exit` moves one opening
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relocation {
    Unchanged,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    TopMiddle,
    BottomMiddle,
    MiddleLeft,
    MiddleRight,
    Upward,
    Downward,
    Leftward,
    Rightward,
}

impl Relocation {
    pub const ALL: [Relocation; 13] = [
        Relocation::Unchanged,
        Relocation::TopLeft,
        Relocation::TopRight,
        Relocation::BottomLeft,
        Relocation::BottomRight,
        Relocation::TopMiddle,
        Relocation::BottomMiddle,
        Relocation::MiddleLeft,
        Relocation::MiddleRight,
        Relocation::Upward,
        Relocation::Downward,
        Relocation::Leftward,
        Relocation::Rightward,
    ];

    fn name(self) -> &'static str {
        match self {
            Relocation::Unchanged => "Unchanged",
            Relocation::TopLeft => "Top Left",
            Relocation::TopRight => "Top Right",
            Relocation::BottomLeft => "Bottom Left",
            Relocation::BottomRight => "Bottom Right",
            Relocation::TopMiddle => "Top Middle",
            Relocation::BottomMiddle => "Bottom Middle",
            Relocation::MiddleLeft => "Middle Left",
            Relocation::MiddleRight => "Middle Right",
            Relocation::Upward => "Upward",
            Relocation::Downward => "Downward",
            Relocation::Leftward => "Leftward",
            Relocation::Rightward => "Rightward",
        }
    }

    /// Fixed boundary opening for the named positions
    fn named_target(self, grid: &Grid) -> Option<Opening> {
        let (w, h) = (grid.width(), grid.height());
        let at = |x, y, side| Some(Opening { cell: Coord::new(x, y), side });
        match self {
            Relocation::TopLeft => at(0, 0, Direction::West),
            Relocation::TopRight => at(w - 1, 0, Direction::East),
            Relocation::BottomLeft => at(0, h - 1, Direction::West),
            Relocation::BottomRight => at(w - 1, h - 1, Direction::East),
            Relocation::TopMiddle => at(w / 2, 0, Direction::North),
            Relocation::BottomMiddle => at(w / 2, h - 1, Direction::South),
            Relocation::MiddleLeft => at(0, h / 2, Direction::West),
            Relocation::MiddleRight => at(w - 1, h / 2, Direction::East),
            _ => None,
        }
    }

    fn nudge(self) -> Option<Direction> {
        match self {
            Relocation::Upward => Some(Direction::North),
            Relocation::Downward => Some(Direction::South),
            Relocation::Leftward => Some(Direction::West),
            Relocation::Rightward => Some(Direction::East),
            _ => None,
        }
    }
}

impl fmt::Display for Relocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Relocation {
    type Err = MazeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        let alias = match key.as_str() {
            "up" => "upward",
            "down" => "downward",
            "left" => "leftward",
            "right" => "rightward",
            other => other,
        };
        Relocation::ALL
            .into_iter()
            .find(|r| r.name().replace(' ', "").to_ascii_lowercase() == alias)
            .ok_or_else(|| MazeError::InvalidRelocation(s.to_string()))
    }
}

/// Every opening `region` could use.
///
/// A sealed block opens through a perimeter wall facing a free cell; a point
/// endpoint (or an opening already moved off its block) uses the grid boundary
/// sides of unreserved cells.
pub fn candidates(grid: &Grid, region: &Region, current: Option<Opening>, reserved: &CoordSet) -> Vec<Opening> {
    let on_block = region.reserved && current.map_or(true, |o| region.contains(o.cell));
    if on_block {
        return block_openings(grid, region, reserved)
            .into_iter()
            .map(|(cell, side)| Opening { cell, side })
            .collect();
    }
    grid.coords()
        .filter(|c| !reserved.contains(c))
        .flat_map(|cell| {
            Direction::ALL
                .into_iter()
                .filter(move |side| grid.is_boundary_side(cell, *side))
                .map(move |side| Opening { cell, side })
        })
        .collect()
}

/// First opening for a freshly generated maze
pub fn initial_opening<R: Rng + ?Sized>(
    grid: &Grid,
    region: &Region,
    reserved: &CoordSet,
    rng: &mut R,
) -> Result<Opening> {
    if !region.reserved {
        let side = grid.boundary_side(region.origin).ok_or_else(|| {
            MazeError::generation(format!(
                "point ({}, {}) is not on the grid boundary",
                region.origin.x, region.origin.y
            ))
        })?;
        return Ok(Opening {
            cell: region.origin,
            side,
        });
    }
    let options = candidates(grid, region, None, reserved);
    if options.is_empty() {
        return Err(MazeError::generation(format!(
            "{:?} block at ({}, {}) has no free neighbour to open into",
            region.kind, region.origin.x, region.origin.y
        )));
    }
    Ok(options[rng.random_range(0..options.len())])
}

/// Where `policy` moves `current`; `RelocationConflict` when the target is a reserved cell
pub fn resolve(
    grid: &Grid,
    region: &Region,
    current: Opening,
    policy: Relocation,
    reserved: &CoordSet,
) -> Result<Opening> {
    if policy == Relocation::Unchanged {
        return Ok(current);
    }
    if let Some(target) = policy.named_target(grid) {
        if reserved.contains(&target.cell) {
            return Err(MazeError::RelocationConflict {
                x: target.cell.x,
                y: target.cell.y,
            });
        }
        return Ok(target);
    }
    let Some(dir) = policy.nudge() else {
        return Ok(current);
    };
    let Some(next) = grid.neighbor(current.cell, dir) else {
        log::debug!("Opening at ({}, {}) cannot move {:?}", current.cell.x, current.cell.y, dir);
        return Ok(current);
    };
    let options: Vec<Opening> = candidates(grid, region, Some(current), reserved)
        .into_iter()
        .filter(|o| o.cell == next)
        .collect();
    let moved = options
        .iter()
        .find(|o| o.side == current.side)
        .or_else(|| options.first())
        .copied();
    Ok(moved.unwrap_or(current))
}

/// Opens the wall and records the markers for `endpoint`
pub fn open(grid: &mut Grid, opening: Opening, endpoint: Endpoint) -> Result<()> {
    let Opening { cell, side } = opening;
    grid.set_wall(cell.x, cell.y, side, WallState::Down)?;
    let target = grid.cell_mut(cell)?;
    target.solution[side.index()] = true;
    match endpoint {
        Endpoint::Entry => target.entry[side.index()] = true,
        Endpoint::Exit => target.exit[side.index()] = true,
    }
    Ok(())
}

/// Closes the wall and clears the markers for `endpoint`
pub fn seal(grid: &mut Grid, opening: Opening, endpoint: Endpoint) -> Result<()> {
    let Opening { cell, side } = opening;
    grid.set_wall(cell.x, cell.y, side, WallState::Up)?;
    let target = grid.cell_mut(cell)?;
    target.solution[side.index()] = false;
    match endpoint {
        Endpoint::Entry => target.entry[side.index()] = false,
        Endpoint::Exit => target.exit[side.index()] = false,
    }
    Ok(())
}
