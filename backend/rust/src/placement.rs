// placement.rs - Reserves the start, finish and logo rectangles before generation

use crate::error_handling::{MazeError, Result};
use crate::grid::Grid;
use crate::shape::{Region, RegionKind, RegionShape};
use crate::types::{Coord, CoordSet, Direction, WallState};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Geometry of every placed region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regions {
    pub start: Region,
    pub finish: Region,
    pub logo: Option<Region>,
}

impl Regions {
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        [Some(&self.start), Some(&self.finish), self.logo.as_ref()]
            .into_iter()
            .flatten()
    }

    /// Cells the generator must not touch
    pub fn reserved_cells(&self) -> CoordSet {
        self.iter()
            .filter(|r| r.reserved)
            .flat_map(|r| r.cells())
            .collect()
    }

    pub fn is_reserved(&self, coord: Coord) -> bool {
        self.iter().any(|r| r.reserved && r.contains(coord))
    }
}

/// Cells claimed by regions placed so far
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    occupied: CoordSet,
    reserved: CoordSet,
    blocks: Vec<Region>,
}

impl Occupancy {
    pub fn claim(&mut self, region: Region) {
        self.occupied.extend(region.cells());
        if region.reserved {
            self.reserved.extend(region.cells());
        }
        self.blocks.push(region);
    }

    /// Every claimed cell, point endpoints included
    pub fn occupied(&self) -> &CoordSet {
        &self.occupied
    }

    /// Cells sealed off from the generator
    pub fn reserved(&self) -> &CoordSet {
        &self.reserved
    }
}

fn region(kind: RegionKind, shape: RegionShape, origin: Coord, (width, height): (usize, usize)) -> Region {
    Region {
        kind,
        origin,
        width,
        height,
        reserved: !shape.is_point(),
    }
}

fn fits(grid: &Grid, origin: Coord, width: usize, height: usize) -> bool {
    width > 0 && height > 0 && origin.x + width <= grid.width() && origin.y + height <= grid.height()
}

fn touches_boundary(grid: &Grid, r: &Region) -> bool {
    r.origin.x == 0
        || r.origin.y == 0
        || r.origin.x + r.width == grid.width()
        || r.origin.y + r.height == grid.height()
}

/// Sides of a reserved block that face a cell the maze can reach
pub fn block_openings(grid: &Grid, block: &Region, reserved: &CoordSet) -> Vec<(Coord, Direction)> {
    block
        .cells()
        .flat_map(|c| grid.neighbors(c).map(move |(dir, n)| (c, dir, n)))
        .filter(|(_, _, n)| !block.contains(*n) && !reserved.contains(n))
        .map(|(c, dir, _)| (c, dir))
        .collect()
}

/// True when, after also reserving `candidate`, the free cells form one
/// component and each reserved endpoint block still has a free neighbour.
fn leaves_maze_whole(grid: &Grid, reserved: &CoordSet, candidate: &Region, blocks: &[Region]) -> bool {
    let is_free = |c: Coord| !reserved.contains(&c) && !(candidate.reserved && candidate.contains(c));
    if grid.components(is_free, true) != 1 {
        return false;
    }
    let mut taken = reserved.clone();
    if candidate.reserved {
        taken.extend(candidate.cells());
    }
    blocks
        .iter()
        .chain(std::iter::once(candidate))
        .filter(|b| b.reserved && b.kind != RegionKind::Logo)
        .all(|b| !block_openings(grid, b, &taken).is_empty())
}

/// Places a start or finish region so that one of its edges lies on the grid boundary
pub fn place_boundary_region<R: Rng + ?Sized>(
    grid: &Grid,
    kind: RegionKind,
    shape: RegionShape,
    pinned: Option<Coord>,
    taken: &Occupancy,
    rng: &mut R,
) -> Result<Region> {
    let (width, height) = shape.dimensions();
    if width > grid.width() || height > grid.height() {
        return Err(MazeError::generation(format!(
            "{:?} region '{}' ({}x{}) does not fit a {}x{} grid",
            kind,
            shape,
            width,
            height,
            grid.width(),
            grid.height()
        )));
    }

    let acceptable = |r: &Region| {
        fits(grid, r.origin, r.width, r.height)
            && touches_boundary(grid, r)
            && r.cells().all(|c| !taken.occupied.contains(&c))
            && leaves_maze_whole(grid, &taken.reserved, r, &taken.blocks)
    };

    if let Some(origin) = pinned {
        let r = region(kind, shape, origin, (width, height));
        if !acceptable(&r) {
            return Err(MazeError::generation(format!(
                "{:?} region cannot be pinned at ({}, {})",
                kind, origin.x, origin.y
            )));
        }
        return Ok(r);
    }

    let candidates: Vec<Region> = (0..=grid.height() - height)
        .flat_map(|y| (0..=grid.width() - width).map(move |x| Coord::new(x, y)))
        .map(|origin| region(kind, shape, origin, (width, height)))
        .filter(|r| acceptable(r))
        .collect();
    log::debug!("{:?} region '{}': {} boundary positions", kind, shape, candidates.len());

    if candidates.is_empty() {
        return Err(MazeError::generation(format!(
            "no free boundary position for {:?} region '{}'",
            kind, shape
        )));
    }
    Ok(candidates[rng.random_range(0..candidates.len())])
}

/// Connectivity checks allowed per logo size before it shrinks
pub const LOGO_CONNECTIVITY_CHECKS: usize = 24;

/// Places the logo anywhere it overlaps neither claimed cells nor the solution
/// path. After one failed draw per free cell, or once the connectivity
/// checks for a size run out, it shrinks one cell in each dimension; once a
/// dimension reaches zero the logo is dropped.
pub fn place_logo<R: Rng + ?Sized>(
    grid: &Grid,
    shape: RegionShape,
    taken: &Occupancy,
    solution: &CoordSet,
    rng: &mut R,
) -> Option<Region> {
    let (mut width, mut height) = shape.dimensions();
    let budget = grid
        .coords()
        .filter(|c| !taken.occupied.contains(c) && !solution.contains(c))
        .count();

    while width > 0 && height > 0 {
        let (found, checks) = draw_logo(grid, (width, height), taken, solution, budget, rng);
        if found.is_some() {
            return found;
        }
        log::warn!(
            "Logo {}x{} does not fit after {} draws ({} connectivity checks), shrinking",
            width,
            height,
            budget,
            checks
        );
        width -= 1;
        height -= 1;
    }
    log::warn!("Logo '{}' omitted, no room left in the grid", shape);
    None
}

/// Random draws for one logo size. Overlap is rejected first; the full-grid
/// connectivity check runs at most once per origin and at most
/// [`LOGO_CONNECTIVITY_CHECKS`] times. Returns the region and the checks spent.
fn draw_logo<R: Rng + ?Sized>(
    grid: &Grid,
    (width, height): (usize, usize),
    taken: &Occupancy,
    solution: &CoordSet,
    budget: usize,
    rng: &mut R,
) -> (Option<Region>, usize) {
    if width > grid.width() || height > grid.height() {
        return (None, 0);
    }
    let mut rejected = CoordSet::default();
    let mut checks = 0;
    for _ in 0..budget {
        let origin = Coord::new(
            rng.random_range(0..=grid.width() - width),
            rng.random_range(0..=grid.height() - height),
        );
        let candidate = Region {
            kind: RegionKind::Logo,
            origin,
            width,
            height,
            reserved: true,
        };
        let clear = candidate
            .cells()
            .all(|c| !taken.occupied.contains(&c) && !solution.contains(&c));
        if !clear || rejected.contains(&origin) {
            continue;
        }
        checks += 1;
        if leaves_maze_whole(grid, &taken.reserved, &candidate, &taken.blocks) {
            return (Some(candidate), checks);
        }
        rejected.insert(origin);
        if checks >= LOGO_CONNECTIVITY_CHECKS {
            break;
        }
    }
    (None, checks)
}

/// Seals a reserved block: perimeter walls up, walls between its own cells down
pub fn carve_region(grid: &mut Grid, region: &Region) -> Result<()> {
    if !region.reserved {
        return Ok(());
    }
    for cell in region.cells() {
        for dir in Direction::ALL {
            let inside = grid
                .neighbor(cell, dir)
                .is_some_and(|n| region.contains(n));
            let state = if inside { WallState::Down } else { WallState::Up };
            grid.set_wall(cell.x, cell.y, dir, state)?;
        }
    }
    Ok(())
}
