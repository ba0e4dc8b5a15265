// maze.rs - Maze aggregate: configuration, generation pipeline, edits and metadata

use crate::cell::Cell;
use crate::error_handling::{MazeError, Result};
use crate::generator::{carve_spanning_tree, reconnect};
use crate::grid::Grid;
use crate::openings::{self, Endpoint, Opening, Relocation};
use crate::placement::{carve_region, place_boundary_region, place_logo, Occupancy, Regions};
use crate::shape::{RegionKind, RegionShape};
use crate::snapshot::{MazeRepository, MazeSnapshot, RegionImage, RepositoryError};
use crate::solver;
use crate::types::{Coord, CoordSet, Direction, WallState};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Parameters for one generation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub name: String,
    pub author: String,
    pub width: usize,
    pub height: usize,
    pub start: RegionShape,
    pub finish: RegionShape,
    pub logo: Option<RegionShape>,
    /// Top-left cell of the start region instead of a random one
    pub start_at: Option<Coord>,
    pub finish_at: Option<Coord>,
    pub show_arrows: bool,
    pub seed: Option<u64>,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            author: String::new(),
            width: 20,
            height: 20,
            start: RegionShape::Point,
            finish: RegionShape::Point,
            logo: None,
            start_at: None,
            finish_at: None,
            show_arrows: true,
            seed: None,
        }
    }
}

impl MazeConfig {
    /// Rejects settings that could never produce a maze, before anything is allocated
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 || self.width * self.height < 2 {
            return Err(MazeError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        for anchor in [self.start_at, self.finish_at].into_iter().flatten() {
            if anchor.x >= self.width || anchor.y >= self.height {
                return Err(MazeError::OutOfBounds {
                    x: anchor.x,
                    y: anchor.y,
                    width: self.width,
                    height: self.height,
                });
            }
        }
        Ok(())
    }
}

/// A generated maze and everything derived from it
#[derive(Debug, Clone)]
pub struct Maze {
    id: Option<u32>,
    name: String,
    author: String,
    created: DateTime<Utc>,
    last_edited: DateTime<Utc>,
    grid: Grid,
    regions: Regions,
    exclusions: CoordSet,
    entry: Opening,
    exit: Opening,
    /// `None` until solved, and again after any wall edit
    solution: Option<Vec<Coord>>,
    show_arrows: bool,
    images: Vec<RegionImage>,
    rng: StdRng,
}

impl Maze {
    /// Generates a maze seeded from `config.seed`, or from the OS when unset
    pub fn generate(config: &MazeConfig) -> Result<Maze> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::generate_with(config, rng)
    }

    pub fn generate_with(config: &MazeConfig, mut rng: StdRng) -> Result<Maze> {
        config.validate()?;
        let mut grid = Grid::new(config.width, config.height)?;

        let mut taken = Occupancy::default();
        let start = place_boundary_region(
            &grid,
            RegionKind::Start,
            config.start,
            config.start_at,
            &taken,
            &mut rng,
        )?;
        taken.claim(start);
        let finish = place_boundary_region(
            &grid,
            RegionKind::Finish,
            config.finish,
            config.finish_at,
            &taken,
            &mut rng,
        )?;
        taken.claim(finish);
        carve_region(&mut grid, &start)?;
        carve_region(&mut grid, &finish)?;

        let stats = carve_spanning_tree(&mut grid, taken.reserved(), &mut rng)?;

        let entry = openings::initial_opening(&grid, &start, taken.reserved(), &mut rng)?;
        let exit = openings::initial_opening(&grid, &finish, taken.reserved(), &mut rng)?;
        openings::open(&mut grid, entry, Endpoint::Entry)?;
        openings::open(&mut grid, exit, Endpoint::Exit)?;
        let mut path = solver::solve(&mut grid, entry, exit, &mut rng)?;

        let mut logo = None;
        if let Some(shape) = config.logo {
            let on_path: CoordSet = path.iter().copied().collect();
            if let Some(region) = place_logo(&grid, shape, &taken, &on_path, &mut rng) {
                taken.claim(region);
                carve_region(&mut grid, &region)?;
                reconnect(&mut grid, taken.reserved(), &mut rng)?;
                path = solver::solve(&mut grid, entry, exit, &mut rng)?;
                logo = Some(region);
            }
        }

        let regions = Regions { start, finish, logo };
        let exclusions = exclusions_for(&regions, entry, exit);
        let now = Utc::now();
        log::info!(
            "Generated '{}' {}x{}: {} tree cells, solution {} cells, {} dead ends",
            config.name,
            config.width,
            config.height,
            stats.tree_cells,
            path.len(),
            grid.dead_end_count()
        );

        Ok(Maze {
            id: None,
            name: config.name.clone(),
            author: config.author.clone(),
            created: now,
            last_edited: now,
            grid,
            regions,
            exclusions,
            entry,
            exit,
            solution: Some(path),
            show_arrows: config.show_arrows,
            images: Vec::new(),
            rng,
        })
    }

    pub fn id(&self) -> Option<u32> {
        self.id
    }

    /// Assigns the persistence id. Only the first assignment sticks.
    pub fn set_id(&mut self, id: u32) -> bool {
        if self.id.is_some() {
            return false;
        }
        self.id = Some(id);
        true
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
        self.touch();
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn last_edited(&self) -> DateTime<Utc> {
        self.last_edited
    }

    pub fn show_arrows(&self) -> bool {
        self.show_arrows
    }

    pub fn set_show_arrows(&mut self, show: bool) {
        self.show_arrows = show;
        self.touch();
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn regions(&self) -> &Regions {
        &self.regions
    }

    /// Reserved cells plus the entry and exit cells
    pub fn exclusions(&self) -> &CoordSet {
        &self.exclusions
    }

    pub fn entry(&self) -> Opening {
        self.entry
    }

    pub fn exit(&self) -> Opening {
        self.exit
    }

    pub fn images(&self) -> &[RegionImage] {
        &self.images
    }

    /// Attaches a raster for a region, replacing any earlier one of the same kind
    pub fn attach_image(&mut self, image: RegionImage) {
        self.images.retain(|i| i.kind != image.kind);
        self.images.push(image);
        self.touch();
    }

    /// Reseeds the solver and relocation randomness
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    fn touch(&mut self) {
        self.last_edited = Utc::now();
    }

    fn invalidate_solution(&mut self) {
        self.solution = None;
        self.touch();
    }

    /// Sets one wall and its mirror; the cached solution is dropped
    pub fn set_wall(&mut self, x: usize, y: usize, dir: Direction, state: WallState) -> Result<()> {
        self.grid.set_wall(x, y, dir, state)?;
        self.invalidate_solution();
        Ok(())
    }

    pub fn replace_cell(&mut self, x: usize, y: usize, cell: Cell) -> Result<()> {
        self.grid.replace_cell(x, y, cell)?;
        self.invalidate_solution();
        Ok(())
    }

    /// Recomputes the path from entry to exit and the per-cell solution bits
    pub fn solve(&mut self) -> Result<&[Coord]> {
        let path = solver::solve(&mut self.grid, self.entry, self.exit, &mut self.rng)?;
        Ok(self.solution.insert(path).as_slice())
    }

    /// Cached path, entry cell first
    pub fn solution_path(&self) -> Option<&[Coord]> {
        self.solution.as_deref()
    }

    pub fn solution_length(&self) -> usize {
        self.solution.as_ref().map_or(0, Vec::len)
    }

    pub fn dead_end_count(&self) -> usize {
        self.grid.dead_end_count()
    }

    /// Whole percent of the grid on the solution path, solving first if needed
    pub fn percent_used(&mut self) -> Result<usize> {
        if self.solution.is_none() {
            self.solve()?;
        }
        Ok(solver::percent_used(self.solution_length(), &self.grid))
    }

    /// Moves the entry and exit openings.
    ///
    /// Returns `Ok(false)` and leaves the maze untouched when the two would
    /// share a cell or a named target lies inside a reserved region.
    pub fn change_entry_exit(&mut self, start: Relocation, finish: Relocation) -> Result<bool> {
        let reserved = self.regions.reserved_cells();
        let targets = openings::resolve(&self.grid, &self.regions.start, self.entry, start, &reserved)
            .and_then(|entry| {
                openings::resolve(&self.grid, &self.regions.finish, self.exit, finish, &reserved)
                    .map(|exit| (entry, exit))
            });
        let (entry, exit) = match targets {
            Ok(pair) => pair,
            Err(MazeError::RelocationConflict { x, y }) => {
                log::warn!("Relocation rejected: ({}, {}) is reserved", x, y);
                return Ok(false);
            }
            Err(e) => return Err(e),
        };
        if entry.cell == exit.cell {
            log::warn!(
                "Relocation rejected: entry and exit would share ({}, {})",
                entry.cell.x,
                entry.cell.y
            );
            return Ok(false);
        }
        if entry == self.entry && exit == self.exit {
            if self.solution.is_none() {
                self.solve()?;
            }
            return Ok(true);
        }

        openings::seal(&mut self.grid, self.entry, Endpoint::Entry)?;
        openings::seal(&mut self.grid, self.exit, Endpoint::Exit)?;
        openings::open(&mut self.grid, entry, Endpoint::Entry)?;
        openings::open(&mut self.grid, exit, Endpoint::Exit)?;
        log::debug!(
            "Entry moved to ({}, {}) {:?}, exit to ({}, {}) {:?}",
            entry.cell.x,
            entry.cell.y,
            entry.side,
            exit.cell.x,
            exit.cell.y,
            exit.side
        );
        self.entry = entry;
        self.exit = exit;
        self.exclusions = exclusions_for(&self.regions, entry, exit);
        self.invalidate_solution();
        self.solve()?;
        Ok(true)
    }

    pub fn snapshot(&self) -> MazeSnapshot {
        let cells: Vec<&Cell> = self.grid.cells().collect();
        MazeSnapshot {
            id: self.id,
            name: self.name.clone(),
            author: self.author.clone(),
            created: self.created,
            last_edited: self.last_edited,
            width: self.grid.width(),
            height: self.grid.height(),
            walls: cells.iter().map(|c| c.walls().map(WallState::value)).collect(),
            solution: cells.iter().map(|c| c.solution).collect(),
            entry: cells.iter().map(|c| c.entry).collect(),
            exit: cells.iter().map(|c| c.exit).collect(),
            entry_opening: self.entry,
            exit_opening: self.exit,
            regions: self.regions.clone(),
            images: self.images.clone(),
            solution_length: self.solution_length(),
            show_arrows: self.show_arrows,
        }
    }

    /// Rebuilds a maze, checking array sizes, wall values, the mirror
    /// invariant and that the markers agree with the recorded openings.
    /// The path itself is recomputed on the next `solve`.
    pub fn from_snapshot(snapshot: MazeSnapshot) -> Result<Maze> {
        let MazeSnapshot {
            id,
            name,
            author,
            created,
            last_edited,
            width,
            height,
            walls,
            solution,
            entry,
            exit,
            entry_opening,
            exit_opening,
            regions,
            images,
            show_arrows,
            ..
        } = snapshot;

        let expected = width.checked_mul(height).ok_or_else(|| {
            MazeError::snapshot(format!("{}x{} grid is too large", width, height))
        })?;
        if expected == 0 {
            return Err(MazeError::InvalidDimensions { width, height });
        }
        for (label, len) in [
            ("walls", walls.len()),
            ("solution", solution.len()),
            ("entry", entry.len()),
            ("exit", exit.len()),
        ] {
            if len != expected {
                return Err(MazeError::snapshot(format!(
                    "{} has {} cells, expected {}",
                    label, len, expected
                )));
            }
        }

        let mut cells = Vec::with_capacity(expected);
        for (i, raw) in walls.iter().enumerate() {
            let mut states = [WallState::Up; 4];
            for (slot, value) in states.iter_mut().zip(raw) {
                *slot = WallState::from_value(*value)
                    .ok_or_else(|| MazeError::snapshot(format!("unknown wall value {}", value)))?;
            }
            let mut cell = Cell::with_walls(i % width, i / width, states);
            cell.solution = solution[i];
            cell.entry = entry[i];
            cell.exit = exit[i];
            cells.push(cell);
        }
        let grid = Grid::from_cells(width, height, cells)?;

        for region in regions.iter() {
            if !region.fits_within(width, height) {
                return Err(MazeError::snapshot(format!(
                    "{:?} region at ({}, {}) leaves the grid",
                    region.kind, region.origin.x, region.origin.y
                )));
            }
        }
        check_marker(&grid, entry_opening, |c| c.entry, "entry")?;
        check_marker(&grid, exit_opening, |c| c.exit, "exit")?;

        let exclusions = exclusions_for(&regions, entry_opening, exit_opening);
        Ok(Maze {
            id,
            name,
            author,
            created,
            last_edited,
            grid,
            regions,
            exclusions,
            entry: entry_opening,
            exit: exit_opening,
            solution: None,
            show_arrows,
            images,
            rng: StdRng::from_os_rng(),
        })
    }

    /// Saves through `repo`, adopting the id it hands out on first save.
    /// A maze without a cached path is solved first so the stored length is current.
    pub fn save<R: MazeRepository + ?Sized>(&mut self, repo: &mut R) -> std::result::Result<u32, RepositoryError> {
        if self.solution.is_none() {
            if let Err(e) = self.solve() {
                log::warn!("Saving '{}' without a solution: {}", self.name, e);
            }
        }
        let id = repo.save(&self.snapshot())?;
        self.set_id(id);
        Ok(id)
    }
}

fn exclusions_for(regions: &Regions, entry: Opening, exit: Opening) -> CoordSet {
    let mut set = regions.reserved_cells();
    set.insert(entry.cell);
    set.insert(exit.cell);
    set
}

/// Exactly one marked side across the grid, and it is the recorded opening
fn check_marker(grid: &Grid, opening: Opening, marks: fn(&Cell) -> [bool; 4], label: &str) -> Result<()> {
    let count: usize = grid
        .cells()
        .map(|c| marks(c).iter().filter(|m| **m).count())
        .sum();
    let here = grid.cell(opening.cell)?;
    if count != 1 || !marks(here)[opening.side.index()] {
        return Err(MazeError::snapshot(format!(
            "{} marker does not match opening at ({}, {})",
            label, opening.cell.x, opening.cell.y
        )));
    }
    Ok(())
}
