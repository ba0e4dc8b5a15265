// generator.rs - Spanning tree construction by loop-erased random walks (Wilson)

use crate::error_handling::{MazeError, Result};
use crate::grid::Grid;
use crate::types::{Coord, CoordMap, CoordSet, Direction};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

/// Carve statistics, mostly useful for logging and benchmarks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub tree_cells: usize,
    pub carved_edges: usize,
    pub walks: usize,
    pub steps: usize,
    pub erased_loops: usize,
}

/// Builds a spanning tree over every cell not in `excluded`, opening only
/// the walls on committed walk paths.
///
/// Fails when the free cells are split into several components, since no
/// walk could then reach the tree from the other side.
pub fn carve_spanning_tree<R: Rng + ?Sized>(
    grid: &mut Grid,
    excluded: &CoordSet,
    rng: &mut R,
) -> Result<GenerationStats> {
    let mut free: Vec<Coord> = grid.coords().filter(|c| !excluded.contains(c)).collect();
    if free.is_empty() {
        return Err(MazeError::generation("every cell is reserved"));
    }
    let components = grid.components(|c| !excluded.contains(&c), true);
    if components > 1 {
        return Err(MazeError::generation(format!(
            "reserved regions split the free cells into {} components",
            components
        )));
    }

    let target = free.len();
    let mut stats = GenerationStats::default();
    let mut tree = CoordSet::default();
    tree.reserve(target);

    free.shuffle(rng);
    let root = free[0];
    tree.insert(root);

    let mut walk: Vec<Coord> = Vec::new();
    let mut position: CoordMap<usize> = CoordMap::default();

    for &origin in &free[1..] {
        if tree.contains(&origin) {
            continue;
        }
        walk.clear();
        position.clear();
        walk.push(origin);
        position.insert(origin, 0);
        stats.walks += 1;

        loop {
            let here = walk[walk.len() - 1];
            let options: Vec<Coord> = grid
                .neighbors(here)
                .map(|(_, n)| n)
                .filter(|n| !excluded.contains(n))
                .collect();
            // Connectivity was checked above, so a free cell always has a free neighbour
            let next = options[rng.random_range(0..options.len())];
            stats.steps += 1;

            if tree.contains(&next) {
                walk.push(next);
                break;
            }
            if let Some(&at) = position.get(&next) {
                for erased in walk.drain(at + 1..) {
                    position.remove(&erased);
                }
                stats.erased_loops += 1;
            } else {
                position.insert(next, walk.len());
                walk.push(next);
            }
        }

        for pair in walk.windows(2) {
            grid.carve_between(pair[0], pair[1])?;
            stats.carved_edges += 1;
        }
        tree.extend(walk[..walk.len() - 1].iter().copied());
    }

    if tree.len() != target {
        return Err(MazeError::generation(format!(
            "tree reached {} of {} free cells",
            tree.len(),
            target
        )));
    }
    stats.tree_cells = tree.len();
    log::debug!(
        "Spanning tree: {} cells, {} edges, {} walks, {} steps, {} loops erased",
        stats.tree_cells,
        stats.carved_edges,
        stats.walks,
        stats.steps,
        stats.erased_loops
    );
    Ok(stats)
}

/// Rejoins a forest over the free cells into a single tree.
///
/// Sealing a block inside an existing tree severs the branches that ran
/// through it; each remaining piece is merged by opening one random wall
/// between two pieces, so no cycle is introduced. Returns the walls opened.
pub fn reconnect<R: Rng + ?Sized>(grid: &mut Grid, excluded: &CoordSet, rng: &mut R) -> Result<usize> {
    let mut label: CoordMap<usize> = CoordMap::default();
    let mut pieces = 0;
    let mut queue = VecDeque::new();
    let free: Vec<Coord> = grid.coords().filter(|c| !excluded.contains(c)).collect();
    for &start in &free {
        if label.contains_key(&start) {
            continue;
        }
        label.insert(start, pieces);
        queue.push_back(start);
        while let Some(here) = queue.pop_front() {
            for (_, next) in grid.open_neighbors(here) {
                if !excluded.contains(&next) && !label.contains_key(&next) {
                    label.insert(next, pieces);
                    queue.push_back(next);
                }
            }
        }
        pieces += 1;
    }
    if pieces <= 1 {
        return Ok(0);
    }

    let mut bridges: Vec<(Coord, Coord, usize, usize)> = Vec::new();
    for &here in &free {
        for dir in [Direction::East, Direction::South] {
            let Some(next) = grid.neighbor(here, dir) else {
                continue;
            };
            if let (Some(&a), Some(&b)) = (label.get(&here), label.get(&next)) {
                if a != b {
                    bridges.push((here, next, a, b));
                }
            }
        }
    }
    bridges.shuffle(rng);

    let mut parent: Vec<usize> = (0..pieces).collect();
    fn root(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }
    let mut opened = 0;
    for (here, next, a, b) in bridges {
        let (ra, rb) = (root(&mut parent, a), root(&mut parent, b));
        if ra == rb {
            continue;
        }
        parent[ra] = rb;
        grid.carve_between(here, next)?;
        opened += 1;
    }
    if opened != pieces - 1 {
        return Err(MazeError::generation(format!(
            "{} pieces of the maze could not be rejoined",
            pieces - opened
        )));
    }
    log::debug!("Rejoined {} pieces after sealing a block", pieces);
    Ok(opened)
}
