// types.rs - Shared type definitions for maze data structures
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Grid position, `x` grows east and `y` grows south
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    #[inline]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Neighbouring position one step in `dir`, `None` when it would underflow
    #[inline]
    pub fn step(self, dir: Direction) -> Option<Coord> {
        match dir {
            Direction::North => self.y.checked_sub(1).map(|y| Coord::new(self.x, y)),
            Direction::East => Some(Coord::new(self.x + 1, self.y)),
            Direction::South => Some(Coord::new(self.x, self.y + 1)),
            Direction::West => self.x.checked_sub(1).map(|x| Coord::new(x, self.y)),
        }
    }
}

// Packs both axes into one word so coordinate sets can skip hashing entirely.
impl Hash for Coord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(((self.x as u64) << 32) | (self.y as u64 & 0xFFFF_FFFF));
    }
}

impl nohash_hasher::IsEnabled for Coord {}

/// Membership set keyed by coordinate
pub type CoordSet = nohash_hasher::IntSet<Coord>;

/// Coordinate keyed map
pub type CoordMap<V> = nohash_hasher::IntMap<Coord, V>;

/// Cardinal directions. The discriminant is the index used by every
/// four-element per-cell array (walls, solution, entry, exit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Direction> {
        Self::ALL.get(index).copied()
    }

    #[inline]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

/// State of one side of a cell.
///
/// `StartMarker` and `EndMarker` are decoration hints; for connectivity they
/// behave exactly like `Up`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WallState {
    #[default]
    Up,
    Down,
    StartMarker,
    EndMarker,
}

impl WallState {
    #[inline]
    pub const fn is_passable(self) -> bool {
        matches!(self, WallState::Down)
    }

    /// Numeric encoding used by snapshots (0 Down, 1 Up, 2 start, 3 end)
    pub const fn value(self) -> u8 {
        match self {
            WallState::Down => 0,
            WallState::Up => 1,
            WallState::StartMarker => 2,
            WallState::EndMarker => 3,
        }
    }

    pub fn from_value(value: u8) -> Option<WallState> {
        match value {
            0 => Some(WallState::Down),
            1 => Some(WallState::Up),
            2 => Some(WallState::StartMarker),
            3 => Some(WallState::EndMarker),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_indices_are_stable() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.index(), i);
            assert_eq!(Direction::from_index(i), Some(*dir));
        }
        assert_eq!(Direction::from_index(4), None);
    }

    #[test]
    fn test_opposite_is_involution() {
        for dir in Direction::ALL {
            assert_ne!(dir, dir.opposite());
            assert_eq!(dir, dir.opposite().opposite());
        }
    }

    #[test]
    fn test_step_underflow() {
        let origin = Coord::new(0, 0);
        assert_eq!(origin.step(Direction::North), None);
        assert_eq!(origin.step(Direction::West), None);
        assert_eq!(origin.step(Direction::East), Some(Coord::new(1, 0)));
        assert_eq!(origin.step(Direction::South), Some(Coord::new(0, 1)));
    }

    #[test]
    fn test_markers_block_movement() {
        assert!(WallState::Down.is_passable());
        assert!(!WallState::Up.is_passable());
        assert!(!WallState::StartMarker.is_passable());
        assert!(!WallState::EndMarker.is_passable());
    }

    #[test]
    fn test_wall_value_encoding() {
        for state in [WallState::Up, WallState::Down, WallState::StartMarker, WallState::EndMarker] {
            assert_eq!(WallState::from_value(state.value()), Some(state));
        }
        assert_eq!(WallState::from_value(9), None);
    }

    #[test]
    fn test_coord_set_membership() {
        let mut set = CoordSet::default();
        set.insert(Coord::new(3, 4));
        assert!(set.contains(&Coord::new(3, 4)));
        assert!(!set.contains(&Coord::new(4, 3)));
    }
}
