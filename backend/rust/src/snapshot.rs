// snapshot.rs - Serializable maze form and the persistence seam

use crate::error_handling::MazeError;
use crate::openings::Opening;
use crate::placement::Regions;
use crate::shape::RegionKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Opaque raster attached to a region; only its pixel size matters here
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionImage {
    pub kind: RegionKind,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub bytes: Vec<u8>,
}

/// Everything needed to rebuild a [`crate::Maze`].
///
/// Wall values use the numeric encoding of [`crate::WallState::value`];
/// every per-cell array is row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeSnapshot {
    pub id: Option<u32>,
    pub name: String,
    pub author: String,
    pub created: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
    pub width: usize,
    pub height: usize,
    pub walls: Vec<[u8; 4]>,
    pub solution: Vec<[bool; 4]>,
    pub entry: Vec<[bool; 4]>,
    pub exit: Vec<[bool; 4]>,
    pub entry_opening: Opening,
    pub exit_opening: Opening,
    pub regions: Regions,
    #[serde(default)]
    pub images: Vec<RegionImage>,
    pub solution_length: usize,
    pub show_arrows: bool,
}

impl MazeSnapshot {
    pub fn to_json(&self) -> Result<String, MazeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, MazeError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("No maze with id {0}")]
    NotFound(u32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Maze(#[from] MazeError),
}

/// Storage for maze snapshots. Implementations are handed to whoever needs
/// them; there is no process-wide instance.
pub trait MazeRepository {
    /// Stores `snapshot` and returns its id, allocating one when it has none
    fn save(&mut self, snapshot: &MazeSnapshot) -> Result<u32, RepositoryError>;
    fn load_by_id(&self, id: u32) -> Result<MazeSnapshot, RepositoryError>;
    fn load_all(&self) -> Result<Vec<MazeSnapshot>, RepositoryError>;
    fn delete(&mut self, id: u32) -> Result<(), RepositoryError>;
}

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    mazes: BTreeMap<u32, MazeSnapshot>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.mazes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mazes.is_empty()
    }
}

impl MazeRepository for InMemoryRepository {
    fn save(&mut self, snapshot: &MazeSnapshot) -> Result<u32, RepositoryError> {
        let id = snapshot
            .id
            .unwrap_or_else(|| self.mazes.keys().next_back().map_or(1, |max| max + 1));
        let mut stored = snapshot.clone();
        stored.id = Some(id);
        self.mazes.insert(id, stored);
        Ok(id)
    }

    fn load_by_id(&self, id: u32) -> Result<MazeSnapshot, RepositoryError> {
        self.mazes.get(&id).cloned().ok_or(RepositoryError::NotFound(id))
    }

    fn load_all(&self) -> Result<Vec<MazeSnapshot>, RepositoryError> {
        Ok(self.mazes.values().cloned().collect())
    }

    fn delete(&mut self, id: u32) -> Result<(), RepositoryError> {
        self.mazes
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound(id))
    }
}
