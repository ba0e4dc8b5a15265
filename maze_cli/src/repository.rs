// repository.rs - One pretty-printed JSON file per saved maze

use log::debug;
use maze_engine::{MazeRepository, MazeSnapshot, RepositoryError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stores `<id>.json` files in a single directory; ids count up from the
/// largest one present.
#[derive(Debug, Clone)]
pub struct JsonDirRepository {
    dir: PathBuf,
}

impl JsonDirRepository {
    /// Opens `dir`, creating it when missing
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, RepositoryError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: u32) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    fn ids(&self) -> Result<Vec<u32>, RepositoryError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u32>().ok())
            {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }
}

impl MazeRepository for JsonDirRepository {
    fn save(&mut self, snapshot: &MazeSnapshot) -> Result<u32, RepositoryError> {
        let id = match snapshot.id {
            Some(id) => id,
            None => self.ids()?.last().map_or(1, |max| max + 1),
        };
        let mut stored = snapshot.clone();
        stored.id = Some(id);
        let json = serde_json::to_string_pretty(&stored)?;
        fs::write(self.path_for(id), json)?;
        debug!("Saved maze {} to {}", id, self.path_for(id).display());
        Ok(id)
    }

    fn load_by_id(&self, id: u32) -> Result<MazeSnapshot, RepositoryError> {
        let json = match fs::read_to_string(self.path_for(id)) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(RepositoryError::NotFound(id)),
            Err(e) => return Err(e.into()),
        };
        let mut snapshot: MazeSnapshot = serde_json::from_str(&json)?;
        snapshot.id = Some(id);
        Ok(snapshot)
    }

    fn load_all(&self) -> Result<Vec<MazeSnapshot>, RepositoryError> {
        self.ids()?.into_iter().map(|id| self.load_by_id(id)).collect()
    }

    fn delete(&mut self, id: u32) -> Result<(), RepositoryError> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(RepositoryError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }
}
