// error_handling.rs - Error kinds surfaced by the maze engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MazeError {
    #[error("Cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("Invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Maze generation failed: {reason}")]
    Generation { reason: String },

    #[error("Entry and exit would both open at cell ({x}, {y})")]
    RelocationConflict { x: usize, y: usize },

    #[error("Unknown region shape '{0}'")]
    InvalidShapeCatalogValue(String),

    #[error("Unknown relocation policy '{0}'")]
    InvalidRelocation(String),

    #[error("Maze has no path from entry to exit: {reason}")]
    Unsolvable { reason: String },

    #[error("Invalid maze snapshot: {reason}")]
    Snapshot { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MazeError {
    pub(crate) fn generation(reason: impl Into<String>) -> Self {
        MazeError::Generation {
            reason: reason.into(),
        }
    }

    pub(crate) fn snapshot(reason: impl Into<String>) -> Self {
        MazeError::Snapshot {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MazeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_message() {
        let err = MazeError::OutOfBounds {
            x: 7,
            y: 2,
            width: 5,
            height: 5,
        };
        assert_eq!(err.to_string(), "Cell (7, 2) is outside the 5x5 grid");
    }

    #[test]
    fn test_generation_helper() {
        let err = MazeError::generation("grid is split in two");
        assert!(matches!(err, MazeError::Generation { ref reason } if reason == "grid is split in two"));
    }
}
