// error_handling.rs - Error kinds for rendering, storage and image probing

use maze_engine::{MazeError, RepositoryError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Image processing failed: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Maze(#[from] MazeError),

    #[error("Invalid wall edit '{input}': {reason}")]
    InvalidEdit { input: String, reason: String },

    #[error("Invalid render size: {reason}")]
    InvalidRenderSize { reason: String },
}

pub type Result<T> = std::result::Result<T, CliError>;
