// lib.rs - Library exports for maze-cli
// Rendering, editing, file-backed persistence and image probing around maze_engine

pub mod edit;
pub mod error_handling;
pub mod images;
pub mod render;
pub mod repository;

pub use error_handling::{CliError, Result};
pub use render::{render_ascii, RenderOptions};
pub use repository::JsonDirRepository;
