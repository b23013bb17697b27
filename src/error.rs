use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed run setup, caught before the simulation loop starts.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("cell ({x},{y}) out of range for a {side}x{side} grid")]
    OutOfRange { x: i32, y: i32, side: usize },

    #[error("grid too large: {0}")]
    Overflow(String),

    #[error("invalid grid: {0}")]
    Parse(String),

    #[error("failed to load grid from '{}': {message}", path.display())]
    Load { path: PathBuf, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
