use std::path::PathBuf;
use terrain_common::NameError;

/// Errors raised while producing a world configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("malformed client stream: {0}")]
    Stream(String),
    #[error("failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Errors from the world loader.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("configs root must not be empty")]
    EmptyConfigsRoot,
    #[error("invalid world name: {0}")]
    InvalidName(#[from] NameError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
