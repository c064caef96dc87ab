//! Catalog error types.

use std::path::PathBuf;
use thiserror::Error;

/// Catalog errors, each mapped to an HTTP status by the HTTP adapter.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Icon name missing or not a single path component
    #[error("invalid app name: {0:?}")]
    InvalidName(String),

    /// No icon for this application
    #[error("icon not found: {0}")]
    NotFound(String),

    /// Launch target does not exist
    #[error("invalid app path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// Launcher could not be spawned or exited unsuccessfully
    #[error("failed to launch app: {0}")]
    LaunchFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CatalogError::InvalidName(_) | CatalogError::InvalidPath(_) => 400,
            CatalogError::NotFound(_) => 404,
            CatalogError::LaunchFailed(_) | CatalogError::Io(_) => 500,
        }
    }

    /// Message returned to HTTP clients
    pub fn public_message(&self) -> String {
        match self {
            CatalogError::InvalidName(_) => "App name is required".to_string(),
            CatalogError::NotFound(name) => format!("Icon not found: {name}"),
            CatalogError::InvalidPath(_) => "Invalid app path".to_string(),
            CatalogError::LaunchFailed(_) => "Failed to launch app".to_string(),
            CatalogError::Io(_) => "Internal error".to_string(),
        }
    }
}

/// Result alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
