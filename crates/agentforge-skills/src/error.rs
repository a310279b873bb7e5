//! Error types for manifest loading and skill fixes

use std::path::PathBuf;
use thiserror::Error;

/// Skills errors
#[derive(Debug, Error)]
pub enum SkillError {
    /// No manifest at the expected location
    #[error("Manifest not found at {}", .0.display())]
    ManifestNotFound(PathBuf),

    /// Reading or writing a file failed
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Manifest is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Manifest is JSON but not shaped like a manifest
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, SkillError>;
