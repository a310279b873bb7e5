//! Error types for loading and compiling agent documents

use agentforge_skills::SkillError;
use std::path::PathBuf;
use thiserror::Error;

/// Agent document errors
#[derive(Debug, Error)]
pub enum AgentError {
    /// The requested agent file does not exist
    #[error("Agent file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The directory to walk does not exist
    #[error("Agents directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// The document has no leading frontmatter block
    #[error("No frontmatter found in {}", path.display())]
    MissingFrontmatter {
        /// Offending document
        path: PathBuf,
    },

    /// Frontmatter is not valid YAML
    #[error("Invalid YAML in {}: {source}", path.display())]
    InvalidYaml {
        /// Offending document
        path: PathBuf,
        /// Parser error
        #[source]
        source: serde_yaml::Error,
    },

    /// Frontmatter parsed but is not a key/value mapping
    #[error("Frontmatter must be a mapping in {}", path.display())]
    NotAMapping {
        /// Offending document
        path: PathBuf,
    },

    /// Reading or writing a file failed
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Skill manifest or skill fix failure
    #[error(transparent)]
    Skills(#[from] SkillError),
}

impl AgentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AgentError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, AgentError>;
