use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Category of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// The document does not start with a frontmatter block
    MissingFrontmatter,

    /// A required frontmatter key is absent
    MissingRequiredField,

    /// Declared skills that the manifest does not know
    InvalidSkillReferences,

    /// Body is empty after trimming
    MissingBody,

    /// The file could not be read or decoded
    Unreadable,
}

/// One reported validation issue tied to a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFinding {
    /// The document the finding applies to
    pub path: PathBuf,
    pub kind: FindingKind,
    /// Human-readable description
    pub message: String,
}

impl ValidationFinding {
    /// Create a finding for the document at `path`
    pub fn new(path: impl Into<PathBuf>, kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A document skipped by a batch operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadWarning {
    /// The skipped document
    pub path: PathBuf,
    /// Why it was skipped
    pub message: String,
}
