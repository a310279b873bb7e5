//! Skills manifest loading
//!
//! The manifest nests skill entries in three optional sections:
//! - `universal`: a list
//! - `toolchains`: a mapping of toolchain name to list
//! - `examples`: a list
//!
//! Every entry is either a bare string or an object with a `name` key. All
//! sections are unioned into one flat [`SkillSet`].

use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Result, SkillError};

/// Directory holding the skills manifest, next to the agents repository
const SKILLS_REPO_DIR: &str = "claude-mpm-skills";
/// Manifest file name inside the skills repository
const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Default, Deserialize)]
struct ManifestSections {
    #[serde(default)]
    universal: Vec<ManifestEntry>,
    #[serde(default)]
    toolchains: BTreeMap<String, ToolchainEntries>,
    #[serde(default)]
    examples: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ManifestEntry {
    Bare(String),
    Named { name: String },
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ToolchainEntries {
    List(Vec<ManifestEntry>),
    Other(Value),
}

impl ManifestEntry {
    fn name(&self) -> Option<&str> {
        match self {
            ManifestEntry::Bare(name) | ManifestEntry::Named { name } => Some(name.as_str()),
            ManifestEntry::Other(_) => None,
        }
    }
}

impl ToolchainEntries {
    fn entries(&self) -> &[ManifestEntry] {
        match self {
            ToolchainEntries::List(list) => list,
            ToolchainEntries::Other(_) => &[],
        }
    }
}

/// Default manifest location: `<root>/../claude-mpm-skills/manifest.json`
pub fn default_manifest_path(root: &Path) -> PathBuf {
    root.join("..").join(SKILLS_REPO_DIR).join(MANIFEST_FILE)
}

/// Flat set of valid skill identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillSet {
    names: BTreeSet<String>,
}

impl SkillSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set from identifiers, dropping empty ones
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| !name.is_empty())
            .collect();
        Self { names }
    }

    /// Parse a manifest document
    ///
    /// Sections are read from the top-level `skills` object when there is
    /// one, otherwise from the top level itself.
    pub fn from_manifest_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;

        if !value.is_object() {
            return Err(SkillError::InvalidManifest(
                "top level must be an object".to_string(),
            ));
        }

        let nested = value.get("skills").is_some_and(Value::is_object);
        let sections = if nested { value["skills"].clone() } else { value };
        let sections: ManifestSections = serde_json::from_value(sections)?;

        let toolchain_entries = sections
            .toolchains
            .values()
            .flat_map(ToolchainEntries::entries);

        let names = sections
            .universal
            .iter()
            .chain(toolchain_entries)
            .chain(sections.examples.iter())
            .filter_map(ManifestEntry::name)
            .map(str::to_string);

        Ok(Self::from_names(names))
    }

    /// Load a manifest file, failing if it is missing or malformed
    pub fn from_manifest_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SkillError::ManifestNotFound(path.to_path_buf()));
        }

        let json = fs::read_to_string(path).map_err(|source| SkillError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let set = Self::from_manifest_str(&json)?;
        info!("Loaded {} skills from {:?}", set.len(), path);
        Ok(set)
    }

    /// Load a manifest file, degrading to an empty set on any failure
    ///
    /// An empty set disables skill-reference checks downstream.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::from_manifest_file(path) {
            Ok(set) => set,
            Err(SkillError::ManifestNotFound(_)) => {
                debug!("No skills manifest at {:?}, skill checks disabled", path);
                Self::new()
            }
            Err(e) => {
                warn!("Ignoring unreadable skills manifest: {}", e);
                Self::new()
            }
        }
    }

    /// Case-sensitive membership test
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of identifiers
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Identifiers in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Split declared skills into (valid, invalid), keeping declaration order
    pub fn partition(&self, skills: &[String]) -> (Vec<String>, Vec<String>) {
        skills.iter().cloned().partition(|s| self.contains(s))
    }
}
