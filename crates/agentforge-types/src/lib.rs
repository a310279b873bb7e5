//! AgentForge Types - Core types shared by the agentforge crates
//!
//! This module defines the documents, compiled artifacts and findings that
//! flow between the loader, the compiler and the validator.

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

pub mod finding;

pub use finding::{FindingKind, LoadWarning, ValidationFinding};

/// Reserved file name of an inheritable base fragment
pub const BASE_AGENT_FILE: &str = "BASE-AGENT.md";

/// Extension of agent documents
pub const AGENT_EXTENSION: &str = "md";

/// Frontmatter keys every agent document must declare
pub const REQUIRED_FIELDS: [&str; 4] = ["name", "description", "agent_id", "agent_type"];

/// An agent document parsed from markdown with YAML frontmatter
#[derive(Debug, Clone, Serialize)]
pub struct AgentDocument {
    /// Location of the document
    pub path: PathBuf,
    /// Scalar frontmatter fields, empty when absent
    pub name: String,
    pub description: String,
    pub agent_id: String,
    pub agent_type: String,
    pub version: String,
    /// List frontmatter fields, empty when absent or not a list
    pub skills: Vec<String>,
    pub tags: Vec<String>,
    pub knowledge: Vec<String>,
    pub interactions: Mapping,
    /// Body text with surrounding whitespace trimmed
    pub body: String,
    /// The full frontmatter mapping as parsed
    pub frontmatter: Mapping,
}

impl AgentDocument {
    /// Build a document from an already parsed frontmatter mapping
    ///
    /// Missing or oddly typed convenience fields fall back to empty values;
    /// the raw mapping is always kept intact in `frontmatter`.
    pub fn from_frontmatter(path: impl Into<PathBuf>, frontmatter: Mapping, body: &str) -> Self {
        Self {
            path: path.into(),
            name: scalar_field(&frontmatter, "name"),
            description: scalar_field(&frontmatter, "description"),
            agent_id: scalar_field(&frontmatter, "agent_id"),
            agent_type: scalar_field(&frontmatter, "agent_type"),
            version: scalar_field(&frontmatter, "version"),
            skills: list_field(&frontmatter, "skills"),
            tags: list_field(&frontmatter, "tags"),
            knowledge: list_field(&frontmatter, "knowledge"),
            interactions: match frontmatter.get("interactions") {
                Some(Value::Mapping(m)) => m.clone(),
                _ => Mapping::new(),
            },
            body: body.trim().to_string(),
            frontmatter,
        }
    }
}

/// A base fragment whose body was applied to a compiled agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseFragment {
    /// Location of the fragment file
    pub path: PathBuf,
    /// Path relative to the inheritance root, e.g. `engineer/BASE-AGENT.md`
    pub relative: PathBuf,
    /// Fragment body with its frontmatter removed and whitespace trimmed
    pub body: String,
}

/// An agent merged with its full chain of base fragments
#[derive(Debug, Clone, Serialize)]
pub struct CompiledAgent {
    /// Location of the agent document
    pub path: PathBuf,
    /// The agent's own frontmatter, empty when it has none
    pub frontmatter: Mapping,
    /// The agent's own body, trimmed
    pub agent_body: String,
    /// Applied fragments, root first
    pub fragments: Vec<BaseFragment>,
    /// The flattened document text
    pub compiled: String,
    /// Line count of `compiled`
    pub total_lines: usize,
}

impl CompiledAgent {
    /// Agent ID from frontmatter, or the file stem when none is declared
    pub fn agent_id(&self) -> String {
        match self.frontmatter.get("agent_id").and_then(scalar_to_string) {
            Some(id) => id,
            None => file_stem(&self.path),
        }
    }

    /// Agent type from frontmatter, empty when absent
    pub fn agent_type(&self) -> String {
        scalar_field(&self.frontmatter, "agent_type")
    }

    /// Relative paths of the applied fragments in inheritance order
    pub fn inheritance_chain(&self) -> Vec<String> {
        self.fragments
            .iter()
            .map(|f| f.relative.to_string_lossy().into_owned())
            .collect()
    }

    /// Whether the compiled text matches `pattern` (case-insensitive, multi-line)
    pub fn has_instruction(&self, pattern: &str) -> Result<bool, regex::Error> {
        let re = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .multi_line(true)
            .build()?;
        Ok(re.is_match(&self.compiled))
    }

    /// Text under a `## header` heading, up to the next `##` line
    pub fn section(&self, header: &str) -> Option<String> {
        let heading = Regex::new(&format!(r"(?m)^##\s+{}\s*\n", regex::escape(header))).ok()?;
        let start = heading.find(&self.compiled)?.end();

        let rest = &self.compiled[start..];
        let mut end = rest.len();
        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.starts_with("##") {
                end = offset;
                break;
            }
            offset += line.len();
        }

        Some(rest[..end].trim().to_string())
    }
}

/// Result of a batch operation that skips failing documents
#[derive(Debug, Clone, Default)]
pub struct Batch<T> {
    /// Results for the documents that succeeded
    pub items: T,
    /// One entry per skipped document
    pub warnings: Vec<LoadWarning>,
}

/// Render a YAML scalar as text; sequences, mappings and null yield `None`
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn scalar_field(mapping: &Mapping, key: &str) -> String {
    mapping
        .get(key)
        .and_then(scalar_to_string)
        .unwrap_or_default()
}

fn list_field(mapping: &Mapping, key: &str) -> Vec<String> {
    match mapping.get(key) {
        Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
        _ => Vec::new(),
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn compiled(frontmatter: &str, text: &str) -> CompiledAgent {
        CompiledAgent {
            path: PathBuf::from("agents/engineer/rust-engineer.md"),
            frontmatter: mapping(frontmatter),
            agent_body: String::new(),
            fragments: vec![
                BaseFragment {
                    path: PathBuf::from("agents/BASE-AGENT.md"),
                    relative: PathBuf::from("BASE-AGENT.md"),
                    body: "root".into(),
                },
                BaseFragment {
                    path: PathBuf::from("agents/engineer/BASE-AGENT.md"),
                    relative: PathBuf::from("engineer/BASE-AGENT.md"),
                    body: "engineer".into(),
                },
            ],
            compiled: text.to_string(),
            total_lines: text.split('\n').count(),
        }
    }

    #[test]
    fn test_document_derived_fields() {
        let fm = mapping(
            "name: Rust Engineer\ndescription: Writes Rust\nagent_id: rust-engineer\n\
             agent_type: engineer\nversion: 1.2\nskills:\n- git\n- docker\n\
             tags: [rust]\ninteractions:\n  handoff: qa\n",
        );
        let doc = AgentDocument::from_frontmatter("a.md", fm, "\n  body text \n");

        assert_eq!(doc.name, "Rust Engineer");
        assert_eq!(doc.agent_id, "rust-engineer");
        assert_eq!(doc.version, "1.2");
        assert_eq!(doc.skills, vec!["git", "docker"]);
        assert_eq!(doc.tags, vec!["rust"]);
        assert!(doc.knowledge.is_empty());
        assert_eq!(doc.interactions.len(), 1);
        assert_eq!(doc.body, "body text");
    }

    #[test]
    fn test_document_defaults_for_missing_fields() {
        let doc = AgentDocument::from_frontmatter("a.md", mapping("name: x\nskills: null"), "");
        assert_eq!(doc.description, "");
        assert_eq!(doc.agent_type, "");
        assert!(doc.skills.is_empty());
        assert!(doc.interactions.is_empty());
    }

    #[test]
    fn test_agent_id_falls_back_to_stem() {
        let agent = compiled("name: x", "");
        assert_eq!(agent.agent_id(), "rust-engineer");

        let agent = compiled("agent_id: custom", "");
        assert_eq!(agent.agent_id(), "custom");
    }

    #[test]
    fn test_inheritance_chain_order() {
        let agent = compiled("name: x", "");
        assert_eq!(
            agent.inheritance_chain(),
            vec!["BASE-AGENT.md", "engineer/BASE-AGENT.md"]
        );
    }

    #[test]
    fn test_has_instruction_is_case_insensitive() {
        let agent = compiled("name: x", "## Git Workflow\nUse feat: commits");
        assert!(agent.has_instruction("git workflow").unwrap());
        assert!(agent.has_instruction(r"^use (feat|fix)").unwrap());
        assert!(!agent.has_instruction("rollback").unwrap());
        assert!(agent.has_instruction("(unclosed").is_err());
    }

    #[test]
    fn test_section_extraction() {
        let text = "# Agent\n\n## Output Format\n\nUse tables.\n\n## Handoff\nTo QA.\n";
        let agent = compiled("name: x", text);

        assert_eq!(agent.section("Output Format").as_deref(), Some("Use tables."));
        assert_eq!(agent.section("Handoff").as_deref(), Some("To QA."));
        assert_eq!(agent.section("Missing"), None);
    }

    #[test]
    fn test_section_stops_at_subheading() {
        let agent = compiled("name: x", "## Quality\nfirst\n### Detail\nsecond\n");
        assert_eq!(agent.section("Quality").as_deref(), Some("first"));
    }
}
