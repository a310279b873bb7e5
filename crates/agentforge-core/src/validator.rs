//! Frontmatter and skill-reference validation

use agentforge_skills::{extract_skills, SkillSet};
use agentforge_types::{FindingKind, ValidationFinding, REQUIRED_FIELDS};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::frontmatter;
use crate::loader::agent_files;

/// Checks agent documents against the required fields and a skill set
///
/// An empty skill set disables the skill-reference check.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    skills: SkillSet,
}

impl Validator {
    /// Validator checking skill references against `skills`
    pub fn new(skills: SkillSet) -> Self {
        Self { skills }
    }

    /// The valid skill identifiers in use
    pub fn skills(&self) -> &SkillSet {
        &self.skills
    }

    /// Validate one document on disk
    pub fn validate(&self, path: &Path) -> Vec<ValidationFinding> {
        match fs::read_to_string(path) {
            Ok(content) => self.validate_content(path, &content),
            Err(e) => vec![ValidationFinding::new(
                path,
                FindingKind::Unreadable,
                format!("Error reading file: {e}"),
            )],
        }
    }

    /// Validate document text attributed to `path`
    pub fn validate_content(&self, path: &Path, content: &str) -> Vec<ValidationFinding> {
        let mut findings = Vec::new();
        let (block, body) = frontmatter::split(content);

        if block.is_empty() {
            findings.push(ValidationFinding::new(
                path,
                FindingKind::MissingFrontmatter,
                "Missing YAML frontmatter",
            ));
        } else {
            // Key presence is a plain text test on the raw block
            for field in REQUIRED_FIELDS {
                if !block.contains(&format!("{field}:")) {
                    findings.push(ValidationFinding::new(
                        path,
                        FindingKind::MissingRequiredField,
                        format!("Missing required field: {field}"),
                    ));
                }
            }

            if !self.skills.is_empty() {
                let invalid: Vec<String> = extract_skills(content)
                    .into_iter()
                    .filter(|skill| !self.skills.contains(skill))
                    .collect();

                if !invalid.is_empty() {
                    findings.push(ValidationFinding::new(
                        path,
                        FindingKind::InvalidSkillReferences,
                        format!(
                            "Invalid skill references (not in skills manifest): {}",
                            invalid.join(", ")
                        ),
                    ));
                }
            }
        }

        if body.trim().is_empty() {
            findings.push(ValidationFinding::new(
                path,
                FindingKind::MissingBody,
                "Missing agent body content",
            ));
        }

        findings
    }

    /// Validate every agent under `root`, keeping only documents with findings
    pub fn validate_all(&self, root: &Path) -> Result<BTreeMap<PathBuf, Vec<ValidationFinding>>> {
        let mut results = BTreeMap::new();

        for path in agent_files(root)? {
            let findings = self.validate(&path);
            if !findings.is_empty() {
                results.insert(path, findings);
            }
        }

        info!("Validation found issues in {} agents", results.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VALID: &str = "---\nname: Ops\ndescription: Deploys things\nagent_id: ops\nagent_type: ops\nskills:\n- git\n- kubernetes\n---\n\n# Ops\n";

    fn kinds(findings: &[ValidationFinding]) -> Vec<FindingKind> {
        findings.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn test_complete_document_has_no_findings() {
        let validator = Validator::default();
        assert!(validator.validate_content(Path::new("ops.md"), VALID).is_empty());
    }

    #[test]
    fn test_each_missing_field_reported_once() {
        let validator = Validator::default();
        for field in REQUIRED_FIELDS {
            let content = VALID
                .lines()
                .filter(|line| !line.starts_with(&format!("{field}:")))
                .collect::<Vec<_>>()
                .join("\n");

            let findings = validator.validate_content(Path::new("ops.md"), &content);
            assert_eq!(findings.len(), 1, "{field}");
            assert_eq!(findings[0].message, format!("Missing required field: {field}"));
        }
    }

    #[test]
    fn test_field_name_as_value_counts_as_present() {
        let content = "---\ndescription: has name: inside\nagent_id: a\nagent_type: t\n---\nBody\n";
        let findings = Validator::default().validate_content(Path::new("a.md"), content);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_invalid_skill_reference() {
        let validator = Validator::new(SkillSet::from_names(["git", "docker"]));
        let findings = validator.validate_content(Path::new("ops.md"), VALID);

        assert_eq!(kinds(&findings), vec![FindingKind::InvalidSkillReferences]);
        assert_eq!(
            findings[0].message,
            "Invalid skill references (not in skills manifest): kubernetes"
        );
    }

    #[test]
    fn test_empty_skill_set_disables_check() {
        let validator = Validator::new(SkillSet::new());
        assert!(validator.validate_content(Path::new("ops.md"), VALID).is_empty());
    }

    #[test]
    fn test_missing_frontmatter_and_body() {
        let findings = Validator::default().validate_content(Path::new("a.md"), "  \n");
        assert_eq!(
            kinds(&findings),
            vec![FindingKind::MissingFrontmatter, FindingKind::MissingBody]
        );
    }

    #[test]
    fn test_skills_not_checked_without_frontmatter() {
        let validator = Validator::new(SkillSet::from_names(["git"]));
        let findings = validator.validate_content(Path::new("a.md"), "skills:\n- nope\n");
        assert_eq!(kinds(&findings), vec![FindingKind::MissingFrontmatter]);
    }

    #[test]
    fn test_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.md");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let findings = Validator::default().validate(&path);
        assert_eq!(kinds(&findings), vec![FindingKind::Unreadable]);
        assert!(findings[0].message.starts_with("Error reading file:"));
    }

    #[test]
    fn test_validate_all_keeps_only_failures() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("good.md"), VALID).unwrap();
        fs::write(dir.path().join("bad.md"), "no frontmatter\n").unwrap();
        fs::write(dir.path().join("BASE-AGENT.md"), "").unwrap();

        let results = Validator::default().validate_all(dir.path()).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results.contains_key(&dir.path().join("bad.md")));
    }
}
