//! Tree-wide skill auditing and fixing

use agentforge_skills::{
    extract_skills, fix_file, is_conventional_name, SkillError, SkillFix, SkillSet,
};
use agentforge_types::LoadWarning;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::Result;
use crate::loader::agent_files;

/// Skill references of one agent that declares unknown skills
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillAudit {
    /// The agent document
    pub path: PathBuf,
    /// Declared skills found in the manifest, in declaration order
    pub valid: Vec<String>,
    /// Declared skills missing from the manifest, in declaration order
    pub invalid: Vec<String>,
}

/// A declared skill whose name breaks the naming convention
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamingViolation {
    /// The agent document declaring the skill
    pub path: PathBuf,
    /// The offending skill name
    pub skill: String,
}

/// Result of auditing every agent under a root
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditReport {
    /// Agents with at least one unknown skill, sorted by path
    pub agents: Vec<SkillAudit>,
    /// Declared skill names outside the naming convention
    pub naming: Vec<NamingViolation>,
    /// Agents that declared at least one skill
    pub agents_with_skills: usize,
    /// Skill declarations across all agents
    pub skills_declared: usize,
    /// Agents that could not be read
    pub warnings: Vec<LoadWarning>,
}

impl AuditReport {
    /// Total number of unknown skill references
    pub fn invalid_references(&self) -> usize {
        self.agents.iter().map(|a| a.invalid.len()).sum()
    }
}

/// Audit the declared skills of every agent under `root`
pub fn audit_tree(root: &Path, skills: &SkillSet) -> Result<AuditReport> {
    let mut report = AuditReport::default();

    for path in agent_files(root)? {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping {:?}: {}", path, e);
                report.warnings.push(LoadWarning {
                    path,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let declared = extract_skills(&content);
        if declared.is_empty() {
            continue;
        }
        report.agents_with_skills += 1;
        report.skills_declared += declared.len();

        for skill in declared.iter().filter(|s| !is_conventional_name(s)) {
            report.naming.push(NamingViolation {
                path: path.clone(),
                skill: skill.clone(),
            });
        }

        let (valid, invalid) = skills.partition(&declared);
        if !invalid.is_empty() {
            report.agents.push(SkillAudit {
                path,
                valid,
                invalid,
            });
        }
    }

    report.agents.sort_by(|a, b| a.path.cmp(&b.path));
    info!(
        "Audited {} agents with skills, {} invalid references",
        report.agents_with_skills,
        report.invalid_references()
    );
    Ok(report)
}

/// Outcome of fixing one file during [`fix_tree`]
#[derive(Debug)]
pub struct FileFix {
    /// The agent document
    pub path: PathBuf,
    /// The applied fix, or why the file could not be fixed
    pub outcome: std::result::Result<SkillFix, SkillError>,
}

/// Remove unknown skills from every agent under `root`
///
/// Only files that changed or failed are reported, in path order.
pub fn fix_tree(root: &Path, skills: &SkillSet) -> Result<Vec<FileFix>> {
    let mut files = agent_files(root)?;
    files.sort();

    let mut fixes = Vec::new();
    for path in files {
        let outcome = fix_file(&path, skills);
        match &outcome {
            Ok(fix) if !fix.changed => continue,
            Ok(fix) => info!("Fixed {:?}: {}", path, fix.message),
            Err(e) => warn!("Could not fix {:?}: {}", path, e),
        }
        fixes.push(FileFix { path, outcome });
    }

    Ok(fixes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let write = |rel: &str, content: &str| {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        };
        write("ops/ops.md", "---\nname: Ops\nskills:\n- git\n- kubernetes\n---\nBody\n");
        write("qa/qa.md", "---\nname: QA\nskills:\n- docker\n---\nBody\n");
        write("eng/eng.md", "---\nname: Eng\nskills:\n- Bad Name\n---\nBody\n");
        write("none.md", "---\nname: None\n---\nBody\n");
        dir
    }

    fn valid() -> SkillSet {
        SkillSet::from_names(["git", "docker"])
    }

    #[test]
    fn test_audit_tree() {
        let dir = tree();
        let report = audit_tree(dir.path(), &valid()).unwrap();

        assert_eq!(report.agents_with_skills, 3);
        assert_eq!(report.skills_declared, 4);
        assert_eq!(report.invalid_references(), 2);

        let paths: Vec<_> = report
            .agents
            .iter()
            .map(|a| a.path.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(paths, vec![PathBuf::from("eng/eng.md"), PathBuf::from("ops/ops.md")]);
        assert_eq!(report.agents[1].valid, vec!["git"]);
        assert_eq!(report.agents[1].invalid, vec!["kubernetes"]);

        assert_eq!(report.naming.len(), 1);
        assert_eq!(report.naming[0].skill, "Bad Name");
    }

    #[test]
    fn test_fix_tree_then_clean_audit() {
        let dir = tree();
        let fixes = fix_tree(dir.path(), &valid()).unwrap();
        assert_eq!(fixes.len(), 2);
        assert!(fixes.iter().all(|f| f.outcome.is_ok()));

        let ops = fs::read_to_string(dir.path().join("ops/ops.md")).unwrap();
        assert_eq!(ops, "---\nname: Ops\nskills:\n- git\n---\nBody\n");
        let eng = fs::read_to_string(dir.path().join("eng/eng.md")).unwrap();
        assert_eq!(eng, "---\nname: Eng\n---\nBody\n");

        assert!(fix_tree(dir.path(), &valid()).unwrap().is_empty());
        assert!(audit_tree(dir.path(), &valid()).unwrap().agents.is_empty());
    }

    #[test]
    fn test_audit_records_unreadable_agent() {
        let dir = tree();
        let binary = dir.path().join("binary.md");
        fs::write(&binary, [0xff, 0xfe, 0x00]).unwrap();

        let report = audit_tree(dir.path(), &valid()).unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].path, binary);
        assert_eq!(report.agents_with_skills, 3);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["warnings"].as_array().map(Vec::len), Some(1));
    }
}
