//! Removing unknown skill references from agent documents

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::block::find_skills_block;
use crate::error::{Result, SkillError};
use crate::manifest::SkillSet;

/// Outcome of fixing one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillFix {
    /// Whether `content` differs from the input
    pub changed: bool,
    /// Human-readable summary
    pub message: String,
    /// Skills left in the block, in declaration order
    pub kept: Vec<String>,
    /// Skills dropped from the block, in declaration order
    pub removed: Vec<String>,
    /// The document text after the fix
    pub content: String,
}

impl SkillFix {
    fn unchanged(content: &str, message: &str, kept: Vec<String>) -> Self {
        Self {
            changed: false,
            message: message.to_string(),
            kept,
            removed: Vec::new(),
            content: content.to_string(),
        }
    }
}

/// Rewrite the `skills:` block so it only names skills in `valid`
///
/// Only the matched block is replaced; every other byte of `content` is kept.
/// When no valid skill remains the whole block, key included, is removed.
pub fn fix_skills(content: &str, valid: &SkillSet) -> SkillFix {
    let Some(block) = find_skills_block(content) else {
        return SkillFix::unchanged(content, "No skills found", Vec::new());
    };

    let (kept, removed) = valid.partition(&block.skills);
    if removed.is_empty() {
        return SkillFix::unchanged(content, "No invalid skills", kept);
    }

    let mut replacement = String::new();
    if !kept.is_empty() {
        replacement.push_str(block.header);
        for skill in &kept {
            replacement.push_str("- ");
            replacement.push_str(skill);
            replacement.push('\n');
        }
    }

    let mut fixed = String::with_capacity(content.len());
    fixed.push_str(&content[..block.span.start]);
    fixed.push_str(&replacement);
    fixed.push_str(&content[block.span.end..]);

    SkillFix {
        changed: true,
        message: format!(
            "Removed {} invalid skills: {}",
            removed.len(),
            removed.join(", ")
        ),
        kept,
        removed,
        content: fixed,
    }
}

/// Fix a document on disk, writing it back in one piece when it changed
pub fn fix_file(path: &Path, valid: &SkillSet) -> Result<SkillFix> {
    let content = fs::read_to_string(path).map_err(|source| SkillError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let fix = fix_skills(&content, valid);
    if fix.changed {
        fs::write(path, &fix.content).map_err(|source| SkillError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Rewrote skills block of {:?}", path);
    }

    Ok(fix)
}
