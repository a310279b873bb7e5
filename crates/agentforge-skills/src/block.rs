//! Locating the `skills:` block of an agent document
//!
//! This is a deliberately narrow text match, not YAML parsing. The block is a
//! literal `skills:` key, a newline, then one or more consecutive lines that
//! start with `- `. The first line breaking that shape ends the block, and
//! indented list items do not match at all. Auditing and fixing both go
//! through [`find_skills_block`] so they always agree on the span.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static SKILLS_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(skills:\s*\n)((?:- .+\n)+)").expect("skills block pattern is valid")
});

/// The matched `skills:` block of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillsBlock<'a> {
    /// Byte range of the whole block: key, whitespace and list lines
    pub span: Range<usize>,
    /// The key and the whitespace following it, e.g. `"skills:\n"`
    pub header: &'a str,
    /// Declared identifiers in order
    pub skills: Vec<String>,
}

/// Find the first `skills:` block in `content`
pub fn find_skills_block(content: &str) -> Option<SkillsBlock<'_>> {
    let caps = SKILLS_BLOCK.captures(content)?;
    let whole = caps.get(0)?;
    let header = caps.get(1)?.as_str();
    let list = caps.get(2)?.as_str();

    let skills = list
        .split('\n')
        .map(str::trim)
        .filter_map(|line| line.strip_prefix("- "))
        .map(|skill| skill.trim().to_string())
        .collect();

    Some(SkillsBlock {
        span: whole.range(),
        header,
        skills,
    })
}

/// Declared skill identifiers, empty when there is no block
pub fn extract_skills(content: &str) -> Vec<String> {
    find_skills_block(content)
        .map(|block| block.skills)
        .unwrap_or_default()
}

/// Whether a skill name follows the lowercase-with-separators convention
///
/// After removing `-`, `_`, `.` and `/` the name must be non-empty and
/// entirely alphanumeric.
pub fn is_conventional_name(name: &str) -> bool {
    let stripped: String = name
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | '.' | '/'))
        .collect();
    !stripped.is_empty() && stripped.chars().all(char::is_alphanumeric)
}
