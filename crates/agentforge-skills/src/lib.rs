//! AgentForge Skills
//!
//! Skill identifiers are opaque strings. This crate knows where they come
//! from and where they are declared, never what they mean:
//!
//! - The skills manifest (JSON) is flattened into a [`SkillSet`]
//! - The `skills:` block of an agent document is located by one shared
//!   pattern, used both for auditing and for rewriting
//! - [`fix_skills`] drops undeclared identifiers from that block in place

#![warn(missing_docs)]

pub mod block;
pub mod error;
pub mod fix;
pub mod manifest;

pub use block::{extract_skills, find_skills_block, is_conventional_name, SkillsBlock};
pub use error::SkillError;
pub use fix::{fix_file, fix_skills, SkillFix};
pub use manifest::{default_manifest_path, SkillSet};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{extract_skills, fix_skills, SkillError, SkillSet};
}
