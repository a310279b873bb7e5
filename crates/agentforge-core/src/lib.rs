//! AgentForge Core
//!
//! Builds and validates agent documents: markdown files with YAML
//! frontmatter that inherit shared guidance from `BASE-AGENT.md` fragments.
//!
//! ## Pipeline
//!
//! - [`loader`] enumerates agent documents below an agents directory
//! - [`frontmatter`] splits and parses each document
//! - [`resolver`] finds the base fragments between the agent and the root
//! - [`compiler`] flattens agent and fragments into one document
//! - [`validator`] and [`audit`] report missing fields and unknown skills

pub mod audit;
pub mod compiler;
pub mod error;
pub mod frontmatter;
pub mod loader;
pub mod output;
pub mod resolver;
pub mod validator;

pub use audit::{audit_tree, fix_tree, AuditReport, FileFix, NamingViolation, SkillAudit};
pub use compiler::AgentCompiler;
pub use error::AgentError;
pub use loader::{agent_files, load_agent, AgentLoader};
pub use output::write_compiled;
pub use resolver::{resolve_base_chain, FragmentLookup, FsFragments};
pub use validator::Validator;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{AgentCompiler, AgentError, AgentLoader, Validator};
    pub use agentforge_skills::SkillSet;
    pub use agentforge_types::{AgentDocument, CompiledAgent, ValidationFinding};
}
