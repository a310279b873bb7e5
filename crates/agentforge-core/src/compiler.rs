//! Flattening an agent and its base chain into one document
//!
//! The compiled text is, separated by blank lines:
//! 1. the agent's frontmatter re-wrapped in `---` lines, when it has one
//! 2. the agent's own trimmed body
//! 3. for every non-blank fragment, root first, a provenance marker
//!    followed by the fragment's trimmed body

use agentforge_types::{BaseFragment, CompiledAgent};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{AgentError, Result};
use crate::frontmatter;
use crate::resolver::{resolve_base_chain, FragmentLookup, FsFragments};

/// Marker line placed before each inherited fragment
pub fn provenance_marker(relative: &Path) -> String {
    format!("<!-- Inherited from {} -->", relative.display())
}

/// Join an agent's parts and its applied fragments into compiled text
pub fn render(frontmatter: &str, agent_body: &str, fragments: &[BaseFragment]) -> String {
    let mut parts = Vec::with_capacity(2 + fragments.len() * 2);

    if !frontmatter.is_empty() {
        parts.push(format!("---\n{frontmatter}\n---"));
    }
    parts.push(agent_body.trim().to_string());

    for fragment in fragments {
        parts.push(provenance_marker(&fragment.relative));
        parts.push(fragment.body.clone());
    }

    parts.join("\n\n")
}

/// Compiles agents against one inheritance root
#[derive(Debug, Clone)]
pub struct AgentCompiler<L = FsFragments> {
    root: PathBuf,
    lookup: L,
}

impl AgentCompiler {
    /// Compiler reading fragments from the filesystem under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_lookup(root, FsFragments)
    }
}

impl<L: FragmentLookup> AgentCompiler<L> {
    /// Compiler with a custom fragment lookup
    pub fn with_lookup(root: impl Into<PathBuf>, lookup: L) -> Self {
        Self {
            root: root.into(),
            lookup,
        }
    }

    /// The inheritance root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Base fragments applying to `agent_path`, root first
    pub fn resolve(&self, agent_path: &Path) -> Vec<PathBuf> {
        resolve_base_chain(agent_path, &self.root, &self.lookup)
    }

    /// Compile one agent with its full base chain
    pub fn compile(&self, agent_path: &Path) -> Result<CompiledAgent> {
        if !agent_path.exists() {
            return Err(AgentError::NotFound(agent_path.to_path_buf()));
        }

        let content = read(agent_path)?;
        let (frontmatter_text, body) = frontmatter::split(&content);
        let frontmatter = frontmatter::parse_lenient(agent_path, frontmatter_text)?;

        let mut fragments = Vec::new();
        for path in self.resolve(agent_path) {
            let text = read(&path)?;
            let (_, fragment_body) = frontmatter::split(&text);
            let fragment_body = fragment_body.trim();

            if fragment_body.is_empty() {
                debug!("Skipping blank fragment {:?}", path);
                continue;
            }

            let relative = path
                .strip_prefix(&self.root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.clone());

            fragments.push(BaseFragment {
                path,
                relative,
                body: fragment_body.to_string(),
            });
        }

        let compiled = render(frontmatter_text, body, &fragments);
        let total_lines = compiled.split('\n').count();
        debug!(
            "Compiled {:?} with {} fragments ({} lines)",
            agent_path,
            fragments.len(),
            total_lines
        );

        Ok(CompiledAgent {
            path: agent_path.to_path_buf(),
            frontmatter,
            agent_body: body.trim().to_string(),
            fragments,
            compiled,
            total_lines,
        })
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| AgentError::io(path, e))
}
