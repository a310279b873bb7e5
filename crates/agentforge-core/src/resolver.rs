//! Base-agent chain resolution
//!
//! An agent inherits every `BASE-AGENT.md` found between its own directory
//! and the inheritance root, both inclusive. The chain is ordered root
//! first so the most general guidance comes before the most specific.

use agentforge_types::BASE_AGENT_FILE;
use std::path::{Path, PathBuf};

/// Answers whether a directory holds a base fragment
pub trait FragmentLookup {
    /// True when `dir` directly contains a base fragment file
    fn has_fragment(&self, dir: &Path) -> bool;
}

/// [`FragmentLookup`] backed by the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFragments;

impl FragmentLookup for FsFragments {
    fn has_fragment(&self, dir: &Path) -> bool {
        dir.join(BASE_AGENT_FILE).is_file()
    }
}

/// Base fragment paths applying to `agent_path`, root first
///
/// Walks from the agent's parent directory upwards while the directory is
/// `root` or below it. Directories without a fragment are skipped.
pub fn resolve_base_chain(
    agent_path: &Path,
    root: &Path,
    lookup: &impl FragmentLookup,
) -> Vec<PathBuf> {
    let mut chain = Vec::new();
    let mut current = agent_path.parent();

    while let Some(dir) = current {
        if !dir.starts_with(root) {
            break;
        }
        if lookup.has_fragment(dir) {
            chain.push(dir.join(BASE_AGENT_FILE));
        }
        current = dir.parent();
    }

    chain.reverse();
    chain
}
