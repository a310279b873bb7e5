//! Discovering and loading every agent document under a directory
//!
//! Batch operations never abort on a single bad document: the failure is
//! logged, recorded as a [`LoadWarning`] and the walk continues.

use agentforge_types::{
    AgentDocument, Batch, CompiledAgent, LoadWarning, AGENT_EXTENSION, BASE_AGENT_FILE,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::compiler::AgentCompiler;
use crate::error::{AgentError, Result};
use crate::frontmatter;

/// Whether `path` names an agent document rather than a base fragment
pub fn is_agent_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name != BASE_AGENT_FILE && name.ends_with(&format!(".{AGENT_EXTENSION}"))
}

/// All agent document paths below `root`, in file-name order per directory
///
/// Symlinks are followed; a link loop is logged and skipped like any other
/// unreadable entry.
pub fn agent_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(AgentError::RootNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {:?}: {}", root, e);
                continue;
            }
        };

        if entry.file_type().is_file() && is_agent_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    debug!("Found {} agent files under {:?}", files.len(), root);
    Ok(files)
}

/// Parse one agent document, requiring a frontmatter mapping
pub fn load_agent(path: &Path) -> Result<AgentDocument> {
    let content = fs::read_to_string(path).map_err(|e| AgentError::io(path, e))?;
    let (block, body) = frontmatter::split(&content);

    if block.is_empty() {
        return Err(AgentError::MissingFrontmatter {
            path: path.to_path_buf(),
        });
    }

    let mapping = frontmatter::parse(path, block)?;
    Ok(AgentDocument::from_frontmatter(path, mapping, body))
}

/// Loads and compiles the agents below one inheritance root
#[derive(Debug, Clone)]
pub struct AgentLoader {
    compiler: AgentCompiler,
}

impl AgentLoader {
    /// Loader for the agents directory `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            compiler: AgentCompiler::new(root),
        }
    }

    /// The agents directory
    pub fn root(&self) -> &Path {
        self.compiler.root()
    }

    /// The compiler used for this root
    pub fn compiler(&self) -> &AgentCompiler {
        &self.compiler
    }

    /// Parse every agent document, skipping the ones that fail
    pub fn load_all(&self) -> Result<Batch<Vec<AgentDocument>>> {
        let batch = self.each(load_agent)?;
        info!(
            "Loaded {} agents ({} skipped)",
            batch.items.len(),
            batch.warnings.len()
        );
        Ok(batch)
    }

    /// Parsed agents whose `agent_type` equals `agent_type`
    pub fn agents_by_type(&self, agent_type: &str) -> Result<Batch<Vec<AgentDocument>>> {
        let mut batch = self.load_all()?;
        batch.items.retain(|agent| agent.agent_type == agent_type);
        Ok(batch)
    }

    /// Compile every agent document, in enumeration order
    pub fn compile_each(&self) -> Result<Batch<Vec<CompiledAgent>>> {
        self.each(|path| self.compiler.compile(path))
    }

    /// Compile every agent, keyed by agent ID
    ///
    /// The key is the frontmatter `agent_id`, or the file stem when absent.
    /// When two agents share a key the one enumerated later wins.
    pub fn compile_all(&self) -> Result<Batch<BTreeMap<String, CompiledAgent>>> {
        let Batch { items, warnings } = self.compile_each()?;

        let mut compiled = BTreeMap::new();
        for agent in items {
            let id = agent.agent_id();
            if let Some(previous) = compiled.insert(id.clone(), agent) {
                debug!("Agent ID '{}' from {:?} replaced", id, previous.path);
            }
        }

        Ok(Batch {
            items: compiled,
            warnings,
        })
    }

    fn each<T>(&self, mut op: impl FnMut(&Path) -> Result<T>) -> Result<Batch<Vec<T>>> {
        let mut batch = Batch {
            items: Vec::new(),
            warnings: Vec::new(),
        };

        for path in agent_files(self.root())? {
            match op(&path) {
                Ok(item) => batch.items.push(item),
                Err(e) => {
                    warn!("Skipping {:?}: {}", path, e);
                    batch.warnings.push(LoadWarning {
                        path,
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_is_agent_file() {
        assert!(is_agent_file(Path::new("agents/qa/qa.md")));
        assert!(!is_agent_file(Path::new("agents/qa/BASE-AGENT.md")));
        assert!(is_agent_file(Path::new("agents/qa/base-agent.md")));
        assert!(!is_agent_file(Path::new("agents/qa/notes.txt")));
    }

    #[test]
    fn test_agent_files_excludes_fragments() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "BASE-AGENT.md", "root");
        write(dir.path(), "qa/BASE-AGENT.md", "qa");
        write(dir.path(), "qa/web-qa.md", "---\nname: x\n---\n");
        write(dir.path(), "ops/ops.md", "---\nname: y\n---\n");
        write(dir.path(), "ops/readme.txt", "");

        let files = agent_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![PathBuf::from("ops/ops.md"), PathBuf::from("qa/web-qa.md")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_agent_files_follows_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let shared = tempfile::tempdir().unwrap();
        write(shared.path(), "qa/qa.md", "---\nname: qa\n---\n");
        write(dir.path(), "ops/ops.md", "---\nname: ops\n---\n");
        std::os::unix::fs::symlink(shared.path().join("qa"), dir.path().join("qa")).unwrap();
        std::os::unix::fs::symlink(
            shared.path().join("qa/qa.md"),
            dir.path().join("ops/linked.md"),
        )
        .unwrap();

        let files = agent_files(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![
                dir.path().join("ops/linked.md"),
                dir.path().join("ops/ops.md"),
                dir.path().join("qa/qa.md"),
            ]
        );
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = agent_files(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, AgentError::RootNotFound(_)));
    }

    #[test]
    fn test_load_agent_requires_frontmatter() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "plain.md", "# No frontmatter\n");
        let err = load_agent(&dir.path().join("plain.md")).unwrap_err();
        assert!(matches!(err, AgentError::MissingFrontmatter { .. }));
    }

    #[test]
    fn test_agents_by_type() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "---\nagent_type: qa\n---\nA\n");
        write(dir.path(), "b.md", "---\nagent_type: ops\n---\nB\n");

        let qa = AgentLoader::new(dir.path()).agents_by_type("qa").unwrap();
        assert_eq!(qa.items.len(), 1);
        assert_eq!(qa.items[0].body, "A");
    }

    #[test]
    fn test_compile_all_key_collision_keeps_later() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a/agent.md", "---\nagent_id: dup\n---\nfirst\n");
        write(dir.path(), "b/agent.md", "---\nagent_id: dup\n---\nsecond\n");
        write(dir.path(), "c/solo.md", "no frontmatter\n");

        let batch = AgentLoader::new(dir.path()).compile_all().unwrap();
        let ids: Vec<&str> = batch.items.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["dup", "solo"]);
        assert_eq!(batch.items["dup"].agent_body, "second");
        assert!(batch.warnings.is_empty());
    }
}
