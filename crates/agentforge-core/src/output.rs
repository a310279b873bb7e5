//! Writing compiled agents to an output tree

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{AgentError, Result};

/// Output location of `agent_path`, mirroring its place under `agents_dir`
///
/// Agents outside `agents_dir` land directly in `output_dir` by file name.
pub fn output_path(agents_dir: &Path, output_dir: &Path, agent_path: &Path) -> PathBuf {
    match agent_path.strip_prefix(agents_dir) {
        Ok(relative) => output_dir.join(relative),
        Err(_) => output_dir.join(agent_path.file_name().unwrap_or(agent_path.as_os_str())),
    }
}

/// Write compiled text for `agent_path` and return where it went
pub fn write_compiled(
    agents_dir: &Path,
    output_dir: &Path,
    agent_path: &Path,
    content: &str,
) -> Result<PathBuf> {
    let target = output_path(agents_dir, output_dir, agent_path);

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| AgentError::io(parent, e))?;
    }
    fs::write(&target, content).map_err(|e| AgentError::io(&target, e))?;

    debug!("Wrote {:?}", target);
    Ok(target)
}
