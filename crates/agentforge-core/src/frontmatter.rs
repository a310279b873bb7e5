//! Frontmatter splitting and parsing
//!
//! A frontmatter block opens with a `---` line at byte offset 0 and closes at
//! the first following `---` line. Anything else is a document without
//! frontmatter, which is valid for base fragments.

use serde_yaml::{Mapping, Value};
use std::path::Path;
use tracing::debug;

use crate::error::{AgentError, Result};

const OPENING: &str = "---\n";
const CLOSING: &str = "\n---\n";

/// Split `text` into its frontmatter block and body
///
/// Returns `("", text)` when the text does not start with a frontmatter
/// block. The block excludes both delimiter lines.
pub fn split(text: &str) -> (&str, &str) {
    let Some(rest) = text.strip_prefix(OPENING) else {
        return ("", text);
    };

    match rest.find(CLOSING) {
        Some(end) => (&rest[..end], &rest[end + CLOSING.len()..]),
        None => ("", text),
    }
}

/// Parse a frontmatter block that must be a YAML mapping
pub fn parse(path: &Path, block: &str) -> Result<Mapping> {
    match parse_value(path, block)? {
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(AgentError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// Parse a frontmatter block, treating absent or non-mapping YAML as empty
///
/// Invalid YAML is still an error.
pub fn parse_lenient(path: &Path, block: &str) -> Result<Mapping> {
    if block.is_empty() {
        return Ok(Mapping::new());
    }

    match parse_value(path, block)? {
        Value::Mapping(mapping) => Ok(mapping),
        _ => {
            debug!("Frontmatter of {:?} is not a mapping, using empty", path);
            Ok(Mapping::new())
        }
    }
}

fn parse_value(path: &Path, block: &str) -> Result<Value> {
    serde_yaml::from_str(block).map_err(|source| AgentError::InvalidYaml {
        path: path.to_path_buf(),
        source,
    })
}
