//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Build, validate and audit agent documents
#[derive(Parser, Debug)]
#[command(name = "agentforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root; the agents directory and output paths resolve against it
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Extra configuration file, layered above the global and local ones
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Compile agents with their BASE-AGENT.md chain
    ///
    /// Examples:
    ///   agentforge build agents/engineer/backend/python-engineer.md
    ///   agentforge build agents/qa/qa.md --preview
    ///   agentforge build --all --output-dir dist
    Build {
        /// Agent document, relative to --root
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        agent: Option<PathBuf>,

        /// Build every agent under the agents directory
        #[arg(long)]
        all: bool,

        /// Where compiled agents are written
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Print the compiled document
        #[arg(long, conflicts_with = "all")]
        preview: bool,
    },

    /// Check required frontmatter fields and skill references
    Validate {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Report skills that are not in the skills manifest
    ///
    /// Requires the skills manifest.
    Audit {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Remove unknown skills from agent documents
    ///
    /// Requires the skills manifest.
    Fix {
        /// Preview fixes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// List agents
    List {
        /// Only agents of this agent_type
        #[arg(short = 't', long = "type")]
        agent_type: Option<String>,
    },
}
