//! AgentForge CLI
//!
//! Compiles agent documents with their `BASE-AGENT.md` chain, validates
//! them and keeps their skill references in line with the skills manifest.

mod cli;
mod config;
mod service;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

use cli::Cli;
use config::Config;
use service::AgentForgeService;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    // Initialize logging
    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    agentforge_logging::init_logging(level, config.logging.format)?;
    tracing::debug!("Verbose mode enabled");

    let service = AgentForgeService::new(config, cli.root);
    service.run(cli.command)
}
