use crate::cli::Commands;
use crate::config::Config;
use agentforge_core::prelude::*;
use agentforge_core::{audit_tree, fix_tree, write_compiled, AuditReport};
use agentforge_types::LoadWarning;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

/// Command dispatcher - runs one subcommand against a project root
pub struct AgentForgeService {
    config: Config,
    root: PathBuf,
}

impl AgentForgeService {
    /// Create a new service for the project at `root`
    pub fn new(config: Config, root: PathBuf) -> Self {
        Self { config, root }
    }

    fn agents_dir(&self) -> PathBuf {
        self.config.agents_dir(&self.root)
    }

    fn output_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        match flag {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => self.root.join(dir),
            None => self.config.output_dir(&self.root),
        }
    }

    /// The skills manifest, failing when it is absent
    fn required_skills(&self) -> Result<SkillSet> {
        let path = self.config.manifest_path(&self.root);
        if !path.is_file() {
            bail!("Manifest not found at {}", path.display());
        }
        let skills = SkillSet::from_manifest_file(&path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        Ok(skills)
    }

    /// Run a command and map its outcome to a process exit code
    pub fn run(self, command: Commands) -> Result<ExitCode> {
        info!("Using agents directory {:?}", self.agents_dir());

        match command {
            Commands::Build {
                agent: Some(agent),
                output_dir,
                preview,
                ..
            } => self.build_one(&agent, output_dir, preview),
            Commands::Build { output_dir, .. } => self.build_all(output_dir),
            Commands::Validate { json } => self.validate(json),
            Commands::Audit { json } => self.audit(json),
            Commands::Fix { dry_run } => self.fix(dry_run),
            Commands::List { agent_type } => self.list(agent_type.as_deref()),
        }
    }

    fn build_one(
        &self,
        agent: &Path,
        output_dir: Option<PathBuf>,
        preview: bool,
    ) -> Result<ExitCode> {
        let agent_path = if agent.is_absolute() {
            agent.to_path_buf()
        } else {
            self.root.join(agent)
        };
        let agents_dir = self.agents_dir();
        let output_dir = self.output_dir(output_dir);

        let name = agent_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("Building {}...", name);

        let compiler = AgentCompiler::new(&agents_dir);
        let built = compiler
            .compile(&agent_path)
            .map_err(anyhow::Error::from)
            .and_then(|compiled| {
                let output =
                    write_compiled(&agents_dir, &output_dir, &agent_path, &compiled.compiled)?;
                Ok((compiled, output))
            });

        let (compiled, output) = match built {
            Ok(built) => built,
            Err(e) => {
                eprintln!("{} {:#}", "✗ Error:".red().bold(), e);
                return Ok(ExitCode::FAILURE);
            }
        };

        println!("{} Built: {}", "✓".green(), output.display());
        println!();
        println!("Content length: {} characters", compiled.compiled.chars().count());
        println!("Base files inherited: {}", compiler.resolve(&agent_path).len());

        if preview {
            println!("\n{}\n", "--- Preview (built content) ---".cyan());
            println!("{}", compiled.compiled);
        }

        Ok(ExitCode::SUCCESS)
    }

    fn build_all(&self, output_dir: Option<PathBuf>) -> Result<ExitCode> {
        let agents_dir = self.agents_dir();
        let output_dir = self.output_dir(output_dir);
        println!("Building all agents...");

        // Every file is written, including agents sharing an agent_id
        let batch = AgentLoader::new(&agents_dir).compile_each()?;
        print_warnings(&batch.warnings, &agents_dir);

        for compiled in &batch.items {
            let output =
                write_compiled(&agents_dir, &output_dir, &compiled.path, &compiled.compiled)?;
            println!(
                "{} {} -> {}",
                "✓".green(),
                relative(&compiled.path, &agents_dir).display(),
                relative(&output, &self.root).display()
            );
        }

        println!(
            "\n{} Built {} agents to {}",
            "✓".green(),
            batch.items.len(),
            output_dir.display()
        );
        Ok(ExitCode::SUCCESS)
    }

    fn validate(&self, json: bool) -> Result<ExitCode> {
        let agents_dir = self.agents_dir();
        let skills = SkillSet::load_or_empty(&self.config.manifest_path(&self.root));
        debug!("Validating with {} known skills", skills.len());

        let results = Validator::new(skills).validate_all(&agents_dir)?;
        let code = if results.is_empty() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };

        if json {
            let findings: Vec<&ValidationFinding> = results.values().flatten().collect();
            println!("{}", serde_json::to_string_pretty(&findings)?);
            return Ok(code);
        }

        println!("Validating all agents...");
        if results.is_empty() {
            println!("{} All agents valid!", "✓".green());
            return Ok(code);
        }

        println!(
            "{} Found errors in {} agents:\n",
            "✗".red(),
            results.len()
        );
        for (path, findings) in &results {
            println!("{}:", relative(path, &agents_dir).display());
            for finding in findings {
                println!("  - {}", finding.message);
            }
            println!();
        }

        Ok(code)
    }

    fn audit(&self, json: bool) -> Result<ExitCode> {
        let agents_dir = self.agents_dir();
        let skills = self.required_skills()?;
        let report = audit_tree(&agents_dir, &skills)?;
        print_warnings(&report.warnings, &agents_dir);

        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_skill_count(&skills);
            print_audit(&report, &agents_dir);
        }
        Ok(ExitCode::SUCCESS)
    }

    fn fix(&self, dry_run: bool) -> Result<ExitCode> {
        let agents_dir = self.agents_dir();
        let skills = self.required_skills()?;
        print_skill_count(&skills);

        if dry_run {
            println!("{}\n", "DRY RUN MODE - No changes will be made".yellow());
            let report = audit_tree(&agents_dir, &skills)?;
            print_warnings(&report.warnings, &agents_dir);
            print_audit(&report, &agents_dir);
            return Ok(ExitCode::SUCCESS);
        }

        let mut fixed = 0;
        let mut errors = 0;
        for fix in fix_tree(&agents_dir, &skills)? {
            let rel = relative(&fix.path, &agents_dir);
            match fix.outcome {
                Ok(outcome) => {
                    fixed += 1;
                    println!("{} {}", "✓".green(), rel.display());
                    println!("   {}", outcome.message);
                }
                Err(e) => {
                    errors += 1;
                    println!("{} {}", "✗".red(), rel.display());
                    println!("   Error: {}", e);
                }
            }
        }

        println!("\n{}", "=".repeat(60));
        println!("Summary:");
        println!("  Fixed: {} agents", fixed);
        println!("  Errors: {} agents", errors);

        Ok(if errors == 0 {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }

    fn list(&self, agent_type: Option<&str>) -> Result<ExitCode> {
        let agents_dir = self.agents_dir();
        let loader = AgentLoader::new(&agents_dir);
        let batch = match agent_type {
            Some(agent_type) => loader.agents_by_type(agent_type)?,
            None => loader.load_all()?,
        };
        print_warnings(&batch.warnings, &agents_dir);

        for agent in &batch.items {
            println!(
                "{:<32} {:<16} {:<10} {} skills",
                agent.agent_id.bold(),
                agent.agent_type,
                agent.version,
                agent.skills.len()
            );
        }
        println!("\n{} agents", batch.items.len());

        Ok(ExitCode::SUCCESS)
    }
}

fn relative<'a>(path: &'a Path, base: &Path) -> &'a Path {
    path.strip_prefix(base).unwrap_or(path)
}

fn print_skill_count(skills: &SkillSet) {
    println!(
        "{} Found {} valid skills in manifest\n",
        "✓".green(),
        skills.len()
    );
}

fn print_warnings(warnings: &[LoadWarning], agents_dir: &Path) {
    for warning in warnings {
        eprintln!(
            "{} {}: {}",
            "warning:".yellow().bold(),
            relative(&warning.path, agents_dir).display(),
            warning.message
        );
    }
}

fn print_audit(report: &AuditReport, agents_dir: &Path) {
    println!("=== AGENTS WITH INVALID SKILL REFERENCES ===\n");
    for agent in &report.agents {
        println!("{}", relative(&agent.path, agents_dir).display().to_string().bold());
        if !agent.valid.is_empty() {
            println!("   {} {}", "Keep:".green(), agent.valid.join(", "));
        }
        println!("   {} {}", "Remove:".red(), agent.invalid.join(", "));
        println!();
    }

    if !report.naming.is_empty() {
        println!("=== SKILL NAMES OUTSIDE THE NAMING CONVENTION ===\n");
        for violation in &report.naming {
            println!(
                "{}: {}",
                relative(&violation.path, agents_dir).display(),
                violation.skill
            );
        }
        println!();
    }

    println!("Summary:");
    println!("  Agents with skills: {}", report.agents_with_skills);
    println!("  Skills declared: {}", report.skills_declared);
    println!("  Agents affected: {}", report.agents.len());
    println!("  Invalid references: {}", report.invalid_references());
}
