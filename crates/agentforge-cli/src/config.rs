use agentforge_logging::LogFormat;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PathsConfig {
    pub agents_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Empty means the sibling `claude-mpm-skills/manifest.json`
    pub manifest: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    pub paths: PathsConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Get the global config path: ~/.agentforge/agentforge.toml
    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".agentforge").join("agentforge.toml"))
    }

    /// Load configuration with layered approach:
    /// 1. Built-in defaults
    /// 2. Global config: ~/.agentforge/agentforge.toml (optional)
    /// 3. Local override: ./agentforge.toml (optional)
    /// 4. The `--config` file, when given
    /// 5. Environment variables (highest priority)
    pub fn load(extra: Option<&Path>) -> anyhow::Result<Self> {
        // Load .env file from current directory
        dotenvy::dotenv().ok();

        let mut config_builder = config::Config::builder()
            .set_default("paths.agents_dir", "agents")?
            .set_default("paths.output_dir", "dist/agents")?
            .set_default("paths.manifest", "")?
            .set_default("logging.level", "warn")?
            .set_default("logging.format", "pretty")?;

        if let Some(global) = Self::global_config_path() {
            config_builder = config_builder.add_source(config::File::from(global).required(false));
        }

        config_builder =
            config_builder.add_source(config::File::with_name("agentforge").required(false));

        if let Some(path) = extra {
            config_builder = config_builder.add_source(config::File::from(path.to_path_buf()));
        }

        // Environment variables with AGENTFORGE__ prefix
        config_builder = config_builder.add_source(
            config::Environment::with_prefix("AGENTFORGE")
                .prefix_separator("__")
                .separator("__"),
        );

        // Convenience env var overrides
        if let Ok(manifest) = env::var("AGENTFORGE_MANIFEST") {
            config_builder = config_builder.set_override("paths.manifest", manifest)?;
        }

        if let Ok(level) = env::var("AGENTFORGE_LOG_LEVEL") {
            config_builder = config_builder.set_override("logging.level", level)?;
        }

        let config: Self = config_builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Agents directory under `root`
    pub fn agents_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.paths.agents_dir)
    }

    /// Build output directory under `root`
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.paths.output_dir)
    }

    /// Skills manifest location for the project at `root`
    ///
    /// The default sits in the skills repository next to the project.
    pub fn manifest_path(&self, root: &Path) -> PathBuf {
        if self.paths.manifest.is_empty() {
            agentforge_skills::default_manifest_path(root)
        } else {
            PathBuf::from(&self.paths.manifest)
        }
    }
}
