//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `ARCHETYPE_REIFY__ENCODING`, `ARCHETYPE_REIFY__WORKERS`,
//!    `ARCHETYPE_OUTPUT__NO_COLOR`
//! 3. Config file: `--config FILE` (required), else the platform config file
//!    (optional)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use archetype_core::domain::Encoding;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults for `archetype reify`.
    pub reify: ReifyConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReifyConfig {
    /// Encoding label, see [`Encoding`].
    pub encoding: String,
    /// Worker pool size; rayon's global pool when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
}

impl Default for ReifyConfig {
    fn default() -> Self {
        Self {
            encoding: Encoding::default().label().to_string(),
            workers: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then environment.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required, Self::environment())
    }

    fn load_from(path: &Path, required: bool, env: Environment) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&AppConfig::default()).context("Failed to build default config")?;

        let settings = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path).required(required))
            .add_source(env)
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        let config: AppConfig = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn environment() -> Environment {
        Environment::with_prefix("ARCHETYPE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn validate(&self) -> anyhow::Result<()> {
        self.encoding()?;
        if self.reify.workers == Some(0) {
            anyhow::bail!("reify.workers must be at least 1");
        }
        Ok(())
    }

    /// The configured encoding, parsed.
    pub fn encoding(&self) -> anyhow::Result<Encoding> {
        self.reify
            .encoding
            .parse()
            .with_context(|| format!("Invalid reify.encoding '{}'", self.reify.encoding))
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.archetype.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "archetype", "archetype")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".archetype.toml"))
    }
}
