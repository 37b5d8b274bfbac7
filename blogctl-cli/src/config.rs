//! Configuration loading for blogctl
//!
//! Sources, highest priority first:
//! 1. `--database-url` flag / `DATABASE_URL` environment variable
//! 2. `./.env`, then `~/.blogctl/.env` (never overwrite variables already set)
//! 3. `./blogctl.toml`, then `~/.blogctl/config.toml`
//! 4. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Load `.env` files and report where variables came from.
///
/// Runs before logging is set up, so the caller logs the returned sources.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded_from.push(env_file);
        }
    }

    loaded_from
}

/// Get the blogctl config directory path (~/.blogctl)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".blogctl"))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BlogctlConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(blogctl_db::pool::DEFAULT_CONNECT_TIMEOUT)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Pretty-print JSON results (default: true)
    #[serde(default)]
    pub pretty: Option<bool>,
}

impl OutputConfig {
    pub fn pretty(&self) -> bool {
        self.pretty.unwrap_or(true)
    }
}

impl BlogctlConfig {
    /// Load `~/.blogctl/config.toml`, then let `./blogctl.toml` override it.
    pub fn load() -> Self {
        let mut paths = Vec::new();
        if let Some(global) = config_dir().map(|d| d.join("config.toml")) {
            paths.push(global);
        }
        paths.push(PathBuf::from("blogctl.toml"));

        Self::load_from(&paths)
    }

    /// Load each existing file in order; later files override earlier ones.
    ///
    /// Unreadable or invalid files are skipped with a warning.
    pub fn load_from(paths: &[PathBuf]) -> Self {
        let mut config = Self::default();

        for path in paths.iter().filter(|p| p.exists()) {
            match read_config(path) {
                Ok(overlay) => {
                    debug!("Loaded config from {}", path.display());
                    config = Self::merge(config, overlay);
                }
                Err(e) => warn!("Skipping {}: {:#}", path.display(), e),
            }
        }

        config
    }

    /// Merge two configs field by field (right overrides left where set)
    fn merge(base: Self, overlay: Self) -> Self {
        Self {
            database: DatabaseConfig {
                url: overlay.database.url.or(base.database.url),
                connect_timeout_secs: overlay
                    .database
                    .connect_timeout_secs
                    .or(base.database.connect_timeout_secs),
            },
            output: OutputConfig {
                pretty: overlay.output.pretty.or(base.output.pretty),
            },
        }
    }

    /// Pick the database URL: explicit flag/env value first, then config.
    pub fn resolve_database_url(&self, explicit: Option<String>) -> Result<String> {
        explicit
            .or_else(|| self.database.url.clone())
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.blogctl/config.toml")
    }
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the merged configuration as TOML
    Show,
    /// Show the global config file path
    Path,
}

pub fn run_config(args: ConfigArgs, config: &BlogctlConfig) -> Result<()> {
    match args.command {
        ConfigCommands::Show => {
            let toml_str =
                toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;
            println!("{}", toml_str);
        }
        ConfigCommands::Path => {
            let path = config_dir()
                .map(|d| d.join("config.toml"))
                .context("Could not determine home directory")?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn read_config(path: &Path) -> Result<BlogctlConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_returns_path() {
        let dir = config_dir();
        assert!(dir.is_some());

        if let Some(path) = dir {
            assert!(path.ends_with(".blogctl"));
        }
    }

    #[test]
    fn test_defaults() {
        let config = BlogctlConfig::default();
        assert!(config.database.url.is_none());
        assert_eq!(config.database.connect_timeout(), Duration::from_secs(30));
        assert!(config.output.pretty());
    }

    #[test]
    fn test_load_from_missing_files_uses_defaults() {
        let config = BlogctlConfig::load_from(&[PathBuf::from("/nonexistent/blogctl.toml")]);
        assert!(config.database.url.is_none());
        assert!(config.output.pretty());
    }

    #[test]
    fn test_local_overrides_global() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("config.toml");
        let local = dir.path().join("blogctl.toml");

        std::fs::write(
            &global,
            "[database]\nurl = \"postgres://localhost/global\"\nconnect_timeout_secs = 5\n",
        )
        .unwrap();
        std::fs::write(&local, "[output]\npretty = false\n").unwrap();

        let config = BlogctlConfig::load_from(&[global, local]);

        // Local file only sets output, so the global database section survives
        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://localhost/global")
        );
        assert_eq!(config.database.connect_timeout(), Duration::from_secs(5));
        assert!(!config.output.pretty());
    }

    #[test]
    fn test_invalid_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("blogctl.toml");
        std::fs::write(&broken, "[database\nurl = ").unwrap();

        let config = BlogctlConfig::load_from(&[broken]);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_explicit_url_wins() {
        let mut config = BlogctlConfig::default();
        config.database.url = Some("postgres://localhost/from-config".to_string());

        let url = config
            .resolve_database_url(Some("postgres://localhost/from-flag".to_string()))
            .unwrap();
        assert_eq!(url, "postgres://localhost/from-flag");

        let url = config.resolve_database_url(None).unwrap();
        assert_eq!(url, "postgres://localhost/from-config");
    }

    #[test]
    fn test_missing_url_is_an_error() {
        let err = BlogctlConfig::default().resolve_database_url(None).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL not set"));
    }
}
