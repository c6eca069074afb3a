//! Optional `config.toml` with defaults for the CLI

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use super::CliError;

/// How `issueq filter` prints its results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

/// Settings read from `config.toml`; every key is optional.
///
/// ```toml
/// default_sort = "priority, updated desc"
/// format = "table"
/// pretty = false
/// log_level = "issue_query=debug"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Sort keys applied when a query has no `sort by` clause
    pub default_sort: Option<String>,
    pub format: OutputFormat,
    pub pretty: bool,
    /// `tracing` filter directive, overridden by `RUST_LOG`
    pub log_level: Option<String>,
}

impl Config {
    /// `<config dir>/issueq/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("issueq").join("config.toml"))
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self, CliError> {
        toml::from_str(text).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path`, or the default location when `path` is `None`.
    ///
    /// A missing file at the default location yields the default config; an
    /// explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Config::default()),
            },
        };

        let text = fs::read_to_string(&path)?;
        Self::parse(&text, &path)
    }

    pub fn log_directive(&self) -> &str {
        self.log_level.as_deref().unwrap_or("warn")
    }
}
