//! CLI support for issue-query
//!
//! Provides programmatic access to the `issueq` commands so they can be
//! embedded in other tools and tested without spawning a process.

mod check;
mod config;
mod fields;
mod filter;
mod records;

pub use check::{execute_check, execute_tokens};
pub use config::{Config, OutputFormat};
pub use fields::fields_overview;
pub use filter::{FilterOptions, execute_filter};
pub use records::parse_issues;

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Lexer or parser error
    #[error("Query error: {0}")]
    Query(#[from] crate::QueryError),

    /// Malformed JSON array input
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed JSON Lines input
    #[error("Invalid record on line {line}: {source}")]
    JsonLine {
        line: usize,
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// No records supplied
    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    #[error("Invalid --now value '{0}': expected an RFC 3339 timestamp")]
    InvalidNow(String),
}
