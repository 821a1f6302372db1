//! CLI support for dataql
//!
//! Provides programmatic access to dataql CLI functionality for embedding
//! in other tools.

mod check;
mod config;
mod docs;
mod document;
mod logging;
mod run;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use config::{AllowEntry, LOG_LEVEL_ENV, LogLevel, RegistryConfig, Settings, TypeConfig};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use document::{Record, json_to_value};
pub use logging::init_logging;
pub use run::{RunOptions, execute_run};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("Registry error: {0}")]
    Registry(#[from] crate::RegistryError),

    #[error("Query failed: {0}")]
    Solve(#[from] crate::SolveError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No data provided. Use --data or pipe JSON to stdin.")]
    NoInput,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid data document: {0}")]
    InvalidDocument(String),

    #[error("Unknown category: '{0}'\nRun 'dataql docs' to see available categories.")]
    UnknownCategory(String),
}
