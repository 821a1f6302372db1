//! Validate dataql queries without running them

use super::CliError;
use crate::parse;

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The query to validate
    pub query: String,
    /// Print the canonical form instead of a verdict
    pub canonical: bool,
}

/// Result of a check operation
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Canonical query text
    Canonical(String),
}

/// Execute a dataql check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let query = parse(&options.query)?;

    if options.canonical {
        Ok(CheckResult::Canonical(query.to_string()))
    } else {
        Ok(CheckResult::SyntaxValid)
    }
}
