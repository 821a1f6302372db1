//! Execute dataql queries against JSON data documents

use tracing::{debug, info};

use super::{CliError, RegistryConfig, json_to_value};
use crate::{Args, CallError, Solver, Value, output, parse};

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// The query to execute
    pub query: String,
    /// Registry declaration (JSON text)
    pub registry: String,
    /// Data document (JSON text)
    pub data: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
}

/// Execute a query, returning the JSON text of its result
pub fn execute_run(options: &RunOptions) -> Result<String, CliError> {
    let query = parse(&options.query)?;
    let config = RegistryConfig::from_json(&options.registry)?;

    let data = options.data.as_ref().ok_or(CliError::NoInput)?;
    let document: serde_json::Value = serde_json::from_str(data)?;
    let serde_json::Value::Object(roots) = document else {
        return Err(CliError::InvalidDocument(
            "top level must be an object whose keys are entry points".to_string(),
        ));
    };

    if let Some(names) = &config.entry_points {
        if let Some(missing) = names.iter().find(|name| !roots.contains_key(name.as_str())) {
            return Err(CliError::InvalidDocument(format!(
                "entry point '{missing}' is not in the document"
            )));
        }
    }

    let mut builder = config.builder()?;
    for (name, json) in roots {
        let exposed = config
            .entry_points
            .as_ref()
            .is_none_or(|names| names.contains(&name));
        if !exposed {
            debug!(entry_point = %name, "not exposed");
            continue;
        }

        let root = json_to_value(json);
        builder = builder.register_entry_point(&name, move |args: &Args| {
            if !args.is_empty() {
                return Err(CallError::UnexpectedArgument("#1".to_string()));
            }
            Ok(root.clone())
        });
    }
    let registry = builder.build()?;

    info!(entry_point = query.entry_point(), "running query");
    let result: Value = Solver::new(&registry).solve(&query)?;

    let json = if options.pretty {
        output::to_json_pretty(&result)?
    } else {
        output::to_json(&result)?
    };
    Ok(json)
}
