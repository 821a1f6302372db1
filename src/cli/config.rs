//! CLI configuration: log level settings and registry declaration files.

use std::{collections::BTreeMap, env, str::FromStr};

use serde::Deserialize;

use super::CliError;
use crate::{RegistryBuilder, TypeSpec, builtins};

/// Environment variable holding the log level.
pub const LOG_LEVEL_ENV: &str = "DATAQL_LOG_LEVEL";

/// Log level for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogLevel {
    /// Every resolution step.
    Trace,
    /// Entry points, denials and registry summaries.
    Debug,
    Info,
    #[default]
    #[value(alias = "warning")]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(CliError::InvalidConfig(format!(
                "unknown log level '{s}', expected one of: trace, debug, info, warn, error"
            ))),
        }
    }
}

impl LogLevel {
    /// Convert to a tracing filter directive string.
    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Settings shared by every command.
///
/// Log level precedence (highest to lowest): `--log-level`,
/// `DATAQL_LOG_LEVEL`, then the default.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub log_level: LogLevel,
}

impl Settings {
    /// Load settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if `DATAQL_LOG_LEVEL` is set to an
    /// unknown level.
    pub fn from_env() -> Result<Self, CliError> {
        let log_level = match env::var(LOG_LEVEL_ENV) {
            Ok(val) => val.parse()?,
            Err(_) => LogLevel::default(),
        };
        Ok(Settings { log_level })
    }

    #[must_use]
    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }
}

/// Registry declaration file.
///
/// ```json
/// {
///   "entry_points": ["User"],
///   "types": {
///     "User":   { "extends": ["Person"], "allow": ["email", "companies"] },
///     "Person": { "allow": ["name"] },
///     "string": { "builtins": true, "allow": [{ "name": "shout", "filter": "string.upper" }] }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Top-level keys of the data document exposed as entry points, all when absent
    #[serde(default)]
    pub entry_points: Option<Vec<String>>,

    #[serde(default)]
    pub types: BTreeMap<String, TypeConfig>,
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeConfig {
    #[serde(default)]
    pub extends: Vec<String>,

    #[serde(default)]
    pub allow: Vec<AllowEntry>,

    /// Allow every builtin filter of this builtin type
    #[serde(default)]
    pub builtins: bool,

    #[serde(default = "enabled")]
    pub inherit: bool,

    #[serde(default = "enabled")]
    pub propagate: bool,
}

/// A member allowed on a type: native access, or a builtin filter standing in for it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AllowEntry {
    Name(String),
    Filter { name: String, filter: String },
}

impl RegistryConfig {
    pub fn from_json(text: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Declares every configured type on a fresh builder.
    pub fn builder(&self) -> Result<RegistryBuilder, CliError> {
        let mut builder = RegistryBuilder::new();

        for (type_name, config) in &self.types {
            let mut spec = TypeSpec::new(type_name.as_str())
                .inherit_members(config.inherit)
                .propagate_members(config.propagate);
            for supertype in &config.extends {
                spec = spec.extends(supertype.as_str());
            }

            for entry in &config.allow {
                spec = match entry {
                    AllowEntry::Name(name) => spec.allow(name.as_str()),
                    AllowEntry::Filter { name, filter } => {
                        let function = resolve_filter(filter)?;
                        spec.allow_filter(name.as_str(), function)
                    }
                };
            }

            builder = builder.register(spec);
            if config.builtins {
                builder = builder.allow_builtins(type_name);
            }
        }

        Ok(builder)
    }
}

/// Resolves a qualified builtin name such as `string.upper`.
fn resolve_filter(qualified: &str) -> Result<builtins::BuiltinFn, CliError> {
    qualified
        .split_once('.')
        .and_then(|(type_name, name)| builtins::lookup(type_name, name))
        .ok_or_else(|| CliError::InvalidConfig(format!("unknown builtin filter '{qualified}'")))
}
