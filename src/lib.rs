pub mod ast;
pub mod builtins;
pub mod error;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod registry;
pub mod solver;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Arg, Field, Filter, List, Literal, Object as ObjectResource, Query, Resource, Token};
pub use error::Error;
pub use lexer::{LexError, Lexer, Position};
pub use output::{to_json, to_json_pretty};
pub use parser::{ParseError, Parser, parse};
pub use registry::{Accessor, EntryPoint, Registry, RegistryBuilder, RegistryError, TypeSpec};
pub use solver::{SolveError, Solver};
pub use value::{Args, CallError, Object, Value};

/// Parses `query` and resolves it against `registry`.
///
/// # Examples
///
/// ```
/// use dataql::{Registry, Value, execute};
///
/// let registry = Registry::builder()
///     .allow("map", "name")
///     .register_entry_point("Me", |_args| Ok(Value::map([("name", Value::from("Ada"))])))
///     .build()
///     .unwrap();
///
/// let result = execute("Me { name, alias: name }", &registry).unwrap();
/// assert_eq!(dataql::to_json(&result).unwrap(), r#"{"name":"Ada","alias":"Ada"}"#);
///
/// let denied = execute("Me { secret }", &registry).unwrap_err();
/// assert_eq!(denied.public_message(), "'secret' is not available at line 1, column 6");
/// ```
pub fn execute(query: &str, registry: &Registry) -> Result<Value, Error> {
    let query = parse(query)?;
    Ok(Solver::new(registry).solve(&query)?)
}
