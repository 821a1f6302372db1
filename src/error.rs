//! Crate-level error, and the message a client is allowed to see.

use thiserror::Error;

use crate::{
    lexer::LexError, parser::ParseError, registry::RegistryError, solver::SolveError,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Solve(#[from] SolveError),
}

impl From<LexError> for Error {
    fn from(e: LexError) -> Self {
        Error::Parse(ParseError::Lex(e))
    }
}

impl Error {
    /// Whether the query itself is malformed and the caller can fix it.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Parse(_))
    }

    /// Message safe to return to whoever sent the query.
    ///
    /// Denied members, missing members and unknown entry points read the same,
    /// so the shape of the allow-list cannot be probed. Causes of callable
    /// failures stay server side.
    pub fn public_message(&self) -> String {
        match self {
            Error::Parse(e) => format!("bad query: {}", e),
            Error::Registry(_) => "query service is misconfigured".to_string(),
            Error::Solve(e) => match e {
                SolveError::UnknownEntryPoint { name, position }
                | SolveError::NotAllowed { name, position, .. }
                | SolveError::AttributeNotFound { name, position, .. } => {
                    format!("'{}' is not available at {}", name, position)
                }
                SolveError::IndexNotFound { index, position, .. } => {
                    format!("index {} is not available at {}", index, position)
                }
                SolveError::NotSubscriptable { position, .. }
                | SolveError::NotIterable { position, .. } => {
                    format!("value cannot be resolved at {}", position)
                }
                SolveError::FilterExecution { name, position, .. } => {
                    format!("'{}' failed at {}", name, position)
                }
            },
        }
    }
}
