use std::fmt;

use crate::ast::{Arg, Object};

/// Complete parsed query.
///
/// The root is always an object whose first step names the entry point,
/// optionally with the entry point's arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub root: Object,
}

impl Query {
    /// Name of the entry point the query starts from.
    pub fn entry_point(&self) -> &str {
        self.root
            .filters
            .first()
            .and_then(|filter| filter.name())
            .unwrap_or_default()
    }

    /// Arguments passed to the entry point, if it was called.
    pub fn entry_point_args(&self) -> &[Arg] {
        self.root
            .filters
            .first()
            .map(|filter| filter.args())
            .unwrap_or_default()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt(f)
    }
}
