use std::fmt;

use crate::{ast::Arg, lexer::Position};

/// One resolution step of a filter chain.
///
/// # Examples
/// ```text
/// name                    // Attribute
/// strftime('%x')          // Method
/// companies.0             // Index (also companies[0])
/// companies[-1]           // Index from the end
/// items[1:3]              // Slice (also items.1:3)
/// items[::-1]             // Slice with a step
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Attribute access, no parentheses
    Attribute { name: String, position: Position },

    /// Method call, arguments in declaration order
    Method {
        name: String,
        args: Vec<Arg>,
        position: Position,
    },

    /// Positional access, negative values count from the end
    Index { index: i64, position: Position },

    /// Range access: start inclusive, stop exclusive, step never zero
    Slice {
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<i64>,
        position: Position,
    },
}

impl Filter {
    /// Name of an attribute or method step.
    pub fn name(&self) -> Option<&str> {
        match self {
            Filter::Attribute { name, .. } | Filter::Method { name, .. } => Some(name),
            Filter::Index { .. } | Filter::Slice { .. } => None,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Filter::Attribute { position, .. }
            | Filter::Method { position, .. }
            | Filter::Index { position, .. }
            | Filter::Slice { position, .. } => *position,
        }
    }

    pub fn args(&self) -> &[Arg] {
        match self {
            Filter::Method { args, .. } => args,
            _ => &[],
        }
    }
}

fn write_bound(f: &mut fmt::Formatter<'_>, bound: &Option<i64>) -> fmt::Result {
    match bound {
        Some(n) => write!(f, "{}", n),
        None => Ok(()),
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Attribute { name, .. } => write!(f, "{}", name),
            Filter::Method { name, args, .. } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
            Filter::Index { index, .. } => write!(f, "[{}]", index),
            Filter::Slice {
                start, stop, step, ..
            } => {
                f.write_str("[")?;
                write_bound(f, start)?;
                f.write_str(":")?;
                write_bound(f, stop)?;
                if step.is_some() {
                    f.write_str(":")?;
                    write_bound(f, step)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Writes a filter chain in canonical form: `a.b(1)[0][1:3].c`.
pub fn write_chain(f: &mut fmt::Formatter<'_>, filters: &[Filter]) -> fmt::Result {
    for (i, filter) in filters.iter().enumerate() {
        if i > 0 && filter.name().is_some() {
            f.write_str(".")?;
        }
        write!(f, "{}", filter)?;
    }
    Ok(())
}
