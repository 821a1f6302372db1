use std::fmt;

/// Literal argument value.
///
/// Only literals can be passed to methods; there are no expressions
/// or references inside argument lists.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `null`, `none` or `nil`, in any letter case
    Null,
    /// `true` or `false`, in any letter case
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "null"),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Float(n) => write!(f, "{:?}", n),
            Literal::String(s) => {
                f.write_str("'")?;
                for ch in s.chars() {
                    match ch {
                        '\'' => f.write_str("\\'")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\r' => f.write_str("\\r")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                f.write_str("'")
            }
        }
    }
}

/// Method argument.
///
/// # Examples
/// ```text
/// strftime('%x')          // positional
/// round(ndigits: 2)       // named
/// round(ndigits=2)        // named, `=` is a synonym of `:`
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Positional(Literal),
    Named { name: String, value: Literal },
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Positional(value) => write!(f, "{}", value),
            Arg::Named { name, value } => write!(f, "{}: {}", name, value),
        }
    }
}
