use std::fmt;

use crate::lexer::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Floating-point number, with a fraction or an exponent
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// -2.5E-3
    /// 1e+50
    /// ```
    Float(f64),

    /// Integer
    ///
    /// Directly after a `.` only integers are read, so `matrix.0.1`
    /// is two index steps.
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -1
    /// ```
    Integer(i64),

    /// String literal enclosed in single or double quotes
    ///
    /// # Examples
    /// ```text
    /// 'Elon Musk'
    /// "%x"
    /// 'it\'s'
    /// ```
    String(String),

    // Identifiers
    /// Attribute, method, entry point or alias name
    ///
    /// Must start with a letter or underscore, followed by letters, digits, or underscores.
    /// `true`, `false`, `null`, `none` and `nil` are plain identifiers here; the
    /// parser reads them as literals in argument position only.
    ///
    /// # Examples
    /// ```text
    /// User
    /// created_year
    /// _internal
    /// ```
    Identifier(String),

    // Punctuation
    /// Opens an argument list
    LParen,
    /// Closes an argument list
    RParen,
    /// Opens the children of an object
    LBrace,
    /// Closes the children of an object
    RBrace,
    /// Opens a list body, an index or a slice
    LBracket,
    /// Closes a list body, an index or a slice
    RBracket,
    /// Separates children, list items and arguments
    Comma,
    /// Alias separator, named argument separator and slice separator
    Colon,
    /// Separates the steps of a filter chain
    Dot,
    /// Named argument separator, synonym of `:`
    Equals,

    /// End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Float(n) => write!(f, "{:?}", n),
            Token::Integer(n) => write!(f, "{}", n),
            Token::String(s) => write!(f, "{:?}", s),
            Token::Identifier(name) => write!(f, "'{}'", name),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Comma => write!(f, "','"),
            Token::Colon => write!(f, "':'"),
            Token::Dot => write!(f, "'.'"),
            Token::Equals => write!(f, "'='"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

/// A token with the position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub position: Position,
}

impl SpannedToken {
    pub fn new(token: Token, position: Position) -> Self {
        SpannedToken { token, position }
    }
}
