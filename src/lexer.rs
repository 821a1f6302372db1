use std::fmt;

use thiserror::Error;

use crate::ast::{SpannedToken, Token};

/// Location of a character in the query text.
///
/// `offset` counts characters from the start of the query (0-based),
/// `line` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn start() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Errors raised while splitting a query into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unexpected character '{character}' at {position}")]
    UnexpectedCharacter { character: char, position: Position },

    #[error("unterminated string starting at {position}")]
    UnterminatedString { position: Position },

    #[error("invalid number '{text}' at {position}")]
    InvalidNumber { text: String, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnexpectedCharacter { position, .. }
            | LexError::UnterminatedString { position }
            | LexError::InvalidNumber { position, .. } => *position,
        }
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    after_dot: bool,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            after_dot: false,
        }
    }

    /// Reads the whole input, ending with a single [`Token::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<SpannedToken>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_token()?;
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn location(&self) -> Position {
        Position {
            offset: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if self.current_char() == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.location();
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance(); // Consume backslash
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        // Any other escaped character stands for itself
                        Some(ch) => result.push(ch),
                        None => break,
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn read_digits(&mut self, text: &mut String) {
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self, integer_only: bool) -> Result<Token, LexError> {
        let start = self.location();
        let mut text = String::new();
        let mut is_float = false;

        if let Some(sign @ ('-' | '+')) = self.current_char() {
            text.push(sign);
            self.advance();
        }
        self.read_digits(&mut text);

        if !integer_only {
            if self.current_char() == Some('.')
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                text.push('.');
                self.advance();
                self.read_digits(&mut text);
            }

            let exponent_follows = match (self.peek_char(1), self.peek_char(2)) {
                (Some(c), _) if c.is_ascii_digit() => true,
                (Some('-' | '+'), Some(c)) => c.is_ascii_digit(),
                _ => false,
            };
            if matches!(self.current_char(), Some('e' | 'E')) && exponent_follows {
                is_float = true;
                text.push('e');
                self.advance();
                if let Some(sign @ ('-' | '+')) = self.current_char() {
                    text.push(sign);
                    self.advance();
                }
                self.read_digits(&mut text);
            }
        }

        let invalid = |text: String| LexError::InvalidNumber {
            text,
            position: start,
        };

        if !is_float {
            if let Ok(n) = text.parse::<i64>() {
                return Ok(Token::Integer(n));
            }
            if integer_only {
                return Err(invalid(text));
            }
        }

        match text.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Token::Float(n)),
            _ => Err(invalid(text)),
        }
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    pub fn next_token(&mut self) -> Result<SpannedToken, LexError> {
        self.skip_whitespace();

        let position = self.location();
        let integer_only = self.after_dot;

        let token = match self.current_char() {
            None => Token::Eof,
            Some('(') => self.single(Token::LParen),
            Some(')') => self.single(Token::RParen),
            Some('{') => self.single(Token::LBrace),
            Some('}') => self.single(Token::RBrace),
            Some('[') => self.single(Token::LBracket),
            Some(']') => self.single(Token::RBracket),
            Some(',') => self.single(Token::Comma),
            Some(':') => self.single(Token::Colon),
            Some('.') => self.single(Token::Dot),
            Some('=') => self.single(Token::Equals),
            Some('"') => Token::String(self.read_string('"')?),
            Some('\'') => Token::String(self.read_string('\'')?),
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                Token::Identifier(self.read_identifier())
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(integer_only)?,
            Some('-' | '+')
                if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) =>
            {
                self.read_number(integer_only)?
            }
            Some(ch) => {
                return Err(LexError::UnexpectedCharacter {
                    character: ch,
                    position,
                });
            }
        };

        self.after_dot = token == Token::Dot;
        Ok(SpannedToken::new(token, position))
    }
}
