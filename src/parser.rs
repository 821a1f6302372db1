use std::mem;

use thiserror::Error;
use tracing::debug;

use crate::{
    ast::{Arg, Field, Filter, List, Literal, Object, Query, Resource, SpannedToken, Token},
    lexer::{LexError, Lexer, Position},
};

/// Errors raised while building the resource tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found} at {position}")]
    Unexpected {
        expected: String,
        found: String,
        position: Position,
    },

    #[error("duplicate key '{key}' at {position} (first declared at {first})")]
    DuplicateKey {
        key: String,
        position: Position,
        first: Position,
    },

    #[error("positional argument after named arguments at {position}")]
    PositionalAfterNamed { position: Position },

    #[error("duplicate argument '{name}' at {position}")]
    DuplicateArgument { name: String, position: Position },

    #[error("slice step cannot be zero at {position}")]
    ZeroSliceStep { position: Position },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lex(e) => e.position(),
            ParseError::Unexpected { position, .. }
            | ParseError::DuplicateKey { position, .. }
            | ParseError::PositionalAfterNamed { position }
            | ParseError::DuplicateArgument { position, .. }
            | ParseError::ZeroSliceStep { position } => *position,
        }
    }
}

/// Recursive descent parser with one token of lookahead.
///
/// The single exception is alias detection at the start of a child, which
/// looks one token further to tell `alias: path` from `path`.
pub struct Parser {
    tokens: Vec<SpannedToken>,
    cursor: usize,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Result<Self, ParseError> {
        Ok(Parser::from_tokens(lexer.tokenize()?))
    }

    pub fn from_tokens(mut tokens: Vec<SpannedToken>) -> Self {
        if tokens.last().is_none_or(|last| last.token != Token::Eof) {
            let position = tokens.last().map(|last| last.position).unwrap_or_default();
            tokens.push(SpannedToken::new(Token::Eof, position));
        }
        Parser { tokens, cursor: 0 }
    }

    fn current(&self) -> &SpannedToken {
        &self.tokens[self.cursor]
    }

    fn position(&self) -> Position {
        self.current().position
    }

    fn peek(&self, offset: usize) -> &Token {
        let index = (self.cursor + offset).min(self.tokens.len() - 1);
        &self.tokens[index].token
    }

    /// Takes the current token and moves to the next one; stays on `Eof`.
    fn advance(&mut self) -> Token {
        if self.cursor + 1 < self.tokens.len() {
            let token = mem::replace(&mut self.tokens[self.cursor].token, Token::Eof);
            self.cursor += 1;
            token
        } else {
            Token::Eof
        }
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current().token) == mem::discriminant(token)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::Unexpected {
            expected: expected.to_string(),
            found: self.current().token.to_string(),
            position: self.position(),
        }
    }

    fn expect(&mut self, expected: Token, description: &str) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(self.unexpected(description));
        }
        self.advance();
        Ok(())
    }

    /// Parses `Entry.point(args).chain { children }` up to the end of input.
    pub fn parse_query(&mut self) -> Result<Query, ParseError> {
        let position = self.position();
        let filters = self.parse_path()?;

        self.expect(Token::LBrace, "'{'")?;
        let children = self.parse_children()?;
        self.expect(Token::Eof, "end of input")?;

        Ok(Query {
            root: Object {
                alias: None,
                filters,
                children,
                position,
            },
        })
    }

    /// Parses children up to and including the closing `}`.
    fn parse_children(&mut self) -> Result<Vec<Resource>, ParseError> {
        let mut children: Vec<Resource> = vec![];
        let mut keys: Vec<(String, Position)> = vec![];

        while !self.check(&Token::RBrace) {
            let child = self.parse_child()?;

            if let Some(key) = child.key() {
                if let Some((_, first)) = keys.iter().find(|(k, _)| k == key) {
                    return Err(ParseError::DuplicateKey {
                        key: key.to_string(),
                        position: child.position(),
                        first: *first,
                    });
                }
                keys.push((key.to_string(), child.position()));
            }
            children.push(child);

            if !self.check(&Token::RBrace) {
                self.expect(Token::Comma, "',' or '}'")?;
            }
        }

        self.expect(Token::RBrace, "'}'")?;
        Ok(children)
    }

    /// Parses `(alias:)? path body?`.
    fn parse_child(&mut self) -> Result<Resource, ParseError> {
        let position = self.position();

        let alias = if matches!(self.current().token, Token::Identifier(_))
            && matches!(self.peek(1), Token::Colon)
        {
            let alias = match self.advance() {
                Token::Identifier(name) => Some(name),
                _ => None,
            };
            self.advance(); // consume ':'
            alias
        } else {
            None
        };

        let filters = self.parse_path()?;
        self.parse_body(alias, filters, position)
    }

    fn parse_body(
        &mut self,
        alias: Option<String>,
        filters: Vec<Filter>,
        position: Position,
    ) -> Result<Resource, ParseError> {
        if self.check(&Token::LBracket) {
            self.advance();
            let body = self.parse_list_body()?;
            Ok(Resource::List(List {
                alias,
                filters,
                body,
                position,
            }))
        } else if self.check(&Token::LBrace) {
            self.advance();
            let children = self.parse_children()?;
            Ok(Resource::Object(Object {
                alias,
                filters,
                children,
                position,
            }))
        } else {
            Ok(Resource::Field(Field {
                alias,
                filters,
                position,
            }))
        }
    }

    /// Parses list items up to and including the closing `]`.
    fn parse_list_body(&mut self) -> Result<Vec<Resource>, ParseError> {
        let mut body = vec![];

        loop {
            let position = self.position();
            let item = match &self.current().token {
                Token::LBrace | Token::LBracket => self.parse_body(None, vec![], position)?,
                Token::Identifier(_) => self.parse_child()?,
                _ => return Err(self.unexpected("field, '{' or '['")),
            };
            body.push(item);

            if self.check(&Token::RBracket) {
                break;
            }
            self.expect(Token::Comma, "',' or ']'")?;
            if self.check(&Token::RBracket) {
                break;
            }
        }

        self.expect(Token::RBracket, "']'")?;
        Ok(body)
    }

    /// Parses a leading name segment followed by `.step` and `[index]` steps.
    fn parse_path(&mut self) -> Result<Vec<Filter>, ParseError> {
        let mut filters = vec![self.parse_segment()?];

        loop {
            if self.check(&Token::Dot) {
                self.advance(); // consume '.'
                filters.push(self.parse_dotted_step()?);
            } else if self.check(&Token::LBracket)
                && matches!(self.peek(1), Token::Integer(_) | Token::Colon)
            {
                self.advance(); // consume '['
                filters.push(self.parse_bracket_step()?);
            } else {
                break;
            }
        }

        Ok(filters)
    }

    /// Parses `name` or `name(args)`.
    fn parse_segment(&mut self) -> Result<Filter, ParseError> {
        let position = self.position();
        let name = match &self.current().token {
            Token::Identifier(_) => match self.advance() {
                Token::Identifier(name) => name,
                _ => return Err(self.unexpected("identifier")),
            },
            _ => return Err(self.unexpected("identifier")),
        };

        if self.check(&Token::LParen) {
            self.advance();
            let args = self.parse_args()?;
            Ok(Filter::Method {
                name,
                args,
                position,
            })
        } else {
            Ok(Filter::Attribute { name, position })
        }
    }

    fn parse_dotted_step(&mut self) -> Result<Filter, ParseError> {
        let position = self.position();
        match self.current().token {
            Token::Identifier(_) => self.parse_segment(),
            Token::Integer(index) => {
                self.advance();
                if self.check(&Token::Colon) {
                    self.parse_slice(Some(index), position)
                } else {
                    Ok(Filter::Index { index, position })
                }
            }
            Token::Colon => self.parse_slice(None, position),
            _ => Err(self.unexpected("attribute, method, index or slice")),
        }
    }

    /// Parses the inside of `[index]` or `[start:stop:step]`, with the `[` consumed.
    fn parse_bracket_step(&mut self) -> Result<Filter, ParseError> {
        let position = self.position();
        let filter = match self.current().token {
            Token::Integer(index) => {
                self.advance();
                if self.check(&Token::Colon) {
                    self.parse_slice(Some(index), position)?
                } else {
                    Filter::Index { index, position }
                }
            }
            Token::Colon => self.parse_slice(None, position)?,
            _ => return Err(self.unexpected("index or slice")),
        };
        self.expect(Token::RBracket, "']'")?;
        Ok(filter)
    }

    fn parse_optional_integer(&mut self) -> Option<i64> {
        match self.current().token {
            Token::Integer(n) => {
                self.advance();
                Some(n)
            }
            _ => None,
        }
    }

    /// Parses `:stop` and `:step` after the optional start.
    fn parse_slice(&mut self, start: Option<i64>, position: Position) -> Result<Filter, ParseError> {
        self.expect(Token::Colon, "':'")?;
        let stop = self.parse_optional_integer();

        let step = if self.check(&Token::Colon) {
            self.advance();
            let step_position = self.position();
            let step = self.parse_optional_integer();
            if step == Some(0) {
                return Err(ParseError::ZeroSliceStep {
                    position: step_position,
                });
            }
            step
        } else {
            None
        };

        Ok(Filter::Slice {
            start,
            stop,
            step,
            position,
        })
    }

    /// Parses arguments up to and including the closing `)`.
    fn parse_args(&mut self) -> Result<Vec<Arg>, ParseError> {
        let mut args: Vec<Arg> = vec![];
        let mut seen_named = false;

        while !self.check(&Token::RParen) {
            let position = self.position();

            let is_named = matches!(self.current().token, Token::Identifier(_))
                && matches!(self.peek(1), Token::Colon | Token::Equals);

            if is_named {
                let name = match self.advance() {
                    Token::Identifier(name) => name,
                    _ => return Err(self.unexpected("argument name")),
                };
                self.advance(); // consume ':' or '='

                let duplicate = args
                    .iter()
                    .any(|arg| matches!(arg, Arg::Named { name: n, .. } if *n == name));
                if duplicate {
                    return Err(ParseError::DuplicateArgument { name, position });
                }

                let value = self.parse_literal()?;
                args.push(Arg::Named { name, value });
                seen_named = true;
            } else {
                if seen_named {
                    return Err(ParseError::PositionalAfterNamed { position });
                }
                args.push(Arg::Positional(self.parse_literal()?));
            }

            if !self.check(&Token::RParen) {
                self.expect(Token::Comma, "',' or ')'")?;
            }
        }

        self.expect(Token::RParen, "')'")?;
        Ok(args)
    }

    fn parse_literal(&mut self) -> Result<Literal, ParseError> {
        let literal = match &self.current().token {
            Token::String(_) | Token::Integer(_) | Token::Float(_) => {
                match self.advance() {
                    Token::String(s) => Literal::String(s),
                    Token::Integer(n) => Literal::Integer(n),
                    Token::Float(n) => Literal::Float(n),
                    _ => return Err(self.unexpected("literal")),
                }
            }
            Token::Identifier(word) => {
                let literal = match word.to_ascii_lowercase().as_str() {
                    "true" => Literal::Boolean(true),
                    "false" => Literal::Boolean(false),
                    "null" | "none" | "nil" => Literal::Null,
                    _ => return Err(self.unexpected("literal")),
                };
                self.advance();
                literal
            }
            _ => return Err(self.unexpected("literal")),
        };
        Ok(literal)
    }
}

/// Parses a query string into its resource tree.
///
/// # Examples
///
/// ```
/// use dataql::parser::parse;
///
/// let query = parse("User.get('Elon Musk') { name, first_company: companies.0.name }").unwrap();
/// assert_eq!(query.entry_point(), "User");
/// assert_eq!(query.root.children.len(), 2);
/// assert_eq!(
///     query.to_string(),
///     "User.get('Elon Musk') { name, first_company: companies[0].name }"
/// );
/// ```
pub fn parse(input: &str) -> Result<Query, ParseError> {
    let query = Parser::new(Lexer::new(input))?.parse_query()?;
    debug!(
        entry_point = query.entry_point(),
        children = query.root.children.len(),
        "query parsed"
    );
    Ok(query)
}
