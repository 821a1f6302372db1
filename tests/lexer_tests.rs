// tests/lexer_tests.rs

use dataql::ast::Token;
use dataql::lexer::{LexError, Lexer, Position};
use rstest::rstest;

fn tokens(input: &str) -> Vec<Token> {
    Lexer::new(input)
        .tokenize()
        .unwrap()
        .into_iter()
        .map(|spanned| spanned.token)
        .collect()
}

fn ident(name: &str) -> Token {
    Token::Identifier(name.to_string())
}

// ============================================================================
// Punctuation
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("(", Token::LParen),
        (")", Token::RParen),
        ("[", Token::LBracket),
        ("]", Token::RBracket),
        ("{", Token::LBrace),
        ("}", Token::RBrace),
        (".", Token::Dot),
        (",", Token::Comma),
        (":", Token::Colon),
        ("=", Token::Equals),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap().token;
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap().token, Token::Eof);
    }
}

#[test]
fn test_empty_input_is_eof() {
    assert_eq!(tokens(""), vec![Token::Eof]);
    assert_eq!(tokens("  \n\t "), vec![Token::Eof]);
}

#[test]
fn test_eof_is_repeated() {
    let mut lexer = Lexer::new("x");
    lexer.next_token().unwrap();
    assert_eq!(lexer.next_token().unwrap().token, Token::Eof);
    assert_eq!(lexer.next_token().unwrap().token, Token::Eof);
}

// ============================================================================
// Identifiers
// ============================================================================

#[test]
fn test_identifiers() {
    let test_cases = vec![
        "x",
        "User",
        "created_year",
        "camelCase",
        "_private",
        "__type__",
        "a1b2c3",
    ];

    for input in test_cases {
        assert_eq!(tokens(input), vec![ident(input), Token::Eof], "Failed for input: {}", input);
    }
}

#[test]
fn test_keywords_are_identifiers() {
    for word in ["true", "False", "null", "NONE", "nil"] {
        assert_eq!(tokens(word), vec![ident(word), Token::Eof]);
    }
}

#[test]
fn test_identifier_cannot_start_with_digit() {
    assert_eq!(tokens("1abc"), vec![Token::Integer(1), ident("abc"), Token::Eof]);
}

// ============================================================================
// Numbers
// ============================================================================

#[rstest]
#[case("0", Token::Integer(0))]
#[case("42", Token::Integer(42))]
#[case("-7", Token::Integer(-7))]
#[case("+7", Token::Integer(7))]
#[case("2.5", Token::Float(2.5))]
#[case("-0.5", Token::Float(-0.5))]
#[case("1e+50", Token::Float(1e50))]
#[case("-2.5E-3", Token::Float(-2.5e-3))]
#[case("3e2", Token::Float(300.0))]
fn test_numbers(#[case] input: &str, #[case] expected: Token) {
    assert_eq!(tokens(input), vec![expected, Token::Eof]);
}

#[test]
fn test_integer_too_large_becomes_float() {
    assert_eq!(
        tokens("99999999999999999999"),
        vec![Token::Float(1e20), Token::Eof]
    );
}

#[test]
fn test_exponent_needs_digits() {
    assert_eq!(tokens("1e"), vec![Token::Integer(1), ident("e"), Token::Eof]);
}

#[test]
fn test_infinite_float_is_invalid() {
    let err = Lexer::new("1e999").tokenize().unwrap_err();
    assert!(matches!(err, LexError::InvalidNumber { ref text, .. } if text == "1e999"));
}

#[test]
fn test_numbers_after_dot_are_integers() {
    assert_eq!(
        tokens("matrix.0.1"),
        vec![
            ident("matrix"),
            Token::Dot,
            Token::Integer(0),
            Token::Dot,
            Token::Integer(1),
            Token::Eof,
        ]
    );
}

#[test]
fn test_negative_index_after_dot() {
    assert_eq!(
        tokens("companies.-1.name"),
        vec![
            ident("companies"),
            Token::Dot,
            Token::Integer(-1),
            Token::Dot,
            ident("name"),
            Token::Eof,
        ]
    );
}

#[test]
fn test_floats_outside_paths() {
    assert_eq!(
        tokens("round(0.1)"),
        vec![
            ident("round"),
            Token::LParen,
            Token::Float(0.1),
            Token::RParen,
            Token::Eof,
        ]
    );
}

#[test]
fn test_lone_minus_is_invalid() {
    let err = Lexer::new("a - b").tokenize().unwrap_err();
    assert_eq!(
        err,
        LexError::UnexpectedCharacter {
            character: '-',
            position: Position {
                offset: 2,
                line: 1,
                column: 3
            },
        }
    );
}

// ============================================================================
// Strings
// ============================================================================

#[rstest]
#[case("'Elon Musk'", "Elon Musk")]
#[case("\"%x\"", "%x")]
#[case("''", "")]
#[case(r"'it\'s'", "it's")]
#[case(r#""say \"hi\"""#, "say \"hi\"")]
#[case(r"'back\\slash'", "back\\slash")]
#[case(r"'a\nb\tc\rd'", "a\nb\tc\rd")]
#[case(r"'\q'", "q")]
#[case("'double \" inside'", "double \" inside")]
fn test_strings(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(tokens(input), vec![Token::String(expected.to_string()), Token::Eof]);
}

#[test]
fn test_unterminated_string() {
    let err = Lexer::new("get('Elon").tokenize().unwrap_err();
    assert_eq!(
        err,
        LexError::UnterminatedString {
            position: Position {
                offset: 4,
                line: 1,
                column: 5
            }
        }
    );
}

#[test]
fn test_unterminated_string_after_backslash() {
    let err = Lexer::new(r"'abc\").tokenize().unwrap_err();
    assert!(matches!(err, LexError::UnterminatedString { .. }));
}

// ============================================================================
// Positions
// ============================================================================

#[test]
fn test_positions_track_lines_and_columns() {
    let spanned = Lexer::new("User {\n  name,\n  age\n}").tokenize().unwrap();

    let positions: Vec<(usize, usize)> = spanned
        .iter()
        .map(|t| (t.position.line, t.position.column))
        .collect();

    assert_eq!(
        positions,
        vec![(1, 1), (1, 6), (2, 3), (2, 7), (3, 3), (4, 1), (4, 2)]
    );
    assert_eq!(spanned[2].position.offset, 9);
}

#[test]
fn test_unexpected_character_reports_position() {
    let err = Lexer::new("User {\n  na$me\n}").tokenize().unwrap_err();
    assert_eq!(err.position().line, 2);
    assert_eq!(err.position().column, 5);
    assert_eq!(err.to_string(), "unexpected character '$' at line 2, column 5");
}

// ============================================================================
// Whole Queries
// ============================================================================

#[test]
fn test_full_query() {
    assert_eq!(
        tokens("User.get('Elon Musk') { year: created_year, companies[name], }"),
        vec![
            ident("User"),
            Token::Dot,
            ident("get"),
            Token::LParen,
            Token::String("Elon Musk".to_string()),
            Token::RParen,
            Token::LBrace,
            ident("year"),
            Token::Colon,
            ident("created_year"),
            Token::Comma,
            ident("companies"),
            Token::LBracket,
            ident("name"),
            Token::RBracket,
            Token::Comma,
            Token::RBrace,
            Token::Eof,
        ]
    );
}

#[test]
fn test_slice_tokens() {
    assert_eq!(
        tokens("items[1:-1:2]"),
        vec![
            ident("items"),
            Token::LBracket,
            Token::Integer(1),
            Token::Colon,
            Token::Integer(-1),
            Token::Colon,
            Token::Integer(2),
            Token::RBracket,
            Token::Eof,
        ]
    );
}

#[test]
fn test_named_argument_with_equals() {
    assert_eq!(
        tokens("round(ndigits=2)"),
        vec![
            ident("round"),
            Token::LParen,
            ident("ndigits"),
            Token::Equals,
            Token::Integer(2),
            Token::RParen,
            Token::Eof,
        ]
    );
}
