// tests/parser_tests.rs

use dataql::ast::{Arg, Filter, Literal, Query, Resource};
use dataql::parser::{ParseError, parse};
use dataql::LexError;
use rstest::rstest;

fn parse_ok(input: &str) -> Query {
    parse(input).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", input, e))
}

fn keys(query: &Query) -> Vec<&str> {
    query
        .root
        .children
        .iter()
        .map(|child| child.key().unwrap())
        .collect()
}

fn child<'a>(query: &'a Query, index: usize) -> &'a Resource {
    &query.root.children[index]
}

fn step_names(resource: &Resource) -> Vec<String> {
    resource.filters().iter().map(|f| f.to_string()).collect()
}

// ============================================================================
// Root Object
// ============================================================================

#[test]
fn test_parse_simple_query() {
    let query = parse_ok("User { name }");
    assert_eq!(query.entry_point(), "User");
    assert!(query.entry_point_args().is_empty());
    assert_eq!(keys(&query), vec!["name"]);
    assert!(matches!(child(&query, 0), Resource::Field(_)));
}

#[test]
fn test_parse_entry_point_with_arguments() {
    let query = parse_ok("User.get('Elon Musk') { name }");
    assert_eq!(query.entry_point(), "User");
    assert!(query.entry_point_args().is_empty());

    match &query.root.filters[1] {
        Filter::Method { name, args, .. } => {
            assert_eq!(name, "get");
            assert_eq!(args, &vec![Arg::Positional(Literal::String("Elon Musk".into()))]);
        }
        other => panic!("Expected method, got {:?}", other),
    }
}

#[test]
fn test_parse_called_entry_point() {
    let query = parse_ok("Users(active: true) { name }");
    assert_eq!(query.entry_point(), "Users");
    assert_eq!(
        query.entry_point_args(),
        &[Arg::Named {
            name: "active".into(),
            value: Literal::Boolean(true)
        }]
    );
}

#[test]
fn test_parse_empty_object() {
    let query = parse_ok("User {}");
    assert!(query.root.children.is_empty());
}

#[test]
fn test_root_requires_braces() {
    let err = parse("User.name").unwrap_err();
    assert!(matches!(err, ParseError::Unexpected { ref expected, .. } if expected == "'{'"));
}

#[test]
fn test_trailing_tokens_are_rejected() {
    let err = parse("User { name } extra").unwrap_err();
    assert!(matches!(err, ParseError::Unexpected { ref expected, .. } if expected == "end of input"));
}

#[test]
fn test_root_must_start_with_identifier() {
    assert!(parse("{ name }").is_err());
    assert!(parse("'User' { name }").is_err());
}

// ============================================================================
// Children, Keys and Aliases
// ============================================================================

#[test]
fn test_children_keep_declaration_order() {
    let query = parse_ok("User { zeta, alpha, mid }");
    assert_eq!(keys(&query), vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_alias_overrides_key() {
    let query = parse_ok("User { year: created_year, birthday.strftime('%x') }");
    assert_eq!(keys(&query), vec!["year", "birthday"]);
    assert_eq!(child(&query, 0).alias(), Some("year"));
    assert_eq!(step_names(child(&query, 0)), vec!["created_year"]);
}

#[rstest]
#[case("User { year:created_year }")]
#[case("User { year : created_year }")]
#[case("User {\n    year:\n        created_year\n}")]
fn test_whitespace_around_alias_colon(#[case] input: &str) {
    let query = parse_ok(input);
    assert_eq!(keys(&query), vec!["year"]);
}

#[test]
fn test_trailing_comma_in_children() {
    let query = parse_ok("User { name, email, }");
    assert_eq!(keys(&query), vec!["name", "email"]);
}

#[test]
fn test_missing_comma_between_children() {
    let err = parse("User { name email }").unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected ',' or '}', found 'email' at line 1, column 13"
    );
}

#[test]
fn test_duplicate_keys_are_rejected() {
    let err = parse("User { name, name }").unwrap_err();
    match err {
        ParseError::DuplicateKey {
            key,
            position,
            first,
        } => {
            assert_eq!(key, "name");
            assert_eq!(first.column, 8);
            assert_eq!(position.column, 14);
        }
        other => panic!("Expected DuplicateKey, got {:?}", other),
    }
}

#[test]
fn test_alias_can_collide_with_field() {
    assert!(matches!(
        parse("User { name, name: email }"),
        Err(ParseError::DuplicateKey { .. })
    ));
    assert!(parse("User { name, other: name }").is_ok());
}

#[test]
fn test_duplicate_keys_in_nested_objects() {
    assert!(parse("User { owner { a, a } }").is_err());
    assert!(parse("User { a, owner { a } }").is_ok());
}

// ============================================================================
// Filter Chains
// ============================================================================

#[test]
fn test_parse_method_chain() {
    let query = parse_ok("User { birthday.strftime('%x').upper }");
    let field = child(&query, 0);
    assert!(matches!(field, Resource::Field(_)));
    assert_eq!(
        step_names(field),
        vec!["birthday", "strftime('%x')", "upper"]
    );
}

#[test]
fn test_parse_dotted_index() {
    let query = parse_ok("User { first_company: companies.0.name }");
    let filters = child(&query, 0).filters();
    assert!(matches!(filters[1], Filter::Index { index: 0, .. }));
    assert!(matches!(filters[2], Filter::Attribute { ref name, .. } if name == "name"));
}

#[test]
fn test_parse_consecutive_indexes() {
    let query = parse_ok("Grid { cell: matrix.0.1 }");
    let filters = child(&query, 0).filters();
    assert!(matches!(filters[1], Filter::Index { index: 0, .. }));
    assert!(matches!(filters[2], Filter::Index { index: 1, .. }));
}

#[test]
fn test_parse_bracket_index() {
    let query = parse_ok("User { last: companies[-1].name }");
    let filters = child(&query, 0).filters();
    assert!(matches!(filters[1], Filter::Index { index: -1, .. }));
    assert_eq!(filters.len(), 3);
}

#[rstest]
#[case("items[1:3]", Some(1), Some(3), None)]
#[case("items[:2]", None, Some(2), None)]
#[case("items[-2:]", Some(-2), None, None)]
#[case("items[::-1]", None, None, Some(-1))]
#[case("items[:]", None, None, None)]
#[case("items[1:10:2]", Some(1), Some(10), Some(2))]
#[case("items.1:3", Some(1), Some(3), None)]
#[case("items.:2", None, Some(2), None)]
#[case("items.::-1", None, None, Some(-1))]
fn test_parse_slices(
    #[case] path: &str,
    #[case] start: Option<i64>,
    #[case] stop: Option<i64>,
    #[case] step: Option<i64>,
) {
    let query = parse_ok(&format!("Data {{ {} }}", path));
    match &child(&query, 0).filters()[1] {
        Filter::Slice {
            start: s,
            stop: e,
            step: t,
            ..
        } => {
            assert_eq!((*s, *e, *t), (start, stop, step), "Failed for {}", path);
        }
        other => panic!("Expected slice, got {:?}", other),
    }
}

#[test]
fn test_zero_slice_step_is_rejected() {
    assert!(matches!(
        parse("Data { items[::0] }"),
        Err(ParseError::ZeroSliceStep { .. })
    ));
}

#[test]
fn test_slice_followed_by_more_steps() {
    let query = parse_ok("Data { items[1:3][0].name }");
    let filters = child(&query, 0).filters();
    assert_eq!(filters.len(), 4);
    assert!(matches!(filters[1], Filter::Slice { .. }));
    assert!(matches!(filters[2], Filter::Index { index: 0, .. }));
}

#[test]
fn test_float_is_not_an_index() {
    assert!(parse("Data { items[1.5] }").is_err());
}

// ============================================================================
// Arguments
// ============================================================================

#[test]
fn test_parse_all_literal_kinds() {
    let query = parse_ok("X { f('s', \"d\", 1, -2, 2.5, 1e+50, true, FALSE, null, None, nil) }");
    let args = child(&query, 0).filters()[0].args().to_vec();
    assert_eq!(
        args,
        vec![
            Arg::Positional(Literal::String("s".into())),
            Arg::Positional(Literal::String("d".into())),
            Arg::Positional(Literal::Integer(1)),
            Arg::Positional(Literal::Integer(-2)),
            Arg::Positional(Literal::Float(2.5)),
            Arg::Positional(Literal::Float(1e50)),
            Arg::Positional(Literal::Boolean(true)),
            Arg::Positional(Literal::Boolean(false)),
            Arg::Positional(Literal::Null),
            Arg::Positional(Literal::Null),
            Arg::Positional(Literal::Null),
        ]
    );
}

#[test]
fn test_named_arguments_accept_colon_and_equals() {
    let query = parse_ok("X { a: f(1, b: 2, c = 'x',) }");
    let args = child(&query, 0).filters()[0].args().to_vec();
    assert_eq!(
        args,
        vec![
            Arg::Positional(Literal::Integer(1)),
            Arg::Named {
                name: "b".into(),
                value: Literal::Integer(2)
            },
            Arg::Named {
                name: "c".into(),
                value: Literal::String("x".into())
            },
        ]
    );
}

#[test]
fn test_empty_argument_list_is_a_method() {
    let query = parse_ok("X { now() }");
    assert!(matches!(
        child(&query, 0).filters()[0],
        Filter::Method { ref args, .. } if args.is_empty()
    ));
}

#[test]
fn test_positional_after_named_is_rejected() {
    assert!(matches!(
        parse("X { f(a: 1, 2) }"),
        Err(ParseError::PositionalAfterNamed { .. })
    ));
}

#[test]
fn test_duplicate_named_argument_is_rejected() {
    assert!(matches!(
        parse("X { f(a: 1, a = 2) }"),
        Err(ParseError::DuplicateArgument { ref name, .. }) if name == "a"
    ));
}

#[test]
fn test_identifier_is_not_a_literal() {
    let err = parse("X { f(value) }").unwrap_err();
    assert!(matches!(err, ParseError::Unexpected { ref expected, .. } if expected == "literal"));
}

#[test]
fn test_lex_errors_surface_through_parse() {
    assert!(matches!(
        parse("X { f('open) }"),
        Err(ParseError::Lex(LexError::UnterminatedString { .. }))
    ));
}

// ============================================================================
// Lists
// ============================================================================

#[test]
fn test_parse_list_of_fields() {
    let query = parse_ok("User { company_names: companies[name] }");
    match child(&query, 0) {
        Resource::List(list) => {
            assert_eq!(list.key(), Some("company_names"));
            assert_eq!(list.body.len(), 1);
            assert!(matches!(list.body[0], Resource::Field(_)));
        }
        other => panic!("Expected list, got {:?}", other),
    }
}

#[test]
fn test_parse_list_of_anonymous_objects() {
    let query = parse_ok("User { companies[{ name, year: created_year }] }");
    match child(&query, 0) {
        Resource::List(list) => match &list.body[0] {
            Resource::Object(object) => {
                assert!(object.filters.is_empty());
                assert_eq!(object.key(), None);
                assert_eq!(object.children.len(), 2);
            }
            other => panic!("Expected object, got {:?}", other),
        },
        other => panic!("Expected list, got {:?}", other),
    }
}

#[test]
fn test_parse_list_with_several_resources() {
    let query = parse_ok("User { companies[name, created_year, owner { name },] }");
    match child(&query, 0) {
        Resource::List(list) => {
            assert_eq!(list.body.len(), 3);
            assert!(matches!(list.body[2], Resource::Object(_)));
        }
        other => panic!("Expected list, got {:?}", other),
    }
}

#[test]
fn test_parse_nested_anonymous_lists() {
    let query = parse_ok("Grid { matrix[[value]] }");
    match child(&query, 0) {
        Resource::List(outer) => match &outer.body[0] {
            Resource::List(inner) => {
                assert!(inner.filters.is_empty());
                assert_eq!(inner.body.len(), 1);
            }
            other => panic!("Expected inner list, got {:?}", other),
        },
        other => panic!("Expected list, got {:?}", other),
    }
}

#[test]
fn test_index_then_list_body() {
    let query = parse_ok("Grid { first_row: matrix[0][value] }");
    match child(&query, 0) {
        Resource::List(list) => {
            assert!(matches!(list.filters[1], Filter::Index { index: 0, .. }));
        }
        other => panic!("Expected list, got {:?}", other),
    }
}

#[test]
fn test_empty_list_body_is_rejected() {
    assert!(parse("User { companies[] }").is_err());
}

#[test]
fn test_nested_object_child() {
    let query = parse_ok("User { owner.profile { name, email } }");
    match child(&query, 0) {
        Resource::Object(object) => {
            assert_eq!(object.key(), Some("owner"));
            assert_eq!(object.filters.len(), 2);
            assert_eq!(object.children.len(), 2);
        }
        other => panic!("Expected object, got {:?}", other),
    }
}

// ============================================================================
// Canonical Form
// ============================================================================

#[test]
fn test_canonical_form_of_example_query() {
    let query = parse_ok(
        "User.get('Elon Musk') {
            name,
            birthday.strftime('%x'),
            companies[{ name, year:created_year }],
            company_names: companies[name],
            first_company: companies.0.name,
        }",
    );
    assert_eq!(
        query.to_string(),
        "User.get('Elon Musk') { name, birthday.strftime('%x'), \
         companies[{ name, year: created_year }], company_names: companies[name], \
         first_company: companies[0].name }"
    );
}

#[rstest]
#[case("User {}")]
#[case("User { a: b.c(1, x: 'it\\'s', y: null)[1:3][::-1][0] }")]
#[case("Grid { matrix[[value]], rows[a, b { c }] }")]
#[case("X { f(2.5, 1e50, true) }")]
#[case("X { a.-1, b[:-2] }")]
fn test_canonical_form_reparses_to_itself(#[case] input: &str) {
    let canonical = parse_ok(input).to_string();
    let reparsed = parse_ok(&canonical).to_string();
    assert_eq!(canonical, reparsed);
}
