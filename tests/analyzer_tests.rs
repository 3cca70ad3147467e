// tests/analyzer_tests.rs

use std::collections::HashMap;

use chrono::{Local, NaiveDate, TimeZone};
use recsel::ast::{BinOp, Expr};
use recsel::lexer::{Lexer, Position};
use recsel::parser::Parser;
use recsel::{
    Diagnostic, FieldSchema, FieldType, analyze, convert_types, process, validate,
};

fn fields() -> FieldSchema {
    FieldSchema::new()
        .with_field("name", FieldType::String)
        .with_field("author", FieldType::String)
        .with_field("created", FieldType::Date)
        .with_field("size", FieldType::Number)
}

fn parse(query: &str) -> Expr {
    Parser::new(Lexer::new(query)).unwrap().parse().unwrap()
}

fn run(query: &str) -> (Expr, Vec<Diagnostic>) {
    analyze(query, &fields()).unwrap()
}

fn messages(query: &str) -> Vec<String> {
    run(query).1.iter().map(|d| d.to_string()).collect()
}

/// The operands of a comparison at the root.
fn operands(expr: Expr) -> (Expr, Expr) {
    match expr {
        Expr::Binary { left, right, .. } => (*left, *right),
        other => panic!("Expected binary expression, got {:?}", other),
    }
}

fn local(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> chrono::DateTime<Local> {
    Local
        .with_ymd_and_hms(y, m, d, h, min, s)
        .earliest()
        .unwrap()
}

// ============================================================================
// Well-formed queries
// ============================================================================

#[test]
fn test_glob_and_date_query_is_valid() {
    let (expr, diagnostics) = run(r#"name GLOB "a*.txt" AND created > "2021-06-01""#);
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);

    let (glob_cmp, date_cmp) = operands(expr);

    match operands(glob_cmp).1 {
        Expr::Glob(glob) => {
            assert_eq!(glob.source(), "a*.txt");
            assert!(glob.pattern.matches("abc.txt"));
            assert!(!glob.pattern.matches("b.txt"));
            assert_eq!(glob.token.pos, Position::new(1, 11));
        }
        other => panic!("Expected glob literal, got {:?}", other),
    }

    match operands(date_cmp).1 {
        Expr::Date(date) => {
            assert_eq!(date.value, local(2021, 6, 1, 0, 0, 0));
            assert_eq!(
                date.value.naive_local(),
                NaiveDate::from_ymd_opt(2021, 6, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            );
            assert_eq!(date.token.value, "\"2021-06-01\"");
        }
        other => panic!("Expected date literal, got {:?}", other),
    }
}

#[test]
fn test_glob_double_star_and_alternation() {
    let (expr, diagnostics) = run(r#"name GLOB "src**.rs""#);
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    match operands(expr).1 {
        Expr::Glob(glob) => {
            assert!(glob.pattern.matches("src/ast/literals.rs"));
            assert!(!glob.pattern.matches("tests/parser_tests.rs"));
        }
        other => panic!("Expected glob literal, got {:?}", other),
    }

    let (expr, diagnostics) = run(r#"name GLOB "*.{rs,toml}""#);
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    match operands(expr).1 {
        Expr::Glob(glob) => {
            assert_eq!(glob.source(), "*.{rs,toml}");
            assert!(glob.pattern.matches("main.rs"));
            assert!(glob.pattern.matches("Cargo.toml"));
            assert!(!glob.pattern.matches("{rs,toml}"));
        }
        other => panic!("Expected glob literal, got {:?}", other),
    }
}

#[test]
fn test_date_time_literal() {
    let (expr, diagnostics) = run(r#"created <= "2021-06-01 13:45:10""#);
    assert!(diagnostics.is_empty());

    match operands(expr).1 {
        Expr::Date(date) => {
            assert_eq!(date.value, local(2021, 6, 1, 13, 45, 10));
            assert_eq!(date.to_string(), "2021-06-01 13:45:10");
        }
        other => panic!("Expected date literal, got {:?}", other),
    }
}

#[test]
fn test_regex_literal() {
    let (expr, diagnostics) = run(r#"author REGEXP "^J(ohn|ane)$""#);
    assert!(diagnostics.is_empty());

    match operands(expr).1 {
        Expr::Regex(regex) => {
            assert!(regex.regex.is_match("Jane"));
            assert!(!regex.regex.is_match("Janet"));
            assert_eq!(regex.to_string(), "^J(ohn|ane)$");
        }
        other => panic!("Expected regex literal, got {:?}", other),
    }
}

#[test]
fn test_plain_comparisons_are_valid() {
    for query in [
        r#"name = "main.rs""#,
        "size >= 1024",
        r#"NOT (name != "x" OR size < 3)"#,
        r#"!(author = "a") AND (((size = 1)))"#,
    ] {
        let (_, diagnostics) = run(query);
        assert!(diagnostics.is_empty(), "{}: {:?}", query, diagnostics);
    }
}

// ============================================================================
// Coercion
// ============================================================================

#[test]
fn test_side_order_does_not_matter() {
    let (left_field, diagnostics) = run(r#"created = "2021-01-01""#);
    assert!(diagnostics.is_empty());
    let (right_field, diagnostics) = run(r#""2021-01-01" = created"#);
    assert!(diagnostics.is_empty());

    assert!(matches!(operands(left_field).1, Expr::Date(_)));
    match operands(right_field).0 {
        Expr::Date(date) => assert_eq!(date.value, local(2021, 1, 1, 0, 0, 0)),
        other => panic!("Expected date literal, got {:?}", other),
    }
}

#[test]
fn test_date_coercion_applies_to_every_comparison_operator() {
    for op in ["=", "!=", "<", "<=", ">", ">="] {
        let (expr, diagnostics) = run(&format!(r#"created {} "2020-02-29""#, op));
        assert!(diagnostics.is_empty(), "{}", op);
        assert!(matches!(operands(expr).1, Expr::Date(_)), "{}", op);
    }
}

#[test]
fn test_malformed_dates_stay_strings() {
    for literal in [
        "2021-13-01",
        "2021-02-30",
        "2021-06-01 25:00:00",
        "2021-6-1",
        "2021-06-01T00:00:00",
        " 2021-06-01",
        "yesterday",
    ] {
        let (expr, diagnostics) = run(&format!(r#"created > "{}""#, literal));
        assert!(
            matches!(operands(expr).1, Expr::String(_)),
            "{} should not be coerced",
            literal
        );
        let messages: Vec<String> = diagnostics.iter().map(|d| d.to_string()).collect();
        assert_eq!(
            messages,
            vec!["1:1: attempting to compare different types - LHS Type: Date vs RHS Type: String"],
            "{}",
            literal
        );
    }
}

#[test]
fn test_glob_requires_glob_operator_and_string_field() {
    // Equality against a string field keeps the literal a string
    let (expr, _) = run(r#"name = "*.rs""#);
    assert!(matches!(operands(expr).1, Expr::String(_)));

    // Date fields are never glob targets
    let (expr, _) = run(r#"created GLOB "2021-*""#);
    assert!(matches!(operands(expr).1, Expr::String(_)));
}

#[test]
fn test_literal_on_left_of_glob_is_still_coerced() {
    let (expr, diagnostics) = run(r#""*.rs" GLOB name"#);
    let messages: Vec<String> = diagnostics.iter().map(|d| d.to_string()).collect();
    assert_eq!(
        messages,
        vec![
            "1:1: argument on LHS has invalid type: Glob. Allowed types are: String",
            "1:1: argument on RHS has invalid type: String. Allowed types are: Glob",
        ]
    );
    assert!(matches!(operands(expr).0, Expr::Glob(_)));
}

#[test]
fn test_two_literals_are_not_coerced() {
    let (expr, _) = run(r#""2021-01-01" = "2021-01-01""#);
    let (left, right) = operands(expr);
    assert!(matches!(left, Expr::String(_)));
    assert!(matches!(right, Expr::String(_)));
}

#[test]
fn test_unknown_field_is_not_coerced() {
    let (expr, diagnostics) = run(r#"modified > "2021-01-01""#);
    assert!(matches!(operands(expr).1, Expr::String(_)));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "invalid field: modified");
}

#[test]
fn test_coercion_reaches_nested_comparisons() {
    let (expr, diagnostics) =
        run(r#"NOT (size = 1 OR (created = "2021-01-01" AND name REGEXP "x+"))"#);
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    assert_eq!(
        expr.to_string(),
        "NOT (size = 1 OR (created = 2021-01-01 00:00:00 AND name REGEXP x+))"
    );
}

#[test]
fn test_coercion_is_idempotent() {
    let once = convert_types(
        parse(r#"created > "2021-06-01" AND name GLOB "*.txt" OR author REGEXP "^a""#),
        &fields(),
    );
    let twice = convert_types(once.clone(), &fields());
    assert_eq!(once, twice);
}

#[test]
fn test_coercion_preserves_shape_and_positions() {
    let original = parse(r#"(created > "2021-06-01")"#);
    let converted = convert_types(original.clone(), &fields());
    assert_eq!(original.pos(), converted.pos());
    assert_eq!(converted.kind_name(), "ParenExpression");
    match converted {
        Expr::Paren { inner, .. } => match *inner {
            Expr::Binary {
                op: BinOp::GreaterThan,
                right,
                ..
            } => assert_eq!(right.pos(), Position::new(1, 12)),
            other => panic!("Expected comparison, got {:?}", other),
        },
        other => panic!("Expected parentheses, got {:?}", other),
    }
}

// ============================================================================
// Restricted operators
// ============================================================================

#[test]
fn test_glob_rejects_number_operand() {
    assert_eq!(
        messages("name GLOB 123"),
        vec!["1:1: argument on RHS has invalid type: Number. Allowed types are: Glob"]
    );
}

#[test]
fn test_uncompilable_glob_and_regex() {
    assert_eq!(
        messages(r#"name GLOB "[abc""#),
        vec!["1:1: argument on RHS has invalid type: String. Allowed types are: Glob"]
    );
    assert_eq!(
        messages(r#"name GLOB "{a,b""#),
        vec!["1:1: argument on RHS has invalid type: String. Allowed types are: Glob"]
    );
    assert_eq!(
        messages(r#"name REGEXP "(unclosed""#),
        vec!["1:1: argument on RHS has invalid type: String. Allowed types are: Regex"]
    );
}

#[test]
fn test_restricted_operator_checks_both_sides() {
    assert_eq!(
        messages(r#"size REGEXP "a+""#),
        vec![
            "1:1: argument on LHS has invalid type: Number. Allowed types are: String",
            "1:1: argument on RHS has invalid type: String. Allowed types are: Regex",
        ]
    );
}

#[test]
fn test_unknown_field_suppresses_type_checks() {
    assert_eq!(
        messages(r#"missing GLOB 5"#),
        vec!["1:1: invalid field: missing"]
    );
    assert_eq!(
        messages(r#"size = missing"#),
        vec!["1:8: invalid field: missing"]
    );
}

// ============================================================================
// Unrestricted comparisons
// ============================================================================

#[test]
fn test_different_types_are_rejected() {
    assert_eq!(
        messages(r#"size = "text""#),
        vec!["1:1: attempting to compare different types - LHS Type: Number vs RHS Type: String"]
    );
    assert_eq!(
        messages(r#"created < 2021"#),
        vec!["1:1: attempting to compare different types - LHS Type: Date vs RHS Type: Number"]
    );
}

#[test]
fn test_comparing_fields_of_the_same_type() {
    assert!(messages("name = author").is_empty());
    assert_eq!(
        messages("name = size"),
        vec!["1:1: attempting to compare different types - LHS Type: String vs RHS Type: Number"]
    );
}

#[test]
fn test_comparison_of_boolean_expression() {
    assert_eq!(
        messages("(size = 1) = 2"),
        vec!["1:1: comparison expressions must compare value types"]
    );
    // Nested problems are still reported, before the comparison's own
    assert_eq!(
        messages("(bogus = 1) = 2"),
        vec![
            "1:2: invalid field: bogus",
            "1:1: comparison expressions must compare value types",
        ]
    );
}

// ============================================================================
// Logical structure
// ============================================================================

#[test]
fn test_logical_operand_must_be_boolean() {
    assert_eq!(
        messages(r#"size = 1 AND "literal""#),
        vec!["1:14: operands of a logical operator must resolve to boolean values"]
    );
}

#[test]
fn test_both_logical_operands_reported() {
    assert_eq!(
        messages("size OR name"),
        vec![
            "1:1: operands of a logical operator must resolve to boolean values",
            "1:9: operands of a logical operator must resolve to boolean values",
        ]
    );
}

#[test]
fn test_paren_must_contain_boolean() {
    assert_eq!(
        messages("(size) AND size = 1"),
        vec!["1:1: expression in parentheses must resolve to a boolean value"]
    );
    // The inner identifier is still validated
    assert_eq!(
        messages("(missing)"),
        vec![
            "1:1: expression in parentheses must resolve to a boolean value",
            "1:2: invalid field: missing",
        ]
    );
}

#[test]
fn test_negation_must_apply_to_boolean() {
    assert_eq!(
        messages("NOT size"),
        vec!["1:1: NOT operator can only be applied to expressions that resolve to a boolean value"]
    );
    assert_eq!(
        messages("!missing"),
        vec![
            "1:1: ! operator can only be applied to expressions that resolve to a boolean value",
            "1:2: invalid field: missing",
        ]
    );
}

#[test]
fn test_all_problems_reported_in_one_pass() {
    let (_, diagnostics) = run(
        "author = 1 AND\n(bogus = \"x\" OR created = \"nope\")\nAND name GLOB size",
    );
    let messages: Vec<String> = diagnostics.iter().map(|d| d.to_string()).collect();
    assert_eq!(
        messages,
        vec![
            "1:1: attempting to compare different types - LHS Type: String vs RHS Type: Number",
            "2:2: invalid field: bogus",
            "2:17: attempting to compare different types - LHS Type: Date vs RHS Type: String",
            "3:5: argument on RHS has invalid type: Number. Allowed types are: Glob",
        ]
    );
}

// ============================================================================
// Root expression
// ============================================================================

#[test]
fn test_non_logical_root_is_rejected() {
    for (query, kind) in [
        ("size", "Identifier"),
        (r#""2021-01-01""#, "StringLiteral"),
        ("42", "NumberLiteral"),
    ] {
        let original = parse(query);
        let (expr, diagnostics) = process(original.clone(), &fields());
        assert_eq!(expr, original);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].to_string(),
            format!("1:1: expected logical expression but received expression of type {}", kind)
        );
    }
}

// ============================================================================
// Oracles
// ============================================================================

#[test]
fn test_hash_map_oracle() {
    let mut oracle = HashMap::new();
    oracle.insert("when".to_string(), FieldType::Date);

    let expr = parse(r#"when = "1999-12-31 23:59:59" AND who = 1"#);
    let (expr, diagnostics) = process(expr, &oracle);

    assert_eq!(diagnostics, vec![Diagnostic::new(Position::new(1, 34), "invalid field: who")]);
    assert!(validate(&expr, &oracle).len() == 1);
    assert_eq!(
        expr.to_string(),
        "when = 1999-12-31 23:59:59 AND who = 1"
    );
}
