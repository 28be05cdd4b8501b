//! Parser tests over the full filter grammar

use filter_syntax::{ComparisonOperator, ExpressionKind, Filter, Literal, parse};

fn root_kind(filter: &Filter) -> &ExpressionKind {
    &filter.root().expect("filter should not be empty").kind
}

#[test]
fn test_parse_empty_input() {
    assert!(parse("").unwrap().is_empty());
    assert!(parse("  \n\t ").unwrap().is_empty());
    assert_eq!(parse("").unwrap().to_prefix_notation(), "");
}

#[test]
fn test_parse_comparison() {
    let filter = parse("age > 30").unwrap();

    match root_kind(&filter) {
        ExpressionKind::Comparison {
            column,
            operator,
            value,
        } => {
            assert_eq!(column.name, "age");
            assert_eq!(*operator, ComparisonOperator::GreaterThan);
            assert_eq!(*value, Literal::Integer(30));
        }
        other => panic!("unexpected node {:?}", other),
    }
}

#[test]
fn test_parse_each_comparison_operator() {
    let cases = [
        ("a = 1", ComparisonOperator::Equal),
        ("a != 1", ComparisonOperator::NotEqual),
        ("a <> 1", ComparisonOperator::NotEqual),
        ("a < 1", ComparisonOperator::LessThan),
        ("a <= 1", ComparisonOperator::LessOrEqual),
        ("a > 1", ComparisonOperator::GreaterThan),
        ("a >= 1", ComparisonOperator::GreaterOrEqual),
    ];

    for (input, expected) in cases {
        let filter = parse(input).unwrap();
        match root_kind(&filter) {
            ExpressionKind::Comparison { operator, .. } => assert_eq!(*operator, expected, "{input}"),
            other => panic!("unexpected node for {input}: {:?}", other),
        }
    }
}

#[test]
fn test_parse_literals() {
    let cases = [
        ("a = 'x'", Literal::String("x".into())),
        ("a = \"x\"", Literal::String("x".into())),
        ("a = -4", Literal::Integer(-4)),
        ("a = 2.5", Literal::Float(2.5)),
        ("a = 1e3", Literal::Float(1000.0)),
        ("a = true", Literal::Boolean(true)),
        ("a = FALSE", Literal::Boolean(false)),
        ("a = null", Literal::Null),
    ];

    for (input, expected) in cases {
        let filter = parse(input).unwrap();
        match root_kind(&filter) {
            ExpressionKind::Comparison { value, .. } => assert_eq!(*value, expected, "{input}"),
            other => panic!("unexpected node for {input}: {:?}", other),
        }
    }
}

#[test]
fn test_parse_in_list() {
    let filter = parse("name IN ('a', 'b')").unwrap();

    match root_kind(&filter) {
        ExpressionKind::In { column, values } => {
            assert_eq!(column.name, "name");
            assert_eq!(
                values,
                &vec![Literal::String("a".into()), Literal::String("b".into())]
            );
        }
        other => panic!("unexpected node {:?}", other),
    }
}

#[test]
fn test_parse_not_in_and_not_like() {
    let filter = parse("color NOT IN ('RED')").unwrap();
    match root_kind(&filter) {
        ExpressionKind::Not { operand } => {
            assert!(matches!(operand.kind, ExpressionKind::In { .. }))
        }
        other => panic!("unexpected node {:?}", other),
    }

    let filter = parse("name not like 'a%'").unwrap();
    match root_kind(&filter) {
        ExpressionKind::Not { operand } => assert!(matches!(
            operand.kind,
            ExpressionKind::Comparison {
                operator: ComparisonOperator::Like,
                ..
            }
        )),
        other => panic!("unexpected node {:?}", other),
    }
}

#[test]
fn test_parse_is_null() {
    let filter = parse("a IS NULL").unwrap();
    assert!(matches!(
        root_kind(&filter),
        ExpressionKind::IsNull { negated: false, .. }
    ));

    let filter = parse("a is not null").unwrap();
    assert!(matches!(
        root_kind(&filter),
        ExpressionKind::IsNull { negated: true, .. }
    ));
}

#[test]
fn test_parse_column_comparison() {
    let filter = parse("table1.id = table2.id").unwrap();

    match root_kind(&filter) {
        ExpressionKind::ColumnComparison { left, right, .. } => {
            assert_eq!(left.segments(), vec!["table1", "id"]);
            assert_eq!(right.name, "table2.id");
        }
        other => panic!("unexpected node {:?}", other),
    }
}

#[test]
fn test_parse_backtick_column() {
    let filter = parse("`order date` IS NULL").unwrap();

    match root_kind(&filter) {
        ExpressionKind::IsNull { column, .. } => {
            assert_eq!(column.name, "order date");
            assert!(column.quoted);
        }
        other => panic!("unexpected node {:?}", other),
    }
}

#[test]
fn test_parse_timestamp_literal_in_list() {
    let filter = parse("ts IN (TIMESTAMP '2024-01-01', TIMESTAMP '2024-01-02 10:00:00')").unwrap();

    match root_kind(&filter) {
        ExpressionKind::In { values, .. } => {
            assert!(values.iter().all(|v| matches!(v, Literal::Timestamp(_))))
        }
        other => panic!("unexpected node {:?}", other),
    }
}

#[test]
fn test_parse_is_deterministic() {
    let input = "a = 1 OR NOT (b < 2.5 AND c IN ('x', 'y')) AND d IS NOT NULL";
    assert_eq!(parse(input).unwrap(), parse(input).unwrap());
}

#[test]
fn test_and_binds_tighter_than_or() {
    let implicit = parse("a=1 OR b=2 AND c=3").unwrap();
    let explicit = parse("a=1 OR (b=2 AND c=3)").unwrap();

    assert_eq!(implicit.to_prefix_notation(), explicit.to_prefix_notation());
    assert_eq!(
        implicit.to_prefix_notation(),
        "(OR (= Column<a> 1) (AND (= Column<b> 2) (= Column<c> 3)))"
    );
}

#[test]
fn test_not_binds_tighter_than_and() {
    let filter = parse("NOT a = 1 AND b = 2").unwrap();
    assert_eq!(
        filter.to_prefix_notation(),
        "(AND (NOT (= Column<a> 1)) (= Column<b> 2))"
    );
}

#[test]
fn test_chains_associate_left() {
    let filter = parse("a = 1 AND b = 2 AND c = 3").unwrap();
    assert_eq!(
        filter.to_prefix_notation(),
        "(AND (AND (= Column<a> 1) (= Column<b> 2)) (= Column<c> 3))"
    );
}

#[test]
fn test_parentheses_override_precedence() {
    let filter = parse("(a = 1 OR b = 2) AND c = 3").unwrap();
    assert_eq!(
        filter.to_prefix_notation(),
        "(AND (OR (= Column<a> 1) (= Column<b> 2)) (= Column<c> 3))"
    );
}

#[test]
fn test_columns_are_collected_once() {
    let filter = parse("a > 1 AND (b = 2 OR a < 10) AND c = b").unwrap();
    assert_eq!(filter.columns(), vec!["a", "b", "c"]);
}

#[test]
fn test_spans_cover_source() {
    let input = "age > 30 AND country = 'US'";
    let filter = parse(input).unwrap();
    let root = filter.root().unwrap();

    assert_eq!(root.span.start, 0);
    assert_eq!(root.span.end, input.len());

    match &root.kind {
        ExpressionKind::And { right, .. } => {
            assert_eq!(&input[right.span.start..right.span.end], "country = 'US'")
        }
        other => panic!("unexpected node {:?}", other),
    }
}

#[test]
fn test_syntax_errors() {
    let cases = [
        ("a = ", 4, "expected literal, found end of input"),
        ("a", 1, "expected comparison operator, found end of input"),
        ("= 1", 0, "expected column name, found ="),
        ("(a = 1", 6, "expected `)`, found end of input"),
        ("a IS 1", 5, "expected `NULL` after `IS`, found 1"),
        ("a NOT = 1", 6, "expected `IN` or `LIKE` after `NOT`, found ="),
        ("a LIKE 5", 7, "expected string pattern after `LIKE`, found 5"),
        ("a IN 1", 5, "expected `(` after `IN`, found 1"),
        ("a IN (1 2)", 8, "expected `,` or `)` in IN list, found 2"),
        ("a IN ()", 6, "expected literal, found )"),
        ("a = 1 AND", 9, "expected column name, found end of input"),
        ("a = 1 )", 6, "expected end of input, found )"),
    ];

    for (input, offset, message) in cases {
        let err = parse(input).unwrap_err();
        assert_eq!(err.offset, offset, "offset for {input:?}");
        assert_eq!(err.message, message, "message for {input:?}");
    }
}

#[test]
fn test_syntax_error_line_and_column() {
    let err = parse("a = 1\nAND b ~ 2").unwrap_err();
    assert_eq!(err.line, 2);
    assert_eq!(err.column, 7);
    assert_eq!(err.offset, 12);
}
