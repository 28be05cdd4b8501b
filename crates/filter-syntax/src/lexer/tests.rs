use super::*;
use crate::lexer::token::TokenCategory;

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn test_keywords_are_case_insensitive() {
    let tokens = kinds("and OR Not in IS like");

    assert_eq!(
        tokens,
        vec![
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::In,
            TokenKind::Is,
            TokenKind::Like,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_keyword_word_boundaries() {
    // "order" must not lex as OR followed by "der"
    let tokens = kinds("order android island nullable is_active");

    assert_eq!(tokens[0], TokenKind::Identifier("order".into()));
    assert_eq!(tokens[1], TokenKind::Identifier("android".into()));
    assert_eq!(tokens[2], TokenKind::Identifier("island".into()));
    assert_eq!(tokens[3], TokenKind::Identifier("nullable".into()));
    assert_eq!(tokens[4], TokenKind::Identifier("is_active".into()));
}

#[test]
fn test_comparison_operators() {
    let tokens = kinds("= != <> < <= > >=");

    assert_eq!(tokens[0], TokenKind::Equal);
    assert_eq!(tokens[1], TokenKind::NotEqual);
    assert_eq!(tokens[2], TokenKind::NotEqual);
    assert_eq!(tokens[3], TokenKind::LessThan);
    assert_eq!(tokens[4], TokenKind::LessOrEqual);
    assert_eq!(tokens[5], TokenKind::GreaterThan);
    assert_eq!(tokens[6], TokenKind::GreaterOrEqual);
}

#[test]
fn test_operators_without_whitespace() {
    let tokens = kinds("a>=5");

    assert_eq!(
        tokens,
        vec![
            TokenKind::Identifier("a".into()),
            TokenKind::GreaterOrEqual,
            TokenKind::Integer(5),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_numeric_literals() {
    let tokens = kinds("42 -7 +3 3.14 -0.5 .5 1e3 2.5E-2");

    assert_eq!(tokens[0], TokenKind::Integer(42));
    assert_eq!(tokens[1], TokenKind::Integer(-7));
    assert_eq!(tokens[2], TokenKind::Integer(3));
    assert_eq!(tokens[3], TokenKind::Float(3.14));
    assert_eq!(tokens[4], TokenKind::Float(-0.5));
    assert_eq!(tokens[5], TokenKind::Float(0.5));
    assert_eq!(tokens[6], TokenKind::Float(1000.0));
    assert_eq!(tokens[7], TokenKind::Float(0.025));
}

#[test]
fn test_integer_out_of_range() {
    let err = tokenize("a = 99999999999999999999").unwrap_err();

    assert_eq!(err.offset, 4);
    assert!(err.message.contains("out of range"));
}

#[test]
fn test_string_literals_and_escapes() {
    let tokens = kinds(r#"'abc' "xyz" 'it\'s' "say \"hi\"" 'back\\slash' 'keep\n'"#);

    assert_eq!(tokens[0], TokenKind::String("abc".into()));
    assert_eq!(tokens[1], TokenKind::String("xyz".into()));
    assert_eq!(tokens[2], TokenKind::String("it's".into()));
    assert_eq!(tokens[3], TokenKind::String("say \"hi\"".into()));
    assert_eq!(tokens[4], TokenKind::String("back\\slash".into()));
    assert_eq!(tokens[5], TokenKind::String("keep\\n".into()));
}

#[test]
fn test_boolean_and_null_literals() {
    let tokens = kinds("TRUE false Null");

    assert_eq!(tokens[0], TokenKind::Boolean(true));
    assert_eq!(tokens[1], TokenKind::Boolean(false));
    assert_eq!(tokens[2], TokenKind::Null);
}

#[test]
fn test_dotted_and_quoted_identifiers() {
    let tokens = kinds("table1.id `a column` _private");

    assert_eq!(tokens[0], TokenKind::Identifier("table1.id".into()));
    assert_eq!(tokens[1], TokenKind::QuotedIdentifier("a column".into()));
    assert_eq!(tokens[2], TokenKind::Identifier("_private".into()));
}

#[test]
fn test_token_spans_are_byte_offsets() {
    let tokens = tokenize("age  >= 30").unwrap();

    assert_eq!(tokens[0].span.start, 0);
    assert_eq!(tokens[0].span.end, 3);
    assert_eq!(tokens[1].span.start, 5);
    assert_eq!(tokens[1].lexeme, ">=");
    assert_eq!(tokens[2].span.start, 8);
    assert_eq!(tokens[3].kind, TokenKind::Eof);
    assert_eq!(tokens[3].span.start, 10);
}

#[test]
fn test_unexpected_character_reports_offset() {
    let err = tokenize("a = 1 # b").unwrap_err();

    assert_eq!(err.offset, 6);
    assert_eq!(err.column, 7);
    assert!(err.message.contains('#'));
}

#[test]
fn test_unterminated_string_reports_start() {
    let err = tokenize("name = 'abc").unwrap_err();

    assert_eq!(err.offset, 7);
    assert!(err.message.contains("unterminated"));
}

#[test]
fn test_lexer_stops_after_error() {
    let mut lexer = Lexer::new("a = $ b");

    assert_eq!(
        lexer.next().unwrap().unwrap().kind,
        TokenKind::Identifier("a".into())
    );
    assert_eq!(lexer.next().unwrap().unwrap().kind, TokenKind::Equal);
    assert!(lexer.next().unwrap().is_err());
    assert!(lexer.next().is_none());
}

#[test]
fn test_malformed_number_is_reported_as_such() {
    let err = tokenize("a = 1e").unwrap_err();
    assert_eq!(err.offset, 4);
    assert_eq!(err.message, "malformed numeric literal `1e`");

    let err = tokenize("a > 12abc").unwrap_err();
    assert_eq!(err.message, "malformed numeric literal `12abc`");
}

#[test]
fn test_multiline_positions() {
    let tokens = tokenize("a = 1\n  AND\r\n\tb = 'é' OR c").unwrap();

    let positions: Vec<(usize, usize)> = tokens.iter().map(|t| (t.span.line, t.span.column)).collect();
    assert_eq!(
        positions,
        vec![(1, 1), (1, 3), (1, 5), (2, 3), (3, 2), (3, 4), (3, 6), (3, 10), (3, 13), (3, 14)]
    );
}

#[test]
fn test_positions_on_long_input() {
    let terms = 20_000;
    let input = vec!["a = 1"; terms].join("\nAND ");

    let tokens = tokenize(&input).unwrap();
    assert_eq!(tokens.len(), terms * 4);

    let last = &tokens[tokens.len() - 2];
    assert_eq!(last.kind, TokenKind::Integer(1));
    assert_eq!((last.span.line, last.span.column), (terms, 9));
}

#[test]
fn test_empty_input_yields_only_eof() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
    assert_eq!(kinds("   \t"), vec![TokenKind::Eof]);
}

#[test]
fn test_token_categories() {
    assert_eq!(TokenKind::Like.category(), TokenCategory::ComparisonOperator);
    assert_eq!(TokenKind::Not.category(), TokenCategory::LogicalConnective);
    assert_eq!(TokenKind::Float(1.0).category(), TokenCategory::NumericLiteral);
    assert_eq!(TokenKind::Comma.category(), TokenCategory::Punctuation);
}
