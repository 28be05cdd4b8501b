use crate::ast::span::Span;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,

    // Identifiers
    Identifier(String),
    QuotedIdentifier(String),

    // Comparison operators
    Equal,          // =
    NotEqual,       // != or <>
    LessThan,       // <
    LessOrEqual,    // <=
    GreaterThan,    // >
    GreaterOrEqual, // >=

    // Keyword operators
    Like,
    In,
    Is,

    // Connectives
    And,
    Or,
    Not,

    // Delimiters
    LeftParen,  // (
    RightParen, // )
    Comma,      // ,

    // Special
    Eof,
}

/// Coarse token classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCategory {
    Identifier,
    StringLiteral,
    NumericLiteral,
    BooleanLiteral,
    NullLiteral,
    ComparisonOperator,
    LogicalConnective,
    Punctuation,
    EndOfInput,
}

impl TokenKind {
    pub fn category(&self) -> TokenCategory {
        match self {
            TokenKind::String(_) => TokenCategory::StringLiteral,
            TokenKind::Integer(_) | TokenKind::Float(_) => TokenCategory::NumericLiteral,
            TokenKind::Boolean(_) => TokenCategory::BooleanLiteral,
            TokenKind::Null => TokenCategory::NullLiteral,
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => TokenCategory::Identifier,
            TokenKind::Equal
            | TokenKind::NotEqual
            | TokenKind::LessThan
            | TokenKind::LessOrEqual
            | TokenKind::GreaterThan
            | TokenKind::GreaterOrEqual
            | TokenKind::Like
            | TokenKind::In
            | TokenKind::Is => TokenCategory::ComparisonOperator,
            TokenKind::And | TokenKind::Or | TokenKind::Not => TokenCategory::LogicalConnective,
            TokenKind::LeftParen | TokenKind::RightParen | TokenKind::Comma => {
                TokenCategory::Punctuation
            }
            TokenKind::Eof => TokenCategory::EndOfInput,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::String(s) => write!(f, "'{}'", s),
            TokenKind::Integer(n) => write!(f, "{}", n),
            TokenKind::Float(n) => write!(f, "{:?}", n),
            TokenKind::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            TokenKind::Null => write!(f, "NULL"),
            TokenKind::Identifier(s) => write!(f, "{}", s),
            TokenKind::QuotedIdentifier(s) => write!(f, "`{}`", s),
            TokenKind::Equal => write!(f, "="),
            TokenKind::NotEqual => write!(f, "!="),
            TokenKind::LessThan => write!(f, "<"),
            TokenKind::LessOrEqual => write!(f, "<="),
            TokenKind::GreaterThan => write!(f, ">"),
            TokenKind::GreaterOrEqual => write!(f, ">="),
            TokenKind::Like => write!(f, "LIKE"),
            TokenKind::In => write!(f, "IN"),
            TokenKind::Is => write!(f, "IS"),
            TokenKind::And => write!(f, "AND"),
            TokenKind::Or => write!(f, "OR"),
            TokenKind::Not => write!(f, "NOT"),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}
