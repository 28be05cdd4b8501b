pub mod ast;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod parser;

pub use ast::{
    expr::{Expression, ExpressionKind},
    filter::Filter,
    ident::Identifier,
    literal::Literal,
    operator::ComparisonOperator,
    span::Span,
};
pub use error::{ParseResult, SyntaxError};
pub use lexer::{
    Lexer, tokenize,
    token::{Token, TokenKind},
};
pub use parser::{MAX_EXPRESSION_DEPTH, MAX_NESTING_DEPTH, parse};
