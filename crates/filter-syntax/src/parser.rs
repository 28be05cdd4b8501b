use crate::{
    ast::{
        expr::{Expression, ExpressionKind},
        filter::Filter,
        ident::Identifier,
        literal::Literal,
        operator::ComparisonOperator,
        span::Span,
    },
    error::{ParseResult, SyntaxError},
    lexer::{
        Lexer, eof_token,
        token::{Token, TokenKind},
    },
};
use tracing::debug;

/// Parentheses and `NOT` may nest at most this deep.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Height limit of the parsed tree. Chains associate to the left, so a flat
/// chain of `n` conditions is already `n` levels deep.
pub const MAX_EXPRESSION_DEPTH: usize = 256;

/// A parsed subtree and its height.
type Subtree = (Expression, usize);

/// Parse filter text into a typed AST.
///
/// Empty or whitespace-only input yields the empty filter.
pub fn parse(input: &str) -> ParseResult<Filter> {
    let filter = Parser::new(input)?.parse_filter()?;
    debug!(
        columns = ?filter.columns(),
        depth = filter.root().map_or(0, Expression::depth),
        "Parsed filter"
    );
    Ok(filter)
}

/// Recursive-descent parser with one token of lookahead.
///
/// Precedence from loosest to tightest: `OR`, `AND`, `NOT`. Chains of the
/// same connective associate to the left. Every subtree is returned with its
/// height so that no tree deeper than [`MAX_EXPRESSION_DEPTH`] is built.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    previous: Span,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> ParseResult<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next().unwrap_or_else(|| Ok(eof_token(input)))?;
        Ok(Parser {
            lexer,
            previous: current.span,
            current,
            depth: 0,
        })
    }

    pub fn parse_filter(mut self) -> ParseResult<Filter> {
        if self.current.is_eof() {
            return Ok(Filter::empty());
        }

        let (root, _) = self.parse_or_expression()?;
        if !self.current.is_eof() {
            return Err(self.error_at_current("expected end of input"));
        }
        Ok(Filter::new(root))
    }

    fn parse_or_expression(&mut self) -> ParseResult<Subtree> {
        let (mut left, mut height) = self.parse_and_expression()?;

        while self.check_token(&TokenKind::Or) {
            let connective = self.current.span;
            grow(height, connective)?;
            self.advance()?;
            let (right, right_height) = self.parse_and_expression()?;
            height = grow(height.max(right_height), connective)?;
            left = Expression::or(left, right);
        }

        Ok((left, height))
    }

    fn parse_and_expression(&mut self) -> ParseResult<Subtree> {
        let (mut left, mut height) = self.parse_unary_expression()?;

        while self.check_token(&TokenKind::And) {
            let connective = self.current.span;
            grow(height, connective)?;
            self.advance()?;
            let (right, right_height) = self.parse_unary_expression()?;
            height = grow(height.max(right_height), connective)?;
            left = Expression::and(left, right);
        }

        Ok((left, height))
    }

    fn parse_unary_expression(&mut self) -> ParseResult<Subtree> {
        if self.check_token(&TokenKind::Not) {
            self.enter()?;
            let start = self.advance()?.span;
            let (operand, operand_height) = self.parse_unary_expression()?;
            self.depth -= 1;
            let height = grow(operand_height, start)?;
            let span = start.to(&operand.span);
            return Ok((Expression::not(operand, span), height));
        }

        self.parse_primary_expression()
    }

    fn parse_primary_expression(&mut self) -> ParseResult<Subtree> {
        if self.check_token(&TokenKind::LeftParen) {
            self.enter()?;
            let open = self.advance()?.span;
            let (mut inner, height) = self.parse_or_expression()?;
            let close = self.expect(&TokenKind::RightParen, "expected `)`")?;
            self.depth -= 1;
            inner.span = open.to(&close.span);
            return Ok((inner, height));
        }

        let predicate = self.parse_predicate()?;
        let height = predicate.depth();
        Ok((predicate, height))
    }

    fn parse_predicate(&mut self) -> ParseResult<Expression> {
        let column = self.parse_column()?;

        match &self.current.kind {
            TokenKind::Is => {
                self.advance()?;
                let negated = self.match_token(&TokenKind::Not)?;
                self.expect(&TokenKind::Null, "expected `NULL` after `IS`")?;
                let span = column.span.to(&self.previous);
                Ok(Expression::new(ExpressionKind::IsNull { column, negated }, span))
            }
            TokenKind::Not => {
                self.advance()?;
                let inner = match &self.current.kind {
                    TokenKind::In => self.parse_in_list(column)?,
                    TokenKind::Like => self.parse_like(column)?,
                    _ => return Err(self.error_at_current("expected `IN` or `LIKE` after `NOT`")),
                };
                let span = inner.span;
                Ok(Expression::not(inner, span))
            }
            TokenKind::In => self.parse_in_list(column),
            TokenKind::Like => self.parse_like(column),
            _ => self.parse_comparison(column),
        }
    }

    fn parse_comparison(&mut self, column: Identifier) -> ParseResult<Expression> {
        let operator = self
            .match_comparison_operator()?
            .ok_or_else(|| self.error_at_current("expected comparison operator"))?;

        let start = column.span;
        let kind = match &self.current.kind {
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => {
                let right = self.parse_column()?;
                if !right.quoted
                    && right.name.eq_ignore_ascii_case("timestamp")
                    && matches!(self.current.kind, TokenKind::String(_))
                {
                    ExpressionKind::Comparison {
                        column,
                        operator,
                        value: self.parse_timestamp_body()?,
                    }
                } else {
                    ExpressionKind::ColumnComparison {
                        left: column,
                        operator,
                        right,
                    }
                }
            }
            _ => ExpressionKind::Comparison {
                column,
                operator,
                value: self.parse_literal()?,
            },
        };

        Ok(Expression::new(kind, start.to(&self.previous)))
    }

    fn parse_like(&mut self, column: Identifier) -> ParseResult<Expression> {
        self.advance()?;
        let pattern = match &self.current.kind {
            TokenKind::String(pattern) => pattern.clone(),
            _ => return Err(self.error_at_current("expected string pattern after `LIKE`")),
        };
        self.advance()?;

        let span = column.span.to(&self.previous);
        Ok(Expression::new(
            ExpressionKind::Comparison {
                column,
                operator: ComparisonOperator::Like,
                value: Literal::String(pattern),
            },
            span,
        ))
    }

    fn parse_in_list(&mut self, column: Identifier) -> ParseResult<Expression> {
        self.advance()?;
        self.expect(&TokenKind::LeftParen, "expected `(` after `IN`")?;

        let mut values = vec![self.parse_literal()?];
        loop {
            if self.match_token(&TokenKind::Comma)? {
                values.push(self.parse_literal()?);
            } else if self.match_token(&TokenKind::RightParen)? {
                break;
            } else {
                return Err(self.error_at_current("expected `,` or `)` in IN list"));
            }
        }

        let span = column.span.to(&self.previous);
        Ok(Expression::new(ExpressionKind::In { column, values }, span))
    }

    fn parse_column(&mut self) -> ParseResult<Identifier> {
        let ident = match &self.current.kind {
            TokenKind::Identifier(name) => Identifier::new(name, self.current.span),
            TokenKind::QuotedIdentifier(name) => Identifier::quoted(name, self.current.span),
            _ => return Err(self.error_at_current("expected column name")),
        };
        self.advance()?;
        Ok(ident)
    }

    fn parse_literal(&mut self) -> ParseResult<Literal> {
        if self.current_is_timestamp_keyword() {
            self.advance()?;
            return self.parse_timestamp_body();
        }

        let literal = match &self.current.kind {
            TokenKind::String(s) => Literal::String(s.clone()),
            TokenKind::Integer(n) => Literal::Integer(*n),
            TokenKind::Float(n) => Literal::Float(*n),
            TokenKind::Boolean(b) => Literal::Boolean(*b),
            TokenKind::Null => Literal::Null,
            _ => return Err(self.error_at_current("expected literal")),
        };
        self.advance()?;
        Ok(literal)
    }

    fn current_is_timestamp_keyword(&self) -> bool {
        matches!(&self.current.kind, TokenKind::Identifier(name) if name.eq_ignore_ascii_case("timestamp"))
    }

    /// Consumes the string token following `TIMESTAMP`.
    fn parse_timestamp_body(&mut self) -> ParseResult<Literal> {
        let literal = match &self.current.kind {
            TokenKind::String(text) => Literal::parse_timestamp(text)
                .map(Literal::Timestamp)
                .ok_or_else(|| {
                    self.error_here(format!("invalid timestamp literal '{}'", text))
                })?,
            _ => return Err(self.error_at_current("expected string after `TIMESTAMP`")),
        };
        self.advance()?;
        Ok(literal)
    }

    fn match_comparison_operator(&mut self) -> ParseResult<Option<ComparisonOperator>> {
        let operator = match self.current.kind {
            TokenKind::Equal => ComparisonOperator::Equal,
            TokenKind::NotEqual => ComparisonOperator::NotEqual,
            TokenKind::LessThan => ComparisonOperator::LessThan,
            TokenKind::LessOrEqual => ComparisonOperator::LessOrEqual,
            TokenKind::GreaterThan => ComparisonOperator::GreaterThan,
            TokenKind::GreaterOrEqual => ComparisonOperator::GreaterOrEqual,
            _ => return Ok(None),
        };
        self.advance()?;
        Ok(Some(operator))
    }

    fn advance(&mut self) -> ParseResult<Token> {
        let next = match self.lexer.next() {
            Some(token) => token?,
            None => eof_token(self.lexer.input()),
        };
        let consumed = std::mem::replace(&mut self.current, next);
        self.previous = consumed.span;
        Ok(consumed)
    }

    fn check_token(&self, expected: &TokenKind) -> bool {
        &self.current.kind == expected
    }

    fn match_token(&mut self, expected: &TokenKind) -> ParseResult<bool> {
        if self.check_token(expected) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, expected: &TokenKind, message: &str) -> ParseResult<Token> {
        if self.check_token(expected) {
            self.advance()
        } else {
            Err(self.error_at_current(message))
        }
    }

    fn enter(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(self.error_here(format!(
                "expression nesting exceeds the maximum depth of {}",
                MAX_NESTING_DEPTH
            )));
        }
        Ok(())
    }

    fn error_at_current(&self, message: &str) -> SyntaxError {
        self.error_here(format!("{}, found {}", message, self.current.kind))
    }

    fn error_here(&self, message: String) -> SyntaxError {
        let span = self.current.span;
        SyntaxError::new(message, span.start, span.line, span.column)
    }
}

/// Height of a node one level above `height`, reported at `at` when too deep.
fn grow(height: usize, at: Span) -> ParseResult<usize> {
    let height = height + 1;
    if height > MAX_EXPRESSION_DEPTH {
        return Err(SyntaxError::new(
            format!(
                "expression exceeds the maximum depth of {} chained or nested conditions",
                MAX_EXPRESSION_DEPTH
            ),
            at.start,
            at.line,
            at.column,
        ));
    }
    Ok(height)
}
