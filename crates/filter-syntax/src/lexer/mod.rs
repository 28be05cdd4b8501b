use crate::{
    ast::span::Span,
    error::{ParseResult, SyntaxError, line_col},
    grammar::{FilterGrammar, Rule},
    lexer::token::{Token, TokenKind},
};
use pest::{
    Parser,
    error::{Error as PestError, InputLocation},
    iterators::{Pair, Pairs},
};

pub mod token;

#[cfg(test)]
mod tests;

/// Iterator over the tokens of a filter string.
///
/// The pest grammar classifies the whole input once in [`Lexer::new`];
/// iteration turns those pairs into tokens in order and ends with exactly one
/// [`TokenKind::Eof`]. The first error ends the sequence.
pub struct Lexer<'a> {
    input: &'a str,
    pairs: Option<Pairs<'a, Rule>>,
    pending_error: Option<SyntaxError>,
    cursor: LineCursor,
    finished: bool,
}

/// Line and column of the last token start, advanced from one token to the
/// next so each input byte is scanned once.
#[derive(Debug, Clone, Copy)]
struct LineCursor {
    offset: usize,
    line: usize,
    column: usize,
}

impl LineCursor {
    fn new() -> Self {
        LineCursor {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// 1-based line and column of `offset`, which must not precede the last one.
    fn advance_to(&mut self, input: &str, offset: usize) -> (usize, usize) {
        let offset = offset.min(input.len());
        if offset < self.offset {
            let (line, column) = line_col(input, offset);
            *self = LineCursor {
                offset,
                line,
                column,
            };
            return (line, column);
        }

        for c in input.get(self.offset..offset).unwrap_or("").chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset = offset;
        (self.line, self.column)
    }
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let (pairs, pending_error) = match FilterGrammar::parse(Rule::tokens, input) {
            Ok(mut pairs) => (pairs.next().map(|p| p.into_inner()), None),
            Err(err) => (None, Some(from_pest_error(err, input))),
        };

        Lexer {
            input,
            pairs,
            pending_error,
            cursor: LineCursor::new(),
            finished: false,
        }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }
}

impl Iterator for Lexer<'_> {
    type Item = ParseResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if let Some(err) = self.pending_error.take() {
            self.finished = true;
            return Some(Err(err));
        }

        let next_pair = self
            .pairs
            .as_mut()
            .and_then(|pairs| pairs.find(|p| p.as_rule() != Rule::EOI));

        match next_pair {
            Some(pair) => {
                let (line, column) = self.cursor.advance_to(self.input, pair.as_span().start());
                let result = token_from_pair(pair, line, column);
                if result.is_err() {
                    self.finished = true;
                }
                Some(result)
            }
            None => {
                self.finished = true;
                let end = self.input.len();
                let (line, column) = self.cursor.advance_to(self.input, end);
                Some(Ok(Token::new(TokenKind::Eof, "", Span::new(end, end, line, column))))
            }
        }
    }
}

/// Tokenizes the whole input eagerly.
pub fn tokenize(input: &str) -> ParseResult<Vec<Token>> {
    Lexer::new(input).collect()
}

pub(crate) fn eof_token(input: &str) -> Token {
    let (line, column) = line_col(input, input.len());
    Token::new(
        TokenKind::Eof,
        "",
        Span::new(input.len(), input.len(), line, column),
    )
}

fn token_from_pair(pair: Pair<'_, Rule>, line: usize, column: usize) -> ParseResult<Token> {
    let span = pair.as_span();
    let lexeme = span.as_str();
    let at = Span::new(span.start(), span.end(), line, column);
    let error = |message: String| SyntaxError::new(message, at.start, line, column);

    let kind = match pair.as_rule() {
        // Literals
        Rule::lit_string => {
            let quote = lexeme.chars().next().unwrap_or('\'');
            TokenKind::String(unescape(&lexeme[1..lexeme.len() - 1], quote))
        }
        Rule::lit_number => parse_number(lexeme).ok_or_else(|| {
            error(format!("numeric literal `{lexeme}` is out of range"))
        })?,
        Rule::lit_boolean => TokenKind::Boolean(lexeme.eq_ignore_ascii_case("true")),
        Rule::lit_null => TokenKind::Null,

        // Identifiers
        Rule::ident => TokenKind::Identifier(lexeme.to_string()),
        Rule::quoted_ident => TokenKind::QuotedIdentifier(lexeme[1..lexeme.len() - 1].to_string()),

        // Keywords
        Rule::kw_and => TokenKind::And,
        Rule::kw_or => TokenKind::Or,
        Rule::kw_not => TokenKind::Not,
        Rule::kw_in => TokenKind::In,
        Rule::kw_is => TokenKind::Is,
        Rule::kw_like => TokenKind::Like,

        // Operators
        Rule::op_eq => TokenKind::Equal,
        Rule::op_ne => TokenKind::NotEqual,
        Rule::op_lt => TokenKind::LessThan,
        Rule::op_le => TokenKind::LessOrEqual,
        Rule::op_gt => TokenKind::GreaterThan,
        Rule::op_ge => TokenKind::GreaterOrEqual,

        // Delimiters
        Rule::lparen => TokenKind::LeftParen,
        Rule::rparen => TokenKind::RightParen,
        Rule::comma => TokenKind::Comma,

        Rule::malformed_number => {
            return Err(error(format!("malformed numeric literal `{lexeme}`")));
        }
        Rule::unterminated_string => return Err(error("unterminated string literal".into())),
        Rule::unknown => return Err(error(format!("unexpected character `{lexeme}`"))),
        other => return Err(error(format!("unexpected token {other:?}"))),
    };

    Ok(Token::new(kind, lexeme, at))
}

/// Integer forms become `Integer`, anything with a fraction or exponent `Float`.
fn parse_number(lexeme: &str) -> Option<TokenKind> {
    if lexeme.contains(['.', 'e', 'E']) {
        lexeme
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(TokenKind::Float)
    } else {
        lexeme.parse::<i64>().ok().map(TokenKind::Integer)
    }
}

/// Resolves `\<quote>` and `\\`; any other backslash sequence is kept as written.
fn unescape(body: &str, quote: char) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next) if next == quote || next == '\\' => out.push(next),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn from_pest_error(err: PestError<Rule>, input: &str) -> SyntaxError {
    let offset = match err.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };
    SyntaxError::at(err.variant.message().to_string(), input, offset)
}
