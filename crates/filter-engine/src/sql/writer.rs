//! Accumulates a WHERE clause and its bound parameters.
//!
//! Text only enters the clause as `&'static str` keywords or as identifiers
//! that passed validation. Literal values always become parameters.

use crate::{
    error::{CompileError, CompileResult},
    sql::dialect::Dialect,
};
use filter_syntax::Identifier;
use model::Value;

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_plain_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A column reference that is safe to splice into SQL for one dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedIdentifier(String);

impl QuotedIdentifier {
    /// Validates `ident` and quotes it as a single column name.
    ///
    /// Unquoted names must consist of `[A-Za-z_][A-Za-z0-9_]*` segments. A
    /// dotted name stays one identifier (`"t.id"`), the same column the
    /// in-memory and columnar backends look up. Backtick-quoted names may
    /// contain anything except the dialect's quote character and control
    /// characters.
    pub fn new(ident: &Identifier, dialect: &dyn Dialect) -> CompileResult<Self> {
        let invalid = || CompileError::InvalidIdentifier {
            identifier: ident.name.clone(),
        };

        for segment in ident.segments() {
            let valid = if ident.quoted {
                !segment.is_empty()
                    && !segment
                        .chars()
                        .any(|c| c == dialect.quote_char() || c.is_control())
            } else {
                is_plain_segment(segment)
            };
            if !valid {
                return Err(invalid());
            }
        }

        Ok(QuotedIdentifier(dialect.quote_identifier(&ident.name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Builds the clause text and parameter list in one pass.
pub struct SqlWriter<'a> {
    sql: String,
    params: Vec<Value>,
    dialect: &'a dyn Dialect,
}

impl<'a> SqlWriter<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            dialect,
        }
    }

    pub fn dialect(&self) -> &'a dyn Dialect {
        self.dialect
    }

    /// Consumes the writer and returns the final SQL string and parameters.
    pub fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    pub fn keyword(&mut self, keyword: &'static str) {
        self.sql.push_str(keyword);
    }

    pub fn identifier(&mut self, ident: &QuotedIdentifier) {
        self.sql.push_str(ident.as_str());
    }

    pub fn add_param(&mut self, value: Value) {
        self.params.push(value);
        let placeholder = self.dialect.get_placeholder(self.params.len() - 1);
        self.sql.push_str(&placeholder);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::dialect::{MySql, Postgres};
    use filter_syntax::Span;

    fn quote(ident: Identifier, dialect: &dyn Dialect) -> CompileResult<String> {
        QuotedIdentifier::new(&ident, dialect).map(|q| q.as_str().to_string())
    }

    #[test]
    fn test_dotted_identifier_is_one_column_name() {
        let ident = Identifier::new("sales.orders.id", Span::default());
        assert_eq!(quote(ident.clone(), &Postgres).unwrap(), r#""sales.orders.id""#);
        assert_eq!(quote(ident, &MySql).unwrap(), "`sales.orders.id`");
    }

    #[test]
    fn test_quoted_identifier_is_one_segment() {
        let ident = Identifier::quoted("order date.v2", Span::default());
        assert_eq!(quote(ident, &Postgres).unwrap(), r#""order date.v2""#);
    }

    #[test]
    fn test_invalid_identifiers() {
        let cases = [
            Identifier::new("a;drop", Span::default()),
            Identifier::new("1abc", Span::default()),
            Identifier::new("t.", Span::default()),
            Identifier::new("t.1x", Span::default()),
            Identifier::quoted("a\"b", Span::default()),
            Identifier::quoted("line\nbreak", Span::default()),
        ];
        for ident in cases {
            let name = ident.name.clone();
            assert_eq!(
                quote(ident, &Postgres),
                Err(CompileError::InvalidIdentifier { identifier: name })
            );
        }

        // A double quote is harmless inside MySQL backticks
        assert!(quote(Identifier::quoted("a\"b", Span::default()), &MySql).is_ok());
        assert!(quote(Identifier::quoted("a`b", Span::default()), &MySql).is_err());
    }

    #[test]
    fn test_params_get_placeholders() {
        let mut writer = SqlWriter::new(&Postgres);
        writer.keyword("x = ");
        writer.add_param(Value::Int(1));
        writer.keyword(" AND y = ");
        writer.add_param(Value::from("a"));

        let (sql, params) = writer.finish();
        assert_eq!(sql, "x = $1 AND y = $2");
        assert_eq!(params, vec![Value::Int(1), Value::from("a")]);
    }
}
