use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use model::Value;
use std::fmt;

/// Literal values, typed from their lexical form at parse time.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
    Timestamp(DateTime<Utc>),
}

impl Literal {
    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::String(_) => "string",
            Literal::Integer(_) => "integer",
            Literal::Float(_) => "float",
            Literal::Boolean(_) => "boolean",
            Literal::Null => "null",
            Literal::Timestamp(_) => "timestamp",
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Literal::String(v) => Value::String(v.clone()),
            Literal::Integer(v) => Value::Int(*v),
            Literal::Float(v) => Value::Float(*v),
            Literal::Boolean(v) => Value::Boolean(*v),
            Literal::Null => Value::Null,
            Literal::Timestamp(v) => Value::Timestamp(*v),
        }
    }

    /// Parses the body of a `TIMESTAMP '...'` literal.
    ///
    /// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.fff]` or `YYYY-MM-DDTHH:MM:SS[.fff]`
    /// read as UTC, and `YYYY-MM-DD` as midnight UTC.
    pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
        let text = text.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
            return Some(ts.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        literal.to_value()
    }
}

/// Renders the literal in filter syntax, so the output parses back to the same literal.
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Float(n) => write!(f, "{:?}", n),
            Literal::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Literal::Null => write!(f, "NULL"),
            Literal::Timestamp(ts) => write!(
                f,
                "TIMESTAMP '{}'",
                ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
            ),
        }
    }
}
