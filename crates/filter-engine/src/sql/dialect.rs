//! Database-specific quoting and placeholder syntax.

use crate::options::SqlDialect;

pub trait Dialect: Send + Sync {
    /// Wraps a single identifier segment in the dialect's quotation marks.
    ///
    /// - PostgreSQL uses double quotes: `"my_column"`
    /// - MySQL uses backticks: `` `my_column` ``
    fn quote_identifier(&self, ident: &str) -> String;

    /// The character `quote_identifier` wraps names in.
    fn quote_char(&self) -> char;

    /// Returns the placeholder for the parameter at `index` (0-based).
    ///
    /// - PostgreSQL uses `$1`, `$2`, etc.
    /// - MySQL uses `?`
    fn get_placeholder(&self, index: usize) -> String;

    /// Returns the name of the dialect (e.g., "PostgreSQL", "MySQL").
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone)]
pub struct Postgres;

impl Dialect for Postgres {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{ident}""#)
    }

    fn quote_char(&self) -> char {
        '"'
    }

    fn get_placeholder(&self, index: usize) -> String {
        format!("${}", index + 1)
    }

    fn name(&self) -> &'static str {
        "PostgreSQL"
    }
}

#[derive(Debug, Clone)]
pub struct MySql;

impl Dialect for MySql {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#"`{ident}`"#)
    }

    fn quote_char(&self) -> char {
        '`'
    }

    fn get_placeholder(&self, _index: usize) -> String {
        "?".into()
    }

    fn name(&self) -> &'static str {
        "MySQL"
    }
}

impl SqlDialect {
    pub fn dialect(&self) -> &'static dyn Dialect {
        match self {
            SqlDialect::Postgres => &Postgres,
            SqlDialect::MySql => &MySql,
        }
    }
}
