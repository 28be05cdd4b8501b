//! Parameterized WHERE clauses for relational backends.

use crate::{
    compiler::FilterCompiler,
    error::CompileResult,
    options::{CompileOptions, SqlDialect},
    typecheck::check_filter,
};
use filter_syntax::{ComparisonOperator, Expression, ExpressionKind, Filter};
use model::{Schema, Value};
use tracing::debug;

pub mod dialect;
pub mod writer;

use writer::{QuotedIdentifier, SqlWriter};

/// Clause used when the filter is empty.
pub const MATCH_ALL: &str = "TRUE";

/// A WHERE clause fragment plus the values bound to its placeholders, in order.
///
/// The clause is evaluated by the database under SQL three-valued logic, so
/// `NOT (a < 5)` drops rows where `a` is NULL. The in-memory backend keeps them.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFilter {
    where_clause: String,
    params: Vec<Value>,
    dialect: SqlDialect,
}

impl SqlFilter {
    pub fn match_all(dialect: SqlDialect) -> Self {
        SqlFilter {
            where_clause: MATCH_ALL.to_string(),
            params: Vec::new(),
            dialect,
        }
    }

    pub fn where_clause(&self) -> &str {
        &self.where_clause
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    pub fn is_match_all(&self) -> bool {
        self.params.is_empty() && self.where_clause == MATCH_ALL
    }

    /// Appends `WHERE <clause>` to a query that has no parameters of its own.
    pub fn apply_to(&self, query: &str) -> String {
        if self.is_match_all() {
            query.to_string()
        } else {
            format!("{} WHERE {}", query, self.where_clause)
        }
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.where_clause, self.params)
    }
}

/// Compiles filters into [`SqlFilter`]s for one dialect.
#[derive(Debug, Clone, Default)]
pub struct SqlCompiler {
    dialect: SqlDialect,
    schema: Option<Schema>,
}

impl SqlCompiler {
    pub fn new(dialect: SqlDialect) -> Self {
        SqlCompiler {
            dialect,
            schema: None,
        }
    }

    pub fn from_options(options: &CompileOptions) -> Self {
        SqlCompiler {
            dialect: options.dialect,
            schema: options.schema.clone(),
        }
    }
}

impl FilterCompiler for SqlCompiler {
    type Filter = SqlFilter;

    fn compile(&self, filter: &Filter) -> CompileResult<SqlFilter> {
        check_filter(filter, self.schema.as_ref())?;

        let Some(root) = filter.root() else {
            return Ok(SqlFilter::match_all(self.dialect));
        };

        let mut writer = SqlWriter::new(self.dialect.dialect());
        write_expr(root, &mut writer)?;
        let (where_clause, params) = writer.finish();

        debug!(
            dialect = self.dialect.dialect().name(),
            clause = %where_clause,
            params = params.len(),
            "Compiled relational filter"
        );

        Ok(SqlFilter {
            where_clause,
            params,
            dialect: self.dialect,
        })
    }
}

fn operator_sql(operator: ComparisonOperator) -> &'static str {
    match operator {
        ComparisonOperator::Equal => " = ",
        ComparisonOperator::NotEqual => " <> ",
        ComparisonOperator::LessThan => " < ",
        ComparisonOperator::LessOrEqual => " <= ",
        ComparisonOperator::GreaterThan => " > ",
        ComparisonOperator::GreaterOrEqual => " >= ",
        ComparisonOperator::Like => " LIKE ",
    }
}

fn write_expr(expr: &Expression, writer: &mut SqlWriter<'_>) -> CompileResult<()> {
    match &expr.kind {
        ExpressionKind::Comparison {
            column,
            operator,
            value,
        } => {
            let column = QuotedIdentifier::new(column, writer.dialect())?;
            writer.identifier(&column);
            writer.keyword(operator_sql(*operator));
            writer.add_param(value.to_value());
        }
        ExpressionKind::ColumnComparison {
            left,
            operator,
            right,
        } => {
            let left = QuotedIdentifier::new(left, writer.dialect())?;
            let right = QuotedIdentifier::new(right, writer.dialect())?;
            writer.identifier(&left);
            writer.keyword(operator_sql(*operator));
            writer.identifier(&right);
        }
        ExpressionKind::In { column, values } => {
            let column = QuotedIdentifier::new(column, writer.dialect())?;
            writer.identifier(&column);
            writer.keyword(" IN (");
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    writer.keyword(", ");
                }
                writer.add_param(value.to_value());
            }
            writer.keyword(")");
        }
        ExpressionKind::IsNull { column, negated } => {
            let column = QuotedIdentifier::new(column, writer.dialect())?;
            writer.identifier(&column);
            writer.keyword(if *negated { " IS NOT NULL" } else { " IS NULL" });
        }
        ExpressionKind::And { left, right } => {
            write_conjunct(left, writer)?;
            writer.keyword(" AND ");
            write_conjunct(right, writer)?;
        }
        ExpressionKind::Or { left, right } => {
            write_expr(left, writer)?;
            writer.keyword(" OR ");
            write_expr(right, writer)?;
        }
        ExpressionKind::Not { operand } => {
            writer.keyword("NOT (");
            write_expr(operand, writer)?;
            writer.keyword(")");
        }
    }
    Ok(())
}

/// Operand of `AND`; an `OR` here needs parentheses to keep its grouping.
fn write_conjunct(expr: &Expression, writer: &mut SqlWriter<'_>) -> CompileResult<()> {
    if matches!(expr.kind, ExpressionKind::Or { .. }) {
        writer.keyword("(");
        write_expr(expr, writer)?;
        writer.keyword(")");
        Ok(())
    } else {
        write_expr(expr, writer)
    }
}
