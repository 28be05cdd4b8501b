//! In-memory row predicates.

use crate::{
    backend::BackendKind,
    columnar::ColumnPredicate,
    compiler::FilterCompiler,
    error::{CompileError, CompileResult},
    options::CompileOptions,
    typecheck::check_filter,
};
use filter_syntax::{ComparisonOperator, Expression, ExpressionKind, Filter, Literal};
use model::{RowLookup, Schema, Value};
use regex::Regex;
use std::{cmp::Ordering, sync::Arc};
use tracing::{debug, trace};

pub mod like;

/// A compiled row predicate.
///
/// Null handling is two-valued: a comparison, `IN` or `LIKE` is `false` when
/// the column is null or missing, `IS [NOT] NULL` tests nullness, and `NOT`
/// negates its operand's result. So `NOT (a < 5)` accepts rows where `a` is
/// null, which differs from SQL where such rows are filtered out.
///
/// Values of different types are never coerced, except that integers and
/// floats compare numerically. A type mismatch makes the leaf `false`.
///
/// Cloning is cheap and the predicate can be shared between threads.
#[derive(Debug, Clone)]
pub struct MemoryPredicate {
    root: Arc<Node>,
}

#[derive(Debug, Clone)]
pub(crate) enum Node {
    Constant(bool),
    Compare {
        column: String,
        operator: ComparisonOperator,
        value: Value,
    },
    Like {
        column: String,
        regex: Regex,
    },
    ColumnCompare {
        left: String,
        operator: ComparisonOperator,
        right: String,
    },
    In {
        column: String,
        values: Vec<Value>,
    },
    IsNull {
        column: String,
        negated: bool,
    },
    Column(ColumnPredicate),
    All(Vec<Node>),
    Any(Vec<Node>),
    Not(Box<Node>),
}

impl MemoryPredicate {
    /// A predicate that accepts every row.
    pub fn accept_all() -> Self {
        Self::from_node(Node::Constant(true))
    }

    pub(crate) fn from_node(node: Node) -> Self {
        MemoryPredicate {
            root: Arc::new(node),
        }
    }

    pub fn is_accept_all(&self) -> bool {
        matches!(*self.root, Node::Constant(true))
    }

    pub fn matches<R: RowLookup + ?Sized>(&self, row: &R) -> bool {
        self.root.eval(row)
    }

    pub fn filter_rows<'r, R: RowLookup>(&self, rows: &'r [R]) -> Vec<&'r R> {
        rows.iter().filter(|row| self.matches(*row)).collect()
    }

    /// Keeps the matching rows, preserving their order.
    pub fn filter_owned<R: RowLookup>(&self, rows: Vec<R>) -> Vec<R> {
        rows.into_iter().filter(|row| self.matches(row)).collect()
    }
}

/// Non-null value of `column`, `None` when the column is null or missing.
fn cell<'r, R: RowLookup + ?Sized>(row: &'r R, column: &str) -> Option<&'r Value> {
    row.get(column).filter(|value| !value.is_null())
}

fn holds(operator: ComparisonOperator, ordering: Ordering) -> bool {
    match operator {
        ComparisonOperator::Equal => ordering == Ordering::Equal,
        ComparisonOperator::NotEqual => ordering != Ordering::Equal,
        ComparisonOperator::LessThan => ordering == Ordering::Less,
        ComparisonOperator::LessOrEqual => ordering != Ordering::Greater,
        ComparisonOperator::GreaterThan => ordering == Ordering::Greater,
        ComparisonOperator::GreaterOrEqual => ordering != Ordering::Less,
        ComparisonOperator::Like => false,
    }
}

fn mismatch(column: &str, expected: &str, found: &str) -> bool {
    trace!(
        column,
        expected,
        found,
        "Type mismatch, predicate evaluates to false"
    );
    false
}

impl Node {
    pub(crate) fn eval<R: RowLookup + ?Sized>(&self, row: &R) -> bool {
        match self {
            Node::Constant(value) => *value,
            Node::Compare {
                column,
                operator,
                value,
            } => {
                let Some(cell) = cell(row, column) else {
                    return false;
                };
                if value.is_null() {
                    return false;
                }
                match cell.compare(value) {
                    Some(ordering) => holds(*operator, ordering),
                    None => mismatch(column, value.type_name(), cell.type_name()),
                }
            }
            Node::Like { column, regex } => match cell(row, column) {
                Some(Value::String(s)) => regex.is_match(s),
                Some(other) => mismatch(column, "string", other.type_name()),
                None => false,
            },
            Node::ColumnCompare {
                left,
                operator,
                right,
            } => match (cell(row, left), cell(row, right)) {
                (Some(l), Some(r)) => match l.compare(r) {
                    Some(ordering) => holds(*operator, ordering),
                    None => mismatch(right, l.type_name(), r.type_name()),
                },
                _ => false,
            },
            Node::In { column, values } => {
                let Some(cell) = cell(row, column) else {
                    return false;
                };
                let mut comparable = false;
                for value in values.iter().filter(|v| !v.is_null()) {
                    match cell.compare(value) {
                        Some(Ordering::Equal) => return true,
                        Some(_) => comparable = true,
                        None => {}
                    }
                }
                if !comparable && let Some(value) = values.iter().find(|v| !v.is_null()) {
                    return mismatch(column, value.type_name(), cell.type_name());
                }
                false
            }
            Node::IsNull { column, negated } => cell(row, column).is_none() != *negated,
            Node::Column(predicate) => predicate.matches(row),
            Node::All(children) => children.iter().all(|child| child.eval(row)),
            Node::Any(children) => children.iter().any(|child| child.eval(row)),
            Node::Not(child) => !child.eval(row),
        }
    }
}

/// Compiles filters into [`MemoryPredicate`]s.
#[derive(Debug, Clone, Default)]
pub struct MemoryCompiler {
    schema: Option<Schema>,
}

impl MemoryCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(schema: Schema) -> Self {
        MemoryCompiler {
            schema: Some(schema),
        }
    }

    pub fn from_options(options: &CompileOptions) -> Self {
        MemoryCompiler {
            schema: options.schema.clone(),
        }
    }

    /// Builds the evaluation tree of an already type-checked expression.
    pub(crate) fn compile_node(&self, expr: &Expression) -> CompileResult<Node> {
        let node = match &expr.kind {
            ExpressionKind::Comparison {
                column,
                operator: ComparisonOperator::Like,
                value,
            } => {
                let pattern = match value {
                    Literal::String(pattern) => pattern,
                    other => {
                        return Err(CompileError::type_mismatch(
                            &column.name,
                            "string pattern",
                            other.type_name(),
                            column.span.start,
                        ));
                    }
                };
                let regex = like::like_to_regex(pattern).map_err(|err| {
                    CompileError::unsupported(
                        BackendKind::InMemory,
                        format!("LIKE pattern '{}': {}", pattern, err),
                    )
                })?;
                Node::Like {
                    column: column.name.clone(),
                    regex,
                }
            }
            ExpressionKind::Comparison {
                column,
                operator,
                value,
            } => Node::Compare {
                column: column.name.clone(),
                operator: *operator,
                value: value.to_value(),
            },
            ExpressionKind::ColumnComparison {
                left,
                operator,
                right,
            } => Node::ColumnCompare {
                left: left.name.clone(),
                operator: *operator,
                right: right.name.clone(),
            },
            ExpressionKind::In { column, values } => Node::In {
                column: column.name.clone(),
                values: values.iter().map(|v| v.to_value()).collect(),
            },
            ExpressionKind::IsNull { column, negated } => Node::IsNull {
                column: column.name.clone(),
                negated: *negated,
            },
            ExpressionKind::And { left, right } => {
                Node::All(vec![self.compile_node(left)?, self.compile_node(right)?])
            }
            ExpressionKind::Or { left, right } => {
                Node::Any(vec![self.compile_node(left)?, self.compile_node(right)?])
            }
            ExpressionKind::Not { operand } => Node::Not(Box::new(self.compile_node(operand)?)),
        };
        Ok(node)
    }
}

impl FilterCompiler for MemoryCompiler {
    type Filter = MemoryPredicate;

    fn compile(&self, filter: &Filter) -> CompileResult<MemoryPredicate> {
        check_filter(filter, self.schema.as_ref())?;

        let Some(root) = filter.root() else {
            debug!("Empty filter, accepting all rows");
            return Ok(MemoryPredicate::accept_all());
        };

        let node = self.compile_node(root)?;
        debug!(filter = %root, "Compiled in-memory predicate");
        Ok(MemoryPredicate::from_node(node))
    }
}
