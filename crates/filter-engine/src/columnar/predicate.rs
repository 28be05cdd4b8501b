use filter_syntax::ComparisonOperator;
use model::{RowLookup, Value};
use serde::Serialize;
use std::{cmp::Ordering, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

impl PredicateOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            PredicateOp::Eq => "=",
            PredicateOp::NotEq => "!=",
            PredicateOp::Lt => "<",
            PredicateOp::LtEq => "<=",
            PredicateOp::Gt => ">",
            PredicateOp::GtEq => ">=",
            PredicateOp::In => "in",
            PredicateOp::NotIn => "not in",
            PredicateOp::IsNull => "is null",
            PredicateOp::IsNotNull => "is not null",
        }
    }

    /// Maps a scalar comparison. `LIKE` has no columnar counterpart.
    pub fn from_comparison(operator: ComparisonOperator) -> Option<Self> {
        match operator {
            ComparisonOperator::Equal => Some(PredicateOp::Eq),
            ComparisonOperator::NotEqual => Some(PredicateOp::NotEq),
            ComparisonOperator::LessThan => Some(PredicateOp::Lt),
            ComparisonOperator::LessOrEqual => Some(PredicateOp::LtEq),
            ComparisonOperator::GreaterThan => Some(PredicateOp::Gt),
            ComparisonOperator::GreaterOrEqual => Some(PredicateOp::GtEq),
            ComparisonOperator::Like => None,
        }
    }
}

impl fmt::Display for PredicateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    None,
    Scalar(Value),
    List(Vec<Value>),
}

/// One `(column, op, operand)` triple of a pushdown filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnPredicate {
    pub column: String,
    pub op: PredicateOp,
    pub operand: Operand,
}

impl ColumnPredicate {
    pub fn compare(column: &str, op: PredicateOp, value: Value) -> Self {
        ColumnPredicate {
            column: column.to_string(),
            op,
            operand: Operand::Scalar(value),
        }
    }

    pub fn in_list(column: &str, values: Vec<Value>, negated: bool) -> Self {
        ColumnPredicate {
            column: column.to_string(),
            op: if negated { PredicateOp::NotIn } else { PredicateOp::In },
            operand: Operand::List(values),
        }
    }

    pub fn is_null(column: &str, negated: bool) -> Self {
        ColumnPredicate {
            column: column.to_string(),
            op: if negated { PredicateOp::IsNotNull } else { PredicateOp::IsNull },
            operand: Operand::None,
        }
    }

    /// Evaluates the triple against a row the way a columnar reader would.
    ///
    /// Every operator except `is null` is false on a null or missing value.
    pub fn matches<R: RowLookup + ?Sized>(&self, row: &R) -> bool {
        let cell = row.get(&self.column).filter(|v| !v.is_null());

        match (self.op, &self.operand, cell) {
            (PredicateOp::IsNull, _, cell) => cell.is_none(),
            (PredicateOp::IsNotNull, _, cell) => cell.is_some(),
            (_, _, None) => false,
            (PredicateOp::In, Operand::List(values), Some(cell)) => {
                values.iter().any(|v| cell.equal(v))
            }
            (PredicateOp::NotIn, Operand::List(values), Some(cell)) => {
                !values.iter().any(|v| cell.equal(v))
            }
            (op, Operand::Scalar(value), Some(cell)) => match cell.compare(value) {
                Some(ordering) => match op {
                    PredicateOp::Eq => ordering == Ordering::Equal,
                    PredicateOp::NotEq => ordering != Ordering::Equal,
                    PredicateOp::Lt => ordering == Ordering::Less,
                    PredicateOp::LtEq => ordering != Ordering::Greater,
                    PredicateOp::Gt => ordering == Ordering::Greater,
                    PredicateOp::GtEq => ordering != Ordering::Less,
                    _ => false,
                },
                None => false,
            },
            _ => false,
        }
    }
}

/// Python literal spelling, as accepted by pyarrow style DNF filters.
fn write_py_value(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Int(v) => write!(f, "{}", v),
        Value::Float(v) => write!(f, "{:?}", v),
        Value::String(v) => write!(f, "'{}'", v.replace('\\', "\\\\").replace('\'', "\\'")),
        Value::Boolean(v) => write!(f, "{}", if *v { "True" } else { "False" }),
        Value::Timestamp(v) => write!(f, "Timestamp('{}')", v.to_rfc3339()),
        Value::Null => write!(f, "None"),
    }
}

impl fmt::Display for ColumnPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "('{}', '{}', ", self.column, self.op)?;
        match &self.operand {
            Operand::None => write!(f, "None")?,
            Operand::Scalar(value) => write_py_value(f, value)?,
            Operand::List(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_py_value(f, value)?;
                }
                write!(f, "]")?;
            }
        }
        write!(f, ")")
    }
}

/// Disjunctive normal form filter: the outer list is OR'ed, each inner list
/// AND'ed.
///
/// `Display` follows the pyarrow DNF tuple layout, but the spelling is only
/// pyarrow style: pyarrow has no `'is null'` or `'is not null'` operator, so a
/// reader handing these terms to pyarrow maps them to its own null checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParquetFilter {
    terms: Vec<Vec<ColumnPredicate>>,
}

impl ParquetFilter {
    pub fn new(terms: Vec<Vec<ColumnPredicate>>) -> Self {
        ParquetFilter { terms }
    }

    pub fn terms(&self) -> &[Vec<ColumnPredicate>] {
        &self.terms
    }

    /// Number of conjunctions.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for predicate in self.terms.iter().flatten() {
            if !columns.contains(&predicate.column.as_str()) {
                columns.push(&predicate.column);
            }
        }
        columns
    }

    pub fn matches<R: RowLookup + ?Sized>(&self, row: &R) -> bool {
        self.terms
            .iter()
            .any(|term| term.iter().all(|predicate| predicate.matches(row)))
    }
}

impl fmt::Display for ParquetFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for (j, predicate) in term.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", predicate)?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}
