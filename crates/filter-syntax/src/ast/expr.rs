use crate::ast::{ident::Identifier, literal::Literal, operator::ComparisonOperator, span::Span};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: Span) -> Self {
        Expression { kind, span }
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        let span = left.span.to(&right.span);
        Expression::new(
            ExpressionKind::And {
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        let span = left.span.to(&right.span);
        Expression::new(
            ExpressionKind::Or {
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    pub fn not(operand: Expression, span: Span) -> Self {
        Expression::new(
            ExpressionKind::Not {
                operand: Box::new(operand),
            },
            span,
        )
    }

    /// Depth of the tree, a leaf counting as one.
    pub fn depth(&self) -> usize {
        match &self.kind {
            ExpressionKind::And { left, right } | ExpressionKind::Or { left, right } => {
                1 + left.depth().max(right.depth())
            }
            ExpressionKind::Not { operand } => 1 + operand.depth(),
            _ => 1,
        }
    }
}

/// Expression types
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    /// `column <op> literal`, including `LIKE` with a string pattern.
    Comparison {
        column: Identifier,
        operator: ComparisonOperator,
        value: Literal,
    },
    /// `column <op> column`. Never `LIKE`.
    ColumnComparison {
        left: Identifier,
        operator: ComparisonOperator,
        right: Identifier,
    },
    /// `column IN (v1, v2, ...)` with at least one value.
    In {
        column: Identifier,
        values: Vec<Literal>,
    },
    IsNull {
        column: Identifier,
        negated: bool,
    },
    And {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Or {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Not {
        operand: Box<Expression>,
    },
}

fn write_list(f: &mut fmt::Formatter<'_>, values: &[Literal]) -> fmt::Result {
    write!(f, "[")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", value)?;
    }
    write!(f, "]")
}

/// Prefix (polish) notation, e.g. `(AND (> Column<a> 1) (<= Column<b> 3))`.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::Comparison {
                column,
                operator,
                value,
            } => write!(f, "({} Column<{}> {})", operator, column, value),
            ExpressionKind::ColumnComparison {
                left,
                operator,
                right,
            } => write!(f, "({} Column<{}> Column<{}>)", operator, left, right),
            ExpressionKind::In { column, values } => {
                write!(f, "(IN Column<{}> ", column)?;
                write_list(f, values)?;
                write!(f, ")")
            }
            ExpressionKind::IsNull { column, negated } => {
                let op = if *negated { "NOTNULL" } else { "ISNULL" };
                write!(f, "({} Column<{}>)", op, column)
            }
            ExpressionKind::And { left, right } => write!(f, "(AND {} {})", left, right),
            ExpressionKind::Or { left, right } => write!(f, "(OR {} {})", left, right),
            ExpressionKind::Not { operand } => match &operand.kind {
                ExpressionKind::In { column, values } => {
                    write!(f, "(NOTIN Column<{}> ", column)?;
                    write_list(f, values)?;
                    write!(f, ")")
                }
                _ => write!(f, "(NOT {})", operand),
            },
        }
    }
}
