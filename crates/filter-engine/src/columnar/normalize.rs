//! Negation normal form for columnar pushdown.
//!
//! Negations are pushed down to the leaves. Rewrites preserve the in-memory
//! null semantics: `NOT (a < 5)` becomes `a >= 5 OR a IS NULL` and
//! `NOT (a IN S)` becomes `a NOT IN S OR a IS NULL`.

use crate::{
    columnar::predicate::{ColumnPredicate, PredicateOp},
    error::CompileResult,
    memory::{MemoryCompiler, Node},
};
use filter_syntax::{ComparisonOperator, Expression, ExpressionKind, Literal};
use model::Value;

#[derive(Debug, Clone)]
pub(crate) enum Nnf {
    Leaf(Leaf),
    All(Vec<Nnf>),
    Any(Vec<Nnf>),
}

#[derive(Debug, Clone)]
pub(crate) enum Leaf {
    Pushable(ColumnPredicate),
    /// Kept as AST and evaluated in memory after the scan.
    Residual {
        expr: Expression,
        negated: bool,
        construct: &'static str,
    },
}

pub(crate) type Dnf = Vec<Vec<ColumnPredicate>>;

pub(crate) fn to_nnf(expr: &Expression, negated: bool) -> Nnf {
    match &expr.kind {
        ExpressionKind::And { left, right } if !negated => {
            all(to_nnf(left, false), to_nnf(right, false))
        }
        ExpressionKind::And { left, right } => any(to_nnf(left, true), to_nnf(right, true)),
        ExpressionKind::Or { left, right } if !negated => {
            any(to_nnf(left, false), to_nnf(right, false))
        }
        ExpressionKind::Or { left, right } => all(to_nnf(left, true), to_nnf(right, true)),
        ExpressionKind::Not { operand } => to_nnf(operand, !negated),
        ExpressionKind::IsNull {
            column,
            negated: is_not,
        } => pushable(ColumnPredicate::is_null(&column.name, *is_not != negated)),
        ExpressionKind::Comparison {
            operator: ComparisonOperator::Like,
            ..
        } => residual(expr, negated, "LIKE pattern"),
        ExpressionKind::ColumnComparison { .. } => {
            residual(expr, negated, "column-to-column comparison")
        }
        ExpressionKind::Comparison {
            value: Literal::Null,
            ..
        } => residual(expr, negated, "comparison with NULL literal"),
        ExpressionKind::Comparison {
            column,
            operator,
            value,
        } => {
            let operator = if negated {
                operator.complement()
            } else {
                Some(*operator)
            };
            let Some(op) = operator.and_then(PredicateOp::from_comparison) else {
                return residual(expr, negated, "LIKE pattern");
            };
            let compare = pushable(ColumnPredicate::compare(&column.name, op, value.to_value()));
            if negated {
                any(compare, pushable(ColumnPredicate::is_null(&column.name, false)))
            } else {
                compare
            }
        }
        ExpressionKind::In { column, values } => {
            // NULL never equals anything, so it cannot change the result
            let values: Vec<Value> = values
                .iter()
                .filter(|v| !v.is_null())
                .map(Literal::to_value)
                .collect();
            if values.is_empty() {
                return residual(expr, negated, "IN list of NULL literals");
            }
            let in_list = pushable(ColumnPredicate::in_list(&column.name, values, negated));
            if negated {
                any(in_list, pushable(ColumnPredicate::is_null(&column.name, false)))
            } else {
                in_list
            }
        }
    }
}

fn pushable(predicate: ColumnPredicate) -> Nnf {
    Nnf::Leaf(Leaf::Pushable(predicate))
}

fn residual(expr: &Expression, negated: bool, construct: &'static str) -> Nnf {
    Nnf::Leaf(Leaf::Residual {
        expr: expr.clone(),
        negated,
        construct,
    })
}

fn all(left: Nnf, right: Nnf) -> Nnf {
    let mut children = Vec::new();
    for child in [left, right] {
        match child {
            Nnf::All(nested) => children.extend(nested),
            other => children.push(other),
        }
    }
    Nnf::All(children)
}

fn any(left: Nnf, right: Nnf) -> Nnf {
    let mut children = Vec::new();
    for child in [left, right] {
        match child {
            Nnf::Any(nested) => children.extend(nested),
            other => children.push(other),
        }
    }
    Nnf::Any(children)
}

/// AND of two DNFs, `None` if it would exceed `max_terms` conjunctions.
pub(crate) fn conjoin(left: &Dnf, right: &Dnf, max_terms: usize) -> Option<Dnf> {
    if left.len().saturating_mul(right.len()) > max_terms {
        return None;
    }
    let mut out = Vec::with_capacity(left.len() * right.len());
    for l in left {
        for r in right {
            let mut term = l.clone();
            term.extend(r.iter().cloned());
            out.push(term);
        }
    }
    Some(out)
}

impl Nnf {
    /// Splits off the top-level AND.
    pub(crate) fn into_conjuncts(self) -> Vec<Nnf> {
        match self {
            Nnf::All(children) => children,
            other => vec![other],
        }
    }

    /// The first construct that keeps this clause from being pushed down.
    pub(crate) fn residual_construct(&self) -> Option<&'static str> {
        match self {
            Nnf::Leaf(Leaf::Pushable(_)) => None,
            Nnf::Leaf(Leaf::Residual { construct, .. }) => Some(construct),
            Nnf::All(children) | Nnf::Any(children) => {
                children.iter().find_map(Nnf::residual_construct)
            }
        }
    }

    /// DNF of the clause, `None` if it holds a residual leaf or expands past
    /// `max_terms` conjunctions.
    pub(crate) fn to_dnf(&self, max_terms: usize) -> Option<Dnf> {
        match self {
            Nnf::Leaf(Leaf::Pushable(predicate)) => Some(vec![vec![predicate.clone()]]),
            Nnf::Leaf(Leaf::Residual { .. }) => None,
            Nnf::Any(children) => {
                let mut terms = Vec::new();
                for child in children {
                    terms.extend(child.to_dnf(max_terms)?);
                    if terms.len() > max_terms {
                        return None;
                    }
                }
                Some(terms)
            }
            Nnf::All(children) => {
                let mut terms: Dnf = vec![Vec::new()];
                for child in children {
                    terms = conjoin(&terms, &child.to_dnf(max_terms)?, max_terms)?;
                }
                Some(terms)
            }
        }
    }

    /// In-memory evaluation tree for a clause that stays residual.
    pub(crate) fn to_node(&self, compiler: &MemoryCompiler) -> CompileResult<Node> {
        let node = match self {
            Nnf::Leaf(Leaf::Pushable(predicate)) => Node::Column(predicate.clone()),
            Nnf::Leaf(Leaf::Residual { expr, negated, .. }) => {
                let node = compiler.compile_node(expr)?;
                if *negated {
                    Node::Not(Box::new(node))
                } else {
                    node
                }
            }
            Nnf::All(children) => Node::All(
                children
                    .iter()
                    .map(|child| child.to_node(compiler))
                    .collect::<CompileResult<_>>()?,
            ),
            Nnf::Any(children) => Node::Any(
                children
                    .iter()
                    .map(|child| child.to_node(compiler))
                    .collect::<CompileResult<_>>()?,
            ),
        };
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filter_syntax::parse;

    fn dnf_of(input: &str, max_terms: usize) -> Option<String> {
        let filter = parse(input).unwrap();
        let nnf = to_nnf(filter.root().unwrap(), false);
        nnf.to_dnf(max_terms)
            .map(|terms| crate::columnar::ParquetFilter::new(terms).to_string())
    }

    #[test]
    fn test_negated_comparison_keeps_nulls() {
        assert_eq!(
            dnf_of("NOT (a < 5)", 8).unwrap(),
            "[[('a', '>=', 5)], [('a', 'is null', None)]]"
        );
    }

    #[test]
    fn test_de_morgan_and_double_negation() {
        assert_eq!(
            dnf_of("NOT (a IS NULL OR NOT b IS NOT NULL)", 8).unwrap(),
            "[[('a', 'is not null', None), ('b', 'is not null', None)]]"
        );
        assert_eq!(dnf_of("NOT NOT a = 1", 8).unwrap(), "[[('a', '=', 1)]]");
    }

    #[test]
    fn test_negated_in_list() {
        assert_eq!(
            dnf_of("a NOT IN (1, NULL, 2)", 8).unwrap(),
            "[[('a', 'not in', [1, 2])], [('a', 'is null', None)]]"
        );
    }

    #[test]
    fn test_distribution_respects_cap() {
        let input = "(a = 1 OR b = 2) AND (c = 3 OR d = 4)";
        assert_eq!(
            dnf_of(input, 4).unwrap(),
            "[[('a', '=', 1), ('c', '=', 3)], [('a', '=', 1), ('d', '=', 4)], \
             [('b', '=', 2), ('c', '=', 3)], [('b', '=', 2), ('d', '=', 4)]]"
        );
        assert_eq!(dnf_of(input, 3), None);
    }

    #[test]
    fn test_residual_leaves_block_dnf() {
        let filter = parse("a = 1 OR name LIKE 'x%'").unwrap();
        let nnf = to_nnf(filter.root().unwrap(), false);
        assert_eq!(nnf.to_dnf(8), None);
        assert_eq!(nnf.residual_construct(), Some("LIKE pattern"));
    }
}
