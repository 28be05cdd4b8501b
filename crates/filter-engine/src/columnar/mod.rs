//! Columnar scan pushdown.
//!
//! A filter is split into a DNF over `(column, op, operand)` triples that a
//! columnar reader can apply while scanning, and a residual predicate for
//! everything the reader cannot express.

use crate::{
    backend::BackendKind,
    compiler::FilterCompiler,
    error::{CompileError, CompileResult},
    memory::{MemoryCompiler, MemoryPredicate, Node},
    options::{CompileOptions, DEFAULT_MAX_DNF_TERMS, PushdownStrategy},
    typecheck::check_filter,
};
use filter_syntax::Filter;
use model::{RowLookup, Schema};
use tracing::{debug, warn};

mod normalize;
pub mod predicate;

pub use predicate::{ColumnPredicate, Operand, ParquetFilter, PredicateOp};

use normalize::{Dnf, conjoin, to_nnf};

/// Result of columnar compilation.
///
/// A row is selected when it passes the pushdown filter (if any) and then the
/// residual predicate (if any). Having neither selects every row.
///
/// Negations are pushed down as their complement plus an explicit null check,
/// so `NOT (a < 5)` becomes `a >= 5 OR a IS NULL`. This agrees with the
/// in-memory predicate whenever a column holds values of the literal's type.
/// A value of another type fails both `a < 5` and `a >= 5`, so the in-memory
/// predicate accepts it while the pushdown drops it. Compiling with a schema
/// rejects such filters with a type mismatch.
#[derive(Debug, Clone)]
pub struct PushdownPlan {
    pub pushdown: Option<ParquetFilter>,
    pub residual: Option<MemoryPredicate>,
}

impl PushdownPlan {
    pub fn accept_all() -> Self {
        PushdownPlan {
            pushdown: None,
            residual: None,
        }
    }

    pub fn pushdown(&self) -> Option<&ParquetFilter> {
        self.pushdown.as_ref()
    }

    pub fn residual(&self) -> Option<&MemoryPredicate> {
        self.residual.as_ref()
    }

    pub fn is_match_all(&self) -> bool {
        self.pushdown.is_none() && self.residual.is_none()
    }

    /// Whether the row passes both stages.
    pub fn matches<R: RowLookup + ?Sized>(&self, row: &R) -> bool {
        self.pushdown.as_ref().is_none_or(|p| p.matches(row))
            && self.residual.as_ref().is_none_or(|r| r.matches(row))
    }

    /// Applies the residual to a batch that already passed the pushdown.
    pub fn apply_residual<R: RowLookup>(&self, rows: Vec<R>) -> Vec<R> {
        match &self.residual {
            Some(residual) => residual.filter_owned(rows),
            None => rows,
        }
    }

    pub fn into_parts(self) -> (Option<ParquetFilter>, Option<MemoryPredicate>) {
        (self.pushdown, self.residual)
    }
}

/// Compiles filters into a [`PushdownPlan`].
#[derive(Debug, Clone)]
pub struct ColumnarCompiler {
    strategy: PushdownStrategy,
    max_dnf_terms: usize,
    schema: Option<Schema>,
}

impl Default for ColumnarCompiler {
    fn default() -> Self {
        ColumnarCompiler {
            strategy: PushdownStrategy::Split,
            max_dnf_terms: DEFAULT_MAX_DNF_TERMS,
            schema: None,
        }
    }
}

impl ColumnarCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: &CompileOptions) -> Self {
        ColumnarCompiler {
            strategy: options.pushdown_strategy,
            max_dnf_terms: options.max_dnf_terms.max(1),
            schema: options.schema.clone(),
        }
    }

    pub fn with_strategy(mut self, strategy: PushdownStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_dnf_terms(mut self, max_dnf_terms: usize) -> Self {
        self.max_dnf_terms = max_dnf_terms.max(1);
        self
    }

    fn keep_residual(&self, construct: String) -> CompileResult<()> {
        match self.strategy {
            PushdownStrategy::Reject => Err(CompileError::unsupported(
                BackendKind::ColumnarPushdown,
                construct,
            )),
            PushdownStrategy::Split => {
                debug!(construct = %construct, "Clause evaluated after scan");
                Ok(())
            }
        }
    }
}

impl FilterCompiler for ColumnarCompiler {
    type Filter = PushdownPlan;

    fn compile(&self, filter: &Filter) -> CompileResult<PushdownPlan> {
        check_filter(filter, self.schema.as_ref())?;

        let Some(root) = filter.root() else {
            return Ok(PushdownPlan::accept_all());
        };

        let memory = MemoryCompiler::new();
        let mut pushed: Dnf = vec![Vec::new()];
        let mut pushed_clauses = 0;
        let mut residual = Vec::new();

        for clause in to_nnf(root, false).into_conjuncts() {
            if let Some(construct) = clause.residual_construct() {
                self.keep_residual(construct.to_string())?;
                residual.push(clause.to_node(&memory)?);
                continue;
            }

            let combined = clause
                .to_dnf(self.max_dnf_terms)
                .and_then(|dnf| conjoin(&pushed, &dnf, self.max_dnf_terms));
            match combined {
                Some(dnf) => {
                    pushed = dnf;
                    pushed_clauses += 1;
                }
                None => {
                    let construct = format!(
                        "filter expanding beyond {} DNF terms",
                        self.max_dnf_terms
                    );
                    self.keep_residual(construct)?;
                    warn!(
                        max_dnf_terms = self.max_dnf_terms,
                        "Pushdown filter too large, evaluating clause after scan"
                    );
                    residual.push(clause.to_node(&memory)?);
                }
            }
        }

        let pushdown = (pushed_clauses > 0).then(|| ParquetFilter::new(pushed));
        let residual = match residual.len() {
            0 => None,
            1 => residual.pop().map(MemoryPredicate::from_node),
            _ => Some(MemoryPredicate::from_node(Node::All(residual))),
        };

        debug!(
            pushdown = ?pushdown.as_ref().map(|p| p.to_string()),
            has_residual = residual.is_some(),
            "Compiled columnar pushdown plan"
        );

        Ok(PushdownPlan { pushdown, residual })
    }
}

#[cfg(test)]
mod tests;
