//! Compiles filter expressions for in-memory, columnar and relational backends.

pub mod backend;
pub mod columnar;
pub mod compiler;
pub mod error;
pub mod memory;
pub mod options;
pub mod sql;
pub mod typecheck;

pub use backend::BackendKind;
pub use columnar::{ColumnarCompiler, ColumnPredicate, Operand, ParquetFilter, PredicateOp, PushdownPlan};
pub use compiler::FilterCompiler;
pub use error::{CompileError, CompileResult};
pub use memory::{MemoryCompiler, MemoryPredicate};
pub use options::{CompileOptions, PushdownStrategy, SqlDialect};
pub use sql::{SqlCompiler, SqlFilter};

use filter_syntax::Filter;
use tracing::debug;

/// A compiled filter in the form its backend consumes.
#[derive(Debug, Clone)]
pub enum BackendPredicate {
    InMemory(MemoryPredicate),
    ColumnarPushdown(PushdownPlan),
    Relational(SqlFilter),
}

impl BackendPredicate {
    pub fn kind(&self) -> BackendKind {
        match self {
            BackendPredicate::InMemory(_) => BackendKind::InMemory,
            BackendPredicate::ColumnarPushdown(_) => BackendKind::ColumnarPushdown,
            BackendPredicate::Relational(_) => BackendKind::Relational,
        }
    }

    /// Whether the predicate selects every row.
    pub fn is_match_all(&self) -> bool {
        match self {
            BackendPredicate::InMemory(predicate) => predicate.is_accept_all(),
            BackendPredicate::ColumnarPushdown(plan) => plan.is_match_all(),
            BackendPredicate::Relational(filter) => filter.is_match_all(),
        }
    }

    pub fn into_memory(self) -> Option<MemoryPredicate> {
        match self {
            BackendPredicate::InMemory(predicate) => Some(predicate),
            _ => None,
        }
    }

    pub fn into_pushdown(self) -> Option<PushdownPlan> {
        match self {
            BackendPredicate::ColumnarPushdown(plan) => Some(plan),
            _ => None,
        }
    }

    pub fn into_sql(self) -> Option<SqlFilter> {
        match self {
            BackendPredicate::Relational(filter) => Some(filter),
            _ => None,
        }
    }
}

/// Parses `filter_text` and compiles it for `backend` with default options.
pub fn compile_filter(filter_text: &str, backend: BackendKind) -> CompileResult<BackendPredicate> {
    compile_filter_with(filter_text, backend, &CompileOptions::default())
}

pub fn compile_filter_with(
    filter_text: &str,
    backend: BackendKind,
    options: &CompileOptions,
) -> CompileResult<BackendPredicate> {
    let filter = filter_syntax::parse(filter_text)?;
    compile_parsed(&filter, backend, options)
}

/// Compiles an already parsed filter; the AST can be reused across backends.
pub fn compile_parsed(
    filter: &Filter,
    backend: BackendKind,
    options: &CompileOptions,
) -> CompileResult<BackendPredicate> {
    debug!(backend = %backend, empty = filter.is_empty(), "Compiling filter");

    let predicate = match backend {
        BackendKind::InMemory => {
            BackendPredicate::InMemory(MemoryCompiler::from_options(options).compile(filter)?)
        }
        BackendKind::ColumnarPushdown => BackendPredicate::ColumnarPushdown(
            ColumnarCompiler::from_options(options).compile(filter)?,
        ),
        BackendKind::Relational => {
            BackendPredicate::Relational(SqlCompiler::from_options(options).compile(filter)?)
        }
    };
    Ok(predicate)
}
