use crate::backend::BackendKind;
use filter_syntax::SyntaxError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("Type mismatch on column `{column}` at offset {offset}: expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("Unsupported predicate for {backend} backend: {construct}")]
    UnsupportedPredicate {
        backend: BackendKind,
        construct: String,
    },

    #[error("Unknown column `{column}` at offset {offset}")]
    UnknownColumn { column: String, offset: usize },

    #[error("Invalid identifier: {identifier}")]
    InvalidIdentifier { identifier: String },
}

impl CompileError {
    pub fn type_mismatch(
        column: &str,
        expected: impl Into<String>,
        found: impl Into<String>,
        offset: usize,
    ) -> Self {
        CompileError::TypeMismatch {
            column: column.to_string(),
            expected: expected.into(),
            found: found.into(),
            offset,
        }
    }

    pub fn unsupported(backend: BackendKind, construct: impl Into<String>) -> Self {
        CompileError::UnsupportedPredicate {
            backend,
            construct: construct.into(),
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;
