use crate::error::CompileResult;
use filter_syntax::Filter;

/// A trait for compiling parsed filters into a backend-native predicate.
pub trait FilterCompiler {
    /// The type of filter that this compiler produces.
    type Filter;

    /// Compile the AST into a filter, or explain which construct the backend
    /// cannot express.
    fn compile(&self, filter: &Filter) -> CompileResult<Self::Filter>;
}
