use thiserror::Error;

/// Malformed or unexpected input in a filter string.
///
/// `offset` is the byte offset of the offending text; `line`/`column` are
/// 1-based and derived from it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("syntax error at offset {offset} (line {line}, column {column}): {message}")]
pub struct SyntaxError {
    pub message: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, offset: usize, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            offset,
            line,
            column,
        }
    }

    /// Builds an error at `offset`, deriving line and column from `source`.
    pub fn at(message: impl Into<String>, source: &str, offset: usize) -> Self {
        let (line, column) = line_col(source, offset);
        Self::new(message, offset, line, column)
    }

    /// Format error with context for display
    pub fn format_error(&self, source: &str) -> String {
        let snippet = source.lines().nth(self.line.saturating_sub(1)).unwrap_or("");
        format!(
            "Syntax error at line {}, column {}:\n{}\n{}^\n{}",
            self.line,
            self.column,
            snippet,
            " ".repeat(self.column.saturating_sub(1)),
            self.message
        )
    }
}

pub type ParseResult<T> = Result<T, SyntaxError>;

/// 1-based line and column (in characters) of a byte offset.
pub(crate) fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let prefix = source.get(..offset).unwrap_or(source);
    let line = prefix.matches('\n').count() + 1;
    let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = prefix[line_start..].chars().count() + 1;
    (line, column)
}
