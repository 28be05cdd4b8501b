use crate::ast::span::Span;
use std::fmt;

/// A column reference.
///
/// Unquoted names may be dotted (`table.column`) and are split into segments;
/// a backtick-quoted name is always a single segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: String,
    pub quoted: bool,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: &str, span: Span) -> Self {
        Self {
            name: name.to_string(),
            quoted: false,
            span,
        }
    }

    pub fn quoted(name: &str, span: Span) -> Self {
        Self {
            name: name.to_string(),
            quoted: true,
            span,
        }
    }

    pub fn segments(&self) -> Vec<&str> {
        if self.quoted {
            vec![self.name.as_str()]
        } else {
            self.name.split('.').collect()
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_segments() {
        let span = Span::new(0, 9, 1, 1);

        assert_eq!(Identifier::new("table1.id", span).segments(), vec!["table1", "id"]);
        assert_eq!(Identifier::quoted("a.column", span).segments(), vec!["a.column"]);
    }
}
