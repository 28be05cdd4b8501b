use crate::ast::{
    expr::Expression,
    visitor::{ColumnCollector, ExpressionVisitor},
};

/// A parsed filter. A filter without a root selects every row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filter {
    root: Option<Expression>,
}

impl Filter {
    pub fn new(root: Expression) -> Self {
        Filter { root: Some(root) }
    }

    pub fn empty() -> Self {
        Filter { root: None }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<&Expression> {
        self.root.as_ref()
    }

    /// Prefix notation of the whole filter; the empty filter renders as `""`.
    pub fn to_prefix_notation(&self) -> String {
        self.root
            .as_ref()
            .map(|root| root.to_string())
            .unwrap_or_default()
    }

    /// Distinct column names referenced by the filter, in first-use order.
    pub fn columns(&self) -> Vec<String> {
        let mut collector = ColumnCollector::default();
        if let Some(root) = &self.root {
            collector.walk(root);
        }
        collector.into_columns()
    }
}

impl From<Option<Expression>> for Filter {
    fn from(root: Option<Expression>) -> Self {
        Filter { root }
    }
}
