use crate::ast::{
    expr::{Expression, ExpressionKind},
    ident::Identifier,
};

/// Visitor trait for AST traversal
pub trait ExpressionVisitor {
    /// Visits `expr` and then its children, depth first, left to right.
    fn walk(&mut self, expr: &Expression) {
        self.visit_expression(expr);
        match &expr.kind {
            ExpressionKind::Comparison { column, .. }
            | ExpressionKind::In { column, .. }
            | ExpressionKind::IsNull { column, .. } => self.visit_identifier(column),
            ExpressionKind::ColumnComparison { left, right, .. } => {
                self.visit_identifier(left);
                self.visit_identifier(right);
            }
            ExpressionKind::And { left, right } | ExpressionKind::Or { left, right } => {
                self.walk(left);
                self.walk(right);
            }
            ExpressionKind::Not { operand } => self.walk(operand),
        }
    }

    fn visit_expression(&mut self, _expr: &Expression) {}
    fn visit_identifier(&mut self, _ident: &Identifier) {}
}

/// Collects referenced column names without duplicates.
#[derive(Debug, Default)]
pub struct ColumnCollector {
    columns: Vec<String>,
}

impl ColumnCollector {
    pub fn into_columns(self) -> Vec<String> {
        self.columns
    }
}

impl ExpressionVisitor for ColumnCollector {
    fn visit_identifier(&mut self, ident: &Identifier) {
        if !self.columns.iter().any(|c| c == &ident.name) {
            self.columns.push(ident.name.clone());
        }
    }
}
