use serde::{Deserialize, Serialize};
use std::fmt;

/// Operators of a column/literal comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    Like,
}

impl ComparisonOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessOrEqual => "<=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterOrEqual => ">=",
            ComparisonOperator::Like => "LIKE",
        }
    }

    /// `<`, `<=`, `>`, `>=`: operators that need an ordered type.
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            ComparisonOperator::LessThan
                | ComparisonOperator::LessOrEqual
                | ComparisonOperator::GreaterThan
                | ComparisonOperator::GreaterOrEqual
        )
    }

    /// The complementary operator over non-null values. `LIKE` has none.
    pub fn complement(&self) -> Option<ComparisonOperator> {
        match self {
            ComparisonOperator::Equal => Some(ComparisonOperator::NotEqual),
            ComparisonOperator::NotEqual => Some(ComparisonOperator::Equal),
            ComparisonOperator::LessThan => Some(ComparisonOperator::GreaterOrEqual),
            ComparisonOperator::LessOrEqual => Some(ComparisonOperator::GreaterThan),
            ComparisonOperator::GreaterThan => Some(ComparisonOperator::LessOrEqual),
            ComparisonOperator::GreaterOrEqual => Some(ComparisonOperator::LessThan),
            ComparisonOperator::Like => None,
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_display() {
        assert_eq!(format!("{}", ComparisonOperator::Equal), "=");
        assert_eq!(format!("{}", ComparisonOperator::GreaterOrEqual), ">=");
        assert_eq!(format!("{}", ComparisonOperator::Like), "LIKE");
    }

    #[test]
    fn test_complement_is_involutive() {
        for op in [
            ComparisonOperator::Equal,
            ComparisonOperator::NotEqual,
            ComparisonOperator::LessThan,
            ComparisonOperator::LessOrEqual,
            ComparisonOperator::GreaterThan,
            ComparisonOperator::GreaterOrEqual,
        ] {
            assert_eq!(op.complement().and_then(|c| c.complement()), Some(op));
        }
        assert_eq!(ComparisonOperator::Like.complement(), None);
    }
}
