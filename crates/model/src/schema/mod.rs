use crate::core::data_type::DataType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column name to type mapping a filter can be bound against at compile time.
///
/// Deserializes from a plain JSON object, e.g. `{"age": "BIGINT", "name": "text"}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    columns: BTreeMap<String, DataType>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, name: &str, data_type: DataType) -> Self {
        self.columns.insert(name.to_string(), data_type);
        self
    }

    pub fn column_type(&self, name: &str) -> Option<DataType> {
        self.columns.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, DataType)> {
        self.columns.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, DataType)> for Schema {
    fn from_iter<I: IntoIterator<Item = (S, DataType)>>(iter: I) -> Self {
        Schema {
            columns: iter.into_iter().map(|(n, t)| (n.into(), t)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_from_json_type_names() {
        let schema: Schema =
            serde_json::from_str(r#"{"age": "BIGINT", "name": "text", "seen": "timestamptz"}"#)
                .unwrap();

        assert_eq!(schema.len(), 3);
        assert_eq!(schema.column_type("age"), Some(DataType::Integer));
        assert_eq!(schema.column_type("seen"), Some(DataType::Timestamp));
        assert_eq!(schema.column_type("other"), None);
    }

    #[test]
    fn test_schema_rejects_unknown_type_names() {
        let result = serde_json::from_str::<Schema>(r#"{"shape": "geometry"}"#);
        assert!(result.is_err());
    }
}
