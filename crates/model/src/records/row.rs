use crate::core::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Column-value lookup used by in-memory predicates.
///
/// Returning `None` means the column is absent from the row; predicates treat
/// an absent column exactly like a `Null` value.
pub trait RowLookup {
    fn get(&self, column: &str) -> Option<&Value>;
}

impl RowLookup for HashMap<String, Value> {
    fn get(&self, column: &str) -> Option<&Value> {
        HashMap::get(self, column)
    }
}

impl RowLookup for BTreeMap<String, Value> {
    fn get(&self, column: &str) -> Option<&Value> {
        BTreeMap::get(self, column)
    }
}

impl<R: RowLookup + ?Sized> RowLookup for &R {
    fn get(&self, column: &str) -> Option<&Value> {
        (**self).get(column)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldValue {
    pub name: String,
    pub value: Value,
}

/// An ordered row of named fields, as handed out by a storage scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Row {
    pub field_values: Vec<FieldValue>,
}

impl Row {
    pub fn new(field_values: Vec<FieldValue>) -> Self {
        Row { field_values }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.field_values.push(FieldValue {
            name: name.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.field_values.iter().find(|f| f.name == name)
    }

    pub fn get_value(&self, name: &str) -> Value {
        self.field(name)
            .map(|f| f.value.clone())
            .unwrap_or(Value::Null)
    }

    pub fn len(&self) -> usize {
        self.field_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_values.is_empty()
    }
}

impl RowLookup for Row {
    fn get(&self, column: &str) -> Option<&Value> {
        self.field(column).map(|f| &f.value)
    }
}

impl<S: Into<String>, V: Into<Value>> FromIterator<(S, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        Row {
            field_values: iter
                .into_iter()
                .map(|(name, value)| FieldValue {
                    name: name.into(),
                    value: value.into(),
                })
                .collect(),
        }
    }
}
