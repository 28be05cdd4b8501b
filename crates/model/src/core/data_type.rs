use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

/// Logical column type a filter can be checked against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum DataType {
    Boolean,
    Integer,
    Float,
    String,
    Timestamp,
}

lazy_static! {
    static ref TYPE_NAME_MAP: HashMap<&'static str, DataType> = build_type_name_map();
}

impl DataType {
    /// Resolves a storage type name (SQL, parquet/arrow or pandas spelling).
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        let normalized = Self::normalize_type_name(type_name);
        TYPE_NAME_MAP.get(normalized.as_str()).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataType::Boolean => "boolean",
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::String => "string",
            DataType::Timestamp => "timestamp",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }

    /// Whether values of both types can be compared without coercion.
    pub fn is_compatible(&self, other: &DataType) -> bool {
        (self.is_numeric() && other.is_numeric()) || self == other
    }

    /// Whether values of this type have a meaningful order for `<`, `>` etc.
    pub fn is_ordered(&self) -> bool {
        !matches!(self, DataType::Boolean)
    }

    fn normalize_type_name(type_name: &str) -> String {
        let trimmed = type_name.trim();
        // Strip length/precision suffixes like VARCHAR(255) or TIMESTAMP(6)
        let base = match trimmed.find('(') {
            Some(idx) => &trimmed[..idx],
            None => trimmed,
        };
        base.trim().to_uppercase()
    }
}

impl TryFrom<&str> for DataType {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        DataType::from_type_name(s).ok_or_else(|| format!("Unknown column type: {s}"))
    }
}

impl TryFrom<String> for DataType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        DataType::try_from(s.as_str())
    }
}

impl From<DataType> for String {
    fn from(data_type: DataType) -> Self {
        data_type.name().to_string()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn build_type_name_map() -> HashMap<&'static str, DataType> {
    use DataType::*;

    let entries = [
        ("BOOLEAN", Boolean),
        ("BOOL", Boolean),
        ("TINYINT", Integer),
        ("SMALLINT", Integer),
        ("MEDIUMINT", Integer),
        ("INT", Integer),
        ("INTEGER", Integer),
        ("BIGINT", Integer),
        ("INT2", Integer),
        ("INT4", Integer),
        ("INT8", Integer),
        ("INT16", Integer),
        ("INT32", Integer),
        ("INT64", Integer),
        ("UINT8", Integer),
        ("UINT16", Integer),
        ("UINT32", Integer),
        ("SERIAL", Integer),
        ("BIGSERIAL", Integer),
        ("FLOAT", Float),
        ("FLOAT4", Float),
        ("FLOAT8", Float),
        ("FLOAT32", Float),
        ("FLOAT64", Float),
        ("REAL", Float),
        ("DOUBLE", Float),
        ("DOUBLE PRECISION", Float),
        ("DECIMAL", Float),
        ("NUMERIC", Float),
        ("CHAR", String),
        ("CHARACTER", String),
        ("VARCHAR", String),
        ("CHARACTER VARYING", String),
        ("TEXT", String),
        ("STRING", String),
        ("UTF8", String),
        ("LARGE_UTF8", String),
        ("OBJECT", String),
        ("TIMESTAMP", Timestamp),
        ("TIMESTAMPTZ", Timestamp),
        ("TIMESTAMP WITH TIME ZONE", Timestamp),
        ("TIMESTAMP WITHOUT TIME ZONE", Timestamp),
        ("DATETIME", Timestamp),
        ("DATETIME64[NS]", Timestamp),
        ("DATE", Timestamp),
    ];

    let mut map = HashMap::new();
    for (name, data_type) in entries {
        map.insert(name, data_type);
    }
    map
}
