pub mod core;
pub mod records;
pub mod schema;

pub use crate::core::{data_type::DataType, value::Value};
pub use crate::records::row::{FieldValue, Row, RowLookup};
pub use crate::schema::Schema;
