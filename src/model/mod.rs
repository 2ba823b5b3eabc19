//! Data model for tabular data representation

mod group;
mod schema;
mod table;

pub use group::{infer_group_columns, partition_rows, FxIndexMap, GroupKey};
pub use schema::{CellType, Column};
pub use table::{CellValue, Nested, Row, Table, Value};
