//! Typed argument errors raised by the dispatch entry points

use thiserror::Error;

/// Argument errors detected before or while walking the input table.
///
/// Failures raised by a tidying function are not part of this taxonomy; they
/// propagate through `anyhow::Result` unmodified.
#[derive(Debug, Error)]
pub enum TidyError {
    /// The object column name does not exist in the table
    #[error("column `{name}` not found in table")]
    UnknownColumn { name: String },

    /// A column expected to hold nested values holds a scalar at some row
    #[error("column `{column}` does not hold a nested value at row {row}")]
    NotNested { column: String, row: usize },

    /// The object column holds a nested value without a tidier capability
    #[error("column `{column}` holds a nested value that is not a tidyable model")]
    NotAModel { column: String },

    /// A tidier result column shares its name with a grouping column
    #[error("result column `{name}` collides with a grouping column of the same name")]
    ColumnCollision { name: String },
}
