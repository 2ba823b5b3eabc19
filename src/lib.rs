//! rowtidy - Rowwise tidying of models nested in tables
//!
//! A library for dispatching tidy/augment/glance summaries over fitted models
//! stored in a nested table column, stacking the per-row results into one
//! grouped output table.

pub mod error;
mod macros;
pub mod model;
pub mod options;
pub mod output;
pub mod rowwise;
pub mod tidier;

pub use error::TidyError;
pub use model::{CellType, CellValue, Column, GroupKey, Nested, Row, Table, Value};
pub use options::RowwiseOptions;
pub use output::RenderFormat;
pub use rowwise::{augment, glance, tidy, RowwiseDispatcher, TidyOp};
pub use tidier::{DataArg, DataRef, Tidier, TidierArgs};
