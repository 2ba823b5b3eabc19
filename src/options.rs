//! Configuration for rowwise dispatch

use std::sync::Arc;

use crate::model::{CellValue, Table};
use crate::tidier::{DataArg, TidierArgs};

/// Configuration for a rowwise tidy/augment/glance call
#[derive(Debug, Clone, Default)]
pub struct RowwiseOptions {
    /// Optional `data` argument resolved per row before each invocation
    pub data: Option<DataArg>,
    /// Extra arguments forwarded verbatim to every invocation
    pub args: TidierArgs,
    /// Invoke tidiers across rows in parallel
    pub parallel: bool,
}

impl RowwiseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pass `data` as a column name, matched against nested columns per row
    pub fn with_data_column(mut self, name: impl Into<String>) -> Self {
        self.data = Some(DataArg::Column(name.into()));
        self
    }

    /// Pass `data` as a table shared by every invocation
    pub fn with_data_table(mut self, table: Arc<Table>) -> Self {
        self.data = Some(DataArg::Table(table));
        self
    }

    /// Add one forwarded argument
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.args.set(name, value);
        self
    }

    /// Enable parallel invocation; output order is unaffected
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
