//! The tidier trait implemented by models stored in nested cells

use std::fmt;
use std::sync::Arc;

use anyhow::Result;

use crate::model::{CellValue, FxIndexMap, Nested, Table};

/// A fitted model that can summarize itself as tables.
///
/// Each method returns the summary for one model; the rowwise entry points
/// call it once per row and stack the results. Implementations that never
/// support an operation should return an error describing why.
pub trait Tidier: fmt::Debug + Send + Sync {
    /// Component-level summary, one row per model term
    fn tidy(&self, data: Option<DataRef<'_>>, args: &TidierArgs) -> Result<Table>;

    /// Observation-level summary, typically one row per input observation
    fn augment(&self, data: Option<DataRef<'_>>, args: &TidierArgs) -> Result<Table>;

    /// Model-level summary, exactly one row per model
    fn glance(&self, data: Option<DataRef<'_>>, args: &TidierArgs) -> Result<Table>;

    /// Short name used when rendering nested cells
    fn label(&self) -> &str {
        "model"
    }
}

/// The `data` argument as supplied by the caller
#[derive(Debug, Clone)]
pub enum DataArg {
    /// A column name, matched against the table's nested columns
    Column(String),
    /// A table passed through unchanged to every invocation
    Table(Arc<Table>),
}

/// The `data` value a single tidier invocation receives
#[derive(Debug, Clone, Copy)]
pub enum DataRef<'a> {
    /// The nested value of the matched data column in the current row
    Cell(&'a Nested),
    /// A caller-supplied table shared by every row
    Table(&'a Table),
    /// A name that matched no nested column, passed through as-is
    Name(&'a str),
}

impl<'a> DataRef<'a> {
    /// The underlying table when this reference resolves to one
    pub fn as_table(&self) -> Option<&'a Table> {
        match self {
            DataRef::Cell(nested) => nested.as_table(),
            DataRef::Table(table) => Some(table),
            DataRef::Name(_) => None,
        }
    }
}

/// Extra keyword arguments forwarded verbatim to every invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TidierArgs {
    values: FxIndexMap<String, CellValue>,
}

impl TidierArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an argument, replacing any previous value for the name
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<CellValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder-style `set`
    pub fn with(mut self, name: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.values.get(name)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            CellValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            CellValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            CellValue::Float(value) => Some(*value),
            CellValue::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            CellValue::String(value) => Some(value.as_ref()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_accessors() {
        let args = TidierArgs::new()
            .with("conf_int", true)
            .with("conf_level", 0.95)
            .with("df", 28)
            .with("method", "wald");
        assert_eq!(args.get_bool("conf_int"), Some(true));
        assert_eq!(args.get_f64("conf_level"), Some(0.95));
        assert_eq!(args.get_i64("df"), Some(28));
        assert_eq!(args.get_str("method"), Some("wald"));
        assert_eq!(args.get("missing"), None);
        assert_eq!(args.len(), 4);

        let names: Vec<&str> = args.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["conf_int", "conf_level", "df", "method"]);
    }

    #[test]
    fn test_args_int_coerces_to_f64() {
        let args = TidierArgs::new().with("df", 28);
        assert_eq!(args.get_f64("df"), Some(28.0));
        assert_eq!(args.get_i64("df"), Some(28));
    }

    #[test]
    fn test_set_replaces_existing() {
        let mut args = TidierArgs::new();
        args.set("conf_level", 0.95);
        args.set("conf_level", 0.99);
        assert_eq!(args.get_f64("conf_level"), Some(0.99));
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_data_ref_as_table() {
        let table = Table::from_column_names(["x"]);
        assert!(DataRef::Table(&table).as_table().is_some());
        assert!(DataRef::Name("weights").as_table().is_none());
        let nested = Nested::table(Table::from_column_names(["x"]));
        assert!(DataRef::Cell(&nested).as_table().is_some());
    }
}
