//! Table, Row, and Value data structures

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::tidier::Tidier;

use super::group::{partition_rows, FxIndexMap, GroupKey};
use super::schema::{CellType, Column};

/// A scalar cell value with type information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Cow<'static, str>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            // Cross-type numeric comparison
            (CellValue::Int(a), CellValue::Float(b)) => (*a as f64) == *b,
            (CellValue::Float(a), CellValue::Int(b)) => *a == (*b as f64),
            _ => false,
        }
    }
}

impl Eq for CellValue {}

fn hash_f64<H: Hasher>(f: f64, state: &mut H) {
    // Normalize NaN and signed zero so values that compare equal hash alike
    let bits = if f.is_nan() {
        f64::NAN.to_bits()
    } else if f == 0.0 {
        0.0_f64.to_bits()
    } else {
        f.to_bits()
    };
    bits.hash(state);
}

impl Hash for CellValue {
    /// Int and Float hash through the same numeric form, keeping the hash
    /// consistent with the cross-type equality above
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            CellValue::Null => 0_u8.hash(state),
            CellValue::Bool(b) => {
                1_u8.hash(state);
                b.hash(state);
            }
            CellValue::Int(i) => {
                2_u8.hash(state);
                hash_f64(*i as f64, state);
            }
            CellValue::Float(f) => {
                2_u8.hash(state);
                hash_f64(*f, state);
            }
            CellValue::String(s) => {
                3_u8.hash(state);
                s.hash(state);
            }
            CellValue::Date(d) => {
                4_u8.hash(state);
                d.hash(state);
            }
            CellValue::DateTime(dt) => {
                5_u8.hash(state);
                dt.hash(state);
            }
        }
    }
}

impl CellValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// The [`CellType`] of this value
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Null => CellType::Null,
            CellValue::Bool(_) => CellType::Bool,
            CellValue::Int(_) => CellType::Int,
            CellValue::Float(_) => CellType::Float,
            CellValue::String(_) => CellType::String,
            CellValue::Date(_) => CellType::Date,
            CellValue::DateTime(_) => CellType::DateTime,
        }
    }

    /// Convert to a display string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed("NULL"),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(f.to_string()),
            CellValue::String(s) => Cow::Borrowed(s.as_ref()),
            CellValue::Date(d) => Cow::Owned(d.to_string()),
            CellValue::DateTime(dt) => Cow::Owned(dt.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(Cow::Owned(s.to_string()))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(Cow::Owned(s))
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

/// An opaque object held by a nested (list-type) column
#[derive(Debug, Clone)]
pub enum Nested {
    /// A fitted model exposing the tidier capability
    Model(Arc<dyn Tidier>),
    /// An embedded sub-table, e.g. the data a model was fit on
    Table(Arc<Table>),
}

impl Nested {
    /// Wrap a model
    pub fn model<T: Tidier + 'static>(model: T) -> Self {
        Nested::Model(Arc::new(model))
    }

    /// Wrap a sub-table
    pub fn table(table: Table) -> Self {
        Nested::Table(Arc::new(table))
    }

    /// The model, if this nested value holds one
    pub fn as_model(&self) -> Option<&dyn Tidier> {
        match self {
            Nested::Model(model) => Some(model.as_ref()),
            Nested::Table(_) => None,
        }
    }

    /// The sub-table, if this nested value holds one
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Nested::Model(_) => None,
            Nested::Table(table) => Some(table.as_ref()),
        }
    }

    /// Short label used when rendering cells
    pub fn label(&self) -> &str {
        match self {
            Nested::Model(model) => model.label(),
            Nested::Table(_) => "table",
        }
    }
}

impl PartialEq for Nested {
    /// Nested values compare by identity, not by content
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Nested::Model(a), Nested::Model(b)) => Arc::ptr_eq(a, b),
            (Nested::Table(a), Nested::Table(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A cell: either a scalar or a nested object
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(CellValue),
    Nested(Nested),
}

impl Value {
    /// The null scalar
    pub fn null() -> Self {
        Value::Scalar(CellValue::Null)
    }

    /// Check if the value is the null scalar
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(CellValue::Null))
    }

    /// Check if the value is nested
    pub fn is_nested(&self) -> bool {
        matches!(self, Value::Nested(_))
    }

    /// The scalar value, if this is one
    pub fn as_scalar(&self) -> Option<&CellValue> {
        match self {
            Value::Scalar(value) => Some(value),
            Value::Nested(_) => None,
        }
    }

    /// The nested value, if this is one
    pub fn as_nested(&self) -> Option<&Nested> {
        match self {
            Value::Scalar(_) => None,
            Value::Nested(nested) => Some(nested),
        }
    }

    /// The [`CellType`] of this value
    pub fn cell_type(&self) -> CellType {
        match self {
            Value::Scalar(value) => value.cell_type(),
            Value::Nested(_) => CellType::Nested,
        }
    }

    /// Convert to a display string; nested values render as `<label>`
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            Value::Scalar(value) => value.display(),
            Value::Nested(nested) => Cow::Owned(format!("<{}>", nested.label())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<CellValue> for Value {
    fn from(value: CellValue) -> Self {
        Value::Scalar(value)
    }
}

impl From<Nested> for Value {
    fn from(nested: Nested) -> Self {
        Value::Nested(nested)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s.into())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(i.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Scalar(f.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(b.into())
    }
}

/// A row in the table
#[derive(Debug, Clone)]
pub struct Row {
    /// Cell values in column order
    pub cells: Vec<Value>,
    /// Index of the source row this row was produced from
    pub source_row: usize,
}

impl Row {
    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.cells.get(index)
    }
}

impl PartialEq for Row {
    /// Rows compare by cell content; provenance is not part of equality
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

/// A table containing columns and rows, optionally grouped
#[derive(Debug)]
pub struct Table {
    /// Column definitions
    pub columns: Vec<Column>,
    /// All rows in the table
    pub rows: Vec<Row>,
    /// Indices of the columns the table is grouped by (empty when ungrouped)
    pub group_columns: Vec<usize>,
    /// Partition index: group key to row indices, in first-occurrence order
    pub group_index: FxIndexMap<GroupKey, Vec<usize>>,
}

impl Table {
    /// Create a new empty table with column definitions
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            group_columns: Vec::new(),
            group_index: FxIndexMap::default(),
        }
    }

    /// Create a new empty table with untyped columns of the given names
    pub fn from_column_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| Column::new(name, index))
            .collect();
        Self::new(columns)
    }

    /// Add a row to the table, widening column types to fit its values
    pub fn add_row(&mut self, cells: Vec<Value>) {
        let source_row = self.rows.len();
        self.push_row(cells, source_row);
    }

    /// Add a row recording which source row produced it
    pub(crate) fn add_row_from(&mut self, cells: Vec<Value>, source_row: usize) {
        self.push_row(cells, source_row);
    }

    fn push_row(&mut self, mut cells: Vec<Value>, source_row: usize) {
        // Pad or truncate to the table width
        cells.resize(self.columns.len(), Value::null());

        for (index, value) in cells.iter().enumerate() {
            let widened = self.columns[index].inferred_type.widen(value.cell_type());
            self.columns[index].inferred_type = widened;
        }

        let row_index = self.rows.len();
        if !self.group_columns.is_empty() {
            let key = GroupKey::from_cells(&cells, &self.group_columns);
            self.group_index.entry(key).or_default().push(row_index);
        }
        self.rows.push(Row { cells, source_row });
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get a value by row and column index
    pub fn value(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether the column holds a nested value in any row, scanned at call
    /// time from the runtime values
    pub fn is_nested_column(&self, index: usize) -> bool {
        self.rows
            .iter()
            .any(|row| matches!(row.get(index), Some(Value::Nested(_))))
    }

    /// Set grouping columns by name; unknown names are ignored
    pub fn set_group_columns<S: AsRef<str>>(&mut self, names: &[S]) {
        let indices = names
            .iter()
            .filter_map(|name| self.column_index(name.as_ref()))
            .collect();
        self.set_group_column_indices(indices);
    }

    /// Set grouping columns by index
    pub fn set_group_column_indices(&mut self, indices: Vec<usize>) {
        self.group_columns = indices;
        self.rebuild_group_index();
    }

    /// Rebuild the partition index
    fn rebuild_group_index(&mut self) {
        if self.group_columns.is_empty() {
            self.group_index = FxIndexMap::default();
        } else {
            self.group_index = partition_rows(self, &self.group_columns);
        }
    }

    /// Group key of a row under the current grouping metadata
    pub fn group_key(&self, row: usize) -> Option<GroupKey> {
        self.rows
            .get(row)
            .map(|r| GroupKey::from_cells(&r.cells, &self.group_columns))
    }

    /// Rows of one partition, in source order
    pub fn group_rows(&self, key: &GroupKey) -> impl Iterator<Item = &Row> + '_ {
        self.group_index
            .get(key)
            .into_iter()
            .flatten()
            .map(move |&index| &self.rows[index])
    }
}

impl PartialEq for Table {
    /// Tables compare by schema, rows, and grouping metadata; the partition
    /// index is derived and excluded
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
            && self.rows == other.rows
            && self.group_columns == other.group_columns
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::output::render_text(self))
    }
}
