//! Grouping-key inference and row partitioning

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use super::table::{CellValue, Table, Value};

/// Insertion-ordered map hashed with FxHasher
pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// The tuple of grouping-column values identifying one partition
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GroupKey {
    values: Vec<CellValue>,
}

impl GroupKey {
    /// Create a key from grouping-column values
    pub fn new(values: Vec<CellValue>) -> Self {
        Self { values }
    }

    /// Key over the given columns of one row's cells.
    ///
    /// Nested values never reach group keys through grouping inference; a
    /// nested cell in a grouping column contributes a null component.
    pub fn from_cells(cells: &[Value], group_columns: &[usize]) -> Self {
        let values = group_columns
            .iter()
            .map(|&index| match cells.get(index) {
                Some(Value::Scalar(value)) => value.clone(),
                _ => CellValue::Null,
            })
            .collect();
        Self { values }
    }

    /// The key components in grouping-column order
    pub fn values(&self) -> &[CellValue] {
        &self.values
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .values
            .iter()
            .map(|value| value.display().into_owned())
            .collect();
        write!(f, "{}", parts.join("|"))
    }
}

/// Infer the grouping columns of a table for dispatch over `object`: every
/// column whose runtime values are scalar, minus the object column itself
/// (excluded even when scalar-typed).
pub fn infer_group_columns(table: &Table, object: usize) -> Vec<usize> {
    (0..table.column_count())
        .filter(|&index| index != object && !table.is_nested_column(index))
        .collect()
}

/// Partition row indices by grouping-key equality.
///
/// Partitions keep the insertion order of the first occurrence of each key;
/// rows within a partition keep source order.
pub fn partition_rows(table: &Table, group_columns: &[usize]) -> FxIndexMap<GroupKey, Vec<usize>> {
    let mut partitions: FxIndexMap<GroupKey, Vec<usize>> = FxIndexMap::default();
    for (index, row) in table.rows.iter().enumerate() {
        let key = GroupKey::from_cells(&row.cells, group_columns);
        partitions.entry(key).or_default().push(index);
    }
    partitions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Nested;

    fn table_with_nested() -> Table {
        // columns: scalar, scalar, nested
        let mut table = Table::from_column_names(["mpg", "cyl", "fit"]);
        table.add_row(vec![
            Value::from(21.0),
            Value::from(6),
            Value::from(Nested::table(Table::new(vec![]))),
        ]);
        table.add_row(vec![
            Value::from(22.8),
            Value::from(4),
            Value::from(Nested::table(Table::new(vec![]))),
        ]);
        table
    }

    #[test]
    fn test_infer_excludes_nested_and_object() {
        let table = table_with_nested();
        assert_eq!(infer_group_columns(&table, 2), vec![0, 1]);
    }

    #[test]
    fn test_object_excluded_even_when_scalar() {
        let mut table = Table::from_column_names(["cyl", "n"]);
        table.add_row(vec![Value::from(4), Value::from(10)]);
        // column 1 is scalar but named as the object: it must not group
        assert_eq!(infer_group_columns(&table, 1), vec![0]);
    }

    #[test]
    fn test_partitions_keep_first_occurrence_order() {
        let mut table = Table::from_column_names(["k"]);
        for key in ["b", "a", "b", "c", "a"] {
            table.add_row(vec![Value::from(key)]);
        }
        let partitions = partition_rows(&table, &[0]);
        let keys: Vec<String> = partitions.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        let rows: Vec<&Vec<usize>> = partitions.values().collect();
        assert_eq!(rows, vec![&vec![0, 2], &vec![1, 4], &vec![3]]);
    }

    #[test]
    fn test_numeric_keys_group_across_int_and_float() {
        let mut table = Table::from_column_names(["k"]);
        table.add_row(vec![Value::from(2)]);
        table.add_row(vec![Value::from(2.0)]);
        let partitions = partition_rows(&table, &[0]);
        assert_eq!(partitions.len(), 1);
        assert_eq!(partitions.values().next(), Some(&vec![0, 1]));
    }

    #[test]
    fn test_group_key_display_joins_components() {
        let key = GroupKey::new(vec![CellValue::Int(4), CellValue::from("a")]);
        assert_eq!(key.to_string(), "4|a");
    }
}
