//! Stacking per-row results into one grouped output table

use crate::error::TidyError;
use crate::model::{Column, FxIndexMap, Table, Value};

/// Accumulates per-row result tables into one output.
///
/// The output schema starts with the grouping columns of the source table
/// and grows by column-name union as results arrive. Rows are recorded in
/// append order; missing cells are null-filled when the table is built.
pub(crate) struct ResultBuilder<'a> {
    source: &'a Table,
    group_columns: &'a [usize],
    columns: Vec<Column>,
    column_slots: FxIndexMap<String, usize>,
    rows: Vec<(usize, Vec<Value>)>,
}

impl<'a> ResultBuilder<'a> {
    pub(crate) fn new(source: &'a Table, group_columns: &'a [usize]) -> Self {
        let mut columns = Vec::with_capacity(group_columns.len());
        let mut column_slots = FxIndexMap::default();
        for (slot, &index) in group_columns.iter().enumerate() {
            let column = &source.columns[index];
            columns.push(Column::with_type(
                column.name.clone(),
                slot,
                column.inferred_type,
            ));
            column_slots.insert(column.name.clone(), slot);
        }
        Self {
            source,
            group_columns,
            columns,
            column_slots,
            rows: Vec::new(),
        }
    }

    /// Append the result produced from one source row.
    ///
    /// A zero-row result still contributes its columns to the output schema.
    pub(crate) fn append(&mut self, source_row: usize, result: Table) -> Result<(), TidyError> {
        let group_count = self.group_columns.len();

        // Union the result schema into the output schema
        let mut slots = Vec::with_capacity(result.columns.len());
        for column in &result.columns {
            let slot = match self.column_slots.get(&column.name) {
                Some(&slot) if slot < group_count => {
                    return Err(TidyError::ColumnCollision {
                        name: column.name.clone(),
                    });
                }
                Some(&slot) => slot,
                None => {
                    let slot = self.columns.len();
                    self.columns.push(Column::with_type(
                        column.name.clone(),
                        slot,
                        column.inferred_type,
                    ));
                    self.column_slots.insert(column.name.clone(), slot);
                    slot
                }
            };
            slots.push(slot);
        }

        for row in &result.rows {
            let mut cells: Vec<Value> = Vec::with_capacity(self.columns.len());
            for &index in self.group_columns {
                let value = self.source.value(source_row, index);
                cells.push(value.cloned().unwrap_or_else(Value::null));
            }
            cells.resize(self.columns.len(), Value::null());
            for (result_index, &slot) in slots.iter().enumerate() {
                if let Some(value) = row.get(result_index) {
                    cells[slot] = value.clone();
                }
            }
            self.rows.push((source_row, cells));
        }
        Ok(())
    }

    /// Build the output table, grouped by the seeded grouping columns
    pub(crate) fn finish(self) -> Table {
        let group_count = self.group_columns.len();
        let mut table = Table::new(self.columns);
        for (source_row, cells) in self.rows {
            table.add_row_from(cells, source_row);
        }
        table.set_group_column_indices((0..group_count).collect());
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellType, Nested};

    fn source_table() -> Table {
        let mut table = Table::from_column_names(["cyl", "am", "fit"]);
        table.add_row(vec![
            Value::from(4),
            Value::from(true),
            Value::from(Nested::table(Table::new(vec![]))),
        ]);
        table.add_row(vec![
            Value::from(6),
            Value::from(false),
            Value::from(Nested::table(Table::new(vec![]))),
        ]);
        table
    }

    fn term_result(term: &str, estimate: f64) -> Table {
        let mut result = Table::from_column_names(["term", "estimate"]);
        result.add_row(vec![Value::from(term), Value::from(estimate)]);
        result
    }

    #[test]
    fn test_group_values_prefix_each_result_row() {
        let source = source_table();
        let mut builder = ResultBuilder::new(&source, &[0, 1]);
        builder.append(0, term_result("(Intercept)", 36.9)).unwrap();
        builder.append(1, term_result("(Intercept)", 19.7)).unwrap();
        let output = builder.finish();

        let names: Vec<&str> = output.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["cyl", "am", "term", "estimate"]);
        assert_eq!(output.group_columns, vec![0, 1]);
        assert_eq!(output.value(0, 0), Some(&Value::from(4)));
        assert_eq!(output.value(0, 1), Some(&Value::from(true)));
        assert_eq!(output.value(1, 0), Some(&Value::from(6)));
        assert_eq!(output.value(1, 3), Some(&Value::from(19.7)));
    }

    #[test]
    fn test_column_union_null_fills_missing_cells() {
        let source = source_table();
        let mut builder = ResultBuilder::new(&source, &[0]);
        builder.append(0, term_result("(Intercept)", 36.9)).unwrap();

        let mut wider = Table::from_column_names(["term", "estimate", "p.value"]);
        wider.add_row(vec![
            Value::from("(Intercept)"),
            Value::from(19.7),
            Value::from(0.01),
        ]);
        builder.append(1, wider).unwrap();
        let output = builder.finish();

        assert_eq!(output.column_count(), 4);
        assert_eq!(output.value(0, 3), Some(&Value::null()));
        assert_eq!(output.value(1, 3), Some(&Value::from(0.01)));
        assert_eq!(output.columns[3].inferred_type, CellType::Float);
    }

    #[test]
    fn test_zero_row_result_contributes_columns() {
        let source = source_table();
        let mut builder = ResultBuilder::new(&source, &[0]);
        builder
            .append(0, Table::from_column_names(["term", "estimate"]))
            .unwrap();
        let output = builder.finish();
        assert_eq!(output.column_count(), 3);
        assert_eq!(output.row_count(), 0);
    }

    #[test]
    fn test_result_column_colliding_with_group_column_fails() {
        let source = source_table();
        let mut builder = ResultBuilder::new(&source, &[0, 1]);
        let mut result = Table::from_column_names(["cyl", "estimate"]);
        result.add_row(vec![Value::from(8), Value::from(1.0)]);
        let err = builder.append(0, result).unwrap_err();
        assert!(matches!(err, TidyError::ColumnCollision { name } if name == "cyl"));
    }
}
