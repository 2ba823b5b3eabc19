//! JSON output format

use anyhow::Result;
use serde::Serialize;

use crate::model::{CellValue, Table, Value};

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }

    /// Render a table as a JSON document
    pub fn render(&self, table: &Table) -> Result<String> {
        let columns: Vec<JsonColumn> = table
            .columns
            .iter()
            .map(|column| JsonColumn {
                name: column.name.clone(),
                cell_type: column.inferred_type.to_string(),
            })
            .collect();

        let group_columns: Vec<String> = table
            .group_columns
            .iter()
            .filter_map(|&index| table.columns.get(index).map(|c| c.name.clone()))
            .collect();

        let rows: Vec<Vec<serde_json::Value>> = table
            .rows
            .iter()
            .map(|row| row.cells.iter().map(value_to_json).collect())
            .collect();

        let output = JsonTable {
            columns,
            group_columns,
            rows,
        };

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&output)?
        } else {
            serde_json::to_string(&output)?
        };
        Ok(rendered)
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable table for JSON output; rows are positional over `columns`
#[derive(Serialize)]
struct JsonTable {
    columns: Vec<JsonColumn>,
    group_columns: Vec<String>,
    rows: Vec<Vec<serde_json::Value>>,
}

#[derive(Serialize)]
struct JsonColumn {
    name: String,
    #[serde(rename = "type")]
    cell_type: String,
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Scalar(scalar) => cell_value_to_json(scalar),
        Value::Nested(nested) => serde_json::Value::String(format!("<{}>", nested.label())),
    }
}

fn cell_value_to_json(value: &CellValue) -> serde_json::Value {
    match value {
        CellValue::Null => serde_json::Value::Null,
        CellValue::Bool(b) => serde_json::Value::Bool(*b),
        CellValue::Int(i) => serde_json::json!(*i),
        CellValue::Float(f) => serde_json::json!(*f),
        CellValue::String(s) => serde_json::Value::String(s.to_string()),
        CellValue::Date(d) => serde_json::Value::String(d.to_string()),
        CellValue::DateTime(dt) => serde_json::Value::String(dt.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Nested;

    #[test]
    fn test_grouped_table_round_trips_through_json() {
        let mut table = Table::from_column_names(["cyl", "fit"]);
        table.add_row(vec![
            Value::from(4),
            Value::from(Nested::table(Table::new(vec![]))),
        ]);
        table.set_group_columns(&["cyl"]);

        let rendered = JsonOutput::compact().render(&table).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(parsed["columns"][0]["name"], "cyl");
        assert_eq!(parsed["columns"][0]["type"], "int");
        assert_eq!(parsed["columns"][1]["type"], "nested");
        assert_eq!(parsed["group_columns"][0], "cyl");
        assert_eq!(parsed["rows"][0][0], 4);
        assert_eq!(parsed["rows"][0][1], "<table>");
    }
}
