//! Plain-text table rendering

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::model::Table;

/// Render a table as an aligned text grid, with a trailing grouping note
/// when the table is grouped
pub fn render_text(table: &Table) -> String {
    if table.columns.is_empty() {
        return String::new();
    }

    let mut builder = Builder::default();
    builder.push_record(table.columns.iter().map(|c| c.name.as_str()));
    for row in &table.rows {
        builder.push_record(row.cells.iter().map(|v| v.display().into_owned()));
    }
    let mut rendered = builder.build().with(Style::sharp()).to_string();

    if !table.group_columns.is_empty() {
        let names: Vec<&str> = table
            .group_columns
            .iter()
            .filter_map(|&index| table.columns.get(index).map(|c| c.name.as_str()))
            .collect();
        rendered.push_str(&format!(
            "\n# Groups: {} [{}]",
            names.join(", "),
            table.group_index.len()
        ));
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;

    #[test]
    fn test_renders_headers_and_group_note() {
        let mut table = Table::from_column_names(["cyl", "estimate"]);
        table.add_row(vec![Value::from(4), Value::from(40.9)]);
        table.add_row(vec![Value::from(6), Value::from(19.7)]);
        table.set_group_columns(&["cyl"]);

        let rendered = render_text(&table);
        assert!(rendered.contains("cyl"));
        assert!(rendered.contains("40.9"));
        assert!(rendered.ends_with("# Groups: cyl [2]"));
    }

    #[test]
    fn test_empty_schema_renders_nothing() {
        let table = Table::new(vec![]);
        assert_eq!(render_text(&table), "");
    }
}
