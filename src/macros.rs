//! Call-site macros naming the object column as a bare identifier

/// Tidy the models in a nested column named by a bare identifier.
///
/// `tidy!(table, fit)` behaves exactly like `rowwise::tidy(&table, "fit", ..)`
/// with default options. An optional `data = name` argument supplies the data
/// column by identifier, and a trailing expression supplies `RowwiseOptions`.
#[macro_export]
macro_rules! tidy {
    ($table:expr, $object:ident) => {
        $crate::rowwise::tidy(
            &$table,
            stringify!($object),
            &$crate::RowwiseOptions::default(),
        )
    };
    ($table:expr, $object:ident, data = $data:ident) => {
        $crate::rowwise::tidy(
            &$table,
            stringify!($object),
            &$crate::RowwiseOptions::new().with_data_column(stringify!($data)),
        )
    };
    ($table:expr, $object:ident, data = $data:ident, $options:expr) => {
        $crate::rowwise::tidy(
            &$table,
            stringify!($object),
            &$options.clone().with_data_column(stringify!($data)),
        )
    };
    ($table:expr, $object:ident, $options:expr) => {
        $crate::rowwise::tidy(&$table, stringify!($object), &$options)
    };
}

/// Augment the models in a nested column named by a bare identifier.
///
/// Same calling forms as [`tidy!`].
#[macro_export]
macro_rules! augment {
    ($table:expr, $object:ident) => {
        $crate::rowwise::augment(
            &$table,
            stringify!($object),
            &$crate::RowwiseOptions::default(),
        )
    };
    ($table:expr, $object:ident, data = $data:ident) => {
        $crate::rowwise::augment(
            &$table,
            stringify!($object),
            &$crate::RowwiseOptions::new().with_data_column(stringify!($data)),
        )
    };
    ($table:expr, $object:ident, data = $data:ident, $options:expr) => {
        $crate::rowwise::augment(
            &$table,
            stringify!($object),
            &$options.clone().with_data_column(stringify!($data)),
        )
    };
    ($table:expr, $object:ident, $options:expr) => {
        $crate::rowwise::augment(&$table, stringify!($object), &$options)
    };
}

/// Glance at the models in a nested column named by a bare identifier.
///
/// Same calling forms as [`tidy!`].
#[macro_export]
macro_rules! glance {
    ($table:expr, $object:ident) => {
        $crate::rowwise::glance(
            &$table,
            stringify!($object),
            &$crate::RowwiseOptions::default(),
        )
    };
    ($table:expr, $object:ident, data = $data:ident) => {
        $crate::rowwise::glance(
            &$table,
            stringify!($object),
            &$crate::RowwiseOptions::new().with_data_column(stringify!($data)),
        )
    };
    ($table:expr, $object:ident, data = $data:ident, $options:expr) => {
        $crate::rowwise::glance(
            &$table,
            stringify!($object),
            &$options.clone().with_data_column(stringify!($data)),
        )
    };
    ($table:expr, $object:ident, $options:expr) => {
        $crate::rowwise::glance(&$table, stringify!($object), &$options)
    };
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::model::{Nested, Table, Value};
    use crate::rowwise;
    use crate::tidier::{DataRef, Tidier, TidierArgs};
    use crate::RowwiseOptions;

    /// Fixture reporting which kind of data reference each call received
    #[derive(Debug)]
    struct Constant(i64);

    impl Constant {
        fn describe(&self, data: Option<DataRef<'_>>) -> Table {
            let kind = match data {
                None => "none",
                Some(DataRef::Cell(_)) => "cell",
                Some(DataRef::Table(_)) => "table",
                Some(DataRef::Name(_)) => "name",
            };
            let mut result = Table::from_column_names(["value", "data_kind"]);
            result.add_row(vec![Value::from(self.0), Value::from(kind)]);
            result
        }
    }

    impl Tidier for Constant {
        fn tidy(&self, data: Option<DataRef<'_>>, _args: &TidierArgs) -> Result<Table> {
            Ok(self.describe(data))
        }

        fn augment(&self, data: Option<DataRef<'_>>, _args: &TidierArgs) -> Result<Table> {
            Ok(self.describe(data))
        }

        fn glance(&self, data: Option<DataRef<'_>>, _args: &TidierArgs) -> Result<Table> {
            Ok(self.describe(data))
        }
    }

    /// Columns `cyl`, `fit`, `dat`: one Constant model and one nested data
    /// table per row
    fn model_table() -> Table {
        let mut table = Table::from_column_names(["cyl", "fit", "dat"]);
        for cyl in [4_i64, 6] {
            let mut data = Table::from_column_names(["x"]);
            data.add_row(vec![Value::from(cyl * 2)]);
            table.add_row(vec![
                Value::from(cyl),
                Value::from(Nested::model(Constant(cyl))),
                Value::from(Nested::table(data)),
            ]);
        }
        table
    }

    #[test]
    fn test_bare_identifier_matches_string_call() {
        let table = model_table();
        let by_macro = crate::tidy!(table, fit).unwrap();
        let by_name = rowwise::tidy(&table, "fit", &RowwiseOptions::default()).unwrap();
        assert_eq!(by_macro, by_name);
    }

    #[test]
    fn test_data_identifier_binds_nested_column() {
        let table = model_table();
        let output = crate::tidy!(table, fit, data = dat).unwrap();
        let kind = output.column_index("data_kind").unwrap();
        assert_eq!(output.value(0, kind), Some(&Value::from("cell")));
    }

    #[test]
    fn test_data_identifier_without_match_passes_name() {
        let table = model_table();
        let output = crate::tidy!(table, fit, data = weights).unwrap();
        let kind = output.column_index("data_kind").unwrap();
        assert_eq!(output.value(0, kind), Some(&Value::from("name")));
    }

    #[test]
    fn test_options_expression_form() {
        let table = model_table();
        let options = RowwiseOptions::new().with_data_column("dat");
        let by_macro = crate::glance!(table, fit, options).unwrap();
        let by_name = rowwise::glance(
            &table,
            "fit",
            &RowwiseOptions::new().with_data_column("dat"),
        )
        .unwrap();
        assert_eq!(by_macro, by_name);
    }

    #[test]
    fn test_data_with_options_form() {
        let table = model_table();
        let options = RowwiseOptions::new();
        let output = crate::augment!(table, fit, data = dat, options).unwrap();
        let kind = output.column_index("data_kind").unwrap();
        assert_eq!(output.value(0, kind), Some(&Value::from("cell")));
        // the options expression is cloned, not consumed
        assert!(options.data.is_none());
    }

    #[test]
    fn test_string_form_reaches_names_macros_cannot() {
        let mut table = Table::from_column_names(["cyl", "model 1"]);
        table.add_row(vec![Value::from(4), Value::from(Nested::model(Constant(4)))]);
        let output = rowwise::tidy(&table, "model 1", &RowwiseOptions::default()).unwrap();
        assert_eq!(output.row_count(), 1);
        assert_eq!(output.value(0, 0), Some(&Value::from(4)));
    }
}
