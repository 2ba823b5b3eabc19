//! Rowwise dispatch of tidying operations over nested model columns

mod combine;

use anyhow::Result;
use rayon::prelude::*;

use crate::error::TidyError;
use crate::model::{infer_group_columns, partition_rows, Nested, Table, Value};
use crate::options::RowwiseOptions;
use crate::tidier::{DataArg, DataRef, Tidier, TidierArgs};

use combine::ResultBuilder;

/// The tidying operation to invoke on each model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TidyOp {
    Tidy,
    Augment,
    Glance,
}

impl TidyOp {
    /// Operation name as it appears at call sites
    pub fn name(&self) -> &'static str {
        match self {
            TidyOp::Tidy => "tidy",
            TidyOp::Augment => "augment",
            TidyOp::Glance => "glance",
        }
    }

    /// Invoke this operation on one model
    pub fn apply(
        &self,
        model: &dyn Tidier,
        data: Option<DataRef<'_>>,
        args: &TidierArgs,
    ) -> Result<Table> {
        match self {
            TidyOp::Tidy => model.tidy(data, args),
            TidyOp::Augment => model.augment(data, args),
            TidyOp::Glance => model.glance(data, args),
        }
    }
}

/// How the `data` option binds for one call, resolved once up front
enum DataBinding<'a> {
    /// No `data` supplied
    None,
    /// `data` named a nested column; each row contributes its own cell
    Column(usize),
    /// Literal passthrough: a caller table, or a name matching no nested column
    Literal(DataRef<'a>),
}

impl<'a> DataBinding<'a> {
    fn resolve(table: &Table, data: Option<&'a DataArg>) -> Self {
        match data {
            None => DataBinding::None,
            Some(DataArg::Column(name)) => match table.column_index(name) {
                Some(index) if table.is_nested_column(index) => DataBinding::Column(index),
                _ => DataBinding::Literal(DataRef::Name(name.as_str())),
            },
            Some(DataArg::Table(shared)) => DataBinding::Literal(DataRef::Table(shared.as_ref())),
        }
    }

    fn for_row(&self, table: &'a Table, row: usize) -> Result<Option<DataRef<'a>>, TidyError> {
        match self {
            DataBinding::None => Ok(None),
            DataBinding::Column(index) => match table.value(row, *index) {
                Some(Value::Nested(nested)) => Ok(Some(DataRef::Cell(nested))),
                _ => Err(TidyError::NotNested {
                    column: table.columns[*index].name.clone(),
                    row,
                }),
            },
            DataBinding::Literal(data) => Ok(Some(*data)),
        }
    }
}

/// Per-call dispatch state: the validated object column, the inferred
/// grouping columns, and the resolved data binding
struct DispatchPlan<'a> {
    table: &'a Table,
    object: usize,
    group_columns: Vec<usize>,
    data: DataBinding<'a>,
}

impl<'a> DispatchPlan<'a> {
    fn prepare(
        table: &'a Table,
        object: &str,
        options: &'a RowwiseOptions,
    ) -> Result<Self, TidyError> {
        let object_index = table
            .column_index(object)
            .ok_or_else(|| TidyError::UnknownColumn {
                name: object.to_string(),
            })?;
        let group_columns = infer_group_columns(table, object_index);
        let data = DataBinding::resolve(table, options.data.as_ref());
        Ok(Self {
            table,
            object: object_index,
            group_columns,
            data,
        })
    }

    /// Nested value of the object column in one row
    fn object_value(&self, row: usize) -> Result<&'a Nested, TidyError> {
        match self.table.value(row, self.object) {
            Some(Value::Nested(nested)) => Ok(nested),
            _ => Err(TidyError::NotNested {
                column: self.table.columns[self.object].name.clone(),
                row,
            }),
        }
    }

    /// Data reference for one row under the resolved binding
    fn data_for(&self, row: usize) -> Result<Option<DataRef<'a>>, TidyError> {
        self.data.for_row(self.table, row)
    }

    /// Stack one result per row into the grouped output.
    ///
    /// Partitions are visited in first-occurrence order and rows within a
    /// partition in source order, so output order matches input order
    /// whenever every row carries a distinct grouping tuple.
    fn recombine(&self, mut results: Vec<Option<Table>>) -> Result<Table, TidyError> {
        let partitions = partition_rows(self.table, &self.group_columns);
        let mut builder = ResultBuilder::new(self.table, &self.group_columns);
        for rows in partitions.values() {
            for &row in rows {
                if let Some(result) = results.get_mut(row).and_then(|slot| slot.take()) {
                    builder.append(row, result)?;
                }
            }
        }
        Ok(builder.finish())
    }
}

/// Dispatches one tidying operation across the rows of a nested table
pub struct RowwiseDispatcher {
    options: RowwiseOptions,
}

impl RowwiseDispatcher {
    /// Create a dispatcher with the given options
    pub fn new(options: RowwiseOptions) -> Self {
        Self { options }
    }

    /// Invoke `func` once per row of `object` and stack the results.
    ///
    /// Rows are visited in input order and the call fails on the first row
    /// whose invocation fails; later rows are not invoked. Results are
    /// stacked partition by partition with the grouping values attached, and
    /// the output is marked grouped by the grouping columns.
    pub fn apply<F>(&self, table: &Table, object: &str, mut func: F) -> Result<Table>
    where
        F: FnMut(&Nested, Option<DataRef<'_>>) -> Result<Table>,
    {
        let plan = DispatchPlan::prepare(table, object, &self.options)?;
        let mut results: Vec<Option<Table>> = Vec::with_capacity(table.row_count());
        for row in 0..table.row_count() {
            let nested = plan.object_value(row)?;
            let data = plan.data_for(row)?;
            results.push(Some(func(nested, data)?));
        }
        Ok(plan.recombine(results)?)
    }

    /// Parallel variant of `apply`.
    ///
    /// Invocations run across rows on the rayon pool; the output table and
    /// the error reported on failure are identical to the sequential form.
    pub fn apply_parallel<F>(&self, table: &Table, object: &str, func: F) -> Result<Table>
    where
        F: Fn(&Nested, Option<DataRef<'_>>) -> Result<Table> + Sync,
    {
        let plan = DispatchPlan::prepare(table, object, &self.options)?;
        let row_results: Vec<Result<Table>> = (0..table.row_count())
            .into_par_iter()
            .map(|row| {
                let nested = plan.object_value(row)?;
                let data = plan.data_for(row)?;
                func(nested, data)
            })
            .collect();

        // First failure in row order wins, matching the sequential form
        let mut results: Vec<Option<Table>> = Vec::with_capacity(row_results.len());
        for row_result in row_results {
            results.push(Some(row_result?));
        }
        Ok(plan.recombine(results)?)
    }

    /// Run one operation over the models stored in `object`
    pub fn dispatch(&self, table: &Table, object: &str, op: TidyOp) -> Result<Table> {
        let args = self.options.args.clone();
        let run = move |nested: &Nested, data: Option<DataRef<'_>>| -> Result<Table> {
            let model = nested.as_model().ok_or_else(|| TidyError::NotAModel {
                column: object.to_string(),
            })?;
            op.apply(model, data, &args)
        };
        if self.options.parallel {
            self.apply_parallel(table, object, run)
        } else {
            self.apply(table, object, run)
        }
    }
}

impl Default for RowwiseDispatcher {
    fn default() -> Self {
        Self::new(RowwiseOptions::default())
    }
}

/// Tidy every model in `object`: component-level summaries, stacked
pub fn tidy(table: &Table, object: &str, options: &RowwiseOptions) -> Result<Table> {
    let dispatcher = RowwiseDispatcher::new(options.clone());
    dispatcher.dispatch(table, object, TidyOp::Tidy)
}

/// Augment every model in `object`: observation-level summaries, stacked
pub fn augment(table: &Table, object: &str, options: &RowwiseOptions) -> Result<Table> {
    let dispatcher = RowwiseDispatcher::new(options.clone());
    dispatcher.dispatch(table, object, TidyOp::Augment)
}

/// Glance at every model in `object`: one model-level summary row each
pub fn glance(table: &Table, object: &str, options: &RowwiseOptions) -> Result<Table> {
    let dispatcher = RowwiseDispatcher::new(options.clone());
    dispatcher.dispatch(table, object, TidyOp::Glance)
}
