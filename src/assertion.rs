//! Table comparison.
//!
//! Tables are compared schema first, then cell by cell in row order, with
//! columns visited in sorted-name order. Cells are matched under the
//! expected column's data type, so `1` and `1.00` are equal in a numeric
//! column and `"2024-03-01"` equals a date value in a date column.

use crate::column::Column;
use crate::columns::{self, ColumnDiff};
use crate::datatype::DataType;
use crate::error::DataSetError;
use crate::table::Table;
use crate::value::Value;
use std::ops::ControlFlow;

/// One cell that differs between expected and actual
#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    pub row: usize,
    pub column: String,
    pub expected: Value,
    pub actual: Value,
}

/// Assert that `actual` holds the same rows and columns as `expected`.
///
/// # Errors
///
/// - `SchemaMismatch` when the column sets differ (names ignoring case)
/// - `RowCountMismatch` when the row counts differ
/// - `ValueMismatch` for the first differing cell
/// - `TypeCast` when a cell cannot be read as its column's type
pub fn assert_equals(expected: &dyn Table, actual: &dyn Table) -> Result<(), DataSetError> {
    let comparison = Comparison::full(expected, actual)?;
    comparison.first_mismatch(expected, actual)
}

/// Assert equality restricted to `column_names`, ignoring every other column.
///
/// # Errors
///
/// `NoSuchColumn` if either table lacks one of the columns, otherwise as
/// [`assert_equals`] minus the schema check.
pub fn assert_equals_by_columns(
    expected: &dyn Table,
    actual: &dyn Table,
    column_names: &[&str],
) -> Result<(), DataSetError> {
    let comparison = Comparison::restricted(expected, actual, column_names)?;
    comparison.first_mismatch(expected, actual)
}

/// Every differing cell, in row then sorted-column order.
///
/// # Errors
///
/// Schema and row count problems fail as in [`assert_equals`]; cell
/// differences are returned instead.
pub fn table_differences(
    expected: &dyn Table,
    actual: &dyn Table,
) -> Result<Vec<Difference>, DataSetError> {
    let comparison = Comparison::full(expected, actual)?;
    let mut differences = Vec::new();
    comparison.walk(expected, actual, |difference| {
        differences.push(difference);
        ControlFlow::Continue(())
    })?;
    Ok(differences)
}

struct Comparison {
    table_name: String,
    row_count: usize,
    columns: Vec<(String, DataType)>,
}

impl Comparison {
    fn full(expected: &dyn Table, actual: &dyn Table) -> Result<Self, DataSetError> {
        let expected_meta = expected.table_meta_data();
        let actual_meta = actual.table_meta_data();

        let diff = ColumnDiff::new(expected_meta.as_ref(), actual_meta.as_ref())?;
        if diff.has_difference() {
            log::debug!("{}: {}", expected_meta.table_name(), diff);
            return Err(diff.to_error());
        }

        let actual_columns = actual_meta.columns()?;
        let columns = columns::sorted_columns(expected_meta.as_ref())?
            .into_iter()
            .map(|column| {
                // The diff is empty, so the lookup cannot miss
                let fallback =
                    columns::find_column(column.name(), actual_columns).map(Column::data_type);
                resolve(column, fallback)
            })
            .collect();
        Self::new(expected, actual, columns)
    }

    fn restricted(
        expected: &dyn Table,
        actual: &dyn Table,
        column_names: &[&str],
    ) -> Result<Self, DataSetError> {
        let expected_meta = expected.table_meta_data();
        let actual_meta = actual.table_meta_data();
        let expected_columns = expected_meta.columns()?;
        let actual_columns = actual_meta.columns()?;

        let mut selected = Vec::with_capacity(column_names.len());
        for name in column_names {
            let column =
                columns::find_column_validated(name, expected_columns, expected_meta.table_name())?;
            let other =
                columns::find_column_validated(name, actual_columns, actual_meta.table_name())?;
            selected.push(resolve(column.clone(), Some(other.data_type())));
        }
        selected.sort_by_cached_key(|(name, _)| name.to_lowercase());
        Self::new(expected, actual, selected)
    }

    fn new(
        expected: &dyn Table,
        actual: &dyn Table,
        columns: Vec<(String, DataType)>,
    ) -> Result<Self, DataSetError> {
        let table_name = expected.table_meta_data().table_name().to_string();
        let row_count = expected.row_count();
        let actual_rows = actual.row_count();
        if row_count != actual_rows {
            return Err(DataSetError::RowCountMismatch {
                table: table_name,
                expected: row_count,
                actual: actual_rows,
            });
        }
        log::debug!(
            "comparing {} ({} rows, {} columns)",
            table_name,
            row_count,
            columns.len()
        );
        Ok(Self {
            table_name,
            row_count,
            columns,
        })
    }

    fn first_mismatch(&self, expected: &dyn Table, actual: &dyn Table) -> Result<(), DataSetError> {
        let mut mismatch = None;
        self.walk(expected, actual, |difference| {
            mismatch = Some(difference);
            ControlFlow::Break(())
        })?;
        match mismatch {
            None => Ok(()),
            Some(d) => Err(DataSetError::ValueMismatch {
                table: self.table_name.clone(),
                row: d.row,
                column: d.column,
                expected: d.expected,
                actual: d.actual,
            }),
        }
    }

    fn walk(
        &self,
        expected: &dyn Table,
        actual: &dyn Table,
        mut on_difference: impl FnMut(Difference) -> ControlFlow<()>,
    ) -> Result<(), DataSetError> {
        for row in 0..self.row_count {
            let index = row as isize;
            for (name, data_type) in &self.columns {
                let expected_value = expected.value(index, name)?;
                let actual_value = actual.value(index, name)?;
                if data_type.matches(&expected_value, &actual_value)? {
                    continue;
                }
                log::trace!(
                    "{} row {} column {}: {} != {}",
                    self.table_name,
                    row,
                    name,
                    expected_value,
                    actual_value
                );
                let difference = Difference {
                    row,
                    column: name.clone(),
                    expected: expected_value,
                    actual: actual_value,
                };
                if on_difference(difference).is_break() {
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}

/// Comparison type: the expected column's, unless it is unknown
fn resolve(column: Column, fallback: Option<DataType>) -> (String, DataType) {
    let data_type = match (column.data_type(), fallback) {
        (DataType::Unknown, Some(other)) => other,
        (own, _) => own,
    };
    (column.name().to_string(), data_type)
}
