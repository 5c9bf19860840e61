//! Column reconciliation helpers.
//!
//! Pure functions over column slices: lookup, sorting, pretty printing and
//! merging. Schemas are never touched; every function that reorders or
//! combines returns a new `Vec`.

mod diff;

pub use diff::ColumnDiff;

use crate::column::Column;
use crate::error::DataSetError;
use crate::metadata::TableMetaData;

/// How two column names are matched when merging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameMatch {
    /// Same identity rule as every lookup
    #[default]
    IgnoreCase,
    /// Byte-for-byte equal names only
    Exact,
}

impl NameMatch {
    fn matches(self, left: &Column, right: &Column) -> bool {
        match self {
            NameMatch::IgnoreCase => left.has_name(right.name()),
            NameMatch::Exact => left.name() == right.name(),
        }
    }
}

/// Find a column by name, ignoring case.
pub fn find_column<'a>(column_name: &str, columns: &'a [Column]) -> Option<&'a Column> {
    columns.iter().find(|c| c.has_name(column_name))
}

/// Find a column by name, ignoring case.
///
/// # Errors
///
/// Returns `NoSuchColumn` naming `table_name` when nothing matches.
pub fn find_column_validated<'a>(
    column_name: &str,
    columns: &'a [Column],
    table_name: &str,
) -> Result<&'a Column, DataSetError> {
    find_column(column_name, columns).ok_or_else(|| DataSetError::NoSuchColumn {
        table: table_name.to_string(),
        column: column_name.to_string(),
    })
}

/// The schema's columns ordered by name, ignoring case.
///
/// The sort is stable: columns whose names differ only in case keep their
/// schema order.
///
/// # Errors
///
/// Propagates a failure to read the schema's columns.
pub fn sorted_columns(meta_data: &dyn TableMetaData) -> Result<Vec<Column>, DataSetError> {
    Ok(sort_columns(meta_data.columns()?))
}

/// Copy of `columns` ordered by name, ignoring case (stable).
pub fn sort_columns(columns: &[Column]) -> Vec<Column> {
    let mut sorted = columns.to_vec();
    sorted.sort_by_cached_key(|c| c.name().to_lowercase());
    sorted
}

/// Render column names as `[A, B, C]`.
pub fn column_names_as_string(columns: &[Column]) -> String {
    let names: Vec<&str> = columns.iter().map(Column::name).collect();
    format!("[{}]", names.join(", "))
}

/// `reference` followed by every candidate whose name is not in `reference`.
///
/// Names are matched ignoring case, consistent with column identity
/// everywhere else; see [`merge_columns_by_name_with`] for exact matching.
pub fn merge_columns_by_name(reference: &[Column], candidates: &[Column]) -> Vec<Column> {
    merge_columns_by_name_with(reference, candidates, NameMatch::IgnoreCase)
}

/// `reference` followed by every candidate whose name has no match in
/// `reference` under `name_match`, in candidate order.
pub fn merge_columns_by_name_with(
    reference: &[Column],
    candidates: &[Column],
    name_match: NameMatch,
) -> Vec<Column> {
    let mut merged = reference.to_vec();
    merged.extend(
        candidates
            .iter()
            .filter(|candidate| !reference.iter().any(|r| name_match.matches(r, candidate)))
            .cloned(),
    );
    merged
}
