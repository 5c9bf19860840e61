use super::{column_names_as_string, find_column};
use crate::column::Column;
use crate::error::DataSetError;
use crate::metadata::TableMetaData;
use std::fmt;

const NO_DIFFERENCE: &str = "no difference found";

/// Columns present on only one side of an expected/actual schema pair.
///
/// Computed once at construction; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDiff {
    table_name: String,
    expected_count: usize,
    actual_count: usize,
    expected_only: Vec<Column>,
    actual_only: Vec<Column>,
}

impl ColumnDiff {
    /// Diff the full column lists of `expected` and `actual` (names compared
    /// ignoring case).
    ///
    /// # Errors
    ///
    /// Propagates a failure to read either schema's columns.
    pub fn new(
        expected: &dyn TableMetaData,
        actual: &dyn TableMetaData,
    ) -> Result<Self, DataSetError> {
        let expected_columns = expected.columns()?;
        let actual_columns = actual.columns()?;
        Ok(Self {
            table_name: expected.table_name().to_string(),
            expected_count: expected_columns.len(),
            actual_count: actual_columns.len(),
            expected_only: missing_from(actual_columns, expected_columns),
            actual_only: missing_from(expected_columns, actual_columns),
        })
    }

    pub fn has_difference(&self) -> bool {
        !self.expected_only.is_empty() || !self.actual_only.is_empty()
    }

    /// Columns of the expected schema missing from the actual one
    pub fn expected_only(&self) -> &[Column] {
        &self.expected_only
    }

    /// Columns of the actual schema missing from the expected one
    pub fn actual_only(&self) -> &[Column] {
        &self.actual_only
    }

    pub fn expected_only_as_string(&self) -> String {
        column_names_as_string(&self.expected_only)
    }

    pub fn actual_only_as_string(&self) -> String {
        column_names_as_string(&self.actual_only)
    }

    /// One-line summary for assertion failures
    pub fn message(&self) -> String {
        if !self.has_difference() {
            NO_DIFFERENCE.to_string()
        } else if self.expected_count != self.actual_count {
            format!(
                "column count (table={}, expectedColCount={}, actualColCount={})",
                self.table_name, self.expected_count, self.actual_count
            )
        } else {
            format!("column mismatch (table={})", self.table_name)
        }
    }

    /// Schema mismatch error carrying this diff
    pub fn to_error(&self) -> DataSetError {
        DataSetError::SchemaMismatch {
            table: self.table_name.clone(),
            message: self.message(),
            expected_only: self.expected_only_as_string(),
            actual_only: self.actual_only_as_string(),
        }
    }
}

impl fmt::Display for ColumnDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ColumnDiff[expected={}, actual={}]",
            self.expected_only_as_string(),
            self.actual_only_as_string()
        )
    }
}

fn missing_from(haystack: &[Column], needles: &[Column]) -> Vec<Column> {
    needles
        .iter()
        .filter(|c| find_column(c.name(), haystack).is_none())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::DataType;
    use crate::metadata::DefaultTableMetaData;

    fn meta(name: &str, columns: &[&str]) -> DefaultTableMetaData {
        let columns = columns.iter().map(|c| Column::new(*c, DataType::Char)).collect();
        DefaultTableMetaData::without_keys(name, columns).unwrap()
    }

    #[test]
    fn test_no_difference() {
        let diff = ColumnDiff::new(&meta("T", &["A", "B"]), &meta("T", &["b", "a"])).unwrap();
        assert!(!diff.has_difference());
        assert_eq!(diff.message(), "no difference found");
        assert_eq!(diff.expected_only_as_string(), "[]");
    }

    #[test]
    fn test_column_count_message() {
        let expected = meta("T", &["A", "B", "C", "D"]);
        let actual = meta("T", &["A", "B", "C"]);
        let diff = ColumnDiff::new(&expected, &actual).unwrap();
        assert!(diff.has_difference());
        assert_eq!(
            diff.message(),
            "column count (table=T, expectedColCount=4, actualColCount=3)"
        );
        assert_eq!(diff.expected_only_as_string(), "[D]");
        assert!(diff.actual_only().is_empty());
    }

    #[test]
    fn test_column_mismatch_message() {
        let diff = ColumnDiff::new(&meta("T", &["A", "B"]), &meta("T", &["A", "X"])).unwrap();
        assert_eq!(diff.message(), "column mismatch (table=T)");
        assert_eq!(diff.expected_only_as_string(), "[B]");
        assert_eq!(diff.actual_only_as_string(), "[X]");
        assert_eq!(diff.to_string(), "ColumnDiff[expected=[B], actual=[X]]");
    }

    #[test]
    fn test_diff_is_symmetric() {
        let a = meta("A", &["ID", "NAME", "EMAIL"]);
        let b = meta("B", &["id", "AGE"]);
        let ab = ColumnDiff::new(&a, &b).unwrap();
        let ba = ColumnDiff::new(&b, &a).unwrap();
        assert_eq!(ab.expected_only(), ba.actual_only());
        assert_eq!(ab.actual_only(), ba.expected_only());
    }

    #[test]
    fn test_to_error() {
        let diff = ColumnDiff::new(&meta("T", &["A"]), &meta("T", &["B"])).unwrap();
        match diff.to_error() {
            DataSetError::SchemaMismatch { table, expected_only, actual_only, .. } => {
                assert_eq!(table, "T");
                assert_eq!(expected_only, "[A]");
                assert_eq!(actual_only, "[B]");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
