//! Error type shared by every dataset operation.

use crate::datatype::DataType;
use crate::executor::ExecutorError;
use crate::value::Value;
use std::fmt;

/// Dataset error
///
/// One tagged error for the whole crate. Database failures keep their cause
/// reachable through [`std::error::Error::source`].
#[derive(Debug)]
pub enum DataSetError {
    /// Requested column is absent from a schema
    NoSuchColumn { table: String, column: String },
    /// Row index outside `[0, row_count)`
    RowOutOfBounds { row: isize, row_count: usize },
    /// A catalog-reported native type the resolver cannot map
    UnsupportedDataType { sql_type: i32, sql_type_name: String },
    /// Catalog or query-layer failure
    DatabaseAccess(ExecutorError),
    /// Illegal replacement rule supplied at registration time
    ReplacementConfiguration(String),
    /// Expected and actual schemas have different columns
    SchemaMismatch {
        table: String,
        message: String,
        expected_only: String,
        actual_only: String,
    },
    /// Expected and actual tables have different row counts
    RowCountMismatch {
        table: String,
        expected: usize,
        actual: usize,
    },
    /// A cell differs between expected and actual
    ValueMismatch {
        table: String,
        row: usize,
        column: String,
        expected: Value,
        actual: Value,
    },
    /// A value cannot be interpreted as the column's data type
    TypeCast {
        value: String,
        data_type: DataType,
        reason: String,
    },
    /// Schema violates its own invariants
    InvalidMetaData(String),
    /// Row width does not match the schema
    InvalidRow {
        table: String,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for DataSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSetError::NoSuchColumn { table, column } => {
                write!(f, "No such column: {table}.{column}")
            }
            DataSetError::RowOutOfBounds { row, row_count } => {
                if *row < 0 {
                    write!(f, "Row out of bounds: {row} < 0")
                } else {
                    write!(f, "Row out of bounds: {row} >= {row_count}")
                }
            }
            DataSetError::UnsupportedDataType {
                sql_type,
                sql_type_name,
            } => write!(
                f,
                "Unsupported data type: sql_type={sql_type}, sql_type_name={sql_type_name}"
            ),
            DataSetError::DatabaseAccess(e) => write!(f, "Database access failure: {e}"),
            DataSetError::ReplacementConfiguration(msg) => {
                write!(f, "Invalid replacement: {msg}")
            }
            DataSetError::SchemaMismatch {
                message,
                expected_only,
                actual_only,
                ..
            } => write!(
                f,
                "Schema mismatch: {message}; expected but missing: {expected_only}, \
                 actual but not expected: {actual_only}"
            ),
            DataSetError::RowCountMismatch {
                table,
                expected,
                actual,
            } => write!(
                f,
                "Row count mismatch (table={table}): expected {expected}, got {actual}"
            ),
            DataSetError::ValueMismatch {
                table,
                row,
                column,
                expected,
                actual,
            } => write!(
                f,
                "Value mismatch (table={table}, row={row}, column={column}): \
                 expected <{expected}> but was <{actual}>"
            ),
            DataSetError::TypeCast {
                value,
                data_type,
                reason,
            } => write!(f, "Cannot cast <{value}> to {data_type}: {reason}"),
            DataSetError::InvalidMetaData(msg) => write!(f, "Invalid table metadata: {msg}"),
            DataSetError::InvalidRow {
                table,
                expected,
                actual,
            } => write!(
                f,
                "Invalid row for table {table}: expected {expected} values, got {actual}"
            ),
        }
    }
}

impl std::error::Error for DataSetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataSetError::DatabaseAccess(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ExecutorError> for DataSetError {
    fn from(error: ExecutorError) -> Self {
        DataSetError::DatabaseAccess(error)
    }
}

impl DataSetError {
    pub(crate) fn type_cast(value: &Value, data_type: DataType, reason: impl Into<String>) -> Self {
        DataSetError::TypeCast {
            value: value.to_string(),
            data_type,
            reason: reason.into(),
        }
    }
}
