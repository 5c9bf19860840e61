//! Rows held in memory.

use super::{check_row, Table};
use crate::column::Column;
use crate::error::DataSetError;
use crate::metadata::{DefaultTableMetaData, MetaDataRef};
use crate::value::Value;

/// In-memory table; each row holds one value per schema column, in schema
/// order.
pub struct DefaultTable {
    meta_data: MetaDataRef,
    rows: Vec<Vec<Value>>,
}

impl DefaultTable {
    pub fn new(meta_data: MetaDataRef) -> Self {
        Self {
            meta_data,
            rows: Vec::new(),
        }
    }

    /// Empty table over a key-less schema.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMetaData` for duplicate column names.
    pub fn with_columns(table_name: &str, columns: Vec<Column>) -> Result<Self, DataSetError> {
        let meta_data = DefaultTableMetaData::without_keys(table_name, columns)?;
        Ok(Self::new(meta_data.into_ref()))
    }

    /// Table pre-filled with `rows`.
    ///
    /// # Errors
    ///
    /// Same as [`add_row`](Self::add_row).
    pub fn with_rows(meta_data: MetaDataRef, rows: Vec<Vec<Value>>) -> Result<Self, DataSetError> {
        let mut table = Self::new(meta_data);
        for row in rows {
            table.add_row(row)?;
        }
        Ok(table)
    }

    /// Append a row.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRow` if the row width differs from the column count.
    pub fn add_row(&mut self, row: Vec<Value>) -> Result<(), DataSetError> {
        let width = self.meta_data.columns()?.len();
        if row.len() != width {
            return Err(DataSetError::InvalidRow {
                table: self.meta_data.table_name().to_string(),
                expected: width,
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }
}

impl Table for DefaultTable {
    fn table_meta_data(&self) -> MetaDataRef {
        self.meta_data.clone()
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn value(&self, row: isize, column: &str) -> Result<Value, DataSetError> {
        let row = check_row(row, self.rows.len())?;
        let index = self.meta_data.column_index(column)?;
        Ok(self.rows[row][index].clone())
    }
}
