//! Row sources.
//!
//! A [`Table`] exposes a shared schema, a row count, and cell values
//! addressed by `(row, column name)`. Variants wrap one another instead of
//! inheriting: [`CompositeTable`] stitches several sources together and
//! [`ReplacementTable`] rewrites values on the way out.
//!
//! # Structure
//!
//! - `default`: rows held in memory
//! - `composite`: several sources presented as one
//! - `replacement`: rule-driven value substitution

pub mod composite;
pub mod default;
pub mod replacement;

pub use composite::CompositeTable;
pub use default::DefaultTable;
pub use replacement::{ReplacementTable, Replacements};

use crate::error::DataSetError;
use crate::metadata::MetaDataRef;
use crate::value::Value;
use std::sync::Arc;

/// A source of rows under one schema
pub trait Table {
    /// The schema, shared rather than copied
    fn table_meta_data(&self) -> MetaDataRef;

    fn row_count(&self) -> usize;

    /// Value of `column` (case-insensitive) in `row`.
    ///
    /// # Errors
    ///
    /// Returns `RowOutOfBounds` unless `0 <= row < row_count()`, and
    /// `NoSuchColumn` for an unknown column.
    fn value(&self, row: isize, column: &str) -> Result<Value, DataSetError>;
}

impl<T: Table + ?Sized> Table for &T {
    fn table_meta_data(&self) -> MetaDataRef {
        (**self).table_meta_data()
    }

    fn row_count(&self) -> usize {
        (**self).row_count()
    }

    fn value(&self, row: isize, column: &str) -> Result<Value, DataSetError> {
        (**self).value(row, column)
    }
}

impl<T: Table + ?Sized> Table for Box<T> {
    fn table_meta_data(&self) -> MetaDataRef {
        (**self).table_meta_data()
    }

    fn row_count(&self) -> usize {
        (**self).row_count()
    }

    fn value(&self, row: isize, column: &str) -> Result<Value, DataSetError> {
        (**self).value(row, column)
    }
}

impl<T: Table + ?Sized> Table for Arc<T> {
    fn table_meta_data(&self) -> MetaDataRef {
        (**self).table_meta_data()
    }

    fn row_count(&self) -> usize {
        (**self).row_count()
    }

    fn value(&self, row: isize, column: &str) -> Result<Value, DataSetError> {
        (**self).value(row, column)
    }
}

/// Validate `row` against `row_count` and return it as an index.
pub(crate) fn check_row(row: isize, row_count: usize) -> Result<usize, DataSetError> {
    match usize::try_from(row) {
        Ok(index) if index < row_count => Ok(index),
        _ => Err(DataSetError::RowOutOfBounds { row, row_count }),
    }
}
