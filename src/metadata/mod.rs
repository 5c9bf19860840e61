//! Table schemas.
//!
//! A schema is the table name, its columns in declaration (or catalog)
//! order, and the ordered primary-key subset. Schemas are shared as
//! [`MetaDataRef`] and never mutated after construction.
//!
//! # Structure
//!
//! - `database`: schema extracted lazily from a live catalog

pub mod database;

pub use database::{DatabaseTableMetaData, KeyOrder};

use crate::column::Column;
use crate::columns;
use crate::error::DataSetError;
use std::collections::HashSet;
use std::sync::Arc;

/// Shared handle to a schema
pub type MetaDataRef = Arc<dyn TableMetaData>;

/// Schema of one table
pub trait TableMetaData: Send + Sync {
    fn table_name(&self) -> &str;

    /// Columns in declaration order.
    ///
    /// # Errors
    ///
    /// Schemas backed by a catalog fail with `DatabaseAccess` when the
    /// catalog cannot be read.
    fn columns(&self) -> Result<&[Column], DataSetError>;

    /// Primary-key columns in key order, a subset of [`columns`](Self::columns).
    ///
    /// # Errors
    ///
    /// Same as [`columns`](Self::columns).
    fn primary_keys(&self) -> Result<&[Column], DataSetError>;

    /// Position of the named column (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `NoSuchColumn` if the schema has no such column.
    fn column_index(&self, column_name: &str) -> Result<usize, DataSetError> {
        self.columns()?
            .iter()
            .position(|c| c.has_name(column_name))
            .ok_or_else(|| DataSetError::NoSuchColumn {
                table: self.table_name().to_string(),
                column: column_name.to_string(),
            })
    }

    /// The named column (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `NoSuchColumn` if the schema has no such column.
    fn column(&self, column_name: &str) -> Result<&Column, DataSetError> {
        columns::find_column_validated(column_name, self.columns()?, self.table_name())
    }
}

/// Resolve primary-key names against the full column list.
///
/// The result follows the order of `names`; names without a matching column
/// are left out.
pub fn primary_keys_by_name<S: AsRef<str>>(columns: &[Column], names: &[S]) -> Vec<Column> {
    names
        .iter()
        .filter_map(|name| columns::find_column(name.as_ref(), columns).cloned())
        .collect()
}

/// In-memory schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultTableMetaData {
    table_name: String,
    columns: Vec<Column>,
    primary_keys: Vec<Column>,
}

impl DefaultTableMetaData {
    /// Build a schema from explicit columns and primary-key columns.
    ///
    /// Primary keys are matched to `columns` by name (ignoring case) and the
    /// matching schema columns are stored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMetaData` if two columns share a name (ignoring case)
    /// or a primary-key column is not one of `columns`.
    pub fn new(
        table_name: impl Into<String>,
        columns: Vec<Column>,
        primary_keys: Vec<Column>,
    ) -> Result<Self, DataSetError> {
        let table_name = table_name.into();
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name().to_lowercase()) {
                return Err(DataSetError::InvalidMetaData(format!(
                    "duplicate column {} in table {}",
                    column.name(),
                    table_name
                )));
            }
        }
        for key in &primary_keys {
            if columns::find_column(key.name(), &columns).is_none() {
                return Err(DataSetError::InvalidMetaData(format!(
                    "primary key {} is not a column of table {}",
                    key.name(),
                    table_name
                )));
            }
        }
        // Keys are the schema's own columns, whatever case or type the caller used
        let key_names: Vec<&str> = primary_keys.iter().map(Column::name).collect();
        let primary_keys = primary_keys_by_name(&columns, &key_names);
        Ok(Self {
            table_name,
            columns,
            primary_keys,
        })
    }

    /// Schema without primary keys.
    ///
    /// # Errors
    ///
    /// See [`DefaultTableMetaData::new`].
    pub fn without_keys(
        table_name: impl Into<String>,
        columns: Vec<Column>,
    ) -> Result<Self, DataSetError> {
        Self::new(table_name, columns, Vec::new())
    }

    /// Schema whose primary keys are given by name. Unknown names are ignored.
    ///
    /// # Errors
    ///
    /// See [`DefaultTableMetaData::new`].
    pub fn with_primary_key_names<S: AsRef<str>>(
        table_name: impl Into<String>,
        columns: Vec<Column>,
        primary_key_names: &[S],
    ) -> Result<Self, DataSetError> {
        let primary_keys = primary_keys_by_name(&columns, primary_key_names);
        Self::new(table_name, columns, primary_keys)
    }

    pub fn into_ref(self) -> MetaDataRef {
        Arc::new(self)
    }
}

impl TableMetaData for DefaultTableMetaData {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn columns(&self) -> Result<&[Column], DataSetError> {
        Ok(&self.columns)
    }

    fn primary_keys(&self) -> Result<&[Column], DataSetError> {
        Ok(&self.primary_keys)
    }
}
