//! Catalog providers: where live schemas come from.
//!
//! A provider reports raw column and primary-key descriptors; turning them
//! into a schema is the job of
//! [`DatabaseTableMetaData`](crate::metadata::DatabaseTableMetaData).
//!
//! # Structure
//!
//! - `memory`: scripted provider for tests and offline schemas
//! - `postgres`: `information_schema` queries over a `may_postgres` executor

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCatalog;
pub use postgres::PostgresCatalog;

use crate::executor::ExecutorError;

/// One column as reported by the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Native type code, see [`sql_types`](crate::datatype::sql_types)
    pub sql_type: i32,
    /// Vendor type name, e.g. `longtext`
    pub sql_type_name: String,
    /// Nullability code: `0` no nulls, `1` nullable, anything else unknown
    pub nullable: i32,
}

impl ColumnDescriptor {
    pub fn new(
        name: impl Into<String>,
        sql_type: i32,
        sql_type_name: impl Into<String>,
        nullable: i32,
    ) -> Self {
        Self {
            name: name.into(),
            sql_type,
            sql_type_name: sql_type_name.into(),
            nullable,
        }
    }
}

/// One primary-key column with its position in the key (1-based)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKeyDescriptor {
    pub name: String,
    pub key_seq: i32,
}

impl PrimaryKeyDescriptor {
    pub fn new(name: impl Into<String>, key_seq: i32) -> Self {
        Self {
            name: name.into(),
            key_seq,
        }
    }
}

/// Live metadata facility of a database
pub trait CatalogProvider: Send + Sync {
    /// Columns of `table` in provider order.
    ///
    /// # Errors
    ///
    /// Returns `ExecutorError` if the catalog cannot be queried.
    fn columns(
        &self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<ColumnDescriptor>, ExecutorError>;

    /// Primary-key columns of `table`, in any order.
    ///
    /// # Errors
    ///
    /// Returns `ExecutorError` if the catalog cannot be queried.
    fn primary_keys(
        &self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<PrimaryKeyDescriptor>, ExecutorError>;
}
