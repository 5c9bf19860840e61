//! # Lifeguard Dataset
//!
//! Tabular dataset model for Lifeguard database tests: table schemas read
//! lazily from the catalog, column reconciliation and diffing, composite and
//! replacement row sources, and type-aware table assertions.
//!
//! ```no_run
//! use lifeguard_dataset::{assert_equals, ReplacementTable, Table};
//! # use lifeguard_dataset::DataSetError;
//! # fn check(expected: &dyn Table, actual: impl Table) -> Result<(), DataSetError> {
//! let mut actual = ReplacementTable::new(actual);
//! actual.add_replacement_object("[null]", lifeguard_dataset::Value::Null);
//! assert_equals(expected, &actual)?;
//! # Ok(())
//! # }
//! ```
//!
//! See [README on GitHub](https://github.com/microscaler/lifeguard) for the
//! rest of the Lifeguard stack.

pub mod assertion;
pub mod catalog;
pub mod column;
pub mod columns;
pub mod config;
pub mod datatype;
pub mod error;
pub mod executor;
pub mod metadata;
pub mod table;
pub mod value;

pub use assertion::{assert_equals, assert_equals_by_columns, table_differences, Difference};
pub use catalog::{
    CatalogProvider, ColumnDescriptor, InMemoryCatalog, PostgresCatalog, PrimaryKeyDescriptor,
};
pub use column::{Column, Nullable};
pub use columns::{ColumnDiff, NameMatch};
pub use config::DataSetConfig;
pub use datatype::{DataType, DataTypeFactory, Dialect};
pub use error::DataSetError;
pub use executor::{CatalogExecutor, CatalogRow, ExecutorError, MayPostgresExecutor};
pub use metadata::{
    DatabaseTableMetaData, DefaultTableMetaData, KeyOrder, MetaDataRef, TableMetaData,
};
pub use table::{CompositeTable, DefaultTable, ReplacementTable, Replacements, Table};
pub use value::Value;
