//! Schema extracted from a live catalog.

use super::{primary_keys_by_name, TableMetaData};
use crate::catalog::{CatalogProvider, PrimaryKeyDescriptor};
use crate::column::{Column, Nullable};
use crate::datatype::DataTypeFactory;
use crate::error::DataSetError;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Order in which composite primary-key columns are arranged, by key sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyOrder {
    /// First key column first
    #[default]
    Ascending,
    /// Reversed key sequence, as older fixture tooling produced it
    Descending,
}

impl KeyOrder {
    fn sort(self, keys: &mut [PrimaryKeyDescriptor]) {
        match self {
            KeyOrder::Ascending => keys.sort_by_key(|k| k.key_seq),
            KeyOrder::Descending => keys.sort_by(|a, b| b.key_seq.cmp(&a.key_seq)),
        }
    }
}

/// Schema read from the database catalog on first access.
///
/// Columns and primary keys are each fetched once and cached for the
/// lifetime of the value; there is no invalidation. A failed fetch caches
/// nothing, so the next access queries the catalog again.
pub struct DatabaseTableMetaData {
    table_name: String,
    schema: Option<String>,
    catalog: Arc<dyn CatalogProvider>,
    factory: Arc<dyn DataTypeFactory>,
    key_order: KeyOrder,
    columns: OnceCell<Vec<Column>>,
    primary_keys: OnceCell<Vec<Column>>,
}

impl DatabaseTableMetaData {
    pub fn new(
        table_name: impl Into<String>,
        catalog: Arc<dyn CatalogProvider>,
        factory: Arc<dyn DataTypeFactory>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            schema: None,
            catalog,
            factory,
            key_order: KeyOrder::default(),
            columns: OnceCell::new(),
            primary_keys: OnceCell::new(),
        }
    }

    pub fn with_schema(mut self, schema: Option<String>) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_key_order(mut self, key_order: KeyOrder) -> Self {
        self.key_order = key_order;
        self
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    fn load_columns(&self) -> Result<Vec<Column>, DataSetError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("load_columns", table = %self.table_name).entered();

        let descriptors = self.catalog.columns(&self.table_name, self.schema())?;
        let mut columns = Vec::with_capacity(descriptors.len());
        let mut seen = HashSet::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let data_type = match self
                .factory
                .create_data_type(descriptor.sql_type, &descriptor.sql_type_name)
            {
                Ok(data_type) => data_type,
                Err(e @ DataSetError::UnsupportedDataType { .. }) => {
                    log::warn!(
                        "Skipping column {}.{}: {}",
                        self.table_name,
                        descriptor.name,
                        e
                    );
                    continue;
                }
                Err(e) => return Err(e),
            };
            // Names are unique ignoring case; the first kept column wins
            if !seen.insert(descriptor.name.to_lowercase()) {
                log::warn!(
                    "Skipping column {}.{}: name already taken",
                    self.table_name,
                    descriptor.name
                );
                continue;
            }
            columns.push(Column::with_nullable(
                descriptor.name,
                data_type,
                Nullable::from_catalog_code(descriptor.nullable),
            ));
        }
        log::debug!(
            "Loaded {} column(s) for table {}",
            columns.len(),
            self.table_name
        );
        Ok(columns)
    }

    fn load_primary_key_names(&self) -> Result<Vec<String>, DataSetError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("load_primary_keys", table = %self.table_name).entered();

        let mut keys = self.catalog.primary_keys(&self.table_name, self.schema())?;
        self.key_order.sort(&mut keys);
        Ok(keys.into_iter().map(|k| k.name).collect())
    }
}

impl TableMetaData for DatabaseTableMetaData {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn columns(&self) -> Result<&[Column], DataSetError> {
        self.columns
            .get_or_try_init(|| self.load_columns())
            .map(Vec::as_slice)
    }

    fn primary_keys(&self) -> Result<&[Column], DataSetError> {
        self.primary_keys
            .get_or_try_init(|| {
                let columns = self.columns()?;
                let names = self.load_primary_key_names()?;
                Ok(primary_keys_by_name(columns, &names))
            })
            .map(Vec::as_slice)
    }
}

impl fmt::Debug for DatabaseTableMetaData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseTableMetaData")
            .field("table_name", &self.table_name)
            .field("schema", &self.schema)
            .field("key_order", &self.key_order)
            .field("columns", &self.columns.get())
            .field("primary_keys", &self.primary_keys.get())
            .finish()
    }
}
