//! Scripted catalog.
//!
//! Serves descriptors registered up front and counts every call, so tests
//! can check that a schema hits the catalog only once and that failures
//! propagate.

use super::{CatalogProvider, ColumnDescriptor, PrimaryKeyDescriptor};
use crate::executor::ExecutorError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct CatalogTable {
    columns: Vec<ColumnDescriptor>,
    primary_keys: Vec<PrimaryKeyDescriptor>,
}

#[derive(Default)]
pub struct InMemoryCatalog {
    tables: Mutex<HashMap<String, CatalogTable>>,
    failure: Mutex<Option<String>>,
    last_schema: Mutex<Option<String>>,
    column_calls: AtomicUsize,
    primary_key_calls: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a table. Lookups are case-insensitive.
    pub fn add_table(
        &self,
        table: &str,
        columns: Vec<ColumnDescriptor>,
        primary_keys: Vec<PrimaryKeyDescriptor>,
    ) {
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        tables.insert(
            table.to_lowercase(),
            CatalogTable {
                columns,
                primary_keys,
            },
        );
    }

    /// Make every following call fail with a query error
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(message.to_string());
    }

    pub fn column_calls(&self) -> usize {
        self.column_calls.load(Ordering::SeqCst)
    }

    pub fn primary_key_calls(&self) -> usize {
        self.primary_key_calls.load(Ordering::SeqCst)
    }

    /// Schema qualifier of the most recent call
    pub fn last_schema(&self) -> Option<String> {
        self.last_schema.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn read<T>(
        &self,
        schema: Option<&str>,
        table: &str,
        f: impl FnOnce(&CatalogTable) -> Vec<T>,
    ) -> Result<Vec<T>, ExecutorError> {
        *self.last_schema.lock().unwrap_or_else(|e| e.into_inner()) = schema.map(str::to_string);
        if let Some(message) = self.failure.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
            return Err(ExecutorError::Query(message.clone()));
        }
        let tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        // Unknown tables have no columns, like an empty catalog result set
        Ok(tables.get(&table.to_lowercase()).map(f).unwrap_or_default())
    }
}

impl CatalogProvider for InMemoryCatalog {
    fn columns(
        &self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<ColumnDescriptor>, ExecutorError> {
        self.column_calls.fetch_add(1, Ordering::SeqCst);
        self.read(schema, table, |t| t.columns.clone())
    }

    fn primary_keys(
        &self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<PrimaryKeyDescriptor>, ExecutorError> {
        self.primary_key_calls.fetch_add(1, Ordering::SeqCst);
        self.read(schema, table, |t| t.primary_keys.clone())
    }
}
