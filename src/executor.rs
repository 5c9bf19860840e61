//! Catalog query execution over `may_postgres`.
//!
//! Metadata extraction only ever reads, so the executor surface is a single
//! `query_all`. Connection setup and pooling stay with the caller.

use may_postgres::{Client, Error as PostgresError, Row};
use std::fmt;

/// Executor error type
#[derive(Debug)]
pub enum ExecutorError {
    /// `PostgreSQL` error from `may_postgres`
    Postgres(PostgresError),
    /// Query execution error
    Query(String),
    /// Row parsing/conversion error
    Parse(String),
    /// Other execution errors
    Other(String),
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutorError::Postgres(e) => write!(f, "PostgreSQL error: {e}"),
            ExecutorError::Query(s) => write!(f, "Query error: {s}"),
            ExecutorError::Parse(s) => write!(f, "Parse error: {s}"),
            ExecutorError::Other(s) => write!(f, "Execution error: {s}"),
        }
    }
}

impl std::error::Error for ExecutorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecutorError::Postgres(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PostgresError> for ExecutorError {
    fn from(err: PostgresError) -> Self {
        ExecutorError::Postgres(err)
    }
}

/// Typed access to the columns of one result row.
///
/// Catalog queries cast every column to `text` or `int4`, so these two
/// accessors are all a provider needs.
pub trait CatalogRow {
    /// # Errors
    ///
    /// Returns `ExecutorError::Parse` if column `idx` is missing, null or
    /// not text.
    fn text(&self, idx: usize) -> Result<String, ExecutorError>;

    /// # Errors
    ///
    /// Returns `ExecutorError::Parse` if column `idx` is missing, null or
    /// not an `int4`.
    fn int4(&self, idx: usize) -> Result<i32, ExecutorError>;
}

impl CatalogRow for Row {
    fn text(&self, idx: usize) -> Result<String, ExecutorError> {
        self.try_get::<usize, String>(idx)
            .map_err(|e| ExecutorError::Parse(format!("catalog column {idx}: {e}")))
    }

    fn int4(&self, idx: usize) -> Result<i32, ExecutorError> {
        self.try_get::<usize, i32>(idx)
            .map_err(|e| ExecutorError::Parse(format!("catalog column {idx}: {e}")))
    }
}

/// Read-only query execution used by catalog providers.
///
/// # Examples
///
/// ```no_run
/// use lifeguard_dataset::executor::{CatalogExecutor, CatalogRow, ExecutorError};
///
/// # fn example<E: CatalogExecutor>(executor: &E) -> Result<(), ExecutorError> {
/// let rows = executor.query_all("SELECT column_name::text FROM information_schema.columns")?;
/// let names = rows.iter().map(|r| r.text(0)).collect::<Result<Vec<_>, _>>()?;
/// # Ok(())
/// # }
/// ```
pub trait CatalogExecutor {
    type Row: CatalogRow;

    /// Execute a parameterless query and return all rows.
    ///
    /// # Errors
    ///
    /// Returns `ExecutorError` if the query execution fails.
    fn query_all(&self, query: &str) -> Result<Vec<Self::Row>, ExecutorError>;
}

/// `CatalogExecutor` backed directly by a `may_postgres::Client`.
pub struct MayPostgresExecutor {
    client: Client,
}

impl MayPostgresExecutor {
    /// Create a new executor from a `may_postgres::Client`
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Consume the executor and return the underlying client
    pub fn into_client(self) -> Client {
        self.client
    }
}

impl CatalogExecutor for MayPostgresExecutor {
    type Row = Row;

    fn query_all(&self, query: &str) -> Result<Vec<Row>, ExecutorError> {
        log::debug!("catalog query: {query}");
        self.client.query(query, &[]).map_err(ExecutorError::Postgres)
    }
}
