//! `PostgreSQL` catalog provider.
//!
//! Reads `information_schema` through any [`CatalogExecutor`]. Postgres
//! reports type names rather than codes, so `data_type` is mapped onto the
//! generic codes here and the `udt_name` is passed along as the vendor name
//! for [`PostgresDataTypeFactory`](crate::datatype::PostgresDataTypeFactory).

use super::{CatalogProvider, ColumnDescriptor, PrimaryKeyDescriptor};
use crate::datatype::sql_types;
use crate::executor::{CatalogExecutor, CatalogRow, ExecutorError};
use sea_query::{
    Condition, Expr, ExprTrait, JoinType, Order, PostgresQueryBuilder, Query, SelectStatement,
};

const DEFAULT_SCHEMA: &str = "public";

/// Catalog provider backed by `information_schema`
pub struct PostgresCatalog<E> {
    executor: E,
}

impl<E: CatalogExecutor> PostgresCatalog<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }
}

/// Column query for `schema.table`, in ordinal order
pub(crate) fn columns_query(table: &str, schema: &str) -> SelectStatement {
    Query::select()
        .expr(Expr::cust("column_name::text"))
        .expr(Expr::cust("data_type::text"))
        .expr(Expr::cust("udt_name::text"))
        .expr(Expr::cust("is_nullable::text"))
        .from(("information_schema", "columns"))
        .and_where(Expr::col("table_schema").eq(schema))
        .and_where(Expr::col("table_name").eq(table))
        .order_by("ordinal_position", Order::Asc)
        .to_owned()
}

/// Primary-key query for `schema.table`
pub(crate) fn primary_keys_query(table: &str, schema: &str) -> SelectStatement {
    Query::select()
        .expr(Expr::cust("kcu.column_name::text"))
        .expr(Expr::cust("kcu.ordinal_position::int4"))
        .from_as(("information_schema", "table_constraints"), "tc")
        .join_as(
            JoinType::InnerJoin,
            ("information_schema", "key_column_usage"),
            "kcu",
            Condition::all()
                .add(Expr::col(("tc", "constraint_name")).equals(("kcu", "constraint_name")))
                .add(Expr::col(("tc", "table_schema")).equals(("kcu", "table_schema"))),
        )
        .and_where(Expr::col(("tc", "constraint_type")).eq("PRIMARY KEY"))
        .and_where(Expr::col(("tc", "table_schema")).eq(schema))
        .and_where(Expr::col(("tc", "table_name")).eq(table))
        .to_owned()
}

/// Map an `information_schema.columns.data_type` to a generic type code
pub(crate) fn sql_type_for(data_type: &str) -> i32 {
    match data_type {
        "smallint" => sql_types::SMALLINT,
        "integer" => sql_types::INTEGER,
        "bigint" => sql_types::BIGINT,
        "numeric" => sql_types::NUMERIC,
        "real" => sql_types::REAL,
        "double precision" => sql_types::DOUBLE,
        "boolean" => sql_types::BOOLEAN,
        "character" => sql_types::CHAR,
        "character varying" | "text" => sql_types::VARCHAR,
        "date" => sql_types::DATE,
        "bytea" => sql_types::BINARY,
        t if t.starts_with("timestamp") => sql_types::TIMESTAMP,
        t if t.starts_with("time") => sql_types::TIME,
        _ => sql_types::OTHER,
    }
}

fn nullable_code(is_nullable: &str) -> i32 {
    match is_nullable {
        "NO" => 0,
        "YES" => 1,
        _ => 2,
    }
}

fn decode_column(row: &impl CatalogRow) -> Result<ColumnDescriptor, ExecutorError> {
    let data_type = row.text(1)?;
    let is_nullable = row.text(3)?;
    Ok(ColumnDescriptor::new(
        row.text(0)?,
        sql_type_for(&data_type),
        row.text(2)?,
        nullable_code(&is_nullable),
    ))
}

fn decode_primary_key(row: &impl CatalogRow) -> Result<PrimaryKeyDescriptor, ExecutorError> {
    Ok(PrimaryKeyDescriptor::new(row.text(0)?, row.int4(1)?))
}

impl<E: CatalogExecutor + Send + Sync> CatalogProvider for PostgresCatalog<E> {
    fn columns(
        &self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<ColumnDescriptor>, ExecutorError> {
        let sql = columns_query(table, schema.unwrap_or(DEFAULT_SCHEMA))
            .to_string(PostgresQueryBuilder);
        let rows = self.executor.query_all(&sql)?;
        rows.iter().map(decode_column).collect()
    }

    fn primary_keys(
        &self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<PrimaryKeyDescriptor>, ExecutorError> {
        let sql = primary_keys_query(table, schema.unwrap_or(DEFAULT_SCHEMA))
            .to_string(PostgresQueryBuilder);
        let rows = self.executor.query_all(&sql)?;
        rows.iter().map(decode_primary_key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{Column, Nullable};
    use crate::datatype::{DataType, PostgresDataTypeFactory};
    use crate::metadata::{DatabaseTableMetaData, TableMetaData};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    enum Cell {
        Text(&'static str),
        Int(i32),
        Null,
    }

    #[derive(Debug, Clone)]
    struct ScriptedRow(Vec<Cell>);

    impl CatalogRow for ScriptedRow {
        fn text(&self, idx: usize) -> Result<String, ExecutorError> {
            match self.0.get(idx) {
                Some(Cell::Text(s)) => Ok(s.to_string()),
                other => Err(ExecutorError::Parse(format!("catalog column {idx}: {other:?}"))),
            }
        }

        fn int4(&self, idx: usize) -> Result<i32, ExecutorError> {
            match self.0.get(idx) {
                Some(Cell::Int(i)) => Ok(*i),
                other => Err(ExecutorError::Parse(format!("catalog column {idx}: {other:?}"))),
            }
        }
    }

    /// Answers the column query and the key query with fixed rows
    #[derive(Default)]
    struct ScriptedExecutor {
        columns: Vec<ScriptedRow>,
        keys: Vec<ScriptedRow>,
        queries: Mutex<Vec<String>>,
    }

    impl CatalogExecutor for ScriptedExecutor {
        type Row = ScriptedRow;

        fn query_all(&self, query: &str) -> Result<Vec<ScriptedRow>, ExecutorError> {
            self.queries.lock().unwrap().push(query.to_string());
            if query.contains("key_column_usage") {
                Ok(self.keys.clone())
            } else {
                Ok(self.columns.clone())
            }
        }
    }

    fn column_row(
        name: &'static str,
        data_type: &'static str,
        udt: &'static str,
        nullable: &'static str,
    ) -> ScriptedRow {
        ScriptedRow(vec![
            Cell::Text(name),
            Cell::Text(data_type),
            Cell::Text(udt),
            Cell::Text(nullable),
        ])
    }

    fn key_row(name: &'static str, seq: i32) -> ScriptedRow {
        ScriptedRow(vec![Cell::Text(name), Cell::Int(seq)])
    }

    fn memberships() -> ScriptedExecutor {
        ScriptedExecutor {
            columns: vec![
                column_row("tenant_id", "integer", "int4", "NO"),
                column_row("user_id", "uuid", "uuid", "NO"),
                column_row("area", "USER-DEFINED", "geometry", "YES"),
                column_row("joined_at", "timestamp without time zone", "timestamp", "YES"),
            ],
            keys: vec![key_row("user_id", 2), key_row("tenant_id", 1)],
            ..Default::default()
        }
    }

    #[test]
    fn test_columns_decoded_from_rows() {
        let catalog = PostgresCatalog::new(memberships());
        let columns = catalog.columns("memberships", None).unwrap();
        assert_eq!(columns.len(), 4);
        assert_eq!(columns[0], ColumnDescriptor::new("tenant_id", sql_types::INTEGER, "int4", 0));
        assert_eq!(columns[1], ColumnDescriptor::new("user_id", sql_types::OTHER, "uuid", 0));
        assert_eq!(columns[2], ColumnDescriptor::new("area", sql_types::OTHER, "geometry", 1));
        assert_eq!(columns[3].sql_type, sql_types::TIMESTAMP);

        let queries = catalog.executor().queries.lock().unwrap();
        assert!(queries[0].contains("'public'"));
        assert!(queries[0].contains("'memberships'"));
    }

    #[test]
    fn test_primary_keys_decoded_with_ordinal() {
        let catalog = PostgresCatalog::new(memberships());
        let keys = catalog.primary_keys("memberships", Some("auth")).unwrap();
        assert_eq!(
            keys,
            vec![
                PrimaryKeyDescriptor::new("user_id", 2),
                PrimaryKeyDescriptor::new("tenant_id", 1),
            ]
        );
        let queries = catalog.executor().queries.lock().unwrap();
        assert!(queries[0].contains("'auth'"));
        assert!(!queries[0].contains("'public'"));
    }

    #[test]
    fn test_schema_through_postgres_catalog() {
        let catalog: Arc<dyn CatalogProvider> = Arc::new(PostgresCatalog::new(memberships()));
        let meta =
            DatabaseTableMetaData::new("memberships", catalog, Arc::new(PostgresDataTypeFactory));
        let names: Vec<&str> = meta.columns().unwrap().iter().map(Column::name).collect();
        assert_eq!(names, vec!["tenant_id", "user_id", "joined_at"]);
        assert_eq!(meta.column("user_id").unwrap().data_type(), DataType::Char);
        assert_eq!(meta.column("tenant_id").unwrap().nullable(), Nullable::NoNulls);
        let keys: Vec<&str> = meta.primary_keys().unwrap().iter().map(Column::name).collect();
        assert_eq!(keys, vec!["tenant_id", "user_id"]);
    }

    #[test]
    fn test_null_cell_is_parse_error() {
        let executor = ScriptedExecutor {
            columns: vec![ScriptedRow(vec![
                Cell::Null,
                Cell::Text("integer"),
                Cell::Text("int4"),
                Cell::Text("NO"),
            ])],
            ..Default::default()
        };
        let err = PostgresCatalog::new(executor).columns("t", None).unwrap_err();
        assert!(matches!(err, ExecutorError::Parse(_)));
    }

    #[test]
    fn test_non_integer_ordinal_is_parse_error() {
        let executor = ScriptedExecutor {
            keys: vec![ScriptedRow(vec![Cell::Text("id"), Cell::Text("1")])],
            ..Default::default()
        };
        let err = PostgresCatalog::new(executor).primary_keys("t", None).unwrap_err();
        assert!(err.to_string().contains("catalog column 1"));
    }

    #[test]
    fn test_columns_query() {
        let sql = columns_query("orders", "sales").to_string(PostgresQueryBuilder);
        assert!(sql.contains(r#""information_schema"."columns""#));
        assert!(sql.contains("'sales'"));
        assert!(sql.contains("'orders'"));
        assert!(sql.contains("ORDER BY"));
        assert!(sql.contains("ordinal_position"));
    }

    #[test]
    fn test_columns_query_escapes_names() {
        let sql = columns_query("o'rders", "public").to_string(PostgresQueryBuilder);
        assert!(!sql.contains("'o'rders'"));
    }

    #[test]
    fn test_primary_keys_query() {
        let sql = primary_keys_query("orders", "public").to_string(PostgresQueryBuilder);
        assert!(sql.contains("'PRIMARY KEY'"));
        assert!(sql.contains("key_column_usage"));
        assert!(sql.contains("JOIN"));
    }

    #[test]
    fn test_sql_type_mapping() {
        assert_eq!(sql_type_for("integer"), sql_types::INTEGER);
        assert_eq!(sql_type_for("character varying"), sql_types::VARCHAR);
        assert_eq!(sql_type_for("timestamp with time zone"), sql_types::TIMESTAMP);
        assert_eq!(sql_type_for("time without time zone"), sql_types::TIME);
        assert_eq!(sql_type_for("USER-DEFINED"), sql_types::OTHER);
        assert_eq!(sql_type_for("uuid"), sql_types::OTHER);
    }

    #[test]
    fn test_nullable_codes() {
        assert_eq!(nullable_code("NO"), 0);
        assert_eq!(nullable_code("YES"), 1);
        assert_eq!(nullable_code(""), 2);
    }
}
