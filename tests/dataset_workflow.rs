//! End-to-end dataset checks against a scripted catalog.
//!
//! A schema is extracted once from the catalog, rows are loaded under it,
//! and fixtures assembled from composite and replacement views are asserted
//! against those rows.

use lifeguard_dataset::datatype::sql_types;
use lifeguard_dataset::{
    assert_equals, assert_equals_by_columns, table_differences, Column, ColumnDescriptor,
    CompositeTable, DataSetConfig, DataSetError, DataType, DefaultTable, DefaultTableMetaData,
    Dialect, InMemoryCatalog, KeyOrder, MetaDataRef, PrimaryKeyDescriptor, ReplacementTable,
    Table, TableMetaData, Value,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Fixtures
// ============================================================================

fn orders_catalog() -> Arc<InMemoryCatalog> {
    let catalog = Arc::new(InMemoryCatalog::new());
    catalog.add_table(
        "ORDERS",
        vec![
            ColumnDescriptor::new("ID", sql_types::INTEGER, "int4", 0),
            ColumnDescriptor::new("CUSTOMER", sql_types::VARCHAR, "varchar", 0),
            ColumnDescriptor::new("TOTAL", sql_types::NUMERIC, "numeric", 1),
            ColumnDescriptor::new("NOTE", sql_types::VARCHAR, "varchar", 1),
            ColumnDescriptor::new("SHAPE", sql_types::OTHER, "geometry", 1),
        ],
        vec![
            PrimaryKeyDescriptor::new("CUSTOMER", 2),
            PrimaryKeyDescriptor::new("ID", 1),
        ],
    );
    catalog
}

fn postgres_config() -> DataSetConfig {
    DataSetConfig {
        dialect: Dialect::Postgres,
        schema: Some("shop".to_string()),
        primary_key_order: KeyOrder::Ascending,
    }
}

fn decimal(text: &str) -> Value {
    Value::Decimal(Decimal::from_str(text).unwrap())
}

/// Rows as the database returns them
fn actual_orders(meta: MetaDataRef) -> DefaultTable {
    DefaultTable::with_rows(
        meta,
        vec![
            vec![Value::Int(1), Value::from("ada"), decimal("10.50"), Value::Null],
            vec![Value::Int(2), Value::from("bob"), decimal("3.00"), Value::from("gift wrap")],
            vec![Value::Int(3), Value::from("cy"), Value::Null, Value::from("leave at door")],
        ],
    )
    .unwrap()
}

/// Fixture written in text with untyped columns, the way flat fixture files
/// hold it; comparisons then use the database column types
fn fixture(rows: &[[&str; 4]]) -> DefaultTable {
    let columns = ["ID", "CUSTOMER", "TOTAL", "NOTE"]
        .iter()
        .map(|name| Column::new(*name, DataType::Unknown))
        .collect();
    let meta = DefaultTableMetaData::without_keys("ORDERS", columns).unwrap();
    DefaultTable::with_rows(
        meta.into_ref(),
        rows.iter()
            .map(|row| row.iter().map(|v| Value::from(*v)).collect())
            .collect(),
    )
    .unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_schema_extracted_once_with_unsupported_columns_skipped() {
    init_logger();
    let catalog = orders_catalog();
    let meta = postgres_config().table_meta_data("orders", catalog.clone());

    let names: Vec<&str> = meta.columns().unwrap().iter().map(Column::name).collect();
    assert_eq!(names, vec!["ID", "CUSTOMER", "TOTAL", "NOTE"]);
    let keys: Vec<&str> = meta.primary_keys().unwrap().iter().map(Column::name).collect();
    assert_eq!(keys, vec!["ID", "CUSTOMER"]);

    // Repeated reads are served from the cache
    meta.columns().unwrap();
    meta.primary_keys().unwrap();
    assert_eq!(catalog.column_calls(), 1);
    assert_eq!(catalog.primary_key_calls(), 1);
    assert_eq!(catalog.last_schema().as_deref(), Some("shop"));
}

#[test]
fn test_descending_key_order_from_config() {
    let config =
        DataSetConfig::from_toml_str("[dataset]\nprimary_key_order = \"descending\"\n").unwrap();
    let meta = config.table_meta_data("ORDERS", orders_catalog());
    let keys: Vec<&str> = meta.primary_keys().unwrap().iter().map(Column::name).collect();
    assert_eq!(keys, vec!["CUSTOMER", "ID"]);
}

#[test]
fn test_fixture_assembled_from_composite_and_replacements_matches_database() {
    init_logger();
    let meta: MetaDataRef = Arc::new(postgres_config().table_meta_data("ORDERS", orders_catalog()));
    let actual = actual_orders(meta);

    let first = fixture(&[["1", "ada", "10.5", "[null]"]]);
    let rest = fixture(&[
        ["2", "bob", "3", "gift [wrap]"],
        ["3", "cy", "[null]", "leave at door"],
    ]);
    let mut expected = ReplacementTable::new(CompositeTable::pair(first, rest));
    expected.add_replacement_object("[null]", Value::Null);
    expected.add_replacement_substring("[wrap]", "wrap").unwrap();

    assert_eq!(expected.row_count(), 3);
    assert_equals(&expected, &actual).unwrap();
    assert!(table_differences(&expected, &actual).unwrap().is_empty());
}

#[test]
fn test_differences_are_reported_per_cell() {
    let meta: MetaDataRef = Arc::new(postgres_config().table_meta_data("ORDERS", orders_catalog()));
    let actual = actual_orders(meta);
    let mut expected = ReplacementTable::new(fixture(&[
        ["1", "ada", "10.5", "[null]"],
        ["2", "bob", "4", "gift wrap"],
        ["3", "cyd", "[null]", "leave at door"],
    ]));
    expected.add_replacement_object("[null]", Value::Null);

    let differences = table_differences(&expected, &actual).unwrap();
    let cells: Vec<(usize, &str)> =
        differences.iter().map(|d| (d.row, d.column.as_str())).collect();
    assert_eq!(cells, vec![(1, "TOTAL"), (2, "CUSTOMER")]);

    match assert_equals(&expected, &actual).unwrap_err() {
        DataSetError::ValueMismatch { row, column, .. } => {
            assert_eq!(row, 1);
            assert_eq!(column, "TOTAL");
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_equals_by_columns(&expected, &actual, &["ID", "NOTE"]).unwrap();
}

#[test]
fn test_schema_mismatch_against_renamed_view() {
    let meta: MetaDataRef = Arc::new(postgres_config().table_meta_data("ORDERS", orders_catalog()));
    let actual = actual_orders(meta);

    let narrow = DefaultTable::with_columns(
        "ORDERS_FIXTURE",
        vec![Column::new("ID", DataType::Integer), Column::new("EMAIL", DataType::Char)],
    )
    .unwrap();
    let expected = CompositeTable::renamed("ORDERS", narrow).unwrap();

    match assert_equals(&expected, &actual).unwrap_err() {
        DataSetError::SchemaMismatch { message, expected_only, actual_only, .. } => {
            assert_eq!(
                message,
                "column count (table=ORDERS, expectedColCount=2, actualColCount=4)"
            );
            assert_eq!(expected_only, "[EMAIL]");
            assert_eq!(actual_only, "[CUSTOMER, TOTAL, NOTE]");
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// Row source with no rows, used to reach the schema through a failing catalog
struct EmptyTable(MetaDataRef);

impl Table for EmptyTable {
    fn table_meta_data(&self) -> MetaDataRef {
        self.0.clone()
    }

    fn row_count(&self) -> usize {
        0
    }

    fn value(&self, row: isize, _column: &str) -> Result<Value, DataSetError> {
        Err(DataSetError::RowOutOfBounds { row, row_count: 0 })
    }
}

#[test]
fn test_catalog_failure_surfaces_as_database_access() {
    let catalog = orders_catalog();
    catalog.fail_with("connection reset");
    let actual = EmptyTable(Arc::new(postgres_config().table_meta_data("ORDERS", catalog.clone())));
    let expected = fixture(&[]);

    let err = assert_equals(&expected, &actual).unwrap_err();
    assert!(matches!(err, DataSetError::DatabaseAccess(_)));
    assert!(err.to_string().contains("connection reset"));
    assert!(std::error::Error::source(&err).is_some());
}
