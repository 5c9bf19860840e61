//! Several row sources presented as one table.

use super::Table;
use crate::error::DataSetError;
use crate::metadata::{DefaultTableMetaData, MetaDataRef};
use crate::value::Value;

/// Concatenation of row sources under one schema.
///
/// Row `n` of the composite is row `n - offset` of the first source whose
/// range `[offset, offset + row_count)` contains `n`. Values are looked up
/// by column name, so sources may order their columns differently.
pub struct CompositeTable<'a> {
    meta_data: MetaDataRef,
    tables: Vec<Box<dyn Table + 'a>>,
}

impl<'a> CompositeTable<'a> {
    /// One source under an explicit schema
    pub fn new(meta_data: MetaDataRef, table: impl Table + 'a) -> Self {
        Self {
            meta_data,
            tables: vec![Box::new(table)],
        }
    }

    /// Sources in order, under an explicit schema
    pub fn from_tables(meta_data: MetaDataRef, tables: Vec<Box<dyn Table + 'a>>) -> Self {
        Self { meta_data, tables }
    }

    /// Two sources; the first one's schema is adopted as is
    pub fn pair(first: impl Table + 'a, second: impl Table + 'a) -> Self {
        Self {
            meta_data: first.table_meta_data(),
            tables: vec![Box::new(first), Box::new(second)],
        }
    }

    /// One source under a new table name, keeping its columns and keys.
    ///
    /// # Errors
    ///
    /// Propagates a failure to read the source schema.
    pub fn renamed(table_name: &str, table: impl Table + 'a) -> Result<Self, DataSetError> {
        let source = table.table_meta_data();
        let meta_data = DefaultTableMetaData::new(
            table_name,
            source.columns()?.to_vec(),
            source.primary_keys()?.to_vec(),
        )?;
        Ok(Self::new(meta_data.into_ref(), table))
    }
}

impl Table for CompositeTable<'_> {
    fn table_meta_data(&self) -> MetaDataRef {
        self.meta_data.clone()
    }

    fn row_count(&self) -> usize {
        self.tables.iter().map(|t| t.row_count()).sum()
    }

    fn value(&self, row: isize, column: &str) -> Result<Value, DataSetError> {
        let Ok(index) = usize::try_from(row) else {
            return Err(DataSetError::RowOutOfBounds {
                row,
                row_count: self.row_count(),
            });
        };
        let mut offset = 0;
        for table in &self.tables {
            let count = table.row_count();
            if index < offset + count {
                log::trace!(
                    "{}: row {} -> {} row {}",
                    self.meta_data.table_name(),
                    index,
                    table.table_meta_data().table_name(),
                    index - offset
                );
                // `index - offset` fits: it is below `count`
                return table.value((index - offset) as isize, column);
            }
            offset += count;
        }
        Err(DataSetError::RowOutOfBounds {
            row,
            row_count: offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::datatype::DataType;
    use crate::metadata::TableMetaData;
    use crate::table::DefaultTable;

    fn table(name: &str, columns: &[&str], rows: &[&[&str]]) -> DefaultTable {
        let columns = columns.iter().map(|c| Column::new(*c, DataType::Char)).collect();
        let mut table = DefaultTable::with_columns(name, columns).unwrap();
        for row in rows {
            table.add_row(row.iter().map(|v| Value::from(*v)).collect()).unwrap();
        }
        table
    }

    fn t1() -> DefaultTable {
        table("T1", &["ID", "NAME"], &[&["1", "a"], &["2", "b"], &["3", "c"]])
    }

    fn t2() -> DefaultTable {
        // Same names, different column order
        table("T2", &["NAME", "ID"], &[&["d", "4"], &["e", "5"]])
    }

    #[test]
    fn test_rows_route_to_owning_source() {
        let composite = CompositeTable::pair(t1(), t2());
        assert_eq!(composite.row_count(), 5);
        let ids: Vec<Value> = (0..5).map(|r| composite.value(r, "ID").unwrap()).collect();
        let expected: Vec<Value> = ["1", "2", "3", "4", "5"].into_iter().map(Value::from).collect();
        assert_eq!(ids, expected);
        assert_eq!(composite.value(3, "name").unwrap(), Value::from("d"));
    }

    #[test]
    fn test_out_of_bounds_rows() {
        let composite = CompositeTable::pair(t1(), t2());
        assert!(matches!(
            composite.value(-1, "ID"),
            Err(DataSetError::RowOutOfBounds { row: -1, row_count: 5 })
        ));
        assert!(matches!(
            composite.value(5, "ID"),
            Err(DataSetError::RowOutOfBounds { row: 5, row_count: 5 })
        ));
    }

    #[test]
    fn test_pair_adopts_first_schema() {
        let first = t1();
        let meta = first.table_meta_data();
        let composite = CompositeTable::pair(first, t2());
        assert!(std::sync::Arc::ptr_eq(&meta, &composite.table_meta_data()));
    }

    #[test]
    fn test_renamed_shares_columns_and_keys() {
        let columns = vec![
            Column::new("ID", DataType::Integer),
            Column::new("NAME", DataType::Char),
        ];
        let meta =
            DefaultTableMetaData::with_primary_key_names("PEOPLE", columns, &["ID"]).unwrap();
        let mut source = DefaultTable::new(meta.into_ref());
        source.add_row(vec![Value::Int(7), Value::from("x")]).unwrap();

        let composite = CompositeTable::renamed("PEOPLE_COPY", &source).unwrap();
        let meta = composite.table_meta_data();
        assert_eq!(meta.table_name(), "PEOPLE_COPY");
        assert_eq!(meta.columns().unwrap(), source.table_meta_data().columns().unwrap());
        assert_eq!(meta.primary_keys().unwrap()[0].name(), "ID");
        assert_eq!(composite.value(0, "ID").unwrap(), Value::Int(7));
    }

    #[test]
    fn test_from_tables_with_explicit_schema() {
        let meta = t1().table_meta_data();
        let (a, b, c) = (t1(), t2(), t1());
        let tables: Vec<Box<dyn Table + '_>> = vec![Box::new(&a), Box::new(&b), Box::new(&c)];
        let composite = CompositeTable::from_tables(meta, tables);
        assert_eq!(composite.row_count(), 8);
        assert_eq!(composite.value(5, "NAME").unwrap(), Value::from("a"));
        assert_eq!(composite.value(7, "ID").unwrap(), Value::from("3"));
    }

    #[test]
    fn test_empty_sources_are_skipped() {
        let empty = table("EMPTY", &["ID", "NAME"], &[]);
        let composite = CompositeTable::pair(empty, t2());
        assert_eq!(composite.value(0, "ID").unwrap(), Value::from("4"));
    }

    #[test]
    fn test_new_wraps_single_source() {
        let source = t2();
        let composite = CompositeTable::new(t1().table_meta_data(), &source);
        assert_eq!(composite.table_meta_data().table_name(), "T1");
        assert_eq!(composite.value(1, "ID").unwrap(), Value::from("5"));
    }
}
