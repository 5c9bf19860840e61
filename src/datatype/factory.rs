//! Dialect-aware resolution of catalog-reported native types.
//!
//! A [`DataTypeFactory`] turns the `(sql_type, sql_type_name)` pair a catalog
//! reports into a semantic [`DataType`]. Vendors that report generic codes
//! (`OTHER`) with a meaningful name get their own factory; everything else
//! falls back to [`DefaultDataTypeFactory`].
//!
//! Vendor-specific write paths are exposed as a static capability
//! ([`DataTypeFactory::lob_binding`]) chosen with the [`Dialect`] at
//! configuration time.

use super::sql_types;
use super::DataType;
use crate::error::DataSetError;
use serde::Deserialize;

/// How a large-object parameter must be bound when written back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobBinding {
    /// Generic parameter binding
    Parameter,
    /// Bind with the national character form-of-use (Oracle `NCLOB`)
    NationalCharacterForm,
}

/// Resolves native catalog types into semantic data types
pub trait DataTypeFactory: Send + Sync {
    /// Map a native type to a [`DataType`].
    ///
    /// # Errors
    ///
    /// Returns `DataSetError::UnsupportedDataType` when the native type has
    /// no semantic counterpart.
    fn create_data_type(
        &self,
        sql_type: i32,
        sql_type_name: &str,
    ) -> Result<DataType, DataSetError>;

    /// Binding required for values of this native type.
    fn lob_binding(&self, _sql_type: i32, _sql_type_name: &str) -> LobBinding {
        LobBinding::Parameter
    }
}

/// Resolver for the generic type codes
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultDataTypeFactory;

impl DataTypeFactory for DefaultDataTypeFactory {
    fn create_data_type(
        &self,
        sql_type: i32,
        sql_type_name: &str,
    ) -> Result<DataType, DataSetError> {
        let data_type = match sql_type {
            sql_types::BIT | sql_types::BOOLEAN => DataType::Boolean,
            sql_types::TINYINT | sql_types::SMALLINT | sql_types::INTEGER | sql_types::BIGINT => {
                DataType::Integer
            }
            sql_types::NUMERIC | sql_types::DECIMAL => DataType::Numeric,
            sql_types::FLOAT | sql_types::REAL | sql_types::DOUBLE => DataType::Double,
            sql_types::CHAR
            | sql_types::VARCHAR
            | sql_types::LONGVARCHAR
            | sql_types::NCHAR
            | sql_types::NVARCHAR
            | sql_types::LONGNVARCHAR => DataType::Char,
            sql_types::CLOB | sql_types::NCLOB => DataType::Clob,
            sql_types::DATE => DataType::Date,
            sql_types::TIME => DataType::Time,
            sql_types::TIMESTAMP => DataType::Timestamp,
            sql_types::BINARY
            | sql_types::VARBINARY
            | sql_types::LONGVARBINARY
            | sql_types::BLOB => DataType::Blob,
            _ => {
                return Err(DataSetError::UnsupportedDataType {
                    sql_type,
                    sql_type_name: sql_type_name.to_string(),
                })
            }
        };
        Ok(data_type)
    }
}

/// MySQL reports `LONGTEXT` as `OTHER`
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDataTypeFactory;

impl DataTypeFactory for MySqlDataTypeFactory {
    fn create_data_type(
        &self,
        sql_type: i32,
        sql_type_name: &str,
    ) -> Result<DataType, DataSetError> {
        if sql_type == sql_types::OTHER && sql_type_name == "longtext" {
            return Ok(DataType::Clob);
        }
        DefaultDataTypeFactory.create_data_type(sql_type, sql_type_name)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDataTypeFactory;

impl DataTypeFactory for PostgresDataTypeFactory {
    fn create_data_type(
        &self,
        sql_type: i32,
        sql_type_name: &str,
    ) -> Result<DataType, DataSetError> {
        if sql_type == sql_types::OTHER {
            match sql_type_name {
                "uuid" | "citext" => return Ok(DataType::Char),
                "json" | "jsonb" | "xml" => return Ok(DataType::Clob),
                _ => {}
            }
        }
        DefaultDataTypeFactory.create_data_type(sql_type, sql_type_name)
    }
}

/// Oracle `NCLOB` reads as a CLOB but must be written with the national
/// character form-of-use.
#[derive(Debug, Default, Clone, Copy)]
pub struct OracleDataTypeFactory;

impl OracleDataTypeFactory {
    fn is_nclob(sql_type: i32, sql_type_name: &str) -> bool {
        sql_type == sql_types::NCLOB
            || (sql_type == sql_types::OTHER && sql_type_name.eq_ignore_ascii_case("NCLOB"))
    }
}

impl DataTypeFactory for OracleDataTypeFactory {
    fn create_data_type(
        &self,
        sql_type: i32,
        sql_type_name: &str,
    ) -> Result<DataType, DataSetError> {
        if Self::is_nclob(sql_type, sql_type_name) {
            return Ok(DataType::Clob);
        }
        if sql_type == sql_types::OTHER && sql_type_name.eq_ignore_ascii_case("CLOB") {
            return Ok(DataType::Clob);
        }
        if sql_type == sql_types::OTHER && sql_type_name.eq_ignore_ascii_case("BLOB") {
            return Ok(DataType::Blob);
        }
        DefaultDataTypeFactory.create_data_type(sql_type, sql_type_name)
    }

    fn lob_binding(&self, sql_type: i32, sql_type_name: &str) -> LobBinding {
        if Self::is_nclob(sql_type, sql_type_name) {
            LobBinding::NationalCharacterForm
        } else {
            LobBinding::Parameter
        }
    }
}

/// Database vendor, selected in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Default,
    Postgres,
    MySql,
    Oracle,
}

impl Dialect {
    pub fn data_type_factory(self) -> Box<dyn DataTypeFactory> {
        match self {
            Dialect::Default => Box::new(DefaultDataTypeFactory),
            Dialect::Postgres => Box::new(PostgresDataTypeFactory),
            Dialect::MySql => Box::new(MySqlDataTypeFactory),
            Dialect::Oracle => Box::new(OracleDataTypeFactory),
        }
    }
}
