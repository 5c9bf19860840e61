//! Column identity, type and nullability.

use crate::datatype::DataType;
use std::fmt;

/// Nullability of a column as far as the catalog knows it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Nullable {
    Nullable,
    NoNulls,
    #[default]
    Unknown,
}

impl Nullable {
    /// Interpret a catalog nullability code (`0` no nulls, `1` nullable).
    pub fn from_catalog_code(code: i32) -> Self {
        match code {
            0 => Nullable::NoNulls,
            1 => Nullable::Nullable,
            _ => Nullable::Unknown,
        }
    }
}

/// A table column
///
/// Immutable once built. Identity is the name, compared case-insensitively
/// through [`Column::has_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    data_type: DataType,
    nullable: Nullable,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self::with_nullable(name, data_type, Nullable::Unknown)
    }

    pub fn with_nullable(name: impl Into<String>, data_type: DataType, nullable: Nullable) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn nullable(&self) -> Nullable {
        self.nullable
    }

    /// Case-insensitive name match
    pub fn has_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.name.to_lowercase() == name.to_lowercase()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
