//! Rule-driven value substitution over a wrapped row source.
//!
//! Two passes run on every cell read. The object pass swaps a value equal
//! to a registered key (the null key included) for its replacement. The
//! substring pass then rewrites text in character-typed columns, applying
//! every literal rule in registration order.

use super::Table;
use crate::datatype::DataType;
use crate::error::DataSetError;
use crate::metadata::MetaDataRef;
use crate::value::Value;

/// Ordered replacement rules
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Replacements {
    objects: Vec<(Value, Value)>,
    substrings: Vec<(String, String)>,
}

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace cells equal to `original` with `replacement`.
    ///
    /// Either side may be [`Value::Null`]. Registering a key again replaces
    /// its target and keeps the original position.
    pub fn add_object(&mut self, original: impl Into<Value>, replacement: impl Into<Value>) {
        let original = original.into();
        let replacement = replacement.into();
        log::debug!("object replacement <{}> -> <{}>", original, replacement);
        match self.objects.iter_mut().find(|(key, _)| *key == original) {
            Some((_, target)) => *target = replacement,
            None => self.objects.push((original, replacement)),
        }
    }

    /// Replace every occurrence of `original` in text cells with `replacement`.
    ///
    /// # Errors
    ///
    /// Returns `ReplacementConfiguration` for an empty `original`; the
    /// registry is left unchanged.
    pub fn add_substring(&mut self, original: &str, replacement: &str) -> Result<(), DataSetError> {
        if original.is_empty() {
            return Err(DataSetError::ReplacementConfiguration(format!(
                "substring rule needs a non-empty literal (replacement={replacement:?})"
            )));
        }
        log::debug!("substring replacement {:?} -> {:?}", original, replacement);
        match self.substrings.iter_mut().find(|(key, _)| key == original) {
            Some((_, target)) => *target = replacement.to_string(),
            None => self
                .substrings
                .push((original.to_string(), replacement.to_string())),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.substrings.is_empty()
    }

    /// Run both passes over a value read from a column of `data_type`.
    pub fn apply(&self, value: Value, data_type: DataType) -> Value {
        let value = match self.objects.iter().find(|(key, _)| *key == value) {
            Some((_, replacement)) => replacement.clone(),
            None => value,
        };
        match value {
            Value::String(text) if data_type.accepts_text_substitution() => {
                Value::String(self.substrings.iter().fold(text, |text, (original, replacement)| {
                    text.replace(original.as_str(), replacement)
                }))
            }
            other => other,
        }
    }
}

/// Read-only view applying [`Replacements`] to every value of `T`
pub struct ReplacementTable<T> {
    table: T,
    replacements: Replacements,
}

impl<T: Table> ReplacementTable<T> {
    pub fn new(table: T) -> Self {
        Self::with_replacements(table, Replacements::new())
    }

    pub fn with_replacements(table: T, replacements: Replacements) -> Self {
        Self { table, replacements }
    }

    /// See [`Replacements::add_object`].
    pub fn add_replacement_object(
        &mut self,
        original: impl Into<Value>,
        replacement: impl Into<Value>,
    ) {
        self.replacements.add_object(original, replacement);
    }

    /// See [`Replacements::add_substring`].
    ///
    /// # Errors
    ///
    /// Returns `ReplacementConfiguration` for an empty `original`.
    pub fn add_replacement_substring(
        &mut self,
        original: &str,
        replacement: &str,
    ) -> Result<(), DataSetError> {
        self.replacements.add_substring(original, replacement)
    }

    pub fn replacements(&self) -> &Replacements {
        &self.replacements
    }

    pub fn into_inner(self) -> T {
        self.table
    }
}

impl<T: Table> Table for ReplacementTable<T> {
    fn table_meta_data(&self) -> MetaDataRef {
        self.table.table_meta_data()
    }

    fn row_count(&self) -> usize {
        self.table.row_count()
    }

    fn value(&self, row: isize, column: &str) -> Result<Value, DataSetError> {
        let raw = self.table.value(row, column)?;
        if self.replacements.is_empty() {
            return Ok(raw);
        }
        let data_type = self.table.table_meta_data().column(column)?.data_type();
        Ok(self.replacements.apply(raw, data_type))
    }
}
