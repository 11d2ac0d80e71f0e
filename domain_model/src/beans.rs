//! Conversions between models, rows and property maps.
//!
//! A model's persistent columns are exactly the keys it serialises to, so
//! `#[transient]` fields and the raw attribute storage never reach the
//! database. Keys that match no column are kept as raw attributes instead of
//! being dropped.

use std::collections::HashMap;
use std::hash::BuildHasher;

use heck::ToSnakeCase;
use serde::de::Error as _;

use crate::{DomainModel, Row, StorageResult, Value};

/// Instance creation and property population for models.
#[derive(Clone, Copy, Debug)]
pub struct Beans;

impl Beans {
    /// A fresh, unsaved instance.
    #[must_use]
    pub fn create_new_instance<T: DomainModel>() -> T {
        T::default()
    }

    /// Copies `properties` onto `bean`.
    ///
    /// Keys are first matched as written against the serialised column
    /// names, then against the field names in [`DomainModel::COLUMNS`].
    /// Failing that they are lower-cased when `underscore_keys` is set, and
    /// converted from camelCase to snake_case otherwise, and matched the same
    /// way. Keys that still match nothing are stored as raw attributes.
    /// Transient fields are reset to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Conversion`](crate::StorageError::Conversion)
    /// when a value cannot be converted to the field's type; `bean` is left
    /// unchanged in that case.
    pub fn populate<T, S>(bean: &mut T, properties: &HashMap<String, Value, S>, underscore_keys: bool) -> StorageResult<()>
    where
        T: DomainModel,
        S: BuildHasher,
    {
        let mut columns = Self::to_row(&*bean)?;
        let mut unmatched = HashMap::new();
        for (key, value) in properties {
            match resolve_column(&columns, T::COLUMNS, key, underscore_keys) {
                Some(column) => {
                    columns.insert(column, value.clone());
                }
                None => {
                    unmatched.insert(key.clone(), value.clone());
                }
            }
        }
        let mut populated: T = serde_json::from_value(Value::Object(columns))?;
        let mut raw = std::mem::take(bean.raw_attributes_mut());
        raw.extend(unmatched);
        *populated.raw_attributes_mut() = raw;
        *bean = populated;
        Ok(())
    }

    /// Maps a database row onto a new instance.
    ///
    /// Columns missing from the row keep their default values; columns the
    /// model does not declare become raw attributes.
    ///
    /// # Errors
    ///
    /// Returns a conversion error when a column value does not fit its field.
    pub fn from_row<T: DomainModel>(row: Row) -> StorageResult<T> {
        let mut columns = Self::to_row(&T::default())?;
        let mut unmatched = HashMap::new();
        for (column, value) in row {
            if columns.contains_key(&column) {
                columns.insert(column, value);
            } else {
                unmatched.insert(column, value);
            }
        }
        let mut bean: T = serde_json::from_value(Value::Object(columns))?;
        bean.raw_attributes_mut().extend(unmatched);
        Ok(bean)
    }

    /// The persistent columns of `bean` and their values.
    ///
    /// # Errors
    ///
    /// Fails when the model does not serialise to an object.
    pub fn to_row<T: DomainModel>(bean: &T) -> StorageResult<Row> {
        match serde_json::to_value(bean)? {
            Value::Object(row) => Ok(row),
            other => Err(serde_json::Error::custom(format!(
                "{} serialised to {other} instead of an object",
                T::MODEL_NAME
            ))
            .into()),
        }
    }
}

fn resolve_column(columns: &Row, fields: &[(&str, &str)], key: &str, underscore_keys: bool) -> Option<String> {
    let converted = if underscore_keys {
        key.to_ascii_lowercase()
    } else {
        key.to_snake_case()
    };
    [key, converted.as_str()].into_iter().find_map(|candidate| {
        if columns.contains_key(candidate) {
            return Some(candidate.to_owned());
        }
        fields
            .iter()
            .find(|(field, column)| *field == candidate && columns.contains_key(*column))
            .map(|(_, column)| (*column).to_owned())
    })
}
