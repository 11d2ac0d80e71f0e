//! The trait `#[domain_model]` implements for every augmented struct.

use std::collections::HashMap;
use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Value, Violation};

/// Mapping metadata and storage hooks for a domain model.
///
/// Implemented by the attribute macro; hand-written implementations are
/// possible but must keep the constants in line with the serde mapping of
/// the struct.
pub trait DomainModel: Default + Serialize + DeserializeOwned + 'static {
    /// Type of the primary key. `Default::default()` marks an unsaved model.
    type PrimaryKey: Clone + Debug + Default + PartialEq + Serialize + DeserializeOwned;

    /// Name of the Rust type, used in diagnostics.
    const MODEL_NAME: &'static str;

    /// Table the model is stored in.
    const TABLE: &'static str;

    /// Column holding the primary key.
    const PRIMARY_COLUMN: &'static str;

    /// Each persistent field name paired with the column it maps to, the
    /// primary key included.
    const COLUMNS: &'static [(&'static str, &'static str)];

    /// Returns the primary key.
    fn primary_key(&self) -> &Self::PrimaryKey;

    /// Replaces the primary key.
    fn set_primary_key(&mut self, key: Self::PrimaryKey);

    /// Storage for columns and properties that have no declared field.
    fn raw_attributes_mut(&mut self) -> &mut HashMap<String, Value>;

    /// Validation rules. Models without a configured validator always pass.
    fn violations(&self) -> Vec<Violation> {
        Vec::new()
    }

    /// Whether the model has been assigned a primary key.
    fn is_persisted(&self) -> bool {
        *self.primary_key() != Self::PrimaryKey::default()
    }
}
