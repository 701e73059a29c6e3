//! Saved catalog snapshots.

use crate::{ReferenceCatalog, ReferenceEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An immutable snapshot of the reference catalog.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use hokusai_core::{Preset, ReferenceCatalog, ReferenceEntry};
///
/// let mut catalog = ReferenceCatalog::new();
/// catalog.add(ReferenceEntry::character("zorbie", "Zorbie", "Green alien.")).unwrap();
///
/// let preset = Preset::snapshot("p1", "Aliens", &catalog, Utc::now());
/// assert_eq!(preset.name(), "Aliens");
/// assert_eq!(preset.catalog(), catalog);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// Unique preset id
    id: String,
    /// User-facing name
    name: String,
    /// Character entries at save time
    characters: BTreeMap<String, ReferenceEntry>,
    /// Location entries at save time
    locations: BTreeMap<String, ReferenceEntry>,
    /// When the snapshot was taken or imported
    created_at: DateTime<Utc>,
}

impl Preset {
    /// Assemble a preset from its parts.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        characters: BTreeMap<String, ReferenceEntry>,
        locations: BTreeMap<String, ReferenceEntry>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            characters,
            locations,
            created_at,
        }
    }

    /// Snapshot the current contents of a catalog.
    pub fn snapshot(
        id: impl Into<String>,
        name: impl Into<String>,
        catalog: &ReferenceCatalog,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            id,
            name,
            catalog.characters().clone(),
            catalog.locations().clone(),
            created_at,
        )
    }

    /// Rebuild a catalog from this snapshot.
    pub fn catalog(&self) -> ReferenceCatalog {
        ReferenceCatalog::from_parts(self.characters.clone(), self.locations.clone())
    }
}
