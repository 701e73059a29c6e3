//! The reference catalog: every character and location a script can mention.

use crate::{ImageData, ReferenceCategory, ReferenceEntry, normalize_handle};
use hokusai_error::{CatalogError, CatalogErrorKind};
use std::collections::BTreeMap;
use tracing::debug;

/// Characters and locations keyed by handle.
///
/// Handles are unique across both categories. Entries are only mutated through
/// the explicit add, update, remove and attach-image operations.
///
/// # Examples
///
/// ```
/// use hokusai_core::{ReferenceCatalog, ReferenceEntry};
///
/// let mut catalog = ReferenceCatalog::new();
/// catalog
///     .add(ReferenceEntry::character("Rayne-Aura", "Rayne", "Spiky dark blue hair."))
///     .unwrap();
///
/// assert!(catalog.contains("rayneaura"));
/// assert!(catalog.add(ReferenceEntry::location("rayneaura", "Dup", "Nope.")).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceCatalog {
    characters: BTreeMap<String, ReferenceEntry>,
    locations: BTreeMap<String, ReferenceEntry>,
}

impl ReferenceCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from persisted character and location maps.
    pub fn from_parts(
        characters: BTreeMap<String, ReferenceEntry>,
        locations: BTreeMap<String, ReferenceEntry>,
    ) -> Self {
        Self {
            characters,
            locations,
        }
    }

    /// Split the catalog back into its character and location maps.
    pub fn into_parts(
        self,
    ) -> (
        BTreeMap<String, ReferenceEntry>,
        BTreeMap<String, ReferenceEntry>,
    ) {
        (self.characters, self.locations)
    }

    /// Add a new entry.
    ///
    /// The handle is normalized to lowercase alphanumerics before insertion.
    ///
    /// # Errors
    ///
    /// Rejects empty handles, names and descriptions, and handles already used
    /// by any character or location. The catalog is unchanged on error.
    #[track_caller]
    pub fn add(&mut self, mut entry: ReferenceEntry) -> Result<(), CatalogError> {
        entry.id = normalize_handle(&entry.id);
        Self::validate(&entry)?;
        if self.contains(&entry.id) {
            return Err(CatalogError::new(CatalogErrorKind::DuplicateHandle(
                entry.id,
            )));
        }
        debug!(handle = %entry.id, category = %entry.category, "Adding reference");
        self.map_mut(entry.category).insert(entry.id.clone(), entry);
        Ok(())
    }

    /// Replace an existing entry, moving it between categories if needed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown handles and the same validation errors
    /// as [`add`](Self::add).
    #[track_caller]
    pub fn update(&mut self, mut entry: ReferenceEntry) -> Result<(), CatalogError> {
        entry.id = normalize_handle(&entry.id);
        Self::validate(&entry)?;
        if self.remove(&entry.id).is_none() {
            return Err(CatalogError::new(CatalogErrorKind::NotFound(entry.id)));
        }
        self.map_mut(entry.category).insert(entry.id.clone(), entry);
        Ok(())
    }

    /// Remove an entry, returning it if it existed.
    pub fn remove(&mut self, handle: &str) -> Option<ReferenceEntry> {
        self.characters
            .remove(handle)
            .or_else(|| self.locations.remove(handle))
    }

    /// Attach or replace the reference image of an entry.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no entry has this handle.
    #[track_caller]
    pub fn attach_image(&mut self, handle: &str, image: ImageData) -> Result<(), CatalogError> {
        let entry = self
            .characters
            .get_mut(handle)
            .or_else(|| self.locations.get_mut(handle))
            .ok_or_else(|| CatalogError::new(CatalogErrorKind::NotFound(handle.to_string())))?;
        debug!(handle, mime_type = %image.mime_type, bytes = image.data.len(), "Attaching reference image");
        entry.image = Some(image);
        Ok(())
    }

    /// Look up an entry by handle.
    pub fn get(&self, handle: &str) -> Option<&ReferenceEntry> {
        self.characters
            .get(handle)
            .or_else(|| self.locations.get(handle))
    }

    /// Returns true if any entry uses this handle.
    pub fn contains(&self, handle: &str) -> bool {
        self.get(handle).is_some()
    }

    /// Iterate characters, then locations, each in handle order.
    pub fn iter(&self) -> impl Iterator<Item = &ReferenceEntry> {
        self.characters.values().chain(self.locations.values())
    }

    /// Character entries keyed by handle.
    pub fn characters(&self) -> &BTreeMap<String, ReferenceEntry> {
        &self.characters
    }

    /// Location entries keyed by handle.
    pub fn locations(&self) -> &BTreeMap<String, ReferenceEntry> {
        &self.locations
    }

    /// Replace the whole catalog, as when a preset is loaded.
    pub fn replace(
        &mut self,
        characters: BTreeMap<String, ReferenceEntry>,
        locations: BTreeMap<String, ReferenceEntry>,
    ) {
        self.characters = characters;
        self.locations = locations;
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.characters.clear();
        self.locations.clear();
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.characters.len() + self.locations.len()
    }

    /// Returns true if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn map_mut(&mut self, category: ReferenceCategory) -> &mut BTreeMap<String, ReferenceEntry> {
        match category {
            ReferenceCategory::Character => &mut self.characters,
            ReferenceCategory::Location => &mut self.locations,
        }
    }

    #[track_caller]
    fn validate(entry: &ReferenceEntry) -> Result<(), CatalogError> {
        if entry.id.is_empty() {
            return Err(CatalogError::new(CatalogErrorKind::EmptyHandle));
        }
        if entry.name.trim().is_empty() {
            return Err(CatalogError::new(CatalogErrorKind::MissingName(
                entry.id.clone(),
            )));
        }
        if entry.description.trim().is_empty() {
            return Err(CatalogError::new(CatalogErrorKind::MissingDescription(
                entry.id.clone(),
            )));
        }
        Ok(())
    }
}
