//! The complete persisted state of one storyboard project.

use crate::{GenerationResult, Preset, ReferenceCatalog, ReferenceEntry, Scene, StoryboardSettings};
use hokusai_error::JsonError;
use serde::Deserialize;
use std::collections::BTreeMap;

/// World lore shipped with a fresh project.
pub const STARTER_LORE: &str = include_str!("../data/starter_lore.txt");

const STARTER_CATALOG: &str = include_str!("../data/starter_catalog.json");

#[derive(Deserialize)]
struct StarterCatalog {
    characters: BTreeMap<String, ReferenceEntry>,
    locations: BTreeMap<String, ReferenceEntry>,
}

/// Everything a project persists.
///
/// `generations` is keyed by positional scene id, the flat format used at
/// rest. Live editing goes through a storyboard that keys results by
/// stable scene keys instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    /// Characters and locations
    pub catalog: ReferenceCatalog,
    /// Scenes in storyboard order
    pub scenes: Vec<Scene>,
    /// Generation results keyed by scene id
    pub generations: BTreeMap<String, GenerationResult>,
    /// Free-form world lore used when drafting
    pub lore: String,
    /// Saved catalog snapshots, newest first
    pub presets: Vec<Preset>,
    /// Authoring toggles
    pub settings: StoryboardSettings,
}

impl Project {
    /// A fresh project with the bundled cast, locations and lore.
    ///
    /// # Errors
    ///
    /// Returns a `JsonError` if the bundled catalog fails to parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use hokusai_core::Project;
    ///
    /// let project = Project::starter().unwrap();
    /// assert!(project.catalog.contains("auraayo"));
    /// assert!(project.catalog.contains("locarena"));
    /// assert!(project.scenes.is_empty());
    /// ```
    #[track_caller]
    pub fn starter() -> Result<Self, JsonError> {
        Ok(Self {
            catalog: Self::starter_catalog()?,
            lore: STARTER_LORE.trim().to_string(),
            ..Self::default()
        })
    }

    /// The bundled reference catalog.
    ///
    /// # Errors
    ///
    /// Returns a `JsonError` if the bundled catalog fails to parse.
    #[track_caller]
    pub fn starter_catalog() -> Result<ReferenceCatalog, JsonError> {
        let starter: StarterCatalog = serde_json::from_str(STARTER_CATALOG)
            .map_err(|e| JsonError::new(format!("Bundled starter catalog: {}", e)))?;
        Ok(ReferenceCatalog::from_parts(
            starter.characters,
            starter.locations,
        ))
    }
}
