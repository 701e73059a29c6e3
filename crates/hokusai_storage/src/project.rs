//! Typed project persistence over a key-value store.

use crate::StorageKey;
use hokusai_core::{GenerationResult, Preset, Project, ReferenceEntry, Scene, StoryboardSettings};
use hokusai_error::{HokusaiResult, JsonError};
use hokusai_interface::KeyValueStore;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Loads and saves whole projects under the fixed [`StorageKey`]s.
///
/// Absent keys fall back to the starter project, so a fresh directory opens
/// with the bundled cast and lore.
///
/// # Examples
///
/// ```
/// use hokusai_storage::{InMemoryStore, ProjectStore};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let store = ProjectStore::new(Arc::new(InMemoryStore::new()));
/// let mut project = store.load_project().await.unwrap();
/// project.lore = "A quiet village.".to_string();
/// store.save_project(&project).await.unwrap();
///
/// assert_eq!(store.load_project().await.unwrap().lore, "A quiet village.");
/// # }
/// ```
#[derive(Clone)]
pub struct ProjectStore {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for ProjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectStore")
            .field("backend", &self.backend.backend_name())
            .finish()
    }
}

impl ProjectStore {
    /// Wrap a key-value backend.
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Load one typed document.
    ///
    /// # Errors
    ///
    /// Returns backend errors, or a `JsonError` if the document has the wrong shape.
    pub async fn load<T: DeserializeOwned>(&self, key: StorageKey) -> HokusaiResult<Option<T>> {
        match self.backend.load(key.as_ref()).await? {
            Some(value) => {
                let typed = serde_json::from_value(value)
                    .map_err(|e| JsonError::new(format!("Stored {} is invalid: {}", key, e)))?;
                Ok(Some(typed))
            }
            None => Ok(None),
        }
    }

    /// Save one typed document.
    ///
    /// # Errors
    ///
    /// Returns backend errors, or a `JsonError` if serialization fails.
    pub async fn save<T: Serialize>(&self, key: StorageKey, value: &T) -> HokusaiResult<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| JsonError::new(format!("Failed to serialize {}: {}", key, e)))?;
        self.backend.save(key.as_ref(), &value).await
    }

    /// Hydrate a project, falling back to starter data for absent keys.
    ///
    /// # Errors
    ///
    /// Returns the first backend or decoding error.
    #[instrument(skip(self), fields(backend = self.backend.backend_name()))]
    pub async fn load_project(&self) -> HokusaiResult<Project> {
        let starter = Project::starter()?;
        let (starter_characters, starter_locations) = starter.catalog.into_parts();

        let characters: BTreeMap<String, ReferenceEntry> = self
            .load(StorageKey::Characters)
            .await?
            .unwrap_or(starter_characters);
        let locations: BTreeMap<String, ReferenceEntry> = self
            .load(StorageKey::Locations)
            .await?
            .unwrap_or(starter_locations);
        let scenes: Vec<Scene> = self.load(StorageKey::Scenes).await?.unwrap_or_default();
        let generations: BTreeMap<String, GenerationResult> = self
            .load(StorageKey::Generations)
            .await?
            .unwrap_or_default();
        let lore: String = self
            .load(StorageKey::Lore)
            .await?
            .unwrap_or(starter.lore);
        let presets: Vec<Preset> = self.load(StorageKey::Presets).await?.unwrap_or_default();
        let settings: StoryboardSettings = self
            .load(StorageKey::Settings)
            .await?
            .unwrap_or_default();

        debug!(
            characters = characters.len(),
            locations = locations.len(),
            scenes = scenes.len(),
            presets = presets.len(),
            "Loaded project"
        );

        Ok(Project {
            catalog: hokusai_core::ReferenceCatalog::from_parts(characters, locations),
            scenes,
            generations,
            lore,
            presets,
            settings,
        })
    }

    /// Write every collection of the project.
    ///
    /// # Errors
    ///
    /// Returns the first backend or encoding error.
    #[instrument(skip(self, project), fields(backend = self.backend.backend_name(), scenes = project.scenes.len()))]
    pub async fn save_project(&self, project: &Project) -> HokusaiResult<()> {
        self.save(StorageKey::Characters, project.catalog.characters())
            .await?;
        self.save(StorageKey::Locations, project.catalog.locations())
            .await?;
        self.save(StorageKey::Scenes, &project.scenes).await?;
        self.save(StorageKey::Generations, &project.generations)
            .await?;
        self.save(StorageKey::Lore, &project.lore).await?;
        self.save(StorageKey::Presets, &project.presets).await?;
        self.save(StorageKey::Settings, &project.settings).await?;
        debug!("Saved project");
        Ok(())
    }

    /// Wipe all stored state.
    ///
    /// # Errors
    ///
    /// Returns backend errors.
    #[instrument(skip(self), fields(backend = self.backend.backend_name()))]
    pub async fn clear(&self) -> HokusaiResult<()> {
        self.backend.clear().await?;
        info!("Project state cleared");
        Ok(())
    }
}
