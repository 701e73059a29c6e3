//! Directory-backed key-value store.
//!
//! Each key is one pretty-printed JSON file: `{dir}/{key}.json`.

use async_trait::async_trait;
use derive_getters::Getters;
use hokusai_error::{HokusaiResult, JsonError, StorageError, StorageErrorKind};
use hokusai_interface::KeyValueStore;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Filesystem storage backend.
///
/// Writes go to a temporary file that is renamed into place, so a crash never
/// leaves a half-written document behind.
#[derive(Debug, Clone, Getters)]
pub struct FileSystemStore {
    /// Directory holding one JSON file per key
    dir: PathBuf,
}

impl FileSystemStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[instrument(skip(dir))]
    pub fn new(dir: impl Into<PathBuf>) -> HokusaiResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        })?;

        tracing::info!(path = %dir.display(), "Opened project directory");
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> HokusaiResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::new(StorageErrorKind::InvalidKey(key.to_string())).into());
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn is_document(path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "json")
    }
}

#[async_trait]
impl KeyValueStore for FileSystemStore {
    #[instrument(skip(self))]
    async fn load(&self, key: &str) -> HokusaiResult<Option<serde_json::Value>> {
        let path = self.path_for(key)?;

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No stored document");
                return Ok(None);
            }
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        };

        let value = serde_json::from_str(&contents).map_err(|e| {
            JsonError::new(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        debug!(bytes = contents.len(), "Loaded document");
        Ok(Some(value))
    }

    #[instrument(skip(self, value))]
    async fn save(&self, key: &str, value: &serde_json::Value) -> HokusaiResult<()> {
        let path = self.path_for(key)?;
        let contents = serde_json::to_string_pretty(value)
            .map_err(|e| JsonError::new(format!("Failed to serialize {}: {}", key, e)))?;

        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &contents).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;
        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;

        debug!(bytes = contents.len(), "Saved document");
        Ok(())
    }

    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn clear(&self) -> HokusaiResult<()> {
        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                self.dir.display(),
                e
            )))
        })?;

        let mut removed = 0usize;
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                self.dir.display(),
                e
            )))
        })? {
            let path = entry.path();
            if Self::is_document(&path) {
                tokio::fs::remove_file(&path).await.map_err(|e| {
                    StorageError::new(StorageErrorKind::FileRemove(format!(
                        "{}: {}",
                        path.display(),
                        e
                    )))
                })?;
                removed += 1;
            }
        }

        tracing::info!(removed, "Cleared project directory");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
