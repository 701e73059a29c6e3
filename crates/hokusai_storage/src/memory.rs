//! In-memory key-value store.

use async_trait::async_trait;
use hokusai_error::HokusaiResult;
use hokusai_interface::KeyValueStore;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Volatile storage backend, useful for tests and dry runs.
///
/// # Examples
///
/// ```
/// use hokusai_interface::KeyValueStore;
/// use hokusai_storage::InMemoryStore;
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() {
/// let store = InMemoryStore::new();
/// store.save("lore", &json!("A quiet village.")).await.unwrap();
/// assert_eq!(store.load("lore").await.unwrap(), Some(json!("A quiet village.")));
///
/// store.clear().await.unwrap();
/// assert_eq!(store.load("lore").await.unwrap(), None);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<BTreeMap<String, serde_json::Value>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn load(&self, key: &str) -> HokusaiResult<Option<serde_json::Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &serde_json::Value) -> HokusaiResult<()> {
        debug!(key, "Storing document in memory");
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn clear(&self) -> HokusaiResult<()> {
        self.entries.write().await.clear();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
