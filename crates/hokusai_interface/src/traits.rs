//! Capability traits for generation services and persistence backends.

use async_trait::async_trait;
use hokusai_core::{DraftRequest, ImageData, RenderRequest};
use hokusai_error::HokusaiResult;

/// A service that renders one storyboard frame.
///
/// Implementations may be slow, fallible and rate-limited. Errors should be
/// `GenerationError`s so callers can classify them.
#[async_trait]
pub trait ImageRenderer: Send + Sync {
    /// Render a frame from a compiled prompt and its reference sheets.
    async fn render(&self, request: &RenderRequest) -> HokusaiResult<ImageData>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gemini-2.5-flash-image").
    fn model_name(&self) -> &str;
}

/// A language model used to rewrite scenes and draft scripts.
#[async_trait]
pub trait TextService: Send + Sync {
    /// Rewrite a scene according to a free-form instruction.
    async fn rewrite(&self, text: &str, instruction: &str) -> HokusaiResult<String>;

    /// Produce script text from a drafting prompt.
    async fn draft_script(&self, request: &DraftRequest) -> HokusaiResult<String>;

    /// Model identifier.
    fn model_name(&self) -> &str;
}

/// Flat key-value persistence of JSON documents.
///
/// A missing key is not an error: `load` returns `Ok(None)`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Load the document stored under `key`.
    async fn load(&self, key: &str) -> HokusaiResult<Option<serde_json::Value>>;

    /// Store a document under `key`, replacing any previous value.
    async fn save(&self, key: &str, value: &serde_json::Value) -> HokusaiResult<()>;

    /// Remove every stored document.
    async fn clear(&self) -> HokusaiResult<()>;

    /// Backend name for logging.
    fn backend_name(&self) -> &'static str;
}
