//! Hokusai - storyboard tool for anime scripts
//!
//! Hokusai turns a freeform script into an ordered storyboard of timed scenes
//! and renders each scene into a frame that stays visually consistent with a
//! catalog of character and location reference sheets.
//!
//! # Features
//!
//! - **Script Pipeline**: segmentation, reference resolution, prompt compilation
//!   and sanitization
//! - **Structural Editing**: insert, move and delete scenes without losing
//!   generation results
//! - **Batch Generation**: sequential rendering with rate-limit cooldowns and
//!   cooperative cancellation
//! - **Script Assistant**: rewrite scenes, continue the story, draft episodes
//! - **Presets**: snapshot, import and export the reference catalog
//! - **Persistence**: project state as JSON documents on disk
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use hokusai::{AliasTable, GeminiClient, GenerationScheduler, ImportMode, Workspace};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = hokusai::HokusaiConfig::load()?;
//!     let mut workspace = Workspace::default();
//!     workspace.import_script("Sequence 1: Ayo enters the arena.", ImportMode::Replace, &AliasTable::builtin());
//!
//!     let renderer = Arc::new(GeminiClient::new(&config.generation)?);
//!     let scheduler = GenerationScheduler::new(workspace.into_shared(), renderer);
//!     let outcome = scheduler.generate_one("01").await;
//!     println!("rendered: {}", outcome.success);
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `gemini` - Google Gemini renderer and text service (default)
//! - `api` - run tests that call the real API
//!
//! # Architecture
//!
//! - `hokusai_error` - Error types and failure classification
//! - `hokusai_core` - Scenes, references, presets, settings
//! - `hokusai_interface` - Renderer, text service and storage traits
//! - `hokusai_rate_limit` - Configuration, retry and request pacing
//! - `hokusai_storage` - Key-value project persistence
//! - `hokusai_script` - Segmenter, resolver, prompt compiler, drafting prompts
//! - `hokusai_board` - Storyboard, scheduler, batch driver, assistant, presets
//! - `hokusai_models` - Provider implementations
//!
//! This crate (`hokusai`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod session;

pub use session::Session;

// Re-export error types
pub use hokusai_error::{
    BuilderError, BuilderErrorKind, CatalogError, CatalogErrorKind, ConfigError, FailureClass,
    GenerationError, GenerationErrorKind, HokusaiError, HokusaiErrorKind, HokusaiResult,
    JsonError, PresetError, PresetErrorKind, RetryableError, ScriptError, ScriptErrorKind,
    StorageError, StorageErrorKind,
};

// Re-export core types
pub use hokusai_core::{
    DraftRequest, GenerationResult, ImageData, Preset, Project, ReferenceCatalog,
    ReferenceCategory, ReferenceEntry, RenderRequest, SCENE_DURATION_SECS, Scene, SceneKey,
    SceneStatus, StoryboardSettings, StyleMode, normalize_handle, scene_label, time_range_label,
};

// Re-export traits
pub use hokusai_interface::{ImageRenderer, KeyValueStore, TextService};

// Re-export configuration, retry and pacing
pub use hokusai_rate_limit::{
    BatchConfig, GenerationConfig, HokusaiConfig, RequestLimiter, RetryPolicy, StorageConfig,
    with_backoff, with_backoff_classified,
};

// Re-export storage
pub use hokusai_storage::{FileSystemStore, InMemoryStore, ProjectStore, StorageKey};

// Re-export the script pipeline
pub use hokusai_script::{
    AliasTable, DISALLOWED_TERMS, NO_MUSIC_TAG, ReferenceResolver, compile, descriptor,
    inject_style, placeholder_content, resolve_mentioned_ids, rewrite_sequence_heading, sanitize,
    segment, toggle_no_music,
};

// Re-export storyboard editing and generation
pub use hokusai_board::{
    BatchDriver, BatchProgress, BatchReport, CancelFlag, Direction, GenerationOutcome,
    GenerationScheduler, ImportMode, Placement, PresetLibrary, RATE_LIMITED_MESSAGE,
    ScriptAssistant, SharedWorkspace, Storyboard, Workspace, reindex,
};

// Re-export providers
#[cfg(feature = "gemini")]
pub use hokusai_models::GeminiClient;
