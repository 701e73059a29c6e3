//! Error types for the Hokusai storyboard toolkit.
//!
//! This crate provides the foundation error types used throughout the Hokusai workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Generation failures are additionally classified by [`FailureClass`] so the
//! retry utility and the batch driver can decide between backing off, cooling
//! down, and giving up.
//!
//! # Examples
//!
//! ```
//! use hokusai_error::{HokusaiResult, StorageError, StorageErrorKind};
//!
//! fn read_state() -> HokusaiResult<String> {
//!     Err(StorageError::new(StorageErrorKind::FileRead("scenes.json".to_string())))?
//! }
//!
//! assert!(read_state().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod catalog;
mod config;
mod error;
mod generation;
mod json;
mod preset;
mod script;
mod storage;

pub use builder::{BuilderError, BuilderErrorKind};
pub use catalog::{CatalogError, CatalogErrorKind};
pub use config::ConfigError;
pub use error::{HokusaiError, HokusaiErrorKind, HokusaiResult};
pub use generation::{FailureClass, GenerationError, GenerationErrorKind, RetryableError};
pub use json::JsonError;
pub use preset::{PresetError, PresetErrorKind};
pub use script::{ScriptError, ScriptErrorKind};
pub use storage::{StorageError, StorageErrorKind};
