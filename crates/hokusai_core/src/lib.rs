//! Core data types for the Hokusai storyboard toolkit.
//!
//! This crate provides the data model shared by every Hokusai crate: the
//! reference catalog, scenes and their positional labels, per-scene
//! generation results, visual styles, presets, and the request types handed
//! to generation services.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod image;
mod preset;
mod project;
mod reference;
mod request;
mod result;
mod scene;
mod settings;
mod style;

pub use catalog::ReferenceCatalog;
pub use image::ImageData;
pub use preset::Preset;
pub use project::{Project, STARTER_LORE};
pub use reference::{ReferenceCategory, ReferenceEntry, normalize_handle};
pub use request::{DraftRequest, DraftRequestBuilder, RenderRequest};
pub use result::{GenerationResult, SceneStatus};
pub use scene::{
    SCENE_DURATION_SECS, Scene, SceneKey, format_timestamp, scene_label, time_range_label,
};
pub use settings::StoryboardSettings;
pub use style::StyleMode;
