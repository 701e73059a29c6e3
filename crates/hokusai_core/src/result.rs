//! Per-scene generation results.

use crate::ImageData;
use serde::{Deserialize, Serialize};

/// Observable state of a scene's generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SceneStatus {
    /// Never generated
    Idle,
    /// A request is in flight
    Pending,
    /// Last attempt produced an image
    Succeeded,
    /// Last attempt failed
    Failed,
}

/// Outcome of rendering one scene.
///
/// Results are values: every transition returns a new result and the store
/// replaces the old one whole. A previous image survives a failed retry.
///
/// # Examples
///
/// ```
/// use hokusai_core::{GenerationResult, ImageData, SceneStatus};
///
/// let idle = GenerationResult::default();
/// let pending = idle.begin();
/// assert_eq!(pending.status(), SceneStatus::Pending);
///
/// let done = GenerationResult::succeeded(ImageData::new(vec![1], "image/png"));
/// let failed = done.begin().fail("Model returned no image data.");
/// assert_eq!(failed.status(), SceneStatus::Failed);
/// assert!(failed.image.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// Last rendered frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageData>,
    /// A request is in flight
    #[serde(default)]
    pub is_pending: bool,
    /// Message from the last failed attempt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl GenerationResult {
    /// A finished result holding a fresh image.
    pub fn succeeded(image: ImageData) -> Self {
        Self {
            image: Some(image),
            is_pending: false,
            error_message: None,
        }
    }

    /// Mark a request as in flight, clearing the previous error.
    pub fn begin(&self) -> Self {
        Self {
            image: self.image.clone(),
            is_pending: true,
            error_message: None,
        }
    }

    /// Record a failure, keeping any earlier image.
    pub fn fail(&self, message: impl Into<String>) -> Self {
        Self {
            image: self.image.clone(),
            is_pending: false,
            error_message: Some(message.into()),
        }
    }

    /// Clear the pending flag without touching image or error.
    pub fn settle(&self) -> Self {
        Self {
            is_pending: false,
            ..self.clone()
        }
    }

    /// Derived status.
    pub fn status(&self) -> SceneStatus {
        if self.is_pending {
            SceneStatus::Pending
        } else if self.error_message.is_some() {
            SceneStatus::Failed
        } else if self.image.is_some() {
            SceneStatus::Succeeded
        } else {
            SceneStatus::Idle
        }
    }
}
