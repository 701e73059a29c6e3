//! Requests handed to generation services.

use crate::{ImageData, StyleMode};
use hokusai_error::{BuilderError, BuilderErrorKind};

/// Everything an image renderer needs for one frame.
///
/// # Examples
///
/// ```
/// use hokusai_core::{RenderRequest, StyleMode};
///
/// let request = RenderRequest {
///     prompt: "ADD SHONEN ANIME, 4K, a forest at dawn".to_string(),
///     references: vec![],
///     style: StyleMode::Anime,
/// };
/// assert!(request.references.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    /// Compiled and sanitized prompt text
    pub prompt: String,
    /// Reference sheets for every resolved handle that has one
    pub references: Vec<ImageData>,
    /// Style whose render instruction accompanies the prompt
    pub style: StyleMode,
}

/// A script-drafting prompt for a text service.
///
/// # Examples
///
/// ```
/// use hokusai_core::DraftRequest;
///
/// let request = DraftRequest::builder()
///     .prompt("Write Sequence 1")
///     .max_output_tokens(8192_u32)
///     .build()
///     .unwrap();
/// assert_eq!(*request.max_output_tokens(), Some(8192));
///
/// assert!(DraftRequest::builder().build().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct DraftRequest {
    /// Full prompt text
    prompt: String,
    /// Output cap for long drafts
    #[builder(default, setter(strip_option))]
    max_output_tokens: Option<u32>,
}

impl DraftRequest {
    /// Start building a draft request.
    pub fn builder() -> DraftRequestBuilder {
        DraftRequestBuilder::default()
    }
}

impl DraftRequestBuilder {
    /// Build the DraftRequest.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if no prompt was set.
    #[track_caller]
    pub fn build(&self) -> Result<DraftRequest, BuilderError> {
        self.build_internal()
            .map_err(|e| BuilderError::new(BuilderErrorKind::MissingField(e.to_string())))
    }
}
