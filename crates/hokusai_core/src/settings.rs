//! Authoring toggles that shape compiled prompts and drafts.

use crate::StyleMode;
use serde::{Deserialize, Serialize};

/// Storyboard-wide authoring settings.
///
/// # Examples
///
/// ```
/// use hokusai_core::{StoryboardSettings, StyleMode};
///
/// let settings = StoryboardSettings::default()
///     .with_style(StyleMode::Aaa)
///     .with_no_music(true);
/// assert!(!settings.voice_tags);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_setters::Setters,
)]
#[serde(rename_all = "camelCase", default)]
#[setters(prefix = "with_")]
pub struct StoryboardSettings {
    /// Visual style injected into prompts
    pub style: StyleMode,
    /// Append the sound-effects-only tag to every scene
    pub no_music: bool,
    /// Ask drafts to include voice direction before dialogue
    pub voice_tags: bool,
}
