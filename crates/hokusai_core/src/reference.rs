//! Character and location reference entries.

use crate::ImageData;
use serde::{Deserialize, Serialize};

/// Whether a reference depicts a character or a location.
///
/// # Examples
///
/// ```
/// use hokusai_core::ReferenceCategory;
/// use std::str::FromStr;
///
/// assert_eq!(ReferenceCategory::from_str("Location").unwrap(), ReferenceCategory::Location);
/// assert_eq!(ReferenceCategory::Character.to_string(), "character");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReferenceCategory {
    /// A recurring character; descriptors ask the renderer to copy the outfit
    Character,
    /// A background or set
    Location,
}

/// A named visual reference that scenes can mention by handle, name or alias.
///
/// # Examples
///
/// ```
/// use hokusai_core::ReferenceEntry;
///
/// let ayo = ReferenceEntry::character("auraayo", "Ayo", "Young man with red skin, spiky white hair.")
///     .with_voice("Energetic, gritty Shonen Hero voice")
///     .with_color("#f472b6");
///
/// assert_eq!(ayo.voice.as_deref(), Some("Energetic, gritty Shonen Hero voice"));
/// assert!(ayo.image.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_setters::Setters)]
#[serde(rename_all = "camelCase")]
#[setters(prefix = "with_", strip_option, into)]
pub struct ReferenceEntry {
    /// Unique lowercase alphanumeric handle, written `@id` in scripts
    #[setters(skip)]
    pub id: String,
    /// Display name used in dialogue
    pub name: String,
    /// Character or location
    #[serde(rename = "type")]
    #[setters(skip)]
    pub category: ReferenceCategory,
    /// Visual description substituted into prompts
    pub description: String,
    /// Voice direction used when drafting dialogue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    /// Display colour for editing surfaces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Reference sheet attached to render requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageData>,
}

impl ReferenceEntry {
    /// Create an entry without voice, colour or image.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: ReferenceCategory,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            description: description.into(),
            voice: None,
            color: None,
            image: None,
        }
    }

    /// Create a character entry.
    pub fn character(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(id, name, ReferenceCategory::Character, description)
    }

    /// Create a location entry.
    pub fn location(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(id, name, ReferenceCategory::Location, description)
    }

    /// Returns true for character entries.
    pub fn is_character(&self) -> bool {
        self.category == ReferenceCategory::Character
    }
}

/// Normalize user input into a handle: lowercase ASCII letters and digits only.
///
/// # Examples
///
/// ```
/// use hokusai_core::normalize_handle;
///
/// assert_eq!(normalize_handle("@Jax Iron!"), "jaxiron");
/// assert_eq!(normalize_handle("  "), "");
/// ```
pub fn normalize_handle(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
