//! Scenes and their positional labels.

use serde::{Deserialize, Serialize};

/// Screen time covered by one scene.
pub const SCENE_DURATION_SECS: u32 = 15;

/// Stable identity of a scene inside a storyboard.
///
/// Keys are handed out in creation order and never reused, so they survive
/// every reorder, insert and delete. Positional ids are derived from them.
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
    derive_more::Display,
)]
#[display("scene#{}", _0)]
pub struct SceneKey(u64);

impl SceneKey {
    /// Wrap a raw key value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw key value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The key issued after this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

/// One timed unit of the storyboard.
///
/// `id` and `time_range` are positional labels recomputed on every reindex.
/// `referenced_ids` is an advisory lexical scan taken at segmentation time.
///
/// # Examples
///
/// ```
/// use hokusai_core::Scene;
///
/// let scene = Scene::at(2, 0, "Sequence 3: The Duel", vec!["auraayo".to_string()]);
/// assert_eq!(scene.id, "03");
/// assert_eq!(scene.time_range, "00:30 - 00:45");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Zero-padded 1-based ordinal at last reindex
    pub id: String,
    /// `MM:SS - MM:SS` display range
    pub time_range: String,
    /// Handles found in the content
    #[serde(default)]
    pub referenced_ids: Vec<String>,
    /// Freeform script text
    pub content: String,
}

impl Scene {
    /// Create a scene whose labels match `ordinal_index` (0-based) on a timeline
    /// starting at `offset_secs`.
    pub fn at(
        ordinal_index: usize,
        offset_secs: u32,
        content: impl Into<String>,
        referenced_ids: Vec<String>,
    ) -> Self {
        let start = offset_secs + ordinal_index as u32 * SCENE_DURATION_SECS;
        Self {
            id: scene_label(ordinal_index + 1),
            time_range: time_range_label(start),
            referenced_ids,
            content: content.into(),
        }
    }

    /// Numeric value of the positional id, if it parses.
    pub fn ordinal(&self) -> Option<usize> {
        self.id.parse().ok()
    }
}

/// Zero-padded label for a 1-based ordinal.
///
/// # Examples
///
/// ```
/// use hokusai_core::scene_label;
///
/// assert_eq!(scene_label(7), "07");
/// assert_eq!(scene_label(123), "123");
/// ```
pub fn scene_label(ordinal: usize) -> String {
    format!("{ordinal:02}")
}

/// Format seconds as `MM:SS`.
///
/// # Examples
///
/// ```
/// use hokusai_core::format_timestamp;
///
/// assert_eq!(format_timestamp(75), "01:15");
/// ```
pub fn format_timestamp(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Display range for a scene starting at `start_secs`.
///
/// # Examples
///
/// ```
/// use hokusai_core::time_range_label;
///
/// assert_eq!(time_range_label(45), "00:45 - 01:00");
/// ```
pub fn time_range_label(start_secs: u32) -> String {
    format!(
        "{} - {}",
        format_timestamp(start_secs),
        format_timestamp(start_secs + SCENE_DURATION_SECS)
    )
}
