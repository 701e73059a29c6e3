//! Logical keys a project is persisted under.

/// Fixed persistence keys.
///
/// # Examples
///
/// ```
/// use hokusai_storage::StorageKey;
///
/// assert_eq!(StorageKey::Generations.as_ref(), "generations");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum StorageKey {
    /// Character reference entries
    Characters,
    /// Location reference entries
    Locations,
    /// Scenes in storyboard order
    Scenes,
    /// Generation results keyed by scene id
    Generations,
    /// World lore text
    Lore,
    /// Saved catalog presets
    Presets,
    /// Authoring toggles
    Settings,
}
