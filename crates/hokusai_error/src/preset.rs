//! Preset library error types.

/// Specific error conditions for preset operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PresetErrorKind {
    /// Preset name missing or blank
    #[display("Preset name cannot be empty")]
    EmptyName,
    /// Document is not shaped like a preset
    #[display("Invalid preset file format: {}", _0)]
    InvalidDocument(String),
    /// No preset with this id
    #[display("Preset '{}' not found", _0)]
    NotFound(String),
}

/// Error type for preset operations.
///
/// # Examples
///
/// ```
/// use hokusai_error::{PresetError, PresetErrorKind};
///
/// let err = PresetError::new(PresetErrorKind::EmptyName);
/// assert!(format!("{}", err).contains("cannot be empty"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Preset Error: {} at line {} in {}", kind, line, file)]
pub struct PresetError {
    /// The specific error condition
    pub kind: PresetErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PresetError {
    /// Create a new PresetError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PresetErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
