//! Script pipeline and storyboard editing errors.

/// Specific error conditions for script and storyboard operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ScriptErrorKind {
    /// No scene carries this positional id
    #[display("No scene with id '{}'", _0)]
    SceneNotFound(String),
    /// Style name did not match any known style
    #[display("Unknown style '{}' (expected anime, aaa or pixar)", _0)]
    UnknownStyle(String),
    /// Text service returned nothing usable
    #[display("Text service returned an empty draft")]
    EmptyDraft,
    /// Alias points at an invalid handle
    #[display("Alias '{}' must map to a non-empty handle", _0)]
    InvalidAlias(String),
}

/// Error type for script and storyboard operations.
///
/// # Examples
///
/// ```
/// use hokusai_error::{ScriptError, ScriptErrorKind};
///
/// let err = ScriptError::new(ScriptErrorKind::SceneNotFound("07".to_string()));
/// assert!(format!("{}", err).contains("'07'"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Script Error: {} at line {} in {}", kind, line, file)]
pub struct ScriptError {
    /// The specific error condition
    pub kind: ScriptErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ScriptError {
    /// Create a new ScriptError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ScriptErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
