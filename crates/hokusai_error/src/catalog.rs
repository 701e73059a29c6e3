//! Reference catalog error types.

/// Specific error conditions for reference catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum CatalogErrorKind {
    /// Handle is empty after normalization
    #[display("Handle must contain at least one letter or digit")]
    EmptyHandle,
    /// Display name missing
    #[display("Reference '@{}' requires a name", _0)]
    MissingName(String),
    /// Visual description missing
    #[display("Reference '@{}' requires a description", _0)]
    MissingDescription(String),
    /// Handle already used by another entry
    #[display("Handle '@{}' is already in use", _0)]
    DuplicateHandle(String),
    /// No entry with this handle
    #[display("No reference with handle '@{}'", _0)]
    NotFound(String),
}

/// Error type for reference catalog operations.
///
/// # Examples
///
/// ```
/// use hokusai_error::{CatalogError, CatalogErrorKind};
///
/// let err = CatalogError::new(CatalogErrorKind::DuplicateHandle("auraayo".to_string()));
/// assert!(format!("{}", err).contains("@auraayo"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Catalog Error: {} at line {} in {}", kind, line, file)]
pub struct CatalogError {
    /// The specific error condition
    pub kind: CatalogErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl CatalogError {
    /// Create a new CatalogError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CatalogErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
