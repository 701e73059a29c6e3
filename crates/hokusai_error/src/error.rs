//! Top-level error wrapper types.

use crate::{
    BuilderError, CatalogError, ConfigError, FailureClass, GenerationError, JsonError,
    PresetError, RetryableError, ScriptError, StorageError,
};

/// Every error condition the Hokusai crates can surface.
///
/// # Examples
///
/// ```
/// use hokusai_error::{HokusaiError, JsonError};
///
/// let err: HokusaiError = JsonError::new("unexpected end of input").into();
/// assert!(format!("{}", err).contains("JSON Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum HokusaiErrorKind {
    /// Reference catalog validation or lookup error
    #[from(CatalogError)]
    Catalog(CatalogError),
    /// Script or storyboard error
    #[from(ScriptError)]
    Script(ScriptError),
    /// Preset library error
    #[from(PresetError)]
    Preset(PresetError),
    /// Image or text generation error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Persistence error
    #[from(StorageError)]
    Storage(StorageError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
}

/// Hokusai error with kind discrimination.
///
/// # Examples
///
/// ```
/// use hokusai_error::{HokusaiResult, ConfigError};
///
/// fn might_fail() -> HokusaiResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Hokusai Error: {}", _0)]
pub struct HokusaiError(Box<HokusaiErrorKind>);

impl HokusaiError {
    /// Create a new error from a kind.
    pub fn new(kind: HokusaiErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &HokusaiErrorKind {
        &self.0
    }

    /// Message suitable for storing on a scene, without location details.
    ///
    /// # Examples
    ///
    /// ```
    /// use hokusai_error::{GenerationError, GenerationErrorKind, HokusaiError};
    ///
    /// let err: HokusaiError =
    ///     GenerationError::new(GenerationErrorKind::SafetyBlocked("SAFETY".into())).into();
    /// assert_eq!(err.user_message(), "Blocked by Safety Filter: SAFETY");
    /// ```
    pub fn user_message(&self) -> String {
        match self.kind() {
            HokusaiErrorKind::Catalog(e) => e.kind.to_string(),
            HokusaiErrorKind::Script(e) => e.kind.to_string(),
            HokusaiErrorKind::Preset(e) => e.kind.to_string(),
            HokusaiErrorKind::Generation(e) => e.kind.to_string(),
            HokusaiErrorKind::Storage(e) => e.kind.to_string(),
            HokusaiErrorKind::Config(e) => e.message.clone(),
            HokusaiErrorKind::Json(e) => e.message.clone(),
            HokusaiErrorKind::Builder(e) => e.kind().to_string(),
        }
    }
}

// Generic From implementation for any type that converts to HokusaiErrorKind
impl<T> From<T> for HokusaiError
where
    T: Into<HokusaiErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

impl RetryableError for HokusaiError {
    fn failure_class(&self) -> FailureClass {
        match self.kind() {
            HokusaiErrorKind::Generation(e) => e.failure_class(),
            _ => FailureClass::Permanent,
        }
    }
}

/// Result type for Hokusai operations.
pub type HokusaiResult<T> = std::result::Result<T, HokusaiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CatalogErrorKind, GenerationErrorKind};

    #[test]
    fn test_generation_errors_keep_their_class() {
        let err: HokusaiError = GenerationError::new(GenerationErrorKind::Http {
            status_code: 429,
            message: "Too Many Requests".to_string(),
        })
        .into();
        assert!(err.is_rate_limited());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_non_generation_errors_are_permanent() {
        let err: HokusaiError =
            CatalogError::new(CatalogErrorKind::NotFound("zorbie".to_string())).into();
        assert_eq!(err.failure_class(), FailureClass::Permanent);
        assert_eq!(err.user_message(), "No reference with handle '@zorbie'");
    }
}
