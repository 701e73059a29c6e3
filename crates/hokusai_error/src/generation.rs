//! Generation service error types and failure classification.

/// Message fragments that identify throttling or overload, matched case-insensitively.
const RATE_LIMIT_MARKERS: &[&str] = &[
    "429",
    "quota",
    "exhausted",
    "too many requests",
    "overloaded",
    "unavailable",
];

/// Generation service error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// API key not found in environment
    #[display("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,
    /// Service explicitly reported throttling
    #[display("Rate limited: {}", _0)]
    RateLimited(String),
    /// Prompt or output was blocked by the provider's safety filter
    #[display("Blocked by Safety Filter: {}", _0)]
    SafetyBlocked(String),
    /// HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    Http {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Transport-level failure (connect, timeout, TLS)
    #[display("Request failed: {}", _0)]
    Request(String),
    /// Service answered without the expected payload
    #[display("Empty response: {}", _0)]
    EmptyResponse(String),
    /// Service answered with a payload that could not be decoded
    #[display("Invalid response: {}", _0)]
    InvalidResponse(String),
    /// Any other service failure
    #[display("{}", _0)]
    Service(String),
}

/// How a failed external call should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum FailureClass {
    /// Throttling or overload; the batch driver cools down and retries.
    #[display("rate limited")]
    RateLimited,
    /// Generic or temporary failure; retried with backoff.
    #[display("transient")]
    Transient,
    /// Safety filter rejection; terminal.
    #[display("safety blocked")]
    SafetyBlocked,
    /// Will not succeed on retry.
    #[display("permanent")]
    Permanent,
}

impl GenerationErrorKind {
    /// Classify this error for retry and cooldown decisions.
    ///
    /// # Examples
    ///
    /// ```
    /// use hokusai_error::{FailureClass, GenerationErrorKind};
    ///
    /// let busy = GenerationErrorKind::Service("Resource has been exhausted (e.g. check quota).".into());
    /// assert_eq!(busy.failure_class(), FailureClass::RateLimited);
    ///
    /// let bad = GenerationErrorKind::Http { status_code: 400, message: "Bad request".into() };
    /// assert_eq!(bad.failure_class(), FailureClass::Permanent);
    /// ```
    pub fn failure_class(&self) -> FailureClass {
        match self {
            GenerationErrorKind::RateLimited(_) => return FailureClass::RateLimited,
            GenerationErrorKind::SafetyBlocked(_) => return FailureClass::SafetyBlocked,
            GenerationErrorKind::MissingApiKey => return FailureClass::Permanent,
            GenerationErrorKind::Http { status_code, .. } if matches!(*status_code, 429 | 503) => {
                return FailureClass::RateLimited;
            }
            _ => {}
        }

        let message = self.to_string().to_lowercase();
        if RATE_LIMIT_MARKERS.iter().any(|marker| message.contains(marker)) {
            return FailureClass::RateLimited;
        }

        match self {
            GenerationErrorKind::Http { status_code, .. } => match *status_code {
                408 => FailureClass::Transient,
                400..=499 => FailureClass::Permanent,
                _ => FailureClass::Transient,
            },
            GenerationErrorKind::InvalidResponse(_) => FailureClass::Permanent,
            _ => FailureClass::Transient,
        }
    }
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use hokusai_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::MissingApiKey);
/// assert!(format!("{}", err).contains("GEMINI_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Trait for errors that can be classified for retry and cooldown handling.
///
/// # Examples
///
/// ```
/// use hokusai_error::{GenerationError, GenerationErrorKind, RetryableError};
///
/// let err = GenerationError::new(GenerationErrorKind::Http {
///     status_code: 503,
///     message: "The model is overloaded".to_string(),
/// });
///
/// assert!(err.is_rate_limited());
/// assert!(!err.is_retryable());
/// ```
pub trait RetryableError {
    /// Classify this error.
    fn failure_class(&self) -> FailureClass;

    /// Returns true if the retry utility should back off and try again.
    fn is_retryable(&self) -> bool {
        self.failure_class() == FailureClass::Transient
    }

    /// Returns true if this error signals throttling or overload.
    fn is_rate_limited(&self) -> bool {
        self.failure_class() == FailureClass::RateLimited
    }
}

impl RetryableError for GenerationError {
    fn failure_class(&self) -> FailureClass {
        self.kind.failure_class()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status_code: u16, message: &str) -> GenerationErrorKind {
        GenerationErrorKind::Http {
            status_code,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_status_codes_classify() {
        assert_eq!(http(429, "slow down").failure_class(), FailureClass::RateLimited);
        assert_eq!(http(503, "try later").failure_class(), FailureClass::RateLimited);
        assert_eq!(http(500, "boom").failure_class(), FailureClass::Transient);
        assert_eq!(http(502, "bad gateway").failure_class(), FailureClass::Transient);
        assert_eq!(http(408, "timeout").failure_class(), FailureClass::Transient);
        assert_eq!(http(401, "unauthorized").failure_class(), FailureClass::Permanent);
        assert_eq!(http(404, "not found").failure_class(), FailureClass::Permanent);
    }

    #[test]
    fn test_message_markers_override_status() {
        assert_eq!(
            http(400, "Quota exceeded for metric").failure_class(),
            FailureClass::RateLimited
        );
        assert_eq!(
            GenerationErrorKind::Request("Service Unavailable".into()).failure_class(),
            FailureClass::RateLimited
        );
    }

    #[test]
    fn test_terminal_kinds() {
        assert_eq!(
            GenerationErrorKind::SafetyBlocked("PROHIBITED_CONTENT".into()).failure_class(),
            FailureClass::SafetyBlocked
        );
        assert_eq!(
            GenerationErrorKind::MissingApiKey.failure_class(),
            FailureClass::Permanent
        );
        assert_eq!(
            GenerationErrorKind::RateLimited("flagged".into()).failure_class(),
            FailureClass::RateLimited
        );
    }

    #[test]
    fn test_generic_failures_are_transient() {
        assert_eq!(
            GenerationErrorKind::Request("fetch failed".into()).failure_class(),
            FailureClass::Transient
        );
        assert_eq!(
            GenerationErrorKind::EmptyResponse("no image candidates".into()).failure_class(),
            FailureClass::Transient
        );
    }
}
