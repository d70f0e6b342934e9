// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for storage operations.

use std::fmt;

/// Classifies what went wrong in a storage or replica operation.
///
/// Callers branch on the kind; the full cause chain is available through the
/// error's [`Display`](std::fmt::Display) output and [`std::error::Error::source()`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A required configuration key was absent.
    MissingConfig,
    /// The configured backend type has no registered constructor.
    UnsupportedBackend,
    /// A configuration value could not be parsed.
    InvalidConfig,
    /// A backend failed to initialize.
    BackendConstruction,
    /// The local store failed an operation it should never fail.
    LocalStore,
    /// A remote read failed and the local fallback could not serve the key either.
    FallbackFailed,
    /// A backend operation failed.
    Backend,
}

impl ErrorKind {
    /// Returns a short, stable name for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingConfig => "missing configuration",
            Self::UnsupportedBackend => "unsupported backend",
            Self::InvalidConfig => "invalid configuration",
            Self::BackendConstruction => "backend construction failed",
            Self::LocalStore => "local store failure",
            Self::FallbackFailed => "remote read and local fallback both failed",
            Self::Backend => "backend operation failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error from a storage operation.
///
/// The error carries an [`ErrorKind`] and, usually, the underlying cause. Context
/// lines can be stacked on top with [`ohno::EnrichableExt::enrich`].
///
/// # Example
///
/// ```
/// use storage_backend::{Error, ErrorKind};
///
/// let error = Error::backend("connection reset");
/// assert_eq!(error.kind(), ErrorKind::Backend);
/// assert!(error.to_string().contains("connection reset"));
/// ```
#[ohno::error]
#[display("{kind}")]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// Creates an error of the given kind with an underlying cause.
    ///
    /// This is the public API for creating storage errors from external crates.
    pub fn with_cause(kind: ErrorKind, cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(kind, cause)
    }

    /// Creates an error of the given kind without a cause.
    #[must_use]
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self::new(kind)
    }

    /// Creates an error for a failed backend operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use storage_backend::{Error, ErrorKind};
    ///
    /// let error = Error::backend("disk full");
    /// assert_eq!(error.kind(), ErrorKind::Backend);
    /// ```
    pub fn backend(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::Backend, cause)
    }

    /// Creates an error for a backend that failed to initialize.
    pub fn construction(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::BackendConstruction, cause)
    }

    /// Creates an error for a required configuration key that is absent.
    #[must_use]
    pub fn missing_config(key: &str) -> Self {
        Self::caused_by(ErrorKind::MissingConfig, format!("no '{key}' specified in config"))
    }

    /// Returns the kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// A specialized [`Result`] type for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use ohno::EnrichableExt;

    use super::*;

    #[test]
    fn error_display_contains_kind_and_cause() {
        let error = Error::backend("socket closed");
        let display = error.to_string();
        assert!(display.contains(ErrorKind::Backend.as_str()), "got: {display}");
        assert!(display.contains("socket closed"), "got: {display}");
    }

    #[test]
    fn error_debug_contains_cause_message() {
        let error = Error::with_cause(ErrorKind::LocalStore, "test error message");
        let debug_str = format!("{error:?}");
        assert!(
            debug_str.contains("test error message"),
            "debug output should contain the cause message, got: {debug_str}"
        );
    }

    #[test]
    fn missing_config_names_the_key() {
        let error = Error::missing_config("storage_type");
        assert_eq!(error.kind(), ErrorKind::MissingConfig);
        assert!(error.to_string().contains("'storage_type'"));
    }

    #[test]
    fn from_kind_has_no_source() {
        let error = Error::from_kind(ErrorKind::UnsupportedBackend);
        assert_eq!(error.kind(), ErrorKind::UnsupportedBackend);
        assert!(std::error::Error::source(&error).is_none());
    }

    #[test]
    fn enrichment_is_rendered() {
        let error = Error::backend("timeout").enrich("while reading key \"a\"");
        assert!(error.to_string().contains("while reading key \"a\""));
    }

    #[test]
    fn result_type_alias_propagates_errors() {
        fn returns_err() -> Result<i32> {
            Err(Error::backend("expected failure"))
        }

        let err = returns_err().expect_err("should return an error");
        assert!(format!("{err}").contains("expected failure"));
    }
}
