//! Error types for the shares-cli library.
//!
//! All failures are terminal for the run in which they occur: the
//! verification pipeline never retries, never skips a file, and never
//! persists a partial report. Errors carry enough context to be surfaced
//! to the operator as a single human-readable message.

use std::io;

use thiserror::Error;

/// Main result type for shares-cli operations.
pub type Result<T> = std::result::Result<T, SharesError>;

/// Comprehensive error type for all shares-cli operations.
#[derive(Error, Debug)]
pub enum SharesError {
    /// I/O related errors (file operations, stdout, etc.)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Reference code table unreadable or its row stream failed
    #[error("Reference load error: {message}")]
    Reference {
        /// Error description
        message: String,
        /// Path of the reference table, when known
        path: Option<String>,
    },

    /// Directory or file unreadable, or a delete failed
    #[error("Filesystem error: {message}")]
    FileSystem {
        /// Error description
        message: String,
        /// Path that caused the error, when known
        path: Option<String>,
    },

    /// Validation errors for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// FHIR server transport errors
    #[error("HTTP error: {message}")]
    Http {
        /// Error description
        message: String,
        /// Response status code, when the server answered
        status: Option<u16>,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error description
        message: String,
    },
}

impl SharesError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new reference load error
    pub fn reference(message: impl Into<String>) -> Self {
        Self::Reference {
            message: message.into(),
            path: None,
        }
    }

    /// Create a new reference load error with the table path
    pub fn reference_at(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Reference {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a new filesystem error
    pub fn filesystem(message: impl Into<String>) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: None,
        }
    }

    /// Create a new filesystem error with path context
    pub fn filesystem_at(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new validation error with field context
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new HTTP error
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Http {
            message: message.into(),
            status,
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Implement From traits for common error types
impl From<io::Error> for SharesError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for SharesError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

impl From<csv::Error> for SharesError {
    fn from(err: csv::Error) -> Self {
        Self::Reference {
            message: format!("CSV row stream failed: {err}"),
            path: None,
        }
    }
}

impl From<reqwest::Error> for SharesError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        Self::Http {
            message: err.to_string(),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SharesError::reference("table unreadable");
        assert!(matches!(err, SharesError::Reference { .. }));

        let err = SharesError::filesystem_at("cannot delete", "patient1.json");
        assert!(matches!(err, SharesError::FileSystem { path: Some(_), .. }));
    }

    #[test]
    fn test_validation_field_error() {
        let err = SharesError::validation_field("missing library declaration", "library");

        if let SharesError::Validation { message, field } = err {
            assert_eq!(message, "missing library declaration");
            assert_eq!(field, Some("library".to_string()));
        } else {
            panic!("Expected Validation error");
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: SharesError = io_err.into();

        assert!(matches!(err, SharesError::Io { .. }));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("invalid json").unwrap_err();
        let err: SharesError = json_err.into();

        assert!(matches!(err, SharesError::Serialization { .. }));
    }

    #[test]
    fn test_error_display_formatting() {
        let err = SharesError::reference_at("missing header row", "codes.csv");
        let display = format!("{}", err);
        assert!(display.contains("Reference load error"));
        assert!(display.contains("missing header row"));
    }
}
