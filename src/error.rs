//! Error types for ciao-contrib operations.
//!
//! This module defines [`CiaoError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `CiaoError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `CiaoError::Other`) for unexpected errors
//! - Validation errors name the allowed values so users can fix the call

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Classification of a failed version-manifest download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    /// The server answered 404.
    NotFound,
    /// DNS lookup or connection failed.
    Unreachable,
    /// Any other HTTP status, or a timeout.
    Http,
    /// Anything the classifier could not place.
    Other,
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not found",
            Self::Unreachable => "unreachable",
            Self::Http => "http",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}

/// Core error type for ciao-contrib operations.
#[derive(Debug, Error)]
pub enum CiaoError {
    /// A required installation file is missing.
    #[error("{message}")]
    NotFound { message: String },

    /// A version file name has no recognizable package suffix.
    #[error("Unrecognized file name: {name}")]
    Name { name: String },

    /// Malformed `key value` text.
    #[error("{message}")]
    Parse { message: String },

    /// The same key appeared twice in a version listing.
    #[error("Multiple copies of {key} found.")]
    DuplicateKey { key: String },

    /// The version manifest could not be downloaded.
    #[error("{message}")]
    Network {
        kind: NetworkErrorKind,
        message: String,
    },

    /// A required instrument parameter was not supplied.
    #[error("{message}")]
    MissingParameter { message: String },

    /// An instrument parameter is not one of the allowed values.
    #[error("{message}")]
    InvalidParameter { message: String },

    /// The instrument is not suitable for spectral work.
    ///
    /// This is a warning: callers decide whether to stop.
    #[error("{message}")]
    UnsuitableInstrument { message: String },

    /// Installation data or settings cannot support the request.
    #[error("{message}")]
    Configuration { message: String },

    /// Response construction failed.
    #[error("Failed to build response: {message}")]
    Build { message: String },

    /// A FITS file could not be read or written.
    #[error("FITS error in {path}: {message}")]
    Fits { path: PathBuf, message: String },

    /// Settings file not found at an explicitly requested location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a settings file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CiaoError {
    /// Whether this error is a warning the caller may choose to ignore.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::UnsuitableInstrument { .. })
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Result type alias for ciao-contrib operations.
pub type Result<T> = std::result::Result<T, CiaoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_names_key() {
        let err = CiaoError::DuplicateKey { key: "ciao".into() };
        assert_eq!(err.to_string(), "Multiple copies of ciao found.");
    }

    #[test]
    fn name_error_displays_file() {
        let err = CiaoError::Name {
            name: "VERSIONtools".into(),
        };
        assert!(err.to_string().contains("VERSIONtools"));
    }

    #[test]
    fn network_error_shows_message_only() {
        let err = CiaoError::Network {
            kind: NetworkErrorKind::Unreachable,
            message: "Unable to reach the CIAO site - is the network down?".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unable to reach the CIAO site - is the network down?"
        );
    }

    #[test]
    fn network_kind_display() {
        assert_eq!(NetworkErrorKind::NotFound.to_string(), "not found");
        assert_eq!(NetworkErrorKind::Http.to_string(), "http");
    }

    #[test]
    fn build_error_is_prefixed() {
        let err = CiaoError::Build {
            message: "bad grid".into(),
        };
        assert_eq!(err.to_string(), "Failed to build response: bad grid");
    }

    #[test]
    fn fits_error_displays_path_and_message() {
        let err = CiaoError::Fits {
            path: PathBuf::from("/data/lut.fits"),
            message: "truncated header".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/data/lut.fits"));
        assert!(msg.contains("truncated header"));
    }

    #[test]
    fn only_unsuitable_instrument_is_a_warning() {
        let warn = CiaoError::UnsuitableInstrument {
            message: "HRC".into(),
        };
        let fatal = CiaoError::invalid("nope");
        assert!(warn.is_warning());
        assert!(!fatal.is_warning());
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: CiaoError = io_err.into();
        assert!(matches!(err, CiaoError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(CiaoError::config("test"))
        }
        assert!(returns_error().is_err());
    }
}
