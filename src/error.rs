//! Error types for the mdcorpus library
//!
//! Every fallible operation in the crate returns [`Result`], whose error side is
//! [`CorpusError`]. Missing paths on collection population are *not* errors:
//! those report `Ok(false)` instead.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum CorpusError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML decoding errors from the metadata decoder
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON errors from record stores
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File not found or invalid path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Path exists but cannot be read as a document
    #[error("Invalid file format: {path} (expected a regular file)")]
    InvalidFileFormat { path: PathBuf },

    /// Front matter parsing errors
    #[error("Invalid front matter in {path}: {reason}")]
    InvalidFrontMatter { path: PathBuf, reason: String },

    /// Query construction errors
    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    /// Value type conversion errors
    #[error("Type conversion error: cannot convert {from} to {to}")]
    TypeConversion { from: String, to: String },

    /// Directory traversal errors
    #[error("Path resolution error: {reason}")]
    PathResolution { reason: String },

    /// A document without a slug cannot be keyed in a store
    #[error("Document has no slug: {path}")]
    MissingSlug { path: PathBuf },

    /// Record store failures
    #[error("Store error: {reason}")]
    Store { reason: String },

    /// Generic validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CorpusError>;

impl CorpusError {
    /// Create a new file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new invalid file format error
    pub fn invalid_file_format(path: impl Into<PathBuf>) -> Self {
        Self::InvalidFileFormat { path: path.into() }
    }

    /// Create a new invalid front matter error
    pub fn invalid_front_matter(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidFrontMatter {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid query error
    pub fn invalid_query(reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            reason: reason.into(),
        }
    }

    /// Create a new type conversion error
    pub fn type_conversion(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::TypeConversion {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a new path resolution error
    pub fn path_resolution(reason: impl Into<String>) -> Self {
        Self::PathResolution {
            reason: reason.into(),
        }
    }

    /// Create a new missing slug error
    pub fn missing_slug(path: impl Into<PathBuf>) -> Self {
        Self::MissingSlug { path: path.into() }
    }

    /// Create a new store error
    pub fn store(reason: impl Into<String>) -> Self {
        Self::Store {
            reason: reason.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(io_err) => !matches!(
                io_err.kind(),
                std::io::ErrorKind::NotFound
                    | std::io::ErrorKind::PermissionDenied
                    | std::io::ErrorKind::AlreadyExists
            ),
            Self::FileNotFound { .. } | Self::MissingSlug { .. } => false,
            Self::InvalidFileFormat { .. }
            | Self::InvalidFrontMatter { .. }
            | Self::InvalidQuery { .. }
            | Self::TypeConversion { .. }
            | Self::PathResolution { .. }
            | Self::Store { .. }
            | Self::Validation { .. } => true,
            Self::Yaml(_) | Self::Json(_) => true,
        }
    }

    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::FileNotFound { .. } | Self::Store { .. } => ErrorSeverity::Critical,
            Self::InvalidFrontMatter { .. } | Self::Yaml(_) | Self::MissingSlug { .. } => {
                ErrorSeverity::High
            }
            Self::InvalidQuery { .. } | Self::TypeConversion { .. } => ErrorSeverity::Medium,
            Self::Validation { .. } | Self::PathResolution { .. } => ErrorSeverity::Low,
            _ => ErrorSeverity::Medium,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
