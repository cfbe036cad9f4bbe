//! Error types for the pictag pipeline.
//!
//! Errors are organized by stage (fetch, tag, search) so that messages carry
//! the bucket, key or index that was involved. Every stage error can also be
//! reduced to an [`ErrorCategory`] for callers that only care about the kind
//! of failure.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for pictag operations.
#[derive(Error, Debug)]
pub enum PictagError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Object store errors outside of a fetch run
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Fetch stage errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Labeling stage errors
    #[error("Labeling error: {0}")]
    Label(#[from] LabelError),

    /// Search stage errors
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of a failure talking to an external service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Service unreachable, DNS failure, timeout
    Connectivity,
    /// Credentials rejected or missing permissions
    Auth,
    /// Bucket, key or index does not exist
    NotFound,
    /// The service answered but the payload lacked expected fields
    MalformedResponse,
    /// Rate limited by the service
    Throttled,
    /// Anything else (local I/O, invalid options, unexpected status)
    Other,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised by the object store client.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to build a backend operator for a bucket
    #[error("Storage backend for {bucket} could not be initialized: {message}")]
    Init { bucket: String, message: String },

    /// Bucket or object does not exist
    #[error("Not found in {bucket}: {path}")]
    NotFound { bucket: String, path: String },

    /// Credentials rejected
    #[error("Permission denied for {bucket}/{path}: {message}")]
    PermissionDenied {
        bucket: String,
        path: String,
        message: String,
    },

    /// Transport-level or backend-specific failure
    #[error("Object store error for {bucket}/{path}: {message}")]
    Backend {
        bucket: String,
        path: String,
        message: String,
        temporary: bool,
    },
}

impl StorageError {
    /// Map an OpenDAL error onto the storage taxonomy.
    pub(crate) fn from_opendal(bucket: &str, path: &str, err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::NotFound {
                bucket: bucket.to_string(),
                path: path.to_string(),
            },
            opendal::ErrorKind::PermissionDenied => Self::PermissionDenied {
                bucket: bucket.to_string(),
                path: path.to_string(),
                message: err.to_string(),
            },
            _ => Self::Backend {
                bucket: bucket.to_string(),
                path: path.to_string(),
                temporary: err.is_temporary(),
                message: err.to_string(),
            },
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Init { .. } => ErrorCategory::Other,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::PermissionDenied { .. } => ErrorCategory::Auth,
            Self::Backend {
                temporary: true, ..
            } => ErrorCategory::Connectivity,
            Self::Backend { .. } => ErrorCategory::Other,
        }
    }
}

/// Fetch stage errors.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Listing the prefix failed
    #[error("Failed to list s3://{bucket}/{prefix}: {source}")]
    List {
        bucket: String,
        prefix: String,
        #[source]
        source: StorageError,
    },

    /// Reading an object failed
    #[error("Failed to download s3://{bucket}/{key}: {source}")]
    Download {
        bucket: String,
        key: String,
        #[source]
        source: StorageError,
    },

    /// Writing the downloaded bytes to disk failed
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::List { source, .. } | Self::Download { source, .. } => source.category(),
            Self::Write { .. } => ErrorCategory::Other,
        }
    }
}

/// Labeling stage errors.
#[derive(Error, Debug)]
pub enum LabelError {
    /// The referenced image is not readable by the vision service
    #[error("Image not found: s3://{bucket}/{key}: {message}")]
    ImageNotFound {
        bucket: String,
        key: String,
        message: String,
    },

    /// Request rate exceeded
    #[error("Vision service throttled the request: {message}")]
    Throttled { message: String },

    /// Credentials rejected
    #[error("Vision service denied access: {message}")]
    AccessDenied { message: String },

    /// Could not reach the service
    #[error("Vision service unreachable: {message}")]
    Connectivity { message: String },

    /// A label in the response lacked a name or a confidence
    #[error("Malformed label response: {message}")]
    MalformedResponse { message: String },

    /// Options rejected before calling the service
    #[error("Invalid label options: {0}")]
    InvalidOptions(String),

    /// Any other service-side error
    #[error("Vision service error: {message}")]
    Service {
        message: String,
        status_code: Option<u16>,
    },
}

impl LabelError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ImageNotFound { .. } => ErrorCategory::NotFound,
            Self::Throttled { .. } => ErrorCategory::Throttled,
            Self::AccessDenied { .. } => ErrorCategory::Auth,
            Self::Connectivity { .. } => ErrorCategory::Connectivity,
            Self::MalformedResponse { .. } => ErrorCategory::MalformedResponse,
            Self::InvalidOptions(_) => ErrorCategory::Other,
            Self::Service { status_code, .. } => match status_code {
                Some(429) => ErrorCategory::Throttled,
                Some(401) | Some(403) => ErrorCategory::Auth,
                _ => ErrorCategory::Other,
            },
        }
    }
}

/// Search stage errors.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The index does not exist
    #[error("Index not found: {index}")]
    IndexNotFound { index: String },

    /// Could not reach the search endpoint
    #[error("Search endpoint {endpoint} unreachable: {message}")]
    Connectivity { endpoint: String, message: String },

    /// Credentials rejected
    #[error("Search endpoint rejected credentials (HTTP {status_code}): {message}")]
    Auth { status_code: u16, message: String },

    /// Any other non-success status
    #[error("Search HTTP {status_code}: {message}")]
    Http { status_code: u16, message: String },

    /// The response body was not a search response
    #[error("Malformed search response: {message}")]
    MalformedResponse { message: String },
}

impl SearchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IndexNotFound { .. } => ErrorCategory::NotFound,
            Self::Connectivity { .. } => ErrorCategory::Connectivity,
            Self::Auth { .. } => ErrorCategory::Auth,
            Self::Http {
                status_code: 429, ..
            } => ErrorCategory::Throttled,
            Self::Http { .. } => ErrorCategory::Other,
            Self::MalformedResponse { .. } => ErrorCategory::MalformedResponse,
        }
    }
}

/// Convenience type alias for pictag results.
pub type Result<T> = std::result::Result<T, PictagError>;
