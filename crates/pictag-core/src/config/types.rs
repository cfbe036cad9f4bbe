//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Object store connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// AWS region; falls back to the environment when unset
    pub region: Option<String>,

    /// Custom endpoint URL (MinIO, R2, LocalStack)
    pub endpoint: Option<String>,

    /// Access key ID (supports ${ENV_VAR} syntax)
    pub access_key_id: String,

    /// Secret access key (supports ${ENV_VAR} syntax)
    pub secret_access_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            region: None,
            endpoint: None,
            access_key_id: "${AWS_ACCESS_KEY_ID}".to_string(),
            secret_access_key: "${AWS_SECRET_ACCESS_KEY}".to_string(),
        }
    }
}

/// Fetch stage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Bucket to download from
    pub bucket: String,

    /// Key prefix selecting the objects to download
    pub prefix: String,

    /// Directory downloaded files are written to
    pub output_dir: PathBuf,

    /// Keep downloading after a failed object instead of aborting
    pub continue_on_error: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            prefix: "images/".to_string(),
            output_dir: PathBuf::from("."),
            continue_on_error: false,
        }
    }
}

/// Labeling stage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelingConfig {
    /// Bucket holding the image to label
    pub bucket: String,

    /// Key of the image to label
    pub image: String,

    /// Maximum number of labels returned
    pub max_labels: u32,

    /// Minimum confidence (percent) for a label to be returned
    pub min_confidence: f32,

    /// AWS region for the vision service; falls back to the environment
    pub region: Option<String>,

    /// Custom endpoint URL for the vision service
    pub endpoint: Option<String>,
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            image: "example.jpg".to_string(),
            max_labels: 10,
            min_confidence: 75.0,
            region: None,
            endpoint: None,
        }
    }
}

/// Search stage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Base URL of the search cluster
    pub endpoint: String,

    /// Index holding tagged image documents
    pub index: String,

    /// Document field the match query runs against
    pub field: String,

    /// Query used when none is given on the command line
    pub query: String,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,

    /// Basic auth username
    pub username: Option<String>,

    /// Basic auth password (supports ${ENV_VAR} syntax)
    pub password: Option<String>,

    /// API key sent as `Authorization: ApiKey ...` (supports ${ENV_VAR} syntax)
    pub api_key: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9200".to_string(),
            index: crate::search::IMAGES_INDEX.to_string(),
            field: crate::search::TAGS_FIELD.to_string(),
            query: "nature".to_string(),
            timeout_ms: 30_000,
            username: None,
            password: None,
            api_key: None,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
