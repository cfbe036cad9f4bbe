//! Core data types shared by the fetch, tag and search stages.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A reference to an object in a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Bucket name
    pub bucket: String,

    /// Object key (opaque, `/` separated by convention)
    pub key: String,
}

impl ObjectRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Local file name for this object: the key's last path segment.
    pub fn file_name(&self) -> Option<&str> {
        file_name_for_key(&self.key)
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Derive a local file name from an object key.
///
/// Returns the substring after the final `/`. Keys ending in `/` (directory
/// markers) and the segments `.` and `..` have no usable name.
pub fn file_name_for_key(key: &str) -> Option<&str> {
    let name = key.rsplit('/').next().unwrap_or(key);
    match name {
        "" | "." | ".." => None,
        name => Some(name),
    }
}

/// One object returned by a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    /// Full object key
    pub key: String,

    /// Object size in bytes as reported by the listing; empty objects are 0
    pub size: u64,
}

/// A label produced by the vision service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    /// The label name (e.g., "Tree", "Mountain")
    pub name: String,

    /// Confidence as a percentage from 0.0 to 100.0
    pub confidence: f32,

    /// Broader labels this one rolls up to (e.g., "Plant" for "Tree")
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,

    /// Service-defined categories (e.g., "Nature and Outdoors")
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl Label {
    /// Create a label with no parents or categories.
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence,
            parents: Vec::new(),
            categories: Vec::new(),
        }
    }
}

/// A search hit as returned by the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Index the document lives in
    #[serde(rename = "_index", default)]
    pub index: String,

    /// Document id
    #[serde(rename = "_id", default)]
    pub id: String,

    /// Relevance score (absent when sorting disables scoring)
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,

    /// The stored document
    #[serde(rename = "_source", default)]
    pub source: serde_json::Value,
}

/// A download that did not complete.
#[derive(Debug, Clone, Serialize)]
pub struct FetchFailure {
    pub key: String,
    pub error: String,
}

/// Summary of a fetch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchReport {
    /// Local paths written, in download order
    pub downloaded: Vec<PathBuf>,

    /// Keys with no derivable file name
    pub skipped: Vec<String>,

    /// Downloads that failed (only populated with continue-on-error)
    pub failed: Vec<FetchFailure>,

    /// Total bytes written
    pub bytes_written: u64,
}

impl FetchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}
