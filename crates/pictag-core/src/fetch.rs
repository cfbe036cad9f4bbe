//! Fetch stage: download every object under a prefix to a local directory.

use std::path::{Path, PathBuf};

use crate::error::FetchError;
use crate::storage::ObjectStore;
use crate::types::{file_name_for_key, FetchFailure, FetchReport, ObjectEntry};

/// Parameters for a fetch run.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Bucket to download from
    pub bucket: String,

    /// Key prefix selecting the objects
    pub prefix: String,

    /// Directory files are written into (created if missing)
    pub output_dir: PathBuf,

    /// Record failed downloads and keep going instead of aborting
    pub continue_on_error: bool,
}

impl FetchRequest {
    pub fn new(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
            output_dir: PathBuf::from("."),
            continue_on_error: false,
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }
}

/// Progress notifications emitted during a fetch.
#[derive(Debug, Clone)]
pub enum FetchEvent<'a> {
    /// Listing finished; `total` objects will be processed
    Listed { total: usize },
    /// One object has been handled (downloaded, skipped or failed)
    Processed { key: &'a str, ok: bool },
}

/// Download every object under `request.prefix`.
///
/// Files are named after the last segment of their key and overwrite any
/// existing file of the same name, so two keys sharing a final segment leave
/// the later one (in key order) on disk.
pub async fn fetch_objects(
    store: &ObjectStore,
    request: &FetchRequest,
) -> Result<FetchReport, FetchError> {
    fetch_objects_with_progress(store, request, |_| {}).await
}

/// Same as [`fetch_objects`], reporting progress through `on_event`.
pub async fn fetch_objects_with_progress<F>(
    store: &ObjectStore,
    request: &FetchRequest,
    mut on_event: F,
) -> Result<FetchReport, FetchError>
where
    F: FnMut(FetchEvent<'_>),
{
    let entries = store
        .list(&request.bucket, &request.prefix)
        .await
        .map_err(|source| FetchError::List {
            bucket: request.bucket.clone(),
            prefix: request.prefix.clone(),
            source,
        })?;

    tracing::info!(
        "Found {} objects under s3://{}/{}",
        entries.len(),
        request.bucket,
        request.prefix
    );
    on_event(FetchEvent::Listed {
        total: entries.len(),
    });

    let mut report = FetchReport::default();
    if entries.is_empty() {
        return Ok(report);
    }

    tokio::fs::create_dir_all(&request.output_dir)
        .await
        .map_err(|source| FetchError::Write {
            path: request.output_dir.clone(),
            source,
        })?;

    for entry in &entries {
        let Some(file_name) = file_name_for_key(&entry.key) else {
            tracing::warn!("Skipping {}: no file name in key", entry.key);
            report.skipped.push(entry.key.clone());
            on_event(FetchEvent::Processed {
                key: &entry.key,
                ok: true,
            });
            continue;
        };
        let path = request.output_dir.join(file_name);

        match download(store, &request.bucket, entry, &path).await {
            Ok(bytes) => {
                report.bytes_written += bytes;
                report.downloaded.push(path);
                on_event(FetchEvent::Processed {
                    key: &entry.key,
                    ok: true,
                });
            }
            Err(e) if request.continue_on_error => {
                tracing::error!("Failed: {} - {}", entry.key, e);
                report.failed.push(FetchFailure {
                    key: entry.key.clone(),
                    error: e.to_string(),
                });
                on_event(FetchEvent::Processed {
                    key: &entry.key,
                    ok: false,
                });
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        "Downloaded {} objects ({} bytes), {} skipped, {} failed",
        report.downloaded.len(),
        report.bytes_written,
        report.skipped.len(),
        report.failed.len()
    );
    Ok(report)
}

async fn download(
    store: &ObjectStore,
    bucket: &str,
    entry: &ObjectEntry,
    path: &Path,
) -> Result<u64, FetchError> {
    let data = store
        .read(bucket, &entry.key)
        .await
        .map_err(|source| FetchError::Download {
            bucket: bucket.to_string(),
            key: entry.key.clone(),
            source,
        })?;

    if path.exists() {
        tracing::debug!("Overwriting {}", path.display());
    }
    tokio::fs::write(path, &data)
        .await
        .map_err(|source| FetchError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!("{} -> {} ({} bytes)", entry.key, path.display(), data.len());
    Ok(data.len() as u64)
}
