//! Object store client built on OpenDAL.
//!
//! One [`ObjectStore`] is constructed by the caller and handed to the fetch
//! stage. It owns one OpenDAL operator per bucket; S3 operators are built on
//! first use and cached for the lifetime of the store.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use futures_util::TryStreamExt;
use opendal::{services, Operator};

use crate::config::{resolve_env_var, StorageConfig};
use crate::error::StorageError;
use crate::types::ObjectEntry;

enum Backend {
    S3(StorageConfig),
    Memory,
}

/// A configured handle to an object store, reused across calls.
pub struct ObjectStore {
    backend: Backend,
    operators: Mutex<HashMap<String, Operator>>,
}

impl ObjectStore {
    /// Create an S3-backed store. No network traffic happens until the first call.
    pub fn s3(config: StorageConfig) -> Self {
        Self {
            backend: Backend::S3(config),
            operators: Mutex::new(HashMap::new()),
        }
    }

    /// Create an in-process store holding the given (empty) buckets.
    ///
    /// Any bucket not named here is reported as not found.
    pub fn memory<I, S>(buckets: I) -> Result<Self, StorageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut operators = HashMap::new();
        for bucket in buckets {
            let bucket = bucket.into();
            let operator = Operator::new(services::Memory::default())
                .map(|op| op.finish())
                .map_err(|e| StorageError::Init {
                    bucket: bucket.clone(),
                    message: e.to_string(),
                })?;
            operators.insert(bucket, operator);
        }
        Ok(Self {
            backend: Backend::Memory,
            operators: Mutex::new(operators),
        })
    }

    /// List every object whose key starts with `prefix`.
    ///
    /// Listing is recursive and follows continuation pages. Directory markers
    /// are dropped and entries come back sorted by key.
    pub async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectEntry>, StorageError> {
        let operator = self.operator(bucket)?;
        let root = list_root(prefix);

        tracing::debug!(bucket, prefix, root, "Listing objects");

        let mut lister = operator
            .lister_with(root)
            .recursive(true)
            .await
            .map_err(|e| StorageError::from_opendal(bucket, prefix, e))?;

        let mut entries = Vec::new();
        while let Some(entry) = lister
            .try_next()
            .await
            .map_err(|e| StorageError::from_opendal(bucket, prefix, e))?
        {
            let metadata = entry.metadata();
            if metadata.is_dir() || !entry.path().starts_with(prefix) {
                continue;
            }
            entries.push(ObjectEntry {
                key: entry.path().to_string(),
                size: metadata.content_length(),
            });
        }

        entries.sort_by(|a, b| a.key.cmp(&b.key));
        tracing::debug!(bucket, prefix, count = entries.len(), "Listing complete");
        Ok(entries)
    }

    /// Read an object's bytes.
    pub async fn read(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let operator = self.operator(bucket)?;
        let data = operator
            .read(key)
            .await
            .map_err(|e| StorageError::from_opendal(bucket, key, e))?
            .to_vec();

        tracing::debug!(bucket, key, size = data.len(), "Object read complete");
        Ok(data)
    }

    /// Store an object, replacing any existing object under the same key.
    pub async fn write(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<(), StorageError> {
        let operator = self.operator(bucket)?;
        operator
            .write(key, data)
            .await
            .map_err(|e| StorageError::from_opendal(bucket, key, e))?;
        Ok(())
    }

    fn operator(&self, bucket: &str) -> Result<Operator, StorageError> {
        let mut operators = self.operators.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(operator) = operators.get(bucket) {
            return Ok(operator.clone());
        }

        match &self.backend {
            Backend::Memory => Err(StorageError::NotFound {
                bucket: bucket.to_string(),
                path: String::new(),
            }),
            Backend::S3(config) => {
                let operator = build_s3_operator(config, bucket)?;
                tracing::info!(bucket, "S3 operator initialized");
                operators.insert(bucket.to_string(), operator.clone());
                Ok(operator)
            }
        }
    }
}

impl std::fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match self.backend {
            Backend::S3(_) => "s3",
            Backend::Memory => "memory",
        };
        f.debug_struct("ObjectStore").field("backend", &backend).finish()
    }
}

fn build_s3_operator(config: &StorageConfig, bucket: &str) -> Result<Operator, StorageError> {
    if bucket.is_empty() {
        return Err(StorageError::Init {
            bucket: bucket.to_string(),
            message: "bucket name is empty".to_string(),
        });
    }

    let mut builder = services::S3::default().bucket(bucket);

    if let Some(ref region) = config.region {
        builder = builder.region(region);
    }
    if let Some(ref endpoint) = config.endpoint {
        builder = builder.endpoint(endpoint);
    }
    if let Some(access_key_id) = resolve_env_var(&config.access_key_id) {
        builder = builder.access_key_id(&access_key_id);
    }
    if let Some(secret_access_key) = resolve_env_var(&config.secret_access_key) {
        builder = builder.secret_access_key(&secret_access_key);
    }

    Operator::new(builder)
        .map(|op| op.finish())
        .map_err(|e| StorageError::Init {
            bucket: bucket.to_string(),
            message: e.to_string(),
        })
}

/// Directory to start a recursive listing from: the prefix up to its last `/`.
fn list_root(prefix: &str) -> &str {
    match prefix.rfind('/') {
        Some(idx) => &prefix[..=idx],
        None => "/",
    }
}
