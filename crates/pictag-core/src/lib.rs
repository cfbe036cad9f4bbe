//! Pictag Core - fetch, tag and search stages for an image tagging workflow.
//!
//! Three independent stages, each a single call-through to a managed
//! service. They share no runtime state; files on disk and the external
//! search index are the only hand-off between them.
//!
//! ```text
//! Object store ──fetch──▶ local files
//! Object ref   ──tag────▶ [(label, confidence)]
//! Query        ──search─▶ [hit]
//! ```
//!
//! Service handles are built once by the caller and passed in explicitly:
//!
//! ```rust,ignore
//! use pictag_core::{fetch_objects, Config, FetchRequest, ObjectStore};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> pictag_core::Result<()> {
//!     let config = Config::load()?;
//!     let store = ObjectStore::s3(config.storage.clone());
//!
//!     let request = FetchRequest::new("my-bucket", "images/");
//!     let report = fetch_objects(&store, &request).await?;
//!     println!("Downloaded {} files", report.downloaded.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod fetch;
pub mod labeling;
pub mod output;
pub mod search;
pub mod storage;
pub mod types;

pub use config::Config;
pub use error::{
    ConfigError, ErrorCategory, FetchError, LabelError, PictagError, Result, SearchError,
    StorageError,
};
pub use fetch::{fetch_objects, fetch_objects_with_progress, FetchEvent, FetchRequest};
pub use labeling::{tag_image, LabelOptions, LabelProvider, RekognitionProvider};
pub use output::{OutputFormat, OutputWriter};
pub use search::{match_query, search_images, ElasticsearchClient, SearchBackend};
pub use storage::ObjectStore;
pub use types::{FetchReport, Label, ObjectEntry, ObjectRef, SearchHit};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
