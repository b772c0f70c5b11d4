//! Storage abstractions for article files.
//!
//! Articles live as flat `YYYY-MM-DD-slug.html` files in one directory.
//! Records are never stored; they are recomputed from these bytes on read.
//!
//! ```text
//! pub/articles/
//! ├── 2025-08-24-golden-dome-analysis.html
//! └── 2025-09-01-space-domain.html
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

// Re-export for convenience
pub use local::LocalStore;

/// Directory entry for one article file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub file_name: String,
    pub size: u64,
    pub modified_at: DateTime<Utc>,
}

/// File contents plus modification time.
#[derive(Debug, Clone)]
pub struct StoredArticle {
    pub bytes: Vec<u8>,
    pub modified_at: DateTime<Utc>,
}

/// Trait for article file backends.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Every `.html` file, in no particular order.
    async fn list_html_files(&self) -> Result<Vec<StoredFile>>;

    /// Read one file. Missing files are `AppError::NotFound`.
    async fn read(&self, file_name: &str) -> Result<StoredArticle>;

    async fn exists(&self, file_name: &str) -> Result<bool>;

    /// Store a new file atomically. Existing files are never replaced.
    async fn write_new(&self, file_name: &str, bytes: &[u8]) -> Result<()>;
}
