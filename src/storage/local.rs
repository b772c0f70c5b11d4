//! Local filesystem article store.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result, UploadRejection};
use crate::storage::{ArticleStore, StoredArticle, StoredFile};

/// Articles stored as files in one directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root_dir: PathBuf,
}

impl LocalStore {
    /// Create a LocalStore rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Full path for a file name. Names that could leave the directory are refused.
    fn path(&self, file_name: &str) -> Result<PathBuf> {
        if file_name.is_empty()
            || file_name.starts_with('.')
            || file_name.contains(['/', '\\'])
            || file_name.contains("..")
        {
            return Err(AppError::validation(format!("invalid file name: {file_name}")));
        }
        Ok(self.root_dir.join(file_name))
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.root_dir).await?;

        let tmp = path.with_extension("html.tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(AppError::Io(e));
        }
        Ok(())
    }
}

fn to_utc(modified: std::io::Result<SystemTime>) -> DateTime<Utc> {
    modified.map(DateTime::<Utc>::from).unwrap_or_else(|_| Utc::now())
}

#[async_trait]
impl ArticleStore for LocalStore {
    async fn list_html_files(&self) -> Result<Vec<StoredFile>> {
        let mut entries = match tokio::fs::read_dir(&self.root_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("Articles directory {:?} does not exist", self.root_dir);
                return Ok(Vec::new());
            }
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !file_name.ends_with(".html") {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            files.push(StoredFile {
                file_name,
                size: metadata.len(),
                modified_at: to_utc(metadata.modified()),
            });
        }
        Ok(files)
    }

    async fn read(&self, file_name: &str) -> Result<StoredArticle> {
        let path = self.path(file_name)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::not_found(file_name.trim_end_matches(".html")));
            }
            Err(e) => return Err(AppError::Io(e)),
        };
        let metadata = tokio::fs::metadata(&path).await?;
        Ok(StoredArticle {
            bytes,
            modified_at: to_utc(metadata.modified()),
        })
    }

    async fn exists(&self, file_name: &str) -> Result<bool> {
        let path = self.path(file_name)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }

    async fn write_new(&self, file_name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(file_name)?;
        if tokio::fs::try_exists(&path).await? {
            return Err(UploadRejection::AlreadyExists {
                file_name: file_name.to_string(),
            }
            .into());
        }
        self.write_bytes(&path, bytes).await?;
        log::info!("Stored {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        store.write_new("2025-01-01-a.html", b"<title>a</title>").await.unwrap();
        let article = store.read("2025-01-01-a.html").await.unwrap();
        assert_eq!(article.bytes, b"<title>a</title>".to_vec());
        assert!(store.exists("2025-01-01-a.html").await.unwrap());
        assert!(!tmp.path().join("2025-01-01-a.html.tmp").exists());
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        let err = store.read("nope.html").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_write_never_replaces() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        store.write_new("2025-01-01-a.html", b"first").await.unwrap();
        let err = store.write_new("2025-01-01-a.html", b"second").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Upload(UploadRejection::AlreadyExists { .. })
        ));
        assert_eq!(store.read("2025-01-01-a.html").await.unwrap().bytes, b"first".to_vec());
    }

    #[tokio::test]
    async fn test_list_only_html_files() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("a.html"), "a").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "b").unwrap();
        std::fs::create_dir(tmp.path().join("dir.html")).unwrap();
        let store = LocalStore::new(tmp.path());

        let files = store.list_html_files().await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "a.html");
        assert_eq!(files[0].size, 1);
    }

    #[tokio::test]
    async fn test_missing_directory_lists_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path().join("absent"));
        assert!(store.list_html_files().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_path_traversal_refused() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        assert!(store.read("../secret.html").await.is_err());
        assert!(store.exists("a/b.html").await.is_err());
    }
}
