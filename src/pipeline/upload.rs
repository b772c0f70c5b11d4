// src/pipeline/upload.rs

//! Article upload and upload listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, UploadRejection};
use crate::models::{Config, SiteConfig};
use crate::services::{HtmlStructure, UploadValidator};
use crate::storage::ArticleStore;
use crate::utils::slug_from_file_name;

/// Result of an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub file_name: String,
    pub slug: String,
    pub url: String,
    pub size: u64,
    /// Hex SHA-256 of the stored bytes
    pub sha256: String,
    pub structure: HtmlStructure,
    pub quality_score: u8,
    /// False for a dry run
    pub stored: bool,
}

/// One previously uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_name: String,
    pub slug: String,
    pub url: String,
    pub size: u64,
    pub modified_at: DateTime<Utc>,
}

fn article_url(site: &SiteConfig, slug: &str) -> String {
    format!("{}{}", site.articles_url_prefix, slug)
}

/// Validate and store an uploaded article.
///
/// Every gate runs before anything is written, so a rejection leaves the
/// store untouched. With `dry_run` the file is validated only.
pub async fn run_upload(
    store: &dyn ArticleStore,
    config: &Config,
    file_name: &str,
    bytes: &[u8],
    dry_run: bool,
) -> Result<UploadReceipt> {
    let validator = UploadValidator::new(&config.upload);
    let structure = validator.validate(file_name, bytes)?;

    if store.exists(file_name).await? {
        return Err(UploadRejection::AlreadyExists {
            file_name: file_name.to_string(),
        }
        .into());
    }

    if dry_run {
        log::info!("Dry run: {file_name} passed validation");
    } else {
        store.write_new(file_name, bytes).await?;
        log::info!("Uploaded {file_name}");
    }

    let slug = slug_from_file_name(file_name).to_string();
    Ok(UploadReceipt {
        file_name: file_name.to_string(),
        url: article_url(&config.site, &slug),
        slug,
        size: bytes.len() as u64,
        sha256: hex::encode(Sha256::digest(bytes)),
        quality_score: structure.quality_score(),
        structure,
        stored: !dry_run,
    })
}

/// Stored files, most recently modified first.
pub async fn list_uploads(store: &dyn ArticleStore, site: &SiteConfig) -> Result<Vec<UploadedFile>> {
    let mut files = store.list_html_files().await?;
    files.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
    Ok(files
        .into_iter()
        .map(|file| {
            let slug = slug_from_file_name(&file.file_name).to_string();
            UploadedFile {
                url: article_url(site, &slug),
                slug,
                file_name: file.file_name,
                size: file.size,
                modified_at: file.modified_at,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::storage::LocalStore;
    use tempfile::TempDir;

    const HTML: &[u8] = b"<html><head><title>T</title></head><body>x</body></html>";

    #[tokio::test]
    async fn test_upload_stores_file_and_reports() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let config = Config::default();

        let receipt = run_upload(&store, &config, "2025-08-24-a.html", HTML, false)
            .await
            .unwrap();
        assert_eq!(receipt.slug, "2025-08-24-a");
        assert_eq!(receipt.url, "/articles/2025-08-24-a");
        assert_eq!(receipt.size, HTML.len() as u64);
        assert_eq!(receipt.sha256.len(), 64);
        assert_eq!(receipt.quality_score, 2);
        assert!(receipt.stored);
        assert!(tmp.path().join("2025-08-24-a.html").exists());
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        let receipt = run_upload(&store, &Config::default(), "2025-08-24-a.html", HTML, true)
            .await
            .unwrap();
        assert!(!receipt.stored);
        assert!(!tmp.path().join("2025-08-24-a.html").exists());
    }

    #[tokio::test]
    async fn test_collision_and_bad_name_rejected() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let config = Config::default();

        run_upload(&store, &config, "2025-08-24-a.html", HTML, false).await.unwrap();
        let err = run_upload(&store, &config, "2025-08-24-a.html", HTML, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upload(UploadRejection::AlreadyExists { .. })));

        let err = run_upload(&store, &config, "my-article.html", HTML, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upload(UploadRejection::BadFileName { .. })));
        assert!(!tmp.path().join("my-article.html").exists());
    }

    #[tokio::test]
    async fn test_list_uploads() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        run_upload(&store, &Config::default(), "2025-08-24-a.html", HTML, false)
            .await
            .unwrap();

        let uploads = list_uploads(&store, &SiteConfig::default()).await.unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].slug, "2025-08-24-a");
        assert_eq!(uploads[0].url, "/articles/2025-08-24-a");
    }
}
