// src/pipeline/catalog.rs

//! Article catalog: records recomputed from stored files on every read.

use futures::stream::{self, StreamExt};

use crate::error::{AppError, Result};
use crate::models::ArticleRecord;
use crate::services::ArticleExtractor;
use crate::storage::ArticleStore;

/// Files read concurrently while parsing the directory.
const READ_CONCURRENCY: usize = 8;

/// Read and extract one stored file.
async fn load_file(
    store: &dyn ArticleStore,
    extractor: &ArticleExtractor,
    file_name: &str,
) -> Result<ArticleRecord> {
    let stored = store.read(file_name).await?;
    let html = String::from_utf8(stored.bytes).map_err(|e| AppError::parse(file_name, e))?;
    Ok(extractor.extract(&html, file_name, stored.modified_at))
}

/// Load the article for a slug.
pub async fn load_article(
    store: &dyn ArticleStore,
    extractor: &ArticleExtractor,
    slug: &str,
) -> Result<ArticleRecord> {
    load_file(store, extractor, &format!("{slug}.html")).await
}

/// Parse every `.html` file, newest first.
///
/// A file that cannot be read or decoded is logged and skipped; the rest
/// of the directory still loads.
pub async fn parse_directory(
    store: &dyn ArticleStore,
    extractor: &ArticleExtractor,
) -> Result<Vec<ArticleRecord>> {
    let files = store.list_html_files().await?;
    let total = files.len();

    let mut results = stream::iter(files)
        .map(|file| async move {
            let result = load_file(store, extractor, &file.file_name).await;
            (file.file_name, result)
        })
        .buffered(READ_CONCURRENCY);

    let mut articles = Vec::with_capacity(total);
    while let Some((file_name, result)) = results.next().await {
        match result {
            Ok(article) => articles.push(article),
            Err(error) => log::warn!("Skipping {file_name}: {error}"),
        }
    }

    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    log::info!("Parsed {} of {} article files", articles.len(), total);
    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStore;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &[u8]) {
        std::fs::write(dir.path().join(name), content).unwrap();
    }

    #[tokio::test]
    async fn test_directory_sorted_newest_first() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "2024-05-01-old.html", b"<title>Old</title>");
        write(&tmp, "2025-08-24-new.html", b"<title>New</title>");
        write(&tmp, "2025-01-10-mid.html", b"<title>Mid</title>");
        write(&tmp, "readme.txt", b"ignored");
        let store = LocalStore::new(tmp.path());

        let articles = parse_directory(&store, &ArticleExtractor::default()).await.unwrap();
        let slugs: Vec<&str> = articles.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, vec!["2025-08-24-new", "2025-01-10-mid", "2024-05-01-old"]);
    }

    #[tokio::test]
    async fn test_bad_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "2025-01-01-good.html", b"<title>Good</title>");
        write(&tmp, "2025-01-02-bad.html", &[0xff, 0xfe, 0x00, 0xc3]);
        let store = LocalStore::new(tmp.path());

        let articles = parse_directory(&store, &ArticleExtractor::default()).await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Good");
    }

    #[tokio::test]
    async fn test_load_missing_article() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let err = load_article(&store, &ArticleExtractor::default(), "2025-01-01-x")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_undated_file_still_loads() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "my-article.html", b"<title>Mine</title>");
        let store = LocalStore::new(tmp.path());

        let article = load_article(&store, &ArticleExtractor::default(), "my-article")
            .await
            .unwrap();
        assert_eq!(article.title, "Mine");
        assert_eq!(article.slug, "my-article");
    }
}
