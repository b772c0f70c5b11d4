// src/pipeline/raw.rs

//! Byte-for-byte article passthrough.

use crate::error::Result;
use crate::storage::ArticleStore;

/// Response headers for raw articles. Nothing may be cached.
pub const RAW_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "text/html; charset=utf-8"),
    ("Cache-Control", "no-cache, no-store, must-revalidate"),
    ("Pragma", "no-cache"),
    ("Expires", "0"),
];

/// Stored article bytes with the headers to serve them under.
#[derive(Debug, Clone)]
pub struct RawArticle {
    pub bytes: Vec<u8>,
    pub headers: &'static [(&'static str, &'static str)],
}

/// Load the untouched bytes for a slug.
pub async fn load_raw(store: &dyn ArticleStore, slug: &str) -> Result<RawArticle> {
    let stored = store.read(&format!("{slug}.html")).await?;
    log::debug!("Serving {} raw bytes for {slug}", stored.bytes.len());
    Ok(RawArticle {
        bytes: stored.bytes,
        headers: &RAW_HEADERS,
    })
}
