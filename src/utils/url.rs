// src/utils/url.rs

//! URL helpers for article assets.

use std::sync::LazyLock;

use regex::Regex;

static IMAGE_EXTENSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(jpg|jpeg|png|gif|webp|svg|bmp|ico)($|\?|#)").expect("image extension regex")
});

/// Whether a URL plausibly points at an image.
///
/// Data URLs are rejected outright; everything else needs an image
/// extension or an `image`/`photo` hint somewhere in the URL.
pub fn is_image_url(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() || url.starts_with("data:") {
        return false;
    }
    IMAGE_EXTENSION_RE.is_match(url) || url.contains("image") || url.contains("photo")
}

/// Resolve an asset URL found inside an article.
///
/// # Examples
/// ```
/// use kiji::utils::url::resolve_asset;
///
/// assert_eq!(resolve_asset("/articles/", "./img/a.png"), "/articles/img/a.png");
/// assert_eq!(resolve_asset("/articles/", "//cdn.example.com/a.png"), "https://cdn.example.com/a.png");
/// ```
pub fn resolve_asset(articles_prefix: &str, url: &str) -> String {
    let url = url.trim();

    // Already absolute
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }

    // Protocol-relative
    if url.starts_with("//") {
        return format!("https:{url}");
    }

    // Relative to the article file
    if let Some(rest) = url.strip_prefix("./") {
        return format!("{articles_prefix}{rest}");
    }

    // Site-relative
    if url.starts_with('/') {
        return url.to_string();
    }

    format!("{articles_prefix}{url}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_url() {
        assert!(is_image_url("chart.PNG"));
        assert!(is_image_url("/a/b.webp?v=2"));
        assert!(is_image_url("https://example.com/images/123"));
        assert!(!is_image_url("data:image/png;base64,AAAA"));
        assert!(!is_image_url("https://example.com/doc.pdf"));
        assert!(!is_image_url("   "));
    }

    #[test]
    fn test_resolve_absolute_url() {
        assert_eq!(
            resolve_asset("/articles/", "https://example.com/a.png"),
            "https://example.com/a.png"
        );
    }

    #[test]
    fn test_resolve_protocol_relative() {
        assert_eq!(
            resolve_asset("/articles/", "//cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn test_resolve_relative_paths() {
        assert_eq!(resolve_asset("/articles/", "./img/a.png"), "/articles/img/a.png");
        assert_eq!(resolve_asset("/articles/", "img/a.png"), "/articles/img/a.png");
        assert_eq!(resolve_asset("/articles/", "/static/a.png"), "/static/a.png");
    }
}
