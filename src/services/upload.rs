// src/services/upload.rs

//! Upload gate for new article files.
//!
//! The denylist is a set of text patterns, not a sandbox. It catches the
//! obvious cases an author might paste in by accident and nothing more.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::UploadRejection;
use crate::models::UploadConfig;

static FILE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}-[a-z0-9-]+\.html$").expect("file name regex")
});

/// Disallowed script patterns and the description reported for each.
static DENYLIST: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (
            r#"<script[^>]*src=["']https?://[^"']*["'][^>]*>"#,
            "external script file",
        ),
        (r"eval\s*\(", "eval usage"),
        (r"document\.cookie", "cookie access"),
        (r"window\.location\.href\s*=", "redirect"),
        (r"innerHTML\s*=\s*[^;]*<", "dynamic HTML injection"),
        (r"xhr\.|XMLHttpRequest|fetch\(", "HTTP calls"),
    ]
    .into_iter()
    .map(|(pattern, description)| {
        let re = Regex::new(&format!("(?i){pattern}")).expect("denylist regex");
        (re, description)
    })
    .collect()
});

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.+?)</title>").expect("title regex"));
static BODY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<body[\s>]").expect("body regex"));
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<style[\s>]").expect("style regex"));
static SCRIPT_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<script([^>]*)>").expect("script regex"));
static SRC_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bsrc\s*=").expect("src regex"));
static STYLESHEET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<link[^>]*rel=["']stylesheet["']"#).expect("stylesheet regex")
});

/// Descriptions of every denylisted pattern found in `content`.
pub fn dangerous_patterns(content: &str) -> Vec<&'static str> {
    DENYLIST
        .iter()
        .filter(|(re, _)| re.is_match(content))
        .map(|(_, description)| *description)
        .collect()
}

/// Whether a name matches `YYYY-MM-DD-slug.html`.
pub fn is_valid_file_name(file_name: &str) -> bool {
    FILE_NAME_RE.is_match(file_name)
}

/// Coarse structure report attached to a successful upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlStructure {
    pub has_title: bool,
    pub has_body: bool,
    pub has_styles: bool,
    pub has_inline_scripts: bool,
    pub has_external_css: bool,
}

impl HtmlStructure {
    pub fn analyze(content: &str) -> Self {
        Self {
            has_title: TITLE_RE.is_match(content),
            has_body: BODY_RE.is_match(content),
            has_styles: STYLE_RE.is_match(content),
            has_inline_scripts: SCRIPT_OPEN_RE
                .captures_iter(content)
                .any(|caps| !SRC_ATTR_RE.is_match(&caps[1])),
            has_external_css: STYLESHEET_RE.is_match(content),
        }
    }

    /// Number of structure flags that are set.
    pub fn quality_score(&self) -> u8 {
        [
            self.has_title,
            self.has_body,
            self.has_styles,
            self.has_inline_scripts,
            self.has_external_css,
        ]
        .into_iter()
        .filter(|flag| *flag)
        .count() as u8
    }
}

/// Checks an incoming file before anything touches storage.
///
/// Name collisions depend on storage and are checked by the caller.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size: u64,
}

impl Default for UploadValidator {
    fn default() -> Self {
        Self::new(&UploadConfig::default())
    }
}

impl UploadValidator {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            max_file_size: config.max_file_size,
        }
    }

    /// Extension and naming pattern.
    pub fn check_name(&self, file_name: &str) -> Result<(), UploadRejection> {
        if !file_name.to_lowercase().ends_with(".html") {
            return Err(UploadRejection::NotHtml {
                file_name: file_name.to_string(),
            });
        }
        if !is_valid_file_name(file_name) {
            return Err(UploadRejection::BadFileName {
                file_name: file_name.to_string(),
            });
        }
        Ok(())
    }

    /// Run every content check in order and describe the accepted file.
    pub fn validate(&self, file_name: &str, bytes: &[u8]) -> Result<HtmlStructure, UploadRejection> {
        self.check_name(file_name)?;

        let size = bytes.len() as u64;
        if size > self.max_file_size {
            return Err(UploadRejection::TooLarge {
                size,
                max: self.max_file_size,
            });
        }

        let content = String::from_utf8_lossy(bytes);
        if !content.contains("<title>") || !content.contains("</title>") {
            return Err(UploadRejection::MissingTitle);
        }

        let issues = dangerous_patterns(&content);
        if !issues.is_empty() {
            return Err(UploadRejection::DangerousPatterns {
                issues: issues.into_iter().map(String::from).collect(),
            });
        }

        Ok(HtmlStructure::analyze(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = "<html><head><title>T</title><style>p{}</style></head>\
                        <body><p>x</p><script>console.log(1)</script></body></html>";

    #[test]
    fn test_accepts_well_formed_article() {
        let structure = UploadValidator::default()
            .validate("2025-08-24-my-article.html", GOOD.as_bytes())
            .unwrap();
        assert!(structure.has_title && structure.has_body && structure.has_styles);
        assert!(structure.has_inline_scripts);
        assert!(!structure.has_external_css);
        assert_eq!(structure.quality_score(), 4);
    }

    #[test]
    fn test_undated_name_is_rejected() {
        let err = UploadValidator::default()
            .validate("my-article.html", GOOD.as_bytes())
            .unwrap_err();
        assert!(matches!(err, UploadRejection::BadFileName { .. }));
    }

    #[test]
    fn test_name_checks() {
        let v = UploadValidator::default();
        assert!(matches!(v.check_name("2025-01-01-a.txt"), Err(UploadRejection::NotHtml { .. })));
        assert!(matches!(
            v.check_name("2025-01-01-Upper.html"),
            Err(UploadRejection::BadFileName { .. })
        ));
        assert!(v.check_name("2025-01-01-a-b-9.html").is_ok());
    }

    #[test]
    fn test_size_limit() {
        let v = UploadValidator::new(&UploadConfig { max_file_size: 10 });
        let err = v.validate("2025-01-01-a.html", GOOD.as_bytes()).unwrap_err();
        assert_eq!(
            err,
            UploadRejection::TooLarge {
                size: GOOD.len() as u64,
                max: 10
            }
        );
    }

    #[test]
    fn test_missing_title() {
        let err = UploadValidator::default()
            .validate("2025-01-01-a.html", b"<html><body>x</body></html>")
            .unwrap_err();
        assert_eq!(err, UploadRejection::MissingTitle);
    }

    #[test]
    fn test_reports_every_dangerous_pattern() {
        let html = r#"<title>t</title>
            <script src="https://evil.example.com/x.js"></script>
            <script>EVAL (x); document.cookie; fetch('/a');</script>"#;
        let err = UploadValidator::default()
            .validate("2025-01-01-a.html", html.as_bytes())
            .unwrap_err();
        assert_eq!(
            err,
            UploadRejection::DangerousPatterns {
                issues: vec![
                    "external script file".to_string(),
                    "eval usage".to_string(),
                    "cookie access".to_string(),
                    "HTTP calls".to_string(),
                ]
            }
        );
    }

    #[test]
    fn test_injection_and_redirect_patterns() {
        assert_eq!(
            dangerous_patterns("el.innerHTML = '<b>' + x; window.location.href = '/'"),
            vec!["redirect", "dynamic HTML injection"]
        );
        assert!(dangerous_patterns("el.innerHTML = text;").is_empty());
    }

    #[test]
    fn test_external_scripts_are_not_inline() {
        let s = HtmlStructure::analyze(
            r#"<script src="/local.js"></script><link rel="stylesheet" href="a.css">"#,
        );
        assert!(!s.has_inline_scripts);
        assert!(s.has_external_css);
    }
}
