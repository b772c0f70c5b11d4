//! Article record derived from an uploaded HTML file.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A display language of the portal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ja,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ja => "ja",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ja" | "ja-jp" => Ok(Language::Ja),
            "en" | "en-us" => Ok(Language::En),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

/// Which languages an article body is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentLanguages {
    Ja,
    En,
    Both,
}

impl ContentLanguages {
    /// Combine two detection flags. Nothing detected counts as both.
    pub fn from_flags(ja: bool, en: bool) -> Self {
        match (ja, en) {
            (true, false) => ContentLanguages::Ja,
            (false, true) => ContentLanguages::En,
            _ => ContentLanguages::Both,
        }
    }

    pub fn includes(&self, language: Language) -> bool {
        match self {
            ContentLanguages::Both => true,
            ContentLanguages::Ja => language == Language::Ja,
            ContentLanguages::En => language == Language::En,
        }
    }
}

/// Fixed article categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    DefensePolicy,
    International,
    Technology,
    Intelligence,
    CyberSecurity,
    SpaceDefense,
    Maritime,
    Analysis,
    Dashboard,
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::DefensePolicy,
        Category::International,
        Category::Technology,
        Category::Intelligence,
        Category::CyberSecurity,
        Category::SpaceDefense,
        Category::Maritime,
        Category::Analysis,
        Category::Dashboard,
        Category::Other,
    ];

    /// Display label in the requested language.
    pub fn label(&self, language: Language) -> &'static str {
        let (ja, en) = match self {
            Category::DefensePolicy => ("防衛政策", "Defense Policy"),
            Category::International => ("国際情勢", "International Affairs"),
            Category::Technology => ("防衛技術", "Defense Technology"),
            Category::Intelligence => ("インテリジェンス", "Intelligence"),
            Category::CyberSecurity => ("サイバーセキュリティ", "Cybersecurity"),
            Category::SpaceDefense => ("宇宙防衛", "Space Defense"),
            Category::Maritime => ("海洋安全保障", "Maritime Security"),
            Category::Analysis => ("分析レポート", "Analysis Report"),
            Category::Dashboard => ("ダッシュボード", "Dashboard"),
            Category::Other => ("その他", "Others"),
        };
        match language {
            Language::Ja => ja,
            Language::En => en,
        }
    }
}

/// One heading of an article's table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub level: u8,
    pub text: String,
    pub id: String,
}

/// Structured view of one uploaded HTML file.
///
/// Records are recomputed from the file on every read and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    /// File name without extension
    pub id: String,

    /// Same as `id`; used in URLs
    pub slug: String,

    /// Fallback display title
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_ja: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_en: Option<String>,

    /// Date prefix of the file name at 15:00 UTC, else extraction time
    pub published_at: DateTime<Utc>,

    /// Modification time of the source file
    pub last_modified: DateTime<Utc>,

    pub category: Category,

    /// At most 200 characters
    pub excerpt: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt_ja: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt_en: Option<String>,

    /// Free-form tags, at most 10
    pub tags: Vec<String>,

    /// Tech tag ids in inference order
    pub tech_tags: Vec<String>,

    /// Top three tech tags after priority sort
    pub primary_tech_tags: Vec<String>,

    pub content_languages: ContentLanguages,

    /// Minutes at 200 characters per minute, at least 1
    pub read_time: u32,

    /// Character count of the body text
    pub word_count: usize,

    pub author: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,

    pub images: Vec<String>,

    /// The untouched source HTML
    pub content: String,
}

impl ArticleRecord {
    /// Title for the given language, falling back to `title`.
    pub fn display_title(&self, language: Language) -> &str {
        let localized = match language {
            Language::Ja => self.title_ja.as_deref(),
            Language::En => self.title_en.as_deref(),
        };
        localized.unwrap_or(&self.title)
    }

    /// Excerpt for the given language, falling back to `excerpt`.
    pub fn display_excerpt(&self, language: Language) -> &str {
        let localized = match language {
            Language::Ja => self.excerpt_ja.as_deref(),
            Language::En => self.excerpt_en.as_deref(),
        };
        localized.unwrap_or(&self.excerpt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parsing() {
        assert_eq!("ja-JP".parse::<Language>(), Ok(Language::Ja));
        assert_eq!("EN".parse::<Language>(), Ok(Language::En));
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_content_languages_from_flags() {
        assert_eq!(ContentLanguages::from_flags(true, true), ContentLanguages::Both);
        assert_eq!(ContentLanguages::from_flags(true, false), ContentLanguages::Ja);
        assert_eq!(ContentLanguages::from_flags(false, true), ContentLanguages::En);
        assert_eq!(ContentLanguages::from_flags(false, false), ContentLanguages::Both);
        assert!(ContentLanguages::Both.includes(Language::En));
        assert!(!ContentLanguages::Ja.includes(Language::En));
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::Maritime.label(Language::Ja), "海洋安全保障");
        assert_eq!(Category::Other.label(Language::En), "Others");
        assert_eq!(
            serde_json::to_string(&Category::CyberSecurity).unwrap(),
            "\"cyber_security\""
        );
    }
}
