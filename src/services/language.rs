//! Content language detection.

use crate::html::Document;
use crate::models::{ContentLanguages, Language};
use crate::services::extractor::EXCERPT_LIMIT;
use crate::utils::truncate_chars;

/// Share of Japanese characters that marks a body as Japanese.
pub const JAPANESE_RATIO: f64 = 0.10;

/// Share of Latin letters that marks a body as English. Higher than the
/// Japanese threshold because digits and punctuation dilute it.
pub const LATIN_RATIO: f64 = 0.30;

/// Per-language titles, excerpts and the detected content languages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageInfo {
    pub title_ja: Option<String>,
    pub title_en: Option<String>,
    pub excerpt_ja: Option<String>,
    pub excerpt_en: Option<String>,
    pub content_languages: ContentLanguages,
}

fn is_japanese(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' | '\u{4E00}'..='\u{9FAF}')
}

/// Whether at least `ratio` of the characters satisfy `pred`.
fn meets_ratio(text: &str, ratio: f64, pred: impl Fn(char) -> bool) -> bool {
    let total = text.chars().count();
    if total == 0 {
        return false;
    }
    let hits = text.chars().filter(|c| pred(*c)).count();
    hits as f64 >= total as f64 * ratio
}

/// Whether the text reads as Japanese.
pub fn has_japanese(text: &str) -> bool {
    meets_ratio(text, JAPANESE_RATIO, is_japanese)
}

/// Whether the text reads as English.
pub fn has_english(text: &str) -> bool {
    meets_ratio(text, LATIN_RATIO, |c| c.is_ascii_alphabetic())
}

/// Parse an `article:languages` value such as `ja,en`. Values naming
/// neither language mean both.
fn declared_languages(value: &str) -> ContentLanguages {
    let langs: Vec<String> = value
        .to_lowercase()
        .split(',')
        .map(|s| s.trim().to_string())
        .collect();
    let ja = langs.iter().any(|l| l == "ja");
    let en = langs.iter().any(|l| l == "en");
    if ja || en {
        ContentLanguages::from_flags(ja, en)
    } else {
        ContentLanguages::Both
    }
}

/// Non-blank `content` of a `<meta name>`.
fn meta_text(doc: &Document, name: &str) -> Option<String> {
    doc.meta_name(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Language hint from `article:language`, `language` or `<html lang>`.
fn language_hint(doc: &Document) -> Option<Language> {
    let hint = doc
        .meta_name("article:language")
        .or_else(|| doc.meta_name("language"))
        .or_else(|| doc.html_lang())?;
    match hint.trim() {
        "ja" | "ja-JP" => Some(Language::Ja),
        "en" | "en-US" => Some(Language::En),
        _ => None,
    }
}

/// Work out which languages an article is written in.
///
/// Explicit meta tags win. Otherwise the body text is measured, and when
/// exactly one language is found the default title and excerpt are
/// credited to it unless a per-language meta tag already supplied one.
pub fn detect(
    doc: &Document,
    body_text: &str,
    default_title: &str,
    default_excerpt: &str,
) -> LanguageInfo {
    let mut info = LanguageInfo {
        title_ja: meta_text(doc, "title:ja"),
        title_en: meta_text(doc, "title:en"),
        excerpt_ja: meta_text(doc, "description:ja").map(|d| truncate_chars(&d, EXCERPT_LIMIT)),
        excerpt_en: meta_text(doc, "description:en").map(|d| truncate_chars(&d, EXCERPT_LIMIT)),
        content_languages: ContentLanguages::Both,
    };

    if let Some(declared) = meta_text(doc, "article:languages") {
        info.content_languages = declared_languages(&declared);
        return info;
    }

    let ja = has_japanese(body_text);
    let en = has_english(body_text);

    let detected = match (ja, en) {
        (true, true) => None,
        (true, false) => Some(Language::Ja),
        (false, true) => Some(Language::En),
        (false, false) => {
            info.content_languages = match language_hint(doc) {
                Some(Language::Ja) => ContentLanguages::Ja,
                Some(Language::En) => ContentLanguages::En,
                None => ContentLanguages::Both,
            };
            return info;
        }
    };

    match detected {
        None => info.content_languages = ContentLanguages::Both,
        Some(Language::Ja) => {
            info.content_languages = ContentLanguages::Ja;
            credit_defaults(&mut info.title_ja, &mut info.excerpt_ja, default_title, default_excerpt);
        }
        Some(Language::En) => {
            info.content_languages = ContentLanguages::En;
            credit_defaults(&mut info.title_en, &mut info.excerpt_en, default_title, default_excerpt);
        }
    }
    info
}

fn credit_defaults(
    title: &mut Option<String>,
    excerpt: &mut Option<String>,
    default_title: &str,
    default_excerpt: &str,
) {
    if title.is_none() && !default_title.is_empty() {
        *title = Some(default_title.to_string());
    }
    if excerpt.is_none() && !default_excerpt.is_empty() {
        *excerpt = Some(default_excerpt.to_string());
    }
}
