// src/services/extractor.rs

//! Article metadata extraction.
//!
//! Every field degrades to a fallback value instead of failing, so any
//! byte string that decodes as text produces a record.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::html::Document;
use crate::models::{ArticleRecord, Category, SiteConfig};
use crate::services::language;
use crate::services::tech_tags::{infer_tech_tags, primary_tech_tags};
use crate::utils::url::{is_image_url, resolve_asset};
use crate::utils::{date_prefix, slug_from_file_name, truncate_chars};

/// Title used when neither `<title>` nor `<h1>` has text.
pub const UNTITLED: &str = "タイトルなし";

/// Maximum excerpt length in characters.
pub const EXCERPT_LIMIT: usize = 200;

/// Maximum number of free-form tags.
pub const MAX_TAGS: usize = 10;

/// Reading speed used for `read_time`.
pub const CHARS_PER_MINUTE: usize = 200;

/// Fixed vocabulary matched against file name and title.
const BASIC_TAGS: [&str; 6] = ["防衛", "安全保障", "AI", "技術", "分析", "レポート"];

/// Category keywords, checked top to bottom; first hit wins.
const CATEGORY_RULES: &[(&[&str], Category)] = &[
    (&["dashboard", "ダッシュボード"], Category::Dashboard),
    (&["ai", "人工知能"], Category::Technology),
    (&["cyber", "サイバー"], Category::CyberSecurity),
    (&["intel", "intelligence", "情報"], Category::Intelligence),
    (&["iran", "israel", "international"], Category::International),
    (&["policy", "方針", "政策"], Category::DefensePolicy),
    (&["space", "宇宙"], Category::SpaceDefense),
    (&["maritime", "海洋"], Category::Maritime),
    (&["analysis", "分析"], Category::Analysis),
];

static BACKGROUND_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"background-image:\s*url\(['"]?([^'")]+)['"]?\)"#).expect("background image regex")
});

/// Builds [`ArticleRecord`]s from raw HTML.
#[derive(Debug, Clone)]
pub struct ArticleExtractor {
    articles_url_prefix: String,
    default_author: String,
}

impl Default for ArticleExtractor {
    fn default() -> Self {
        Self::new(&SiteConfig::default())
    }
}

impl ArticleExtractor {
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            articles_url_prefix: site.articles_url_prefix.clone(),
            default_author: site.default_author.clone(),
        }
    }

    /// Extract a record from one article file.
    pub fn extract(&self, html: &str, file_name: &str, modified_at: DateTime<Utc>) -> ArticleRecord {
        let doc = Document::parse(html);
        let slug = slug_from_file_name(file_name).to_string();

        let title = extract_title(&doc);
        let body_text = doc.body_text();
        let excerpt = extract_excerpt(&doc, &body_text);
        let tags = extract_tags(&doc, file_name, &title);
        let tech_tags = infer_tech_tags(file_name, &title, &tags);
        let primary = primary_tech_tags(&tech_tags);
        let languages = language::detect(&doc, &body_text, &title, &excerpt);
        let word_count = body_text.chars().count();

        log::debug!(
            "Extracted {slug}: {word_count} chars, {} tags, {} tech tags",
            tags.len(),
            tech_tags.len()
        );

        ArticleRecord {
            id: slug.clone(),
            slug,
            published_at: date_prefix(file_name).unwrap_or_else(Utc::now),
            last_modified: modified_at,
            category: categorize(file_name, &title),
            title_ja: languages.title_ja,
            title_en: languages.title_en,
            excerpt_ja: languages.excerpt_ja,
            excerpt_en: languages.excerpt_en,
            content_languages: languages.content_languages,
            title,
            excerpt,
            tags,
            tech_tags,
            primary_tech_tags: primary,
            read_time: read_time(word_count),
            word_count,
            author: self.author(&doc),
            featured_image: self.featured_image(&doc),
            images: self.images(&doc),
            content: html.to_string(),
        }
    }

    fn author(&self, doc: &Document) -> String {
        doc.meta_name("author")
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| self.default_author.clone())
    }

    /// `<img src>` and inline `background-image` URLs, resolved and deduplicated.
    fn images(&self, doc: &Document) -> Vec<String> {
        let from_img = doc.elements("img").filter_map(|img| img.attr("src"));
        let from_style: Vec<String> = doc
            .tags()
            .filter(|tag| !tag.closing)
            .filter_map(|tag| tag.attr("style"))
            .flat_map(|style| {
                BACKGROUND_IMAGE_RE
                    .captures_iter(&style)
                    .map(|caps| caps[1].to_string())
                    .collect::<Vec<_>>()
            })
            .collect();

        let mut images: Vec<String> = Vec::new();
        for url in from_img.chain(from_style) {
            if !is_image_url(&url) {
                continue;
            }
            let resolved = resolve_asset(&self.articles_url_prefix, &url);
            if !images.contains(&resolved) {
                images.push(resolved);
            }
        }
        images
    }

    /// Open Graph, then Twitter Card, then `featured-image`, then the first `<img>`.
    ///
    /// A source that does not look like an image is skipped in favour of the next.
    fn featured_image(&self, doc: &Document) -> Option<String> {
        let url = doc
            .meta("property", "og:image")
            .filter(|url| is_image_url(url))
            .or_else(|| doc.meta_name("twitter:image").filter(|url| is_image_url(url)))
            .or_else(|| doc.meta_name("featured-image").filter(|url| is_image_url(url)))
            .or_else(|| {
                doc.elements("img")
                    .next()
                    .and_then(|img| img.attr("src"))
                    .filter(|src| is_image_url(src))
            })?;
        Some(resolve_asset(&self.articles_url_prefix, &url))
    }
}

/// Extract with the default site settings.
pub fn extract(html: &str, file_name: &str, modified_at: DateTime<Utc>) -> ArticleRecord {
    ArticleExtractor::default().extract(html, file_name, modified_at)
}

fn extract_title(doc: &Document) -> String {
    doc.first_text("title")
        .or_else(|| doc.first_text("h1"))
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Category from file name and title. Tech tags play no part.
pub fn categorize(file_name: &str, title: &str) -> Category {
    let text = format!("{file_name} {title}").to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| text.contains(kw)))
        .map_or(Category::Other, |(_, category)| *category)
}

fn extract_excerpt(doc: &Document, body_text: &str) -> String {
    let description = doc
        .meta_name("description")
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    let source = description
        .or_else(|| doc.first_text("p"))
        .unwrap_or_else(|| body_text.trim().to_string());
    truncate_chars(&source, EXCERPT_LIMIT)
}

/// Meta keywords first, then vocabulary hits; deduplicated and capped.
fn extract_tags(doc: &Document, file_name: &str, title: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    let mut add = |tag: &str| {
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    };

    if let Some(keywords) = doc.meta_name("keywords") {
        keywords.split(',').map(str::trim).for_each(&mut add);
    }

    let text = format!("{file_name} {title}").to_lowercase();
    for word in BASIC_TAGS {
        if text.contains(&word.to_lowercase()) {
            add(word);
        }
    }

    tags.truncate(MAX_TAGS);
    tags
}

/// Minutes to read `chars` characters, at least one.
pub fn read_time(chars: usize) -> u32 {
    let minutes = (chars as f64 / CHARS_PER_MINUTE as f64).round() as u32;
    minutes.max(1)
}
