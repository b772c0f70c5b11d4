// src/html/segments.rs

//! Splits an article into its style, script and body segments.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static STYLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("style").expect("style selector"));
static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("script selector"));
static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("body selector"));
static HEAD_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("head").expect("head selector"));

/// Matches both `<style>` and `<style media="...">`.
static STYLE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style(?:\s[^>]*)?>(.*?)</style\s*>").expect("style block regex")
});
static BODY_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<body[\s>/]").expect("body tag regex"));
static FIRST_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[a-zA-Z]").expect("first tag regex"));
static RESET_MARGIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"margin:\s*0").expect("margin regex"));
static RESET_PADDING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"padding:\s*0").expect("padding regex"));

/// Script `type` values that carry data, not code.
const DATA_SCRIPT_TYPES: [&str; 2] = ["application/json", "application/ld+json"];

/// The three parts of an article the renderer works with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments {
    /// Concatenated text of every `<style>` block
    pub style_text: String,
    /// Concatenated inline, executable scripts
    pub script_text: String,
    /// Body markup with all style and script elements removed
    pub body_markup: String,
}

/// Split raw article HTML into style, script and body segments.
pub fn split_segments(html: &str) -> Segments {
    let mut document = Html::parse_document(html);
    let mut detached = Vec::new();

    let mut styles = Vec::new();
    for style in document.select(&STYLE_SELECTOR) {
        styles.push(style.text().collect::<String>());
        detached.push(style.id());
    }
    log::debug!("Found {} style elements via structured parse", styles.len());

    if styles.is_empty() {
        styles = scan_style_blocks(html);
        if !styles.is_empty() {
            log::debug!("Recovered {} style blocks by pattern scan", styles.len());
        }
    }

    let mut scripts = Vec::new();
    for script in document.select(&SCRIPT_SELECTOR) {
        let element = script.value();
        let is_external = element.attr("src").is_some();
        let is_data = element
            .attr("type")
            .is_some_and(|t| DATA_SCRIPT_TYPES.contains(&t.trim().to_ascii_lowercase().as_str()));
        if !is_external && !is_data {
            scripts.push(script.text().collect::<String>());
        }
        detached.push(script.id());
    }

    for id in detached {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    let body_markup = body_markup(&mut document, html);

    let segments = Segments {
        style_text: join_blocks(styles),
        script_text: join_blocks(scripts),
        body_markup,
    };
    log::debug!(
        "Split article: {} chars of CSS, {} chars of script, {} chars of body",
        segments.style_text.len(),
        segments.script_text.len(),
        segments.body_markup.len()
    );
    segments
}

/// Pattern scan used when the structured parse found no style elements.
fn scan_style_blocks(html: &str) -> Vec<String> {
    STYLE_BLOCK_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|css| !css.trim().is_empty())
        .map(str::to_string)
        .collect()
}

fn join_blocks(blocks: Vec<String>) -> String {
    blocks
        .into_iter()
        .filter(|block| !block.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn body_markup(document: &mut Html, html: &str) -> String {
    if !BODY_TAG_RE.is_match(html) {
        log::debug!("No <body> tag; using the document without <head>");
        let head_ids: Vec<_> = document.select(&HEAD_SELECTOR).map(|h| h.id()).collect();
        for id in head_ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }

    let Some(body) = document.select(&BODY_SELECTOR).next() else {
        return document.root_element().inner_html();
    };

    let markup = body.inner_html();
    if !looks_like_leaked_css(&markup) {
        return markup;
    }

    log::debug!("Raw CSS text detected in body content; re-slicing at first tag");
    match FIRST_TAG_RE.find(&markup) {
        Some(m) if m.start() > 0 => markup[m.start()..].to_string(),
        _ => {
            let children: Vec<String> = body
                .children()
                .filter_map(ElementRef::wrap)
                .map(|child| child.html())
                .collect();
            if children.is_empty() {
                markup
            } else {
                children.concat()
            }
        }
    }
}

/// Stylesheet text that ended up as body text instead of inside `<style>`.
fn looks_like_leaked_css(markup: &str) -> bool {
    markup.trim_start().starts_with("* {")
        || (RESET_MARGIN_RE.is_match(markup)
            && RESET_PADDING_RE.is_match(markup)
            && !markup.contains('<'))
}
