//! Table of contents from article headings.

use crate::html::Document;
use crate::models::TocEntry;

const HEADINGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// `h1`-`h6` entries in document order.
///
/// Headings without an `id` get `heading-<n>`, where `n` counts every
/// heading seen so far, including skipped empty ones.
pub fn table_of_contents(html: &str) -> Vec<TocEntry> {
    let doc = Document::parse(html);
    doc.tags()
        .filter(|tag| !tag.closing && HEADINGS.contains(&tag.name.as_str()))
        .enumerate()
        .filter_map(|(index, tag)| {
            let text = doc.inner_text(&tag).trim().to_string();
            if text.is_empty() {
                return None;
            }
            let level = tag.name[1..].parse().unwrap_or(1);
            let id = tag
                .attr("id")
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("heading-{index}"));
            Some(TocEntry { level, text, id })
        })
        .collect()
}
