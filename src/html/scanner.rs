// src/html/scanner.rs

//! Lightweight tag scanner for metadata extraction.
//!
//! Field extraction only needs a handful of elements (`title`, `h1`, `p`,
//! `meta`, `img`, headings), so the document is scanned tag by tag with
//! regexes instead of being built into a DOM tree. Comments and the bodies
//! of `<script>`/`<style>` elements are dropped up front so their contents
//! never look like markup or text.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment regex"));
static RAW_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("raw text regex")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(/?)([A-Za-z][A-Za-z0-9:-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#)
        .expect("tag regex")
});
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'=<>/]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("attribute regex")
});
static ANY_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("strip regex"));
static HEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<head\b[^>]*>.*?</head\s*>").expect("head regex"));
static TITLE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title\b[^>]*>.*?</title\s*>").expect("title regex"));
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").expect("entity regex")
});

/// One start or end tag found by the scanner.
#[derive(Debug, Clone)]
pub struct Tag<'a> {
    /// Lower-cased element name
    pub name: String,
    /// Whether this is an end tag (`</x>`)
    pub closing: bool,
    /// Byte offset of `<`
    pub start: usize,
    /// Byte offset just past `>`
    pub end: usize,
    raw_attrs: &'a str,
}

impl Tag<'_> {
    /// Attribute value with entities decoded. Names compare case-insensitively.
    pub fn attr(&self, name: &str) -> Option<String> {
        ATTR_RE.captures_iter(self.raw_attrs).find_map(|caps| {
            if !caps[1].eq_ignore_ascii_case(name) {
                return None;
            }
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            Some(decode_entities(value))
        })
    }
}

/// A scanned HTML document.
#[derive(Debug, Clone)]
pub struct Document {
    source: String,
}

impl Document {
    /// Prepare a document for scanning. Never fails.
    pub fn parse(html: &str) -> Self {
        let without_comments = COMMENT_RE.replace_all(html, "");
        let source = RAW_TEXT_RE.replace_all(&without_comments, "").into_owned();
        Self { source }
    }

    /// All start and end tags in document order.
    pub fn tags(&self) -> impl Iterator<Item = Tag<'_>> {
        self.tags_from(0)
    }

    /// Start tags of the given element name.
    pub fn elements(&self, name: &str) -> impl Iterator<Item = Tag<'_>> {
        let name = name.to_ascii_lowercase();
        self.tags()
            .filter(move |tag| !tag.closing && tag.name == name)
    }

    /// Text content of the element opened by `open`, up to its end tag.
    pub fn inner_text(&self, open: &Tag<'_>) -> String {
        let rest = &self.source[open.end..];
        let close = self
            .tags_from(open.end)
            .find(|tag| tag.closing && tag.name == open.name)
            .map_or(rest.len(), |tag| tag.start - open.end);
        markup_to_text(&rest[..close])
    }

    /// Trimmed text of the first element with non-empty text.
    ///
    /// Only the first occurrence is considered, matching `querySelector`.
    pub fn first_text(&self, name: &str) -> Option<String> {
        let open = self.elements(name).next()?;
        let text = self.inner_text(&open);
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// `content` of the first `<meta>` whose `key` attribute equals `value`.
    pub fn meta(&self, key: &str, value: &str) -> Option<String> {
        self.elements("meta")
            .find(|tag| tag.attr(key).as_deref() == Some(value))
            .and_then(|tag| tag.attr("content"))
    }

    /// Shorthand for `<meta name="...">`.
    pub fn meta_name(&self, value: &str) -> Option<String> {
        self.meta("name", value)
    }

    /// `lang` attribute of the root element.
    pub fn html_lang(&self) -> Option<String> {
        self.elements("html").next().and_then(|tag| tag.attr("lang"))
    }

    /// Text content of the body.
    ///
    /// Without a `<body>` tag, the whole document minus `<head>` and
    /// `<title>` stands in for it.
    pub fn body_text(&self) -> String {
        match self.elements("body").next() {
            Some(open) => self.inner_text(&open),
            None => {
                let without_head = HEAD_RE.replace_all(&self.source, "");
                let without_title = TITLE_BLOCK_RE.replace_all(&without_head, "");
                markup_to_text(&without_title)
            }
        }
    }

    /// Tags starting at or after byte `offset`.
    fn tags_from(&self, offset: usize) -> impl Iterator<Item = Tag<'_>> {
        TAG_RE.captures_iter(&self.source[offset..]).map(move |caps| {
            let whole = caps.get(0).expect("match");
            Tag {
                name: caps[2].to_ascii_lowercase(),
                closing: !caps[1].is_empty(),
                start: offset + whole.start(),
                end: offset + whole.end(),
                raw_attrs: caps.get(3).map_or("", |m| m.as_str()),
            }
        })
    }
}

/// Remove all tags and decode entities, keeping whitespace as written.
pub fn markup_to_text(markup: &str) -> String {
    decode_entities(&ANY_TAG_RE.replace_all(markup, ""))
}

/// Decode numeric and common named character references.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body
                .strip_prefix("#x")
                .or_else(|| body.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(body)
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "mdash" => '—',
        "ndash" => '–',
        "hellip" => '…',
        "laquo" => '«',
        "raquo" => '»',
        "ldquo" => '“',
        "rdquo" => '”',
        "lsquo" => '‘',
        "rsquo" => '’',
        "middot" => '·',
        "times" => '×',
        "rarr" => '→',
        "larr" => '←',
        "yen" => '¥',
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_text_skips_comments_and_scripts() {
        let doc = Document::parse(
            "<!-- <title>old</title> --><script>var t = '<title>js</title>';</script>\
             <title> Real &amp; Title </title>",
        );
        assert_eq!(doc.first_text("title").as_deref(), Some("Real & Title"));
    }

    #[test]
    fn test_first_text_only_checks_first_element() {
        let doc = Document::parse("<h1>  </h1><h1>Second</h1>");
        assert_eq!(doc.first_text("h1"), None);
    }

    #[test]
    fn test_meta_lookup() {
        let doc = Document::parse(
            r#"<meta property="og:image" content="/a.png"><META NAME='keywords' CONTENT="a, b">"#,
        );
        assert_eq!(doc.meta("property", "og:image").as_deref(), Some("/a.png"));
        assert_eq!(doc.meta_name("keywords").as_deref(), Some("a, b"));
        assert_eq!(doc.meta_name("description"), None);
    }

    #[test]
    fn test_attr_with_quoted_gt() {
        let doc = Document::parse(r#"<img alt="a > b" src="x.png">"#);
        let img = doc.elements("img").next().unwrap();
        assert_eq!(img.attr("src").as_deref(), Some("x.png"));
        assert_eq!(img.attr("alt").as_deref(), Some("a > b"));
    }

    #[test]
    fn test_body_text_with_and_without_body() {
        let doc = Document::parse("<head><title>T</title></head><body><p>a</p><p>b</p></body>");
        assert_eq!(doc.body_text(), "ab");

        let doc = Document::parse("<title>T</title><p>only</p><style>p{}</style>");
        assert!(doc.elements("body").next().is_none());
        assert_eq!(doc.body_text(), "only");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("&lt;b&gt; &#26085; &#x672C; &bogus;"), "<b> 日 本 &bogus;");
    }

    #[test]
    fn test_html_lang() {
        let doc = Document::parse(r#"<!DOCTYPE html><html lang="ja-JP"><body></body></html>"#);
        assert_eq!(doc.html_lang().as_deref(), Some("ja-JP"));
    }
}
