// src/render/scripts.rs

//! Rewrites article scripts so several of them can share one page.
//!
//! Article scripts are written as if they own the page: they declare
//! top-level `currentLang` and `observer` bindings and expect
//! `setLanguage` to be called from a click. Running two of them, or the
//! same one twice, would throw on redeclaration, so those bindings are
//! moved onto a namespace object (`window` unless configured otherwise).

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Regex, Replacer};

static LANG_LITERAL_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:let|const|var)\s+currentLang\s*=\s*['"](?:ja|en)['"]\s*;?"#)
        .expect("currentLang literal regex")
});
static LANG_EMPTY_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:let|var)\s+currentLang\s*;").expect("currentLang empty regex")
});
static LANG_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:let|const|var)\s+currentLang\s*=").expect("currentLang decl regex")
});
static LANG_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bcurrentLang\b").expect("currentLang ref regex"));
static OBSERVER_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:let|const|var)\s+observer\s*=").expect("observer decl regex")
});
static OBSERVER_ASSIGN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bobserver\s*=").expect("observer assign regex"));
static OBSERVER_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bobserver\b").expect("observer ref regex"));
static FUNCTION_HEAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bfunction\s*[\w$]*\s*$").expect("function head regex")
});
static SET_LANGUAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"function\s+setLanguage\s*\(\s*lang\s*\)\s*\{").expect("setLanguage regex")
});
static EVENT_TARGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bevent\.target\b").expect("event target regex"));

const GUARDED_EVENT_TARGET: &str = "(event && event.target ? event.target : document.activeElement)";

/// Whether the identifier at `start` is a property or part of a longer name.
fn is_qualified(src: &str, start: usize) -> bool {
    src[..start]
        .chars()
        .next_back()
        .is_some_and(|c| c == '.' || c == '$' || c == '_' || c.is_alphanumeric())
}

/// Replace matches of `re` that are not member accesses.
///
/// `followed_by` lists characters that, right after the match, mean the
/// match is something else (`==` comparisons, `=>` arrow parameters).
fn replace_unqualified(src: &str, re: &Regex, replacement: &str, followed_by: &[char]) -> String {
    let mut out = String::with_capacity(src.len());
    let mut last = 0;
    for m in re.find_iter(src) {
        if is_qualified(src, m.start()) || src[m.end()..].starts_with(followed_by) {
            continue;
        }
        out.push_str(&src[last..m.start()]);
        out.push_str(replacement);
        last = m.end();
    }
    out.push_str(&src[last..]);
    out
}

fn skip_whitespace(src: &str, pos: usize) -> usize {
    let rest = &src[pos..];
    pos + rest.len() - rest.trim_start().len()
}

/// If the identifier at `start..end` is a function or arrow parameter,
/// the offset just past its parameter list.
fn parameter_list_end(src: &str, start: usize, end: usize) -> Option<usize> {
    if src[end..].trim_start().starts_with("=>") {
        return Some(end);
    }

    let mut depth = 0usize;
    let mut open = None;
    for (i, c) in src[..start].char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' if depth == 0 => {
                open = Some(i);
                break;
            }
            '(' => depth -= 1,
            ';' | '{' | '}' => return None,
            _ => {}
        }
    }
    let open = open?;

    let mut depth = 0usize;
    let mut close = None;
    for (i, c) in src[end..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => {
                close = Some(end + i + 1);
                break;
            }
            ')' => depth -= 1,
            ';' | '{' | '}' => return None,
            _ => {}
        }
    }
    let close = close?;

    let is_arrow = src[close..].trim_start().starts_with("=>");
    (is_arrow || FUNCTION_HEAD_RE.is_match(&src[..open])).then_some(close)
}

/// Extent of the function body that follows a parameter list at `from`.
fn body_range(src: &str, from: usize) -> Range<usize> {
    let mut pos = skip_whitespace(src, from);
    if src[pos..].starts_with("=>") {
        pos = skip_whitespace(src, pos + 2);
    }
    let braced = src[pos..].starts_with('{');
    let mut depth = 0usize;
    for (i, c) in src[pos..].char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' if depth == 0 => return pos..pos + i,
            ')' | ']' | '}' => {
                depth -= 1;
                if braced && depth == 0 {
                    return pos..pos + i + 1;
                }
            }
            ',' | ';' if depth == 0 && !braced => return pos..pos + i,
            _ => {}
        }
    }
    pos..src.len()
}

/// Point bare `observer` reads at the namespaced binding.
///
/// Parameters named `observer` and the bodies they shadow are left
/// alone, as are object keys and string contents.
fn redirect_observer_reads(src: &str, replacement: &str) -> String {
    let mut params = Vec::new();
    let mut shadowed = Vec::new();
    for m in OBSERVER_REF_RE.find_iter(src) {
        if is_qualified(src, m.start()) {
            continue;
        }
        if let Some(list_end) = parameter_list_end(src, m.start(), m.end()) {
            params.push(m.start());
            shadowed.push(body_range(src, list_end));
        }
    }

    let mut out = String::with_capacity(src.len());
    let mut last = 0;
    for m in OBSERVER_REF_RE.find_iter(src) {
        let at = m.start();
        let quoted = src[..at].ends_with(['\'', '"', '`']);
        let object_key = src[m.end()..].trim_start().starts_with(':');
        if is_qualified(src, at)
            || quoted
            || object_key
            || params.contains(&at)
            || shadowed.iter().any(|body| body.contains(&at))
        {
            continue;
        }
        out.push_str(&src[last..at]);
        out.push_str(replacement);
        last = m.end();
    }
    out.push_str(&src[last..]);
    out
}

fn replace_all(src: &str, re: &Regex, rep: impl Replacer) -> String {
    re.replace_all(src, rep).into_owned()
}

/// Article script rewriter.
#[derive(Debug, Clone)]
pub struct ScriptRewriter {
    namespace: String,
}

impl Default for ScriptRewriter {
    fn default() -> Self {
        Self::new("window")
    }
}

impl ScriptRewriter {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Apply every rewrite in order.
    pub fn rewrite(&self, script: &str) -> String {
        let ns = &self.namespace;
        let lang = format!("{ns}.currentLang");
        let lang_assign = format!("{lang} =");
        let observer = format!("{ns}.observer");
        let observer_assign = format!("{observer} =");

        // currentLang: drop literal initialisers, the host sets the value
        let s = replace_all(script, &LANG_LITERAL_DECL_RE, "");
        let s = replace_all(&s, &LANG_EMPTY_DECL_RE, "");
        let s = replace_all(&s, &LANG_DECL_RE, regex::NoExpand(&lang_assign));
        let s = replace_unqualified(&s, &LANG_REF_RE, &lang, &[]);

        // observer; under `window` bare reads already resolve to the global
        let before = s;
        let s = replace_all(&before, &OBSERVER_DECL_RE, regex::NoExpand(&observer_assign));
        let s = replace_unqualified(&s, &OBSERVER_ASSIGN_RE, &observer_assign, &['=', '>']);
        let s = if ns.as_str() != "window" && s != before {
            redirect_observer_reads(&s, &observer)
        } else {
            s
        };

        // setLanguage may be called without a click event
        let s = replace_all(&s, &SET_LANGUAGE_RE, "function setLanguage(lang, event) {");
        replace_all(&s, &EVENT_TARGET_RE, GUARDED_EVENT_TARGET)
    }
}
