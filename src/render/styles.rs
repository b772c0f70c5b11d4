// src/render/styles.rs

//! Stylesheet namespacing.
//!
//! The rewrite is textual. Selectors inside comments or string literals
//! are rewritten too, and complex selectors that merely mention `body`
//! (e.g. `body.en .x`) are left alone. A selector-list AST transform would
//! fix both; until then treat the output as a close approximation.

use std::sync::LazyLock;

use regex::{Captures, NoExpand, Regex};

static UNIVERSAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\*").expect("universal selector regex"));
static HTML_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bhtml\b").expect("html selector regex"));
// The leading group keeps `tbody`, `.card-body` and `#body` out.
static BODY_RULE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[\s,}>+~])body\s*\{([^}]*)\}").expect("body rule regex")
});
static LANGUAGE_HIDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[^{}]*\[lang=["'](?:ja|en)["']\][^{}]*\{[^}]*display:\s*none[^}]*\}"#)
        .expect("language rule regex")
});

/// Replacement for neutralized language rules.
pub const DISABLED_LANGUAGE_CSS: &str = "/* Disabled language CSS */";

/// Confine an article stylesheet to `container` (e.g. `.article-content`).
///
/// - a `*` opening a line becomes `<container> *`
/// - every `html` token becomes the container
/// - `body { ... }` moves onto the container, which is also stretched to
///   the full viewport width so the article can break out of the host layout
/// - rules that hide `[lang="ja"]`/`[lang="en"]` with `display: none` are
///   commented out, since the host owns language switching
pub fn namespace_styles(css: &str, container: &str) -> String {
    if css.trim().is_empty() {
        return String::new();
    }

    let universal = format!("{container} *");
    let css = UNIVERSAL_RE.replace_all(css, NoExpand(&universal));
    let css = HTML_RE.replace_all(&css, NoExpand(container));
    let css = BODY_RULE_RE.replace_all(&css, |caps: &Captures| {
        format!(
            "{}{container} {{{}}}\n{container} {{\n  min-height: 100vh;\n  width: 100vw;\n  \
             margin-left: calc(-50vw + 50%);\n  margin-right: calc(-50vw + 50%);\n  \
             display: block;\n  position: relative;\n  box-sizing: border-box;\n}}",
            &caps[1], &caps[2]
        )
    });
    let css = LANGUAGE_HIDE_RE.replace_all(&css, DISABLED_LANGUAGE_CSS);

    log::debug!("Namespaced stylesheet: {} bytes", css.len());
    css.into_owned()
}

/// Host rules appended after the article's own stylesheet.
///
/// Resets the container box, shrinks in-article language buttons, and
/// drives `[lang]` visibility from the `en` class on the container or body.
pub fn host_styles(container: &str) -> String {
    let c = container;
    format!(
        r#"
{c} {{
  margin: 0 !important;
  padding: 0 !important;
  width: 100% !important;
  min-height: 100vh !important;
  box-sizing: border-box !important;
}}

{c} .language-switcher,
{c} .lang-toggle,
{c} .language-toggle,
{c} .lang {{
  position: fixed !important;
  top: 10px !important;
  right: 10px !important;
  z-index: 100 !important;
  transform: scale(0.6) !important;
  opacity: 0.7 !important;
}}

{c} .lang-btn {{
  font-size: 11px !important;
  padding: 4px 8px !important;
  margin: 0 2px !important;
}}

{c} [lang="en"] {{
  display: none !important;
}}

{c} [lang="ja"] {{
  display: block !important;
}}

{c}.en [lang="ja"],
body.en {c} [lang="ja"] {{
  display: none !important;
}}

{c}.en [lang="en"],
body.en {c} [lang="en"] {{
  display: block !important;
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const C: &str = ".article-content";

    #[test]
    fn test_universal_and_html_selectors() {
        let css = "* { box-sizing: border-box; }\nhtml { font-size: 16px; }";
        let out = namespace_styles(css, C);
        assert!(out.starts_with(".article-content * {"));
        assert!(out.contains(".article-content { font-size: 16px; }"));
        assert!(!out.contains("html"));
    }

    #[test]
    fn test_html_substitution_is_idempotent() {
        let once = namespace_styles("html, p { color: red }\n.x html .y {}", C);
        let twice = namespace_styles(&once, C);
        assert!(!HTML_RE.is_match(&once));
        assert!(!HTML_RE.is_match(&twice));
    }

    #[test]
    fn test_body_rule_moves_to_container() {
        let out = namespace_styles("body { background: #000; }", C);
        assert!(out.contains(".article-content { background: #000; }"));
        assert!(out.contains("min-height: 100vh;"));
        assert!(out.contains("margin-left: calc(-50vw + 50%);"));
        assert!(!out.contains("body"));
    }

    #[test]
    fn test_body_lookalikes_are_untouched() {
        let css = "tbody { color: red }\n.card-body { padding: 0 }";
        assert_eq!(namespace_styles(css, C), css);
    }

    #[test]
    fn test_language_hiding_rules_are_disabled() {
        let css = ".en [lang=\"ja\"] { display: none; }\n\
                   .x, [lang='en'] { color: red; display:none }\n\
                   [lang=\"ja\"] { color: blue }";
        let out = namespace_styles(css, C);
        assert_eq!(out.matches(DISABLED_LANGUAGE_CSS).count(), 2);
        assert!(out.contains("[lang=\"ja\"] { color: blue }"));
        assert!(!out.contains("display: none"));
    }

    #[test]
    fn test_empty_stylesheet() {
        assert_eq!(namespace_styles("  \n", C), "");
    }

    #[test]
    fn test_host_styles_use_container() {
        let css = host_styles(".wrap");
        assert!(css.contains(".wrap.en [lang=\"en\"]"));
        assert!(css.contains("body.en .wrap [lang=\"ja\"]"));
        assert!(!css.contains("article-content"));
    }
}
