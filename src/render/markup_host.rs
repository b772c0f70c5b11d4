// src/render/markup_host.rs

//! A [`ScriptHost`] that writes `<script>` markup instead of running code.
//!
//! The page that receives the markup does the actual work: a prelude sets
//! the namespaced globals, the rewritten article script follows, and the
//! language sync runs in a `setTimeout` once the DOM has settled. Each
//! call to an article function is wrapped in `try`/`catch` and only logs
//! to the console when it throws.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::Result;
use crate::models::Language;
use crate::render::executor::{SET_LANGUAGE, ScriptHost};
use crate::utils::escape_attr;

static SCRIPT_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(script)").expect("script close regex"));

/// JavaScript string literal.
fn js_string(s: &str) -> String {
    Value::from(s).to_string()
}

/// Keep `</script>` inside a script body from closing the element.
fn escape_script(script: &str) -> String {
    SCRIPT_CLOSE_RE.replace_all(script, r"<\/$1").into_owned()
}

#[derive(Debug)]
struct Deferred {
    delay_ms: u64,
    lines: Vec<String>,
}

/// Collects host actions as browser-side markup.
#[derive(Debug)]
pub struct MarkupHost {
    namespace: String,
    namespace_ready: bool,
    pending: Vec<String>,
    blocks: Vec<String>,
    deferred: Option<Deferred>,
}

impl Default for MarkupHost {
    fn default() -> Self {
        Self::new("window")
    }
}

impl MarkupHost {
    pub fn new(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self {
            namespace_ready: namespace == "window",
            namespace,
            pending: Vec::new(),
            blocks: Vec::new(),
            deferred: None,
        }
    }

    fn emit(&mut self, line: String) {
        match &mut self.deferred {
            Some(deferred) => deferred.lines.push(line),
            None => self.pending.push(line),
        }
    }

    /// Create the namespace object before anything is assigned to it.
    fn ensure_namespace(&mut self) {
        if !self.namespace_ready {
            let ns = &self.namespace;
            self.pending.push(format!("window.{ns} = window.{ns} || {{}};"));
            self.namespace_ready = true;
        }
    }

    fn flush_pending(&mut self) {
        if !self.pending.is_empty() {
            let body = self.pending.join("\n");
            self.blocks.push(format!("<script>\n{body}\n</script>"));
            self.pending.clear();
        }
    }

    /// All collected `<script>` elements in execution order.
    pub fn into_markup(mut self) -> String {
        self.flush_pending();
        if let Some(Deferred { delay_ms, lines }) = self.deferred.take() {
            let body = lines.join("\n");
            self.blocks.push(format!(
                "<script>\nsetTimeout(function () {{\n{body}\n}}, {delay_ms});\n</script>"
            ));
        }
        self.blocks.join("\n")
    }
}

impl ScriptHost for MarkupHost {
    fn set_global(&mut self, name: &str, value: &str) -> Result<()> {
        self.ensure_namespace();
        let line = format!("{}.{name} = {};", self.namespace, js_string(value));
        self.emit(line);
        Ok(())
    }

    fn inject(&mut self, article_id: &str, script: &str) -> Result<()> {
        self.ensure_namespace();
        self.flush_pending();
        self.blocks.push(format!(
            "<script data-article-script=\"true\" data-article-id=\"{}\">\n{}\n</script>",
            escape_attr(article_id),
            escape_script(script)
        ));
        Ok(())
    }

    fn settle(&mut self, delay_ms: u64) {
        if self.deferred.is_none() {
            self.deferred = Some(Deferred {
                delay_ms,
                lines: Vec::new(),
            });
        }
    }

    fn set_language_class(&mut self, container: &str, language: Language) -> Result<()> {
        let (body_class, toggle) = match language {
            Language::En => ("en", "add"),
            Language::Ja => ("", "remove"),
        };
        self.emit(format!("document.body.className = {};", js_string(body_class)));
        self.emit(format!(
            "var articleContainer = document.querySelector({});\n\
             if (articleContainer) {{ articleContainer.classList.{toggle}('en'); }}",
            js_string(container)
        ));
        Ok(())
    }

    fn defines(&self, _function: &str) -> bool {
        // the emitted code checks `typeof` before calling
        true
    }

    fn call(&mut self, function: &str, language: Language, with_event: bool) -> Result<()> {
        let f = format!("window.{function}");
        let lang = js_string(language.as_str());
        let plain = format!(
            "try {{ {f}({lang}); }} catch (e) {{ console.log('[kiji] {function} failed:', e); }}"
        );

        let attempt = if with_event && function == SET_LANGUAGE {
            let label = js_string(match language {
                Language::Ja => "日本語",
                Language::En => "English",
            });
            let event = format!(
                "{{ target: {{ textContent: {label}, classList: {{ add: function () {{}}, \
                 remove: function () {{}} }} }}, preventDefault: function () {{}} }}"
            );
            format!("try {{ {f}({lang}, {event}); }} catch (e) {{ {plain} }}")
        } else {
            plain
        };

        self.emit(format!("if (typeof {f} === 'function') {{ {attempt} }}"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::executor::{ScriptExecutor, ScriptToken};

    #[test]
    fn test_markup_layout() {
        let mut host = MarkupHost::default();
        let outcome = ScriptExecutor::default().execute(
            &mut host,
            &mut ScriptToken::default(),
            "2025-01-01-a",
            "let currentLang = 'ja'; function setLanguage(lang) { currentLang = lang; }",
            Language::En,
        );
        assert_eq!(outcome, crate::render::ExecutionOutcome::Executed);

        let markup = host.into_markup();
        let global = markup.find("window.currentLang = \"en\";").unwrap();
        let script = markup.find("data-article-script=\"true\"").unwrap();
        let timer = markup.find("setTimeout(function () {").unwrap();
        assert!(global < script && script < timer);
        assert!(markup.contains("data-article-id=\"2025-01-01-a\""));
        assert!(markup.contains("document.body.className = \"en\";"));
        assert!(markup.contains("articleContainer.classList.add('en')"));
        assert!(markup.contains("if (typeof window.setLang === 'function')"));
        assert!(markup.contains("window.setLanguage(\"en\", { target: { textContent: \"English\""));
        assert!(markup.contains("}, 300);"));
    }

    #[test]
    fn test_japanese_clears_body_class() {
        let mut host = MarkupHost::default();
        host.settle(10);
        host.set_language_class(".article-content", Language::Ja).unwrap();
        let markup = host.into_markup();
        assert!(markup.contains("document.body.className = \"\";"));
        assert!(markup.contains("classList.remove('en')"));
        assert!(markup.contains("}, 10);"));
    }

    #[test]
    fn test_script_close_tag_is_escaped() {
        let mut host = MarkupHost::default();
        host.inject("a", "var s = '</script><b>';").unwrap();
        let markup = host.into_markup();
        assert!(markup.contains(r"var s = '<\/script><b>';"));
        assert_eq!(markup.matches("</script>").count(), 1);
    }

    #[test]
    fn test_custom_namespace_globals() {
        let mut host = MarkupHost::new("__kiji");
        host.set_global("currentLang", "ja").unwrap();
        assert_eq!(
            host.into_markup(),
            "<script>\nwindow.__kiji = window.__kiji || {};\n__kiji.currentLang = \"ja\";\n</script>"
        );
    }

    #[test]
    fn test_custom_namespace_created_before_article_script() {
        let mut host = MarkupHost::new("__kiji");
        host.inject("a", "__kiji.observer = null;").unwrap();
        let markup = host.into_markup();
        let init = markup.find("window.__kiji = window.__kiji || {};").unwrap();
        let script = markup.find("data-article-script").unwrap();
        assert!(init < script);
        assert_eq!(markup.matches("window.__kiji ||").count(), 1);
    }

    #[test]
    fn test_window_namespace_needs_no_setup() {
        let mut host = MarkupHost::default();
        host.set_global("currentLang", "ja").unwrap();
        assert!(!host.into_markup().contains("||"));
    }
}
