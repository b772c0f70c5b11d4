// src/render/executor.rs

//! Once-per-article script execution.
//!
//! The executor never runs JavaScript itself. It drives a [`ScriptHost`],
//! which may be a real page, a test double, or [`MarkupHost`] emitting the
//! equivalent browser-side markup. Failures are logged and swallowed so a
//! broken article script cannot take the surrounding page down.
//!
//! [`MarkupHost`]: crate::render::MarkupHost

use std::collections::HashMap;

use crate::error::Result;
use crate::models::{Language, RendererConfig};
use crate::render::scripts::ScriptRewriter;

/// Article language entry points, in the order they are tried.
pub const SET_LANG: &str = "setLang";
pub const SET_LANGUAGE: &str = "setLanguage";

/// Where an article script runs.
pub trait ScriptHost {
    /// Assign `<namespace>.<name> = value` before the script runs.
    fn set_global(&mut self, name: &str, value: &str) -> Result<()>;

    /// Insert and run the rewritten script.
    fn inject(&mut self, article_id: &str, script: &str) -> Result<()>;

    /// Defer everything that follows by `delay_ms`.
    fn settle(&mut self, delay_ms: u64);

    /// Set the body class for `language` and mirror it onto the container.
    fn set_language_class(&mut self, container: &str, language: Language) -> Result<()>;

    /// Whether the script defined a global function with this name.
    ///
    /// Hosts that only find out at run time answer `true` and guard the
    /// call themselves.
    fn defines(&self, function: &str) -> bool;

    /// Call `function(lang)`, or `function(lang, event)` with a stand-in
    /// click event when `with_event` is set.
    fn call(&mut self, function: &str, language: Language, with_event: bool) -> Result<()>;
}

/// Per-article "already executed" state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptToken {
    executed: bool,
}

impl ScriptToken {
    pub fn is_executed(&self) -> bool {
        self.executed
    }

    pub fn reset(&mut self) {
        self.executed = false;
    }

    fn mark_executed(&mut self) {
        self.executed = true;
    }
}

/// Script tokens for every article shown in one page.
#[derive(Debug, Default)]
pub struct PageSession {
    tokens: HashMap<String, ScriptToken>,
}

impl PageSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for an article, created on first use.
    pub fn token(&mut self, article_id: &str) -> &mut ScriptToken {
        self.tokens.entry(article_id.to_string()).or_default()
    }

    pub fn is_executed(&self, article_id: &str) -> bool {
        self.tokens.get(article_id).is_some_and(ScriptToken::is_executed)
    }

    /// Forget an article so its script may run again, e.g. after the view
    /// showing it is torn down.
    pub fn release(&mut self, article_id: &str) {
        if let Some(token) = self.tokens.get_mut(article_id) {
            token.reset();
        }
    }
}

/// What [`ScriptExecutor::execute`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// No inline script to run
    NoScript,
    /// The token says this article already ran
    AlreadyExecuted,
    Executed,
    /// Injection failed; logged and swallowed
    Failed,
}

/// Rewrites and runs article scripts against a [`ScriptHost`].
#[derive(Debug, Clone)]
pub struct ScriptExecutor {
    rewriter: ScriptRewriter,
    container: String,
    settle_delay_ms: u64,
}

impl Default for ScriptExecutor {
    fn default() -> Self {
        Self::new(&RendererConfig::default())
    }
}

impl ScriptExecutor {
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            rewriter: ScriptRewriter::new(config.script_namespace.clone()),
            container: config.container_selector.clone(),
            settle_delay_ms: config.settle_delay_ms,
        }
    }

    pub fn rewriter(&self) -> &ScriptRewriter {
        &self.rewriter
    }

    /// Run `script` for `article_id` unless `token` says it already ran.
    pub fn execute<H: ScriptHost + ?Sized>(
        &self,
        host: &mut H,
        token: &mut ScriptToken,
        article_id: &str,
        script: &str,
        language: Language,
    ) -> ExecutionOutcome {
        if script.trim().is_empty() {
            log::debug!("No inline script for {article_id}");
            return ExecutionOutcome::NoScript;
        }
        if token.is_executed() {
            log::debug!("Script for {article_id} already executed");
            return ExecutionOutcome::AlreadyExecuted;
        }

        let rewritten = self.rewriter.rewrite(script);
        if let Err(e) = self.inject(host, article_id, &rewritten, language) {
            log::warn!("Script execution failed for {article_id}: {e}");
            return ExecutionOutcome::Failed;
        }
        token.mark_executed();
        log::debug!("Executed {} bytes of script for {article_id}", rewritten.len());

        host.settle(self.settle_delay_ms);
        self.sync_language(host, article_id, language);
        ExecutionOutcome::Executed
    }

    fn inject<H: ScriptHost + ?Sized>(
        &self,
        host: &mut H,
        article_id: &str,
        script: &str,
        language: Language,
    ) -> Result<()> {
        host.set_global("currentLang", language.as_str())?;
        host.inject(article_id, script)
    }

    /// Push the host language into the article. Every step is best effort.
    fn sync_language<H: ScriptHost + ?Sized>(&self, host: &mut H, article_id: &str, language: Language) {
        if let Err(e) = host.set_language_class(&self.container, language) {
            log::warn!("Could not apply language class for {article_id}: {e}");
        }

        if host.defines(SET_LANG) {
            if let Err(e) = host.call(SET_LANG, language, false) {
                log::warn!("{SET_LANG}({language}) failed for {article_id}: {e}");
            }
        }

        if host.defines(SET_LANGUAGE) {
            if let Err(e) = host.call(SET_LANGUAGE, language, true) {
                log::debug!("{SET_LANGUAGE} with event failed for {article_id}, retrying: {e}");
                if let Err(e) = host.call(SET_LANGUAGE, language, false) {
                    log::warn!("{SET_LANGUAGE}({language}) failed for {article_id}: {e}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[derive(Debug, Default)]
    struct RecordingHost {
        events: Vec<String>,
        functions: Vec<&'static str>,
        fail_inject: bool,
        fail_event_call: bool,
    }

    impl ScriptHost for RecordingHost {
        fn set_global(&mut self, name: &str, value: &str) -> Result<()> {
            self.events.push(format!("global {name}={value}"));
            Ok(())
        }

        fn inject(&mut self, article_id: &str, script: &str) -> Result<()> {
            if self.fail_inject {
                return Err(AppError::script(article_id, "SyntaxError"));
            }
            self.events.push(format!("inject {article_id}: {script}"));
            Ok(())
        }

        fn settle(&mut self, delay_ms: u64) {
            self.events.push(format!("settle {delay_ms}"));
        }

        fn set_language_class(&mut self, container: &str, language: Language) -> Result<()> {
            self.events.push(format!("class {container} {language}"));
            Ok(())
        }

        fn defines(&self, function: &str) -> bool {
            self.functions.iter().any(|f| *f == function)
        }

        fn call(&mut self, function: &str, language: Language, with_event: bool) -> Result<()> {
            self.events
                .push(format!("call {function}({language}, event={with_event})"));
            if with_event && self.fail_event_call {
                return Err(AppError::script("a", "event.preventDefault is not a function"));
            }
            Ok(())
        }
    }

    const SCRIPT: &str = "let currentLang = 'ja'; function setLanguage(lang) { currentLang = lang; }";

    #[test]
    fn test_runs_once_per_token() {
        let executor = ScriptExecutor::default();
        let mut host = RecordingHost::default();
        let mut session = PageSession::new();

        let first = executor.execute(&mut host, session.token("a"), "a", SCRIPT, Language::En);
        let second = executor.execute(&mut host, session.token("a"), "a", SCRIPT, Language::En);

        assert_eq!(first, ExecutionOutcome::Executed);
        assert_eq!(second, ExecutionOutcome::AlreadyExecuted);
        assert_eq!(host.events.iter().filter(|e| e.starts_with("inject")).count(), 1);
        assert!(session.is_executed("a"));
        assert!(!session.is_executed("b"));
    }

    #[test]
    fn test_release_allows_rerun() {
        let executor = ScriptExecutor::default();
        let mut host = RecordingHost::default();
        let mut session = PageSession::new();

        executor.execute(&mut host, session.token("a"), "a", SCRIPT, Language::Ja);
        session.release("a");
        let again = executor.execute(&mut host, session.token("a"), "a", SCRIPT, Language::Ja);
        assert_eq!(again, ExecutionOutcome::Executed);
    }

    #[test]
    fn test_event_order_and_rewrite() {
        let executor = ScriptExecutor::default();
        let mut host = RecordingHost {
            functions: vec![SET_LANG, SET_LANGUAGE],
            ..Default::default()
        };
        let mut token = ScriptToken::default();
        executor.execute(&mut host, &mut token, "a", SCRIPT, Language::En);

        assert_eq!(host.events[0], "global currentLang=en");
        assert!(host.events[1].starts_with("inject a:"));
        assert!(!host.events[1].contains("let currentLang"));
        assert!(host.events[1].contains("function setLanguage(lang, event)"));
        assert_eq!(
            &host.events[2..],
            &[
                "settle 300",
                "class .article-content en",
                "call setLang(en, event=false)",
                "call setLanguage(en, event=true)",
            ]
        );
    }

    #[test]
    fn test_set_language_falls_back_without_event() {
        let executor = ScriptExecutor::default();
        let mut host = RecordingHost {
            functions: vec![SET_LANGUAGE],
            fail_event_call: true,
            ..Default::default()
        };
        let outcome = executor.execute(&mut host, &mut ScriptToken::default(), "a", SCRIPT, Language::Ja);
        assert_eq!(outcome, ExecutionOutcome::Executed);
        assert_eq!(
            host.events.last().map(String::as_str),
            Some("call setLanguage(ja, event=false)")
        );
    }

    #[test]
    fn test_failed_injection_is_swallowed() {
        let executor = ScriptExecutor::default();
        let mut host = RecordingHost {
            fail_inject: true,
            ..Default::default()
        };
        let mut token = ScriptToken::default();
        let outcome = executor.execute(&mut host, &mut token, "a", SCRIPT, Language::Ja);
        assert_eq!(outcome, ExecutionOutcome::Failed);
        assert!(!token.is_executed());
    }

    #[test]
    fn test_empty_script_is_skipped() {
        let executor = ScriptExecutor::default();
        let mut host = RecordingHost::default();
        let mut token = ScriptToken::default();
        assert_eq!(
            executor.execute(&mut host, &mut token, "a", "  \n", Language::Ja),
            ExecutionOutcome::NoScript
        );
        assert!(host.events.is_empty());
    }
}
