//! Content isolation renderer.
//!
//! - `styles`: stylesheet namespacing and host rules
//! - `scripts`: script rewrites for shared pages
//! - `executor`: once-per-article execution against a script host
//! - `markup_host`: script host that emits browser markup
//! - `renderer`: namespaced and raw display modes

pub mod executor;
pub mod markup_host;
pub mod renderer;
pub mod scripts;
pub mod styles;

pub use executor::{ExecutionOutcome, PageSession, ScriptExecutor, ScriptHost, ScriptToken};
pub use markup_host::MarkupHost;
pub use renderer::{ArticleRenderer, DisplayMode, RenderedArticle};
pub use scripts::ScriptRewriter;
pub use styles::{host_styles, namespace_styles};
