// src/render/renderer.rs

//! Article display in namespaced or raw mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::html::split_segments;
use crate::models::{ArticleRecord, Config, Language};
use crate::render::executor::{PageSession, ScriptExecutor};
use crate::render::markup_host::MarkupHost;
use crate::render::styles::{host_styles, namespace_styles};
use crate::utils::escape_attr;

/// How an article is put on the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Styles and scripts confined to the container
    #[default]
    Namespaced,
    /// Original bytes in an iframe, no isolation at all
    Raw,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Namespaced => f.write_str("namespaced"),
            DisplayMode::Raw => f.write_str("raw"),
        }
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "namespaced" => Ok(DisplayMode::Namespaced),
            "raw" => Ok(DisplayMode::Raw),
            other => Err(format!("unknown display mode: {other}")),
        }
    }
}

/// An article ready to be placed in a host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArticle {
    /// Namespaced article CSS followed by the host rules
    pub styles: String,
    /// Body markup for the container
    pub body: String,
    /// `<script>` elements produced by the script host
    pub scripts: String,
    pub container_class: String,
    pub language: Language,
}

impl RenderedArticle {
    pub fn to_html(&self) -> String {
        let class = match self.language {
            Language::En => format!("{} en", self.container_class),
            Language::Ja => self.container_class.clone(),
        };
        let mut html = String::with_capacity(self.styles.len() + self.body.len() + self.scripts.len() + 64);
        html.push_str("<style>\n");
        html.push_str(&self.styles);
        html.push_str("\n</style>\n");
        html.push_str(&format!("<div class=\"{}\">\n", escape_attr(&class)));
        html.push_str(&self.body);
        html.push_str("\n</div>\n");
        html.push_str(&self.scripts);
        html
    }
}

/// Turns article records into page fragments.
#[derive(Debug, Clone)]
pub struct ArticleRenderer {
    container_selector: String,
    container_class: String,
    script_namespace: String,
    raw_url_prefix: String,
    executor: ScriptExecutor,
}

impl Default for ArticleRenderer {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl ArticleRenderer {
    pub fn new(config: &Config) -> Self {
        Self {
            container_selector: config.renderer.container_selector.clone(),
            container_class: config.renderer.container_class().to_string(),
            script_namespace: config.renderer.script_namespace.clone(),
            raw_url_prefix: config.site.raw_url_prefix.clone(),
            executor: ScriptExecutor::new(&config.renderer),
        }
    }

    /// Render in the requested mode as one HTML fragment.
    pub fn render(
        &self,
        article: &ArticleRecord,
        mode: DisplayMode,
        language: Language,
        session: &mut PageSession,
    ) -> String {
        match mode {
            DisplayMode::Namespaced => self.render_namespaced(article, language, session).to_html(),
            DisplayMode::Raw => self.raw_frame(article),
        }
    }

    /// Split, namespace and script-host an article.
    ///
    /// The script is only emitted the first time an article is rendered in
    /// a session; later renders reuse whatever already ran on the page.
    pub fn render_namespaced(
        &self,
        article: &ArticleRecord,
        language: Language,
        session: &mut PageSession,
    ) -> RenderedArticle {
        let segments = split_segments(&article.content);
        log::debug!(
            "Rendering {}: styles {} bytes, scripts {} bytes, body {} bytes",
            article.id,
            segments.style_text.len(),
            segments.script_text.len(),
            segments.body_markup.len()
        );

        let mut styles = namespace_styles(&segments.style_text, &self.container_selector);
        styles.push_str(&host_styles(&self.container_selector));

        let mut host = MarkupHost::new(self.script_namespace.clone());
        self.executor.execute(
            &mut host,
            session.token(&article.id),
            &article.id,
            &segments.script_text,
            language,
        );

        RenderedArticle {
            styles,
            body: segments.body_markup,
            scripts: host.into_markup(),
            container_class: self.container_class.clone(),
            language,
        }
    }

    /// Iframe pointing at the raw endpoint for the article.
    pub fn raw_frame(&self, article: &ArticleRecord) -> String {
        format!(
            "<iframe src=\"{}\" class=\"article-raw-frame\" title=\"{}\" \
             style=\"width: 100%; min-height: 100vh; border: 0;\"></iframe>",
            escape_attr(&format!("{}{}", self.raw_url_prefix, article.slug)),
            escape_attr(&article.title)
        )
    }
}
