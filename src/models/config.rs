//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Language;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Filesystem locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Public URL layout of the site
    #[serde(default)]
    pub site: SiteConfig,

    /// Upload gate limits
    #[serde(default)]
    pub upload: UploadConfig,

    /// Isolation renderer settings
    #[serde(default)]
    pub renderer: RendererConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Serialize the configuration back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.paths.articles_dir.as_os_str().is_empty() {
            return Err(AppError::validation("paths.articles_dir is empty"));
        }
        for (name, prefix) in [
            ("site.articles_url_prefix", &self.site.articles_url_prefix),
            ("site.raw_url_prefix", &self.site.raw_url_prefix),
        ] {
            if !prefix.starts_with('/') || !prefix.ends_with('/') {
                return Err(AppError::validation(format!(
                    "{name} must start and end with '/': {prefix:?}"
                )));
            }
        }
        if self.upload.max_file_size == 0 {
            return Err(AppError::validation("upload.max_file_size must be > 0"));
        }
        let selector = self.renderer.container_selector.trim();
        if !selector.starts_with('.') || selector.len() < 2 || selector.contains(char::is_whitespace)
        {
            return Err(AppError::validation(
                "renderer.container_selector must be a single class selector like .article-content",
            ));
        }
        if !is_js_identifier(&self.renderer.script_namespace) {
            return Err(AppError::validation(format!(
                "renderer.script_namespace must be a JavaScript identifier: {:?}",
                self.renderer.script_namespace
            )));
        }
        Ok(())
    }
}

fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Filesystem locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the uploaded `.html` articles
    #[serde(default = "defaults::articles_dir")]
    pub articles_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            articles_dir: defaults::articles_dir(),
        }
    }
}

/// Public URL layout and site-wide defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Prefix for article pages and relative article assets
    #[serde(default = "defaults::articles_url_prefix")]
    pub articles_url_prefix: String,

    /// Prefix of the raw passthrough endpoint
    #[serde(default = "defaults::raw_url_prefix")]
    pub raw_url_prefix: String,

    /// Author used when an article carries no author meta tag
    #[serde(default = "defaults::default_author")]
    pub default_author: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            articles_url_prefix: defaults::articles_url_prefix(),
            raw_url_prefix: defaults::raw_url_prefix(),
            default_author: defaults::default_author(),
        }
    }
}

/// Upload gate limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum accepted file size in bytes
    #[serde(default = "defaults::max_file_size")]
    pub max_file_size: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: defaults::max_file_size(),
        }
    }
}

/// Isolation renderer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Class selector of the container the article is confined to
    #[serde(default = "defaults::container_selector")]
    pub container_selector: String,

    /// Delay before the language sync runs after script injection
    #[serde(default = "defaults::settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Global object that receives redirected article variables
    #[serde(default = "defaults::script_namespace")]
    pub script_namespace: String,

    /// Host language used when the caller does not pass one
    #[serde(default)]
    pub default_language: Language,
}

impl RendererConfig {
    /// Container class name without the leading dot.
    pub fn container_class(&self) -> &str {
        self.container_selector.trim().trim_start_matches('.')
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            container_selector: defaults::container_selector(),
            settle_delay_ms: defaults::settle_delay_ms(),
            script_namespace: defaults::script_namespace(),
            default_language: Language::default(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn articles_dir() -> PathBuf {
        PathBuf::from("pub/articles")
    }
    pub fn articles_url_prefix() -> String {
        "/articles/".into()
    }
    pub fn raw_url_prefix() -> String {
        "/raw/".into()
    }
    pub fn default_author() -> String {
        "防衛情報研究センター".into()
    }
    pub fn max_file_size() -> u64 {
        10 * 1024 * 1024
    }
    pub fn container_selector() -> String {
        ".article-content".into()
    }
    pub fn settle_delay_ms() -> u64 {
        300
    }
    pub fn script_namespace() -> String {
        "window".into()
    }
}
