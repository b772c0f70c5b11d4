// src/models/mod.rs

//! Domain models for the article portal.

mod article;
pub mod config;
pub mod tech_tag;

// Re-export all public types
pub use article::{ArticleRecord, Category, ContentLanguages, Language, TocEntry};
pub use config::{Config, PathsConfig, RendererConfig, SiteConfig, UploadConfig};
pub use tech_tag::{TECH_TAGS, TechCategory, TechTag};
