//! Business logic services.
//!
//! - `extractor`: builds article records from raw HTML
//! - `language`: content language detection
//! - `tech_tags`: tech tag inference
//! - `toc`: table of contents
//! - `upload`: upload gate

pub mod extractor;
pub mod language;
pub mod tech_tags;
pub mod toc;
pub mod upload;

pub use extractor::{ArticleExtractor, extract};
pub use language::LanguageInfo;
pub use tech_tags::{infer_tech_tags, primary_tech_tags};
pub use toc::table_of_contents;
pub use upload::{HtmlStructure, UploadValidator};
