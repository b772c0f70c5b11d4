//! Pipeline entry points for article operations.
//!
//! - `catalog`: load one article or the whole directory
//! - `upload`: gate, store and list uploads
//! - `raw`: byte-for-byte passthrough

pub mod catalog;
pub mod raw;
pub mod upload;

pub use catalog::{load_article, parse_directory};
pub use raw::{RAW_HEADERS, RawArticle, load_raw};
pub use upload::{UploadReceipt, UploadedFile, list_uploads, run_upload};
