//! HTML handling shared by the extractor and the renderer.
//!
//! - `scanner`: tag scanner used for field extraction
//! - `segments`: style/script/body splitter used for isolated display

pub mod scanner;
pub mod segments;

pub use scanner::{Document, Tag};
pub use segments::{Segments, split_segments};
