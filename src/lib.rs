// src/lib.rs

//! Kiji: bilingual article portal core.
//!
//! Extracts metadata from uploaded HTML articles and renders them inside a
//! host page with their styles and scripts confined to one container.

pub mod error;
pub mod html;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod services;
pub mod storage;
pub mod utils;
