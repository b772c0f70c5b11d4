// src/error.rs

//! Unified error handling for the article portal core.

use std::fmt;

use thiserror::Error;

/// Result type alias for article operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// No article file exists for the slug
    #[error("Article not found: {slug}")]
    NotFound { slug: String },

    /// Upload rejected by the validation gate
    #[error("Upload rejected: {0}")]
    Upload(#[from] UploadRejection),

    /// A single article file could not be turned into a record
    #[error("Parse error for {file}: {message}")]
    Parse { file: String, message: String },

    /// Article script failed inside the script host
    #[error("Script error for article {article_id}: {message}")]
    Script { article_id: String, message: String },
}

impl AppError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not-found error for a slug.
    pub fn not_found(slug: impl Into<String>) -> Self {
        Self::NotFound { slug: slug.into() }
    }

    /// Create a per-file parse error.
    pub fn parse(file: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.to_string(),
        }
    }

    /// Create a script execution error.
    pub fn script(article_id: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Script {
            article_id: article_id.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error means the requested article does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Reasons the upload gate refuses a file. Nothing is written when any of these fire.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadRejection {
    #[error("only .html files can be uploaded: {file_name}")]
    NotHtml { file_name: String },

    #[error("file name must follow YYYY-MM-DD-slug.html (e.g. 2025-08-24-my-article.html): {file_name}")]
    BadFileName { file_name: String },

    #[error("file is {size} bytes, limit is {max} bytes")]
    TooLarge { size: u64, max: u64 },

    #[error("HTML must contain a <title> tag")]
    MissingTitle,

    #[error("disallowed script patterns: {}", .issues.join(", "))]
    DangerousPatterns { issues: Vec<String> },

    #[error("a file named {file_name} already exists")]
    AlreadyExists { file_name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        assert!(AppError::not_found("x").is_not_found());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(AppError::from(io).is_not_found());
        assert!(!AppError::validation("bad").is_not_found());
    }

    #[test]
    fn test_rejection_lists_every_issue() {
        let err = UploadRejection::DangerousPatterns {
            issues: vec!["eval".to_string(), "cookie".to_string()],
        };
        assert_eq!(err.to_string(), "disallowed script patterns: eval, cookie");
    }
}
