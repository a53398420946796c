//! errors.rs - Custom error types for the promptscrub-core library.
//!
//! `ScrubError` covers everything that can go wrong while building a
//! sanitization policy. Once a policy exists, sanitizing text cannot fail.
//! `ExtractionError` is the boundary type reported by document extraction
//! collaborators, and `PromptRejection` is the outcome of prompt validation.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible configuration errors in the `promptscrub-core` library.
///
/// Every variant is raised at policy construction time and is meant to abort startup.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScrubError {
    #[error("Failed to compile redaction rule '{0}': {1}")]
    RuleCompilationError(String, regex::Error),

    #[error("Rule '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Invalid redaction rule: {0}")]
    InvalidRule(String),

    #[error("Invalid sanitization settings: {0}")]
    InvalidSettings(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}

/// Failure reported by the upstream text extraction layer for a single document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("Text extraction failed: {0}")]
    Failed(String),

    #[error("Failed to read input: {0}")]
    Io(String),
}

impl From<std::io::Error> for ExtractionError {
    fn from(err: std::io::Error) -> Self {
        ExtractionError::Io(err.to_string())
    }
}

/// Reasons a raw prompt is rejected by [`crate::validators::validate_prompt`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptRejection {
    #[error("Prompt cannot be empty")]
    Empty,

    #[error("Prompt too short")]
    TooShort,

    #[error("Prompt too long (max {max} characters)")]
    TooLong { max: usize },

    #[error("Prompt appears to be spam")]
    Spam,
}
