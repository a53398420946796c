// File: promptscrub-core/src/validators.rs
//! Acceptability checks for a raw prompt, run before any sanitization.
//!
//! These are independent of the pipeline: a front end may reject input with
//! [`validate_prompt`] and never sanitize it at all.
//!
//! License: MIT OR APACHE 2.0

use std::collections::HashSet;

use crate::errors::PromptRejection;

/// Longest prompt accepted, in chars.
pub const MAX_PROMPT_LENGTH: usize = 10_000;

/// Shortest trimmed prompt accepted, in chars.
pub const MIN_PROMPT_LENGTH: usize = 3;

/// Prompts built from fewer distinct chars than this are treated as spam.
pub const MIN_DISTINCT_CHARS: usize = 5;

/// Checks that a prompt is worth forwarding.
///
/// Checks run in order (empty, too short, too long, spam) and the first
/// failing one is reported.
pub fn validate_prompt(prompt: &str) -> Result<(), PromptRejection> {
    if prompt.is_empty() {
        return Err(PromptRejection::Empty);
    }

    if prompt.trim().chars().count() < MIN_PROMPT_LENGTH {
        return Err(PromptRejection::TooShort);
    }

    if prompt.chars().count() > MAX_PROMPT_LENGTH {
        return Err(PromptRejection::TooLong {
            max: MAX_PROMPT_LENGTH,
        });
    }

    let distinct: HashSet<char> = prompt.chars().collect();
    if distinct.len() < MIN_DISTINCT_CHARS {
        return Err(PromptRejection::Spam);
    }

    Ok(())
}
