// File: promptscrub-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for one-shot sanitization without holding an engine.
//!
//! These compile a policy per call. Anything that sanitizes more than once
//! should build a `PromptEngine` (or a `SanitizationPolicy`) once and reuse it.

use anyhow::{Context, Result};

use crate::config::RedactionConfig;
use crate::engine::SanitizationEngine;
use crate::engines::prompt_engine::PromptEngine;
use crate::pipeline::SanitizationResult;
use crate::policy::PolicyOverride;

/// Fully sanitizes `content` under `config`, with an optional per-call override.
pub fn headless_sanitize(
    config: RedactionConfig,
    overrides: Option<&PolicyOverride>,
    content: &str,
) -> Result<SanitizationResult> {
    let engine = PromptEngine::new(config).context("Failed to build sanitization policy")?;
    let engine = match overrides {
        Some(o) => engine.with_override(o).context("Failed to apply policy override")?,
        None => engine,
    };
    Ok(engine.sanitize(content))
}

/// Like [`headless_sanitize`], returning only the cleaned text.
pub fn headless_sanitize_string(
    config: RedactionConfig,
    overrides: Option<&PolicyOverride>,
    content: &str,
) -> Result<String> {
    headless_sanitize(config, overrides, content).map(|r| r.cleaned_text)
}
