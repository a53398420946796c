//! pipeline.rs - The sanitize pipeline.
//!
//! One pure function composing every stage in a fixed order:
//!
//! 1. whitespace normalization
//! 2. markup stripping (script/style blocks, tags, ANSI escapes)
//! 3. PII redaction
//! 4. name heuristic, when enabled
//! 5. repeated-symbol compression
//! 6. injection neutralization
//! 7. length clamp
//! 8. minimum-content check
//!
//! No stage can fail. Degenerate output is replaced by the policy's fallback
//! message rather than reported as an error.
//!
//! License: MIT OR APACHE 2.0

use std::borrow::Cow;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::policy::SanitizationPolicy;
use crate::redaction_match::RedactionEvent;
use crate::stats::FilterStats;

static SCRIPT_STYLE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>").unwrap()
});

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Characters whose long runs are compressed.
const COMPRESSIBLE_SYMBOLS: &str = "!@#$%^&*()_+=[]{}|;:,.<>?/~`-";

/// Runs longer than this are cut down to exactly this many characters.
const MAX_SYMBOL_RUN: usize = 3;

/// The outcome of one sanitization call. Owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanitizationResult {
    pub cleaned_text: String,
    /// Per-label tallies: rule labels in precedence order, then `names` and
    /// `injection`. Labels with no matches are omitted.
    pub events: Vec<RedactionEvent>,
    pub stats: FilterStats,
}

/// Trims and collapses every whitespace run to a single space.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes `<script>`/`<style>` blocks with their content, any remaining tag,
/// and ANSI escape sequences.
pub fn strip_markup(text: &str) -> String {
    let without_blocks = SCRIPT_STYLE_BLOCK.replace_all(text, "");
    let without_tags = MARKUP_TAG.replace_all(&without_blocks, "");
    strip_ansi_escapes::strip_str(without_tags.as_ref())
}

/// Normalizes whitespace and strips markup.
///
/// Whitespace is collapsed again after stripping since a removed tag can leave
/// two spaces side by side.
pub fn markup_free_text(text: &str) -> String {
    normalize_whitespace(&strip_markup(&normalize_whitespace(text)))
}

/// Cuts every run of four or more identical symbol characters down to three.
pub fn compress_symbol_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous: Option<char> = None;
    let mut run = 0usize;

    for c in text.chars() {
        if Some(c) == previous {
            run += 1;
        } else {
            previous = Some(c);
            run = 1;
        }
        if run > MAX_SYMBOL_RUN && COMPRESSIBLE_SYMBOLS.contains(c) {
            continue;
        }
        out.push(c);
    }
    out
}

/// Keeps the first `max_length` chars and appends `suffix` if anything was cut.
pub fn clamp_length<'a>(text: &'a str, max_length: usize, suffix: &str) -> Cow<'a, str> {
    match text.char_indices().nth(max_length) {
        Some((cut, _)) => {
            debug!("Clamping input to {} chars.", max_length);
            Cow::Owned(format!("{}{}", &text[..cut], suffix))
        }
        None => Cow::Borrowed(text),
    }
}

/// Trims `text`, substituting `fallback` if fewer than `min_chars` remain.
pub fn ensure_meaningful(text: &str, min_chars: usize, fallback: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() < min_chars {
        debug!("Sanitized text is below the minimum content length; using fallback.");
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Runs the full pipeline over `text` under `policy`.
pub fn sanitize(text: &str, policy: &SanitizationPolicy) -> SanitizationResult {
    let settings = policy.settings();

    let stripped = markup_free_text(text);

    let (mut current, mut events) = policy.redactor().redact(&stripped);

    if settings.enable_name_heuristic {
        let (renamed, names) = policy.name_heuristic().apply(&current);
        current = renamed;
        if names.count > 0 {
            events.push(names);
        }
    }

    let compressed = compress_symbol_runs(&current);

    let (neutralized, injection) = policy.injection_filter().neutralize(&compressed);
    if injection.count > 0 {
        events.push(injection);
    }

    let clamped = clamp_length(&neutralized, settings.max_length, &settings.truncation_suffix);
    let cleaned_text = ensure_meaningful(
        &clamped,
        settings.min_content_length,
        &settings.fallback_message,
    );

    let stats = policy.stats_calculator().diff(text, &cleaned_text);
    debug!(
        "Sanitized {} -> {} chars, {} item(s) filtered.",
        stats.original_length, stats.filtered_length, stats.items_filtered
    );

    SanitizationResult {
        cleaned_text,
        events,
        stats,
    }
}

/// Decodes `bytes` as UTF-8, dropping undecodable sequences, then sanitizes.
pub fn sanitize_bytes(bytes: &[u8], policy: &SanitizationPolicy) -> SanitizationResult {
    sanitize(&decode_lossless_utf8(bytes), policy)
}

/// Keeps every valid UTF-8 sequence of `bytes` and drops the rest.
pub fn decode_lossless_utf8(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}
