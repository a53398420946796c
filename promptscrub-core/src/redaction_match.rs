// promptscrub-core/src/redaction_match.rs
//! Per-request redaction events and PII-safe debug logging helpers.

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// A static boolean that is initialized once to determine if PII is allowed in debug logs.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("PROMPTSCRUB_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// Label used for events produced by the name heuristic.
pub const NAMES_LABEL: &str = "names";
/// Label used for events produced by the injection filter.
pub const INJECTION_LABEL: &str = "injection";

/// Tally of one label's redactions during a single sanitization call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionEvent {
    pub label: String,
    /// Total characters of the original spans replaced under this label.
    pub matched_span_length: usize,
    pub count: usize,
}

impl RedactionEvent {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            matched_span_length: 0,
            count: 0,
        }
    }

    pub fn record(&mut self, matched: &str) {
        self.count += 1;
        self.matched_span_length += matched.chars().count();
    }
}

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub fn log_captured_match_debug(module_path: &str, rule_name: &str, original_sensitive_content: &str) {
    debug!(
        "{} Captured match (original): '{}' for rule '{}'",
        module_path,
        get_loggable_content(original_sensitive_content),
        rule_name
    );
}

pub fn log_redaction_action_debug(
    module_path: &str,
    original_sensitive_content: &str,
    sanitized_replacement: &str,
    rule_name: &str,
) {
    debug!(
        "{} Redaction action: Original='{}', Redacted='{}' for rule '{}'",
        module_path,
        get_loggable_content(original_sensitive_content),
        sanitized_replacement,
        rule_name
    );
}
