// promptscrub-core/src/engine.rs
//! Defines the core SanitizationEngine trait and related data structures.
//!
//! The `SanitizationEngine` trait is the seam front ends program against: the
//! CLI, batch processing and any future service wrapper all hold a
//! `dyn SanitizationEngine` rather than a concrete engine.
//!
//! License: MIT OR APACHE 2.0

use serde::{Deserialize, Serialize};

use crate::engines::injection::InjectionFinding;
use crate::pipeline::SanitizationResult;
use crate::policy::SanitizationPolicy;
use crate::redaction_match::RedactionEvent;
use crate::sanitizers::compiler::CompiledRules;
use crate::stats::FilterStats;

/// What a scan reports: everything a sanitization would, minus the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub events: Vec<RedactionEvent>,
    pub stats: FilterStats,
    /// Injection phrases found in the normalized input, by byte span.
    pub injection_findings: Vec<InjectionFinding>,
}

/// A trait that defines the core functionality of a sanitization engine.
///
/// Implementations hold an immutable policy, so every method takes `&self`
/// and none can fail.
pub trait SanitizationEngine: Send + Sync {
    /// Performs full sanitization on the provided content.
    fn sanitize(&self, content: &str) -> SanitizationResult;

    /// Sanitizes raw bytes, dropping sequences that are not valid UTF-8.
    fn sanitize_bytes(&self, content: &[u8]) -> SanitizationResult;

    /// Analyzes the provided content without returning sanitized text.
    ///
    /// Used by the `scan` command and by callers that only gate on counts.
    fn analyze_for_stats(&self, content: &str) -> ScanReport;

    /// Returns the policy the engine applies.
    fn policy(&self) -> &SanitizationPolicy;

    /// Returns a reference to the `CompiledRules` used by the engine.
    fn compiled_rules(&self) -> &CompiledRules {
        self.policy().rules()
    }
}
