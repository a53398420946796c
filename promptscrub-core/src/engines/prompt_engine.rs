// promptscrub-core/src/engines/prompt_engine.rs
//! The `SanitizationEngine` implementation backed by the sanitize pipeline.
//! License: MIT OR APACHE 2.0

use std::sync::Arc;

use crate::config::RedactionConfig;
use crate::engine::{SanitizationEngine, ScanReport};
use crate::errors::ScrubError;
use crate::pipeline::{self, SanitizationResult};
use crate::policy::{PolicyOverride, SanitizationPolicy};

#[derive(Debug, Clone)]
pub struct PromptEngine {
    policy: Arc<SanitizationPolicy>,
}

impl PromptEngine {
    pub fn new(config: RedactionConfig) -> Result<Self, ScrubError> {
        Ok(Self::from_policy(Arc::new(SanitizationPolicy::new(config)?)))
    }

    pub fn with_defaults() -> Result<Self, ScrubError> {
        Ok(Self::from_policy(Arc::new(SanitizationPolicy::with_defaults()?)))
    }

    pub fn from_policy(policy: Arc<SanitizationPolicy>) -> Self {
        Self { policy }
    }

    /// Returns an engine over a derived policy; `self` is left untouched.
    pub fn with_override(&self, overrides: &PolicyOverride) -> Result<Self, ScrubError> {
        if overrides.is_empty() {
            return Ok(self.clone());
        }
        Ok(Self::from_policy(Arc::new(self.policy.with_override(overrides)?)))
    }
}

impl SanitizationEngine for PromptEngine {
    fn sanitize(&self, content: &str) -> SanitizationResult {
        pipeline::sanitize(content, &self.policy)
    }

    fn sanitize_bytes(&self, content: &[u8]) -> SanitizationResult {
        pipeline::sanitize_bytes(content, &self.policy)
    }

    fn analyze_for_stats(&self, content: &str) -> ScanReport {
        let result = pipeline::sanitize(content, &self.policy);
        let normalized = pipeline::markup_free_text(content);
        ScanReport {
            events: result.events,
            stats: result.stats,
            injection_findings: self.policy.injection_filter().detect(&normalized),
        }
    }

    fn policy(&self) -> &SanitizationPolicy {
        &self.policy
    }
}
