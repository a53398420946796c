//! Before/after metrics for a sanitization call.
//!
//! Counts are read back from the sanitized text: every occurrence of a rule
//! token counts as one filtered item of that rule. Names have no token of their
//! own, so they are estimated from how many capitalized word pairs disappeared.
//! That estimate also absorbs pairs lost to truncation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::redaction_match::NAMES_LABEL;
use crate::sanitizers::compiler::CompiledRules;

static CAPITALIZED_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]{2,}\s+[A-Z][a-z]{2,}\b").unwrap()
});

/// Summary metrics comparing raw input to sanitized output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterStats {
    pub original_length: usize,
    pub filtered_length: usize,
    /// Percentage of characters removed, rounded to two decimals. Negative when
    /// tokens are longer than what they replaced.
    pub reduction_percentage: f64,
    pub items_filtered: usize,
    /// `"{label} ({count})"` entries in rule order.
    pub filter_types: Vec<String>,
}

impl FilterStats {
    pub fn empty() -> Self {
        Self {
            original_length: 0,
            filtered_length: 0,
            reduction_percentage: 0.0,
            items_filtered: 0,
            filter_types: Vec::new(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn capitalized_pairs(text: &str) -> usize {
    CAPITALIZED_PAIR.find_iter(text).count()
}

/// Computes [`FilterStats`] from the tokens of a rule registry.
#[derive(Debug, Clone, Default)]
pub struct StatsCalculator {
    /// `(label, token)` in precedence order.
    markers: Vec<(String, String)>,
}

impl StatsCalculator {
    pub fn new(markers: Vec<(String, String)>) -> Self {
        Self { markers }
    }

    pub fn from_rules(rules: &CompiledRules) -> Self {
        Self::new(
            rules
                .rules
                .iter()
                .map(|r| (r.name.clone(), r.token.clone()))
                .collect(),
        )
    }

    pub fn diff(&self, original: &str, sanitized: &str) -> FilterStats {
        let original_length = original.chars().count();
        let filtered_length = sanitized.chars().count();

        let mut items_filtered = 0usize;
        let mut filter_types = Vec::new();
        for (label, token) in &self.markers {
            let count = sanitized.matches(token.as_str()).count();
            if count > 0 {
                items_filtered += count;
                filter_types.push(format!("{} ({})", label, count));
            }
        }

        let names = capitalized_pairs(original).saturating_sub(capitalized_pairs(sanitized));
        if names > 0 {
            items_filtered += names;
            filter_types.push(format!("{} ({})", NAMES_LABEL, names));
        }

        let reduction_percentage = if original_length == 0 {
            0.0
        } else {
            let removed = original_length as f64 - filtered_length as f64;
            round2(removed / original_length as f64 * 100.0)
        };

        FilterStats {
            original_length,
            filtered_length,
            reduction_percentage,
            items_filtered,
            filter_types,
        }
    }
}
