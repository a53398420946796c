//! policy.rs - The immutable sanitization policy.
//!
//! A `SanitizationPolicy` is everything a sanitization call needs: the ordered
//! rule registry, the resolved settings, the injection filter and the name
//! heuristic. It is built and validated once, at startup, and then shared
//! read-only between threads. Per-call adjustments go through
//! [`PolicyOverride`], which derives a new policy from already-compiled parts.
//!
//! License: MIT OR APACHE 2.0

use std::collections::HashSet;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{is_valid_token, PolicySettings, RedactionConfig};
use crate::engines::injection::InjectionFilter;
use crate::engines::names::NameHeuristic;
use crate::engines::redactor::Redactor;
use crate::errors::ScrubError;
use crate::sanitizers::compiler::{compile_rules, ensure_marker_is_inert, CompiledRules};
use crate::stats::StatsCalculator;

/// Per-call adjustments to a policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyOverride {
    /// When set, only these rule labels stay active.
    pub enabled_rules: Option<Vec<String>>,
    /// Rule labels to switch off for this call.
    pub disabled_rules: Vec<String>,
    pub max_length: Option<usize>,
    pub enable_name_heuristic: Option<bool>,
}

impl PolicyOverride {
    pub fn is_empty(&self) -> bool {
        self == &PolicyOverride::default()
    }
}

#[derive(Debug, Clone)]
pub struct SanitizationPolicy {
    redactor: Redactor,
    settings: PolicySettings,
    injection: InjectionFilter,
    names: NameHeuristic,
    stats: StatsCalculator,
}

fn validate_settings(settings: &PolicySettings) -> Result<(), ScrubError> {
    if settings.max_length == 0 {
        return Err(ScrubError::InvalidSettings(
            "max_length must be greater than 0.".to_string(),
        ));
    }
    if !is_valid_token(&settings.injection_marker) {
        return Err(ScrubError::InvalidSettings(format!(
            "injection_marker '{}' must be '[' + uppercase letters or underscores + ']'.",
            settings.injection_marker
        )));
    }
    if settings.fallback_message.trim().chars().count() < settings.min_content_length {
        return Err(ScrubError::InvalidSettings(format!(
            "fallback_message is shorter than min_content_length ({}).",
            settings.min_content_length
        )));
    }
    Ok(())
}

impl SanitizationPolicy {
    /// Compiles and validates a policy from configuration.
    ///
    /// Every failure here is a configuration error and should abort startup.
    pub fn new(config: RedactionConfig) -> Result<Self, ScrubError> {
        let settings = config.settings.resolve();
        validate_settings(&settings)?;

        let rules = compile_rules(config.rules)?;
        ensure_marker_is_inert(&rules, &settings.injection_marker)?;

        let injection =
            InjectionFilter::new(&settings.extra_injection_patterns, &settings.injection_marker)?;
        for rule in &rules.rules {
            if let Some(pattern) = injection.first_pattern_matching(&rule.token) {
                return Err(ScrubError::InvalidRule(format!(
                    "Rule '{}': token '{}' is matched by injection pattern '{}'.",
                    rule.name, rule.token, pattern
                )));
            }
        }

        let names = NameHeuristic::new()?;
        let stats = StatsCalculator::from_rules(&rules);

        info!(
            "Sanitization policy ready: {} rule(s), max_length {}, name heuristic {}.",
            rules.rules.len(),
            settings.max_length,
            if settings.enable_name_heuristic { "on" } else { "off" }
        );

        Ok(Self {
            redactor: Redactor::new(rules),
            settings,
            injection,
            names,
            stats,
        })
    }

    /// Builds the policy from the embedded default rules and settings.
    pub fn with_defaults() -> Result<Self, ScrubError> {
        Self::new(RedactionConfig::load_default_rules()?)
    }

    /// Derives a policy with `overrides` applied. Nothing is recompiled.
    pub fn with_override(&self, overrides: &PolicyOverride) -> Result<Self, ScrubError> {
        if overrides.is_empty() {
            return Ok(self.clone());
        }

        let known: HashSet<&str> = self.rules().labels().into_iter().collect();
        let requested = overrides
            .enabled_rules
            .iter()
            .flatten()
            .chain(overrides.disabled_rules.iter());
        for name in requested {
            if !known.contains(name.as_str()) {
                warn!("Rule '{}' named in the override is not part of the policy.", name);
            }
        }

        let enabled: Option<HashSet<&str>> = overrides
            .enabled_rules
            .as_ref()
            .map(|names| names.iter().map(String::as_str).collect());
        let disabled: HashSet<&str> = overrides.disabled_rules.iter().map(String::as_str).collect();

        let rules = CompiledRules {
            rules: self
                .rules()
                .rules
                .iter()
                .filter(|r| enabled.as_ref().map_or(true, |set| set.contains(r.name.as_str())))
                .filter(|r| !disabled.contains(r.name.as_str()))
                .cloned()
                .collect(),
        };

        let mut settings = self.settings.clone();
        if let Some(max_length) = overrides.max_length {
            settings.max_length = max_length;
        }
        if let Some(names) = overrides.enable_name_heuristic {
            settings.enable_name_heuristic = names;
        }
        validate_settings(&settings)?;

        debug!(
            "Derived policy with {} of {} rule(s) active.",
            rules.rules.len(),
            self.rules().rules.len()
        );

        Ok(Self {
            stats: StatsCalculator::from_rules(&rules),
            redactor: Redactor::new(rules),
            settings,
            injection: self.injection.clone(),
            names: self.names.clone(),
        })
    }

    pub fn rules(&self) -> &CompiledRules {
        self.redactor.rules()
    }

    pub fn settings(&self) -> &PolicySettings {
        &self.settings
    }

    pub fn redactor(&self) -> &Redactor {
        &self.redactor
    }

    pub fn injection_filter(&self) -> &InjectionFilter {
        &self.injection
    }

    pub fn name_heuristic(&self) -> &NameHeuristic {
        &self.names
    }

    pub fn stats_calculator(&self) -> &StatsCalculator {
        &self.stats
    }
}
