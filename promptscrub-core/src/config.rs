//! Configuration management for `promptscrub-core`.
//!
//! This module defines the core data structures for redaction rules and policy settings.
//! It handles serialization/deserialization of YAML configurations and provides utilities
//! for loading, merging, and validating these configs.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::errors::ScrubError;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

pub const DEFAULT_MAX_LENGTH: usize = 8000;
pub const DEFAULT_INJECTION_MARKER: &str = "[FILTERED]";
pub const DEFAULT_TRUNCATION_SUFFIX: &str = "... [truncated]";
pub const DEFAULT_FALLBACK_MESSAGE: &str = "Please provide a meaningful prompt.";
pub const DEFAULT_MIN_CONTENT_LENGTH: usize = 3;

/// Represents a single PII redaction rule.
///
/// The rule name doubles as its reporting label (`ssn`, `phone`, ...). Unless
/// `replace_with` is given, matches are replaced with `[{NAME}_FILTERED]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RedactionRule {
    /// Unique identifier and reporting label for the rule (e.g., "ssn").
    pub name: String,
    /// Human-readable description of what the rule targets.
    pub description: Option<String>,
    /// Position in the pass order. Lower values run first; values must be unique.
    pub precedence: u32,
    /// Regex patterns, applied one after another as a single precedence step.
    pub patterns: Vec<String>,
    /// If true, all patterns of this rule match case-insensitively.
    pub case_insensitive: bool,
    /// Explicit replacement token. Must be `[` + uppercase letters/underscores + `]`.
    pub replace_with: Option<String>,
    /// If true, the rule is disabled unless explicitly enabled.
    pub opt_in: bool,
    /// Explicit override for enabling/disabling the rule.
    pub enabled: Option<bool>,
    pub version: String,
    pub author: String,
    /// Metadata tags for categorization.
    pub tags: Option<Vec<String>>,
}

impl Default for RedactionRule {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            precedence: 0,
            patterns: Vec::new(),
            case_insensitive: false,
            replace_with: None,
            opt_in: false,
            enabled: None,
            version: "1.0.0".to_string(),
            author: "Relay Team".to_string(),
            tags: None,
        }
    }
}

impl RedactionRule {
    /// The marker substituted for every match of this rule.
    pub fn token(&self) -> String {
        match &self.replace_with {
            Some(token) => token.clone(),
            None => format!("[{}_FILTERED]", self.name.to_uppercase()),
        }
    }

    /// Whether the rule takes part in redaction.
    pub fn is_active(&self) -> bool {
        match self.enabled {
            Some(enabled) => enabled,
            None => !self.opt_in,
        }
    }
}

/// Returns true if `token` is a bracketed run of uppercase ASCII letters and underscores.
///
/// Tokens of this shape contain no digits, `@` or `.`, so none of the numeric or
/// email-shaped rules can match them again on a later pass.
pub fn is_valid_token(token: &str) -> bool {
    let Some(inner) = token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) else {
        return false;
    };
    !inner.is_empty() && inner.chars().all(|c| c.is_ascii_uppercase() || c == '_')
}

/// A user-supplied prompt-injection pattern, appended to the built-in denylist.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InjectionPatternConfig {
    pub name: String,
    pub pattern: String,
}

/// Optional scalar settings as they appear in YAML. Unset fields fall back to defaults.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SettingsConfig {
    pub max_length: Option<usize>,
    pub enable_name_heuristic: Option<bool>,
    pub injection_marker: Option<String>,
    pub truncation_suffix: Option<String>,
    pub fallback_message: Option<String>,
    pub min_content_length: Option<usize>,
    pub injection_patterns: Option<Vec<InjectionPatternConfig>>,
}

/// Fully resolved scalar settings of a sanitization policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicySettings {
    pub max_length: usize,
    pub enable_name_heuristic: bool,
    pub injection_marker: String,
    pub truncation_suffix: String,
    pub fallback_message: String,
    pub min_content_length: usize,
    pub extra_injection_patterns: Vec<InjectionPatternConfig>,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            enable_name_heuristic: false,
            injection_marker: DEFAULT_INJECTION_MARKER.to_string(),
            truncation_suffix: DEFAULT_TRUNCATION_SUFFIX.to_string(),
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            min_content_length: DEFAULT_MIN_CONTENT_LENGTH,
            extra_injection_patterns: Vec::new(),
        }
    }
}

impl SettingsConfig {
    /// Fills every unset field with its default.
    pub fn resolve(&self) -> PolicySettings {
        let defaults = PolicySettings::default();
        PolicySettings {
            max_length: self.max_length.unwrap_or(defaults.max_length),
            enable_name_heuristic: self.enable_name_heuristic.unwrap_or(defaults.enable_name_heuristic),
            injection_marker: self.injection_marker.clone().unwrap_or(defaults.injection_marker),
            truncation_suffix: self.truncation_suffix.clone().unwrap_or(defaults.truncation_suffix),
            fallback_message: self.fallback_message.clone().unwrap_or(defaults.fallback_message),
            min_content_length: self.min_content_length.unwrap_or(defaults.min_content_length),
            extra_injection_patterns: self.injection_patterns.clone().unwrap_or_default(),
        }
    }
}

/// Represents the top-level configuration structure for promptscrub.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct RedactionConfig {
    /// PII redaction rules. Pass order is decided by `precedence`, not list order.
    pub rules: Vec<RedactionRule>,
    /// Scalar policy settings.
    #[serde(default)]
    pub settings: SettingsConfig,
}

impl RedactionConfig {
    /// Loads redaction rules from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading custom rules from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: RedactionConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_rules(&config.rules)
            .with_context(|| format!("Invalid rules in config file {}", path.display()))?;
        info!("Loaded {} rules from file {}.", config.rules.len(), path.display());

        Ok(config)
    }

    /// Loads default redaction rules from the embedded configuration.
    pub fn load_default_rules() -> Result<Self> {
        debug!("Loading default rules from embedded string...");
        let default_yaml = include_str!("../config/default_rules.yaml");
        let config: RedactionConfig = serde_yml::from_str(default_yaml)
            .context("Failed to parse default rules")?;

        debug!("Loaded {} default rules.", config.rules.len());
        Ok(config)
    }

    /// Applies enable/disable lists provided by the user.
    ///
    /// Disabled rules are removed. Opt-in rules are kept only when named in `enable_rules`.
    pub fn set_active_rules(&mut self, enable_rules: &[String], disable_rules: &[String]) {
        let enable_set: HashSet<&str> = enable_rules.iter().map(String::as_str).collect();
        let disable_set: HashSet<&str> = disable_rules.iter().map(String::as_str).collect();

        debug!("Initial rules count before filtering: {}", self.rules.len());

        let all_rule_names: HashSet<&str> = self.rules.iter().map(|r| r.name.as_str()).collect();

        for rule_name in enable_set.difference(&all_rule_names) {
            warn!("Rule '{}' in `enable_rules` list does not exist.", rule_name);
        }

        for rule_name in disable_set.difference(&all_rule_names) {
            warn!("Rule '{}' in `disable_rules` list does not exist.", rule_name);
        }

        self.rules.retain(|rule| !disable_set.contains(rule.name.as_str()));
        for rule in self.rules.iter_mut() {
            if enable_set.contains(rule.name.as_str()) {
                rule.enabled = Some(true);
            }
        }
        self.rules.retain(RedactionRule::is_active);

        debug!("Final active rules count after filtering: {}", self.rules.len());
    }
}

/// Merges user-defined rules and settings with defaults.
///
/// A user rule replaces the default rule of the same name; new names are appended.
/// Each user setting that is set overrides the default one.
pub fn merge_rules(
    default_config: RedactionConfig,
    user_config: Option<RedactionConfig>,
) -> RedactionConfig {
    debug!("merge_rules called. Initial default rules count: {}", default_config.rules.len());

    let mut final_rules = default_config.rules;
    let mut final_settings = default_config.settings;

    if let Some(user_cfg) = user_config {
        debug!("User config provided. Merging {} user rules.", user_cfg.rules.len());
        for user_rule in user_cfg.rules {
            match final_rules.iter_mut().find(|r| r.name == user_rule.name) {
                Some(existing) => {
                    debug!("Overriding default rule '{}' with user rule.", user_rule.name);
                    *existing = user_rule;
                }
                None => final_rules.push(user_rule),
            }
        }

        let user_settings = user_cfg.settings;
        if let Some(max_length) = user_settings.max_length {
            debug!("Overriding max_length with user value: {}", max_length);
            final_settings.max_length = Some(max_length);
        }
        if let Some(names) = user_settings.enable_name_heuristic {
            debug!("Overriding enable_name_heuristic with user value: {}", names);
            final_settings.enable_name_heuristic = Some(names);
        }
        if user_settings.injection_marker.is_some() {
            final_settings.injection_marker = user_settings.injection_marker;
        }
        if user_settings.truncation_suffix.is_some() {
            final_settings.truncation_suffix = user_settings.truncation_suffix;
        }
        if user_settings.fallback_message.is_some() {
            final_settings.fallback_message = user_settings.fallback_message;
        }
        if user_settings.min_content_length.is_some() {
            final_settings.min_content_length = user_settings.min_content_length;
        }
        if let Some(extra) = user_settings.injection_patterns {
            final_settings
                .injection_patterns
                .get_or_insert_with(Vec::new)
                .extend(extra);
        }
    }

    debug!("Final total rules after merge: {}", final_rules.len());

    RedactionConfig {
        rules: final_rules,
        settings: final_settings,
    }
}

/// Validates rule integrity: names, tokens, patterns and precedence uniqueness.
///
/// Regex syntax is checked later, when the rules are compiled.
pub fn validate_rules(rules: &[RedactionRule]) -> Result<(), ScrubError> {
    let mut rule_names = HashSet::new();
    let mut precedences = HashSet::new();
    let mut errors = Vec::new();

    for rule in rules {
        if rule.name.is_empty() {
            errors.push("A rule has an empty `name` field.".to_string());
        } else if !rule_names.insert(rule.name.as_str()) {
            errors.push(format!("Duplicate rule name found: '{}'.", rule.name));
        }

        if rule.patterns.is_empty() {
            errors.push(format!("Rule '{}' has no `patterns`.", rule.name));
        }
        for pattern in &rule.patterns {
            if pattern.is_empty() {
                errors.push(format!("Rule '{}' has an empty pattern.", rule.name));
            }
        }

        let token = rule.token();
        if !is_valid_token(&token) {
            errors.push(format!(
                "Rule '{}': replacement token '{}' must be '[' + uppercase letters or underscores + ']'.",
                rule.name, token
            ));
        }

        if rule.is_active() && !precedences.insert(rule.precedence) {
            errors.push(format!(
                "Rule '{}': precedence {} is already claimed by another active rule.",
                rule.name, rule.precedence
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ScrubError::InvalidRule(format!(
            "Rule validation failed:\n{}",
            errors.join("\n")
        )))
    }
}
