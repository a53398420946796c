//! compiler.rs - Compiles redaction rules into the ordered registry.
//!
//! This module turns a list of `RedactionRule`s into `CompiledRules`: active
//! rules only, every pattern compiled, sorted by ascending precedence. It is
//! also where the registry invariants are enforced: unique names and
//! precedences, well-formed tokens, and tokens that no rule can match.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use regex::{Regex, RegexBuilder};

use crate::config::{validate_rules, RedactionRule, MAX_PATTERN_LENGTH};
use crate::errors::ScrubError;

/// Compiled size limit per pattern.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Represents a single compiled redaction rule.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// The unique name of the rule, also its reporting label.
    pub name: String,
    /// Position in the pass order.
    pub precedence: u32,
    /// The marker substituted for every match.
    pub token: String,
    /// Patterns applied one after another, in listed order.
    pub regexes: Vec<Regex>,
}

impl CompiledRule {
    /// Returns true if any pattern of this rule matches somewhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regexes.iter().any(|re| re.is_match(text))
    }
}

/// The ordered rule registry.
#[derive(Debug, Clone, Default)]
pub struct CompiledRules {
    /// Rules sorted by ascending precedence.
    pub rules: Vec<CompiledRule>,
}

impl CompiledRules {
    /// Rule labels in pass order.
    pub fn labels(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&CompiledRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Returns the name of the first rule that matches `marker`, if any.
    pub fn first_rule_matching(&self, marker: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.is_match(marker))
            .map(|rule| rule.name.as_str())
    }
}

fn compile_pattern(rule: &RedactionRule, pattern: &str) -> Result<Regex, ScrubError> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(ScrubError::PatternLengthExceeded(
            rule.name.clone(),
            pattern.len(),
            MAX_PATTERN_LENGTH,
        ));
    }

    RegexBuilder::new(pattern)
        .case_insensitive(rule.case_insensitive)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|e| ScrubError::RuleCompilationError(rule.name.clone(), e))
}

/// Compiles a list of `RedactionRule`s into the ordered registry.
///
/// Inactive rules are skipped. Fails if any rule is malformed, any pattern
/// does not compile, or any rule token can be matched by a rule.
pub fn compile_rules(rules_to_compile: Vec<RedactionRule>) -> Result<CompiledRules, ScrubError> {
    debug!("Starting compilation of {} rules.", rules_to_compile.len());
    validate_rules(&rules_to_compile)?;

    let mut compiled_rules = Vec::new();
    let mut compilation_errors = Vec::new();

    for rule in rules_to_compile {
        if !rule.is_active() {
            debug!("Skipping inactive rule '{}'.", rule.name);
            continue;
        }

        let mut regexes = Vec::with_capacity(rule.patterns.len());
        for pattern in &rule.patterns {
            debug!("Attempting to compile rule: '{}' with pattern '{:?}'", rule.name, pattern);
            match compile_pattern(&rule, pattern) {
                Ok(regex) => regexes.push(regex),
                Err(e) => compilation_errors.push(e),
            }
        }

        if regexes.len() == rule.patterns.len() {
            log::debug!(
                target: "promptscrub_core::sanitizer",
                "Rule '{}' compiled successfully.",
                &rule.name
            );
            compiled_rules.push(CompiledRule {
                token: rule.token(),
                name: rule.name,
                precedence: rule.precedence,
                regexes,
            });
        }
    }

    if !compilation_errors.is_empty() {
        let error_message = compilation_errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        return Err(ScrubError::Fatal(format!(
            "Failed to compile {} rule pattern(s):\n{}",
            compilation_errors.len(),
            error_message
        )));
    }

    compiled_rules.sort_by_key(|r| r.precedence);
    let compiled = CompiledRules { rules: compiled_rules };

    for rule in &compiled.rules {
        ensure_marker_is_inert(&compiled, &rule.token)?;
    }

    if compiled.rules.is_empty() {
        warn!("No active redaction rules; only normalization and injection filtering will run.");
    }
    debug!("Finished compiling rules. Total compiled: {}.", compiled.rules.len());
    Ok(compiled)
}

/// Fails if any compiled rule matches `marker`.
pub fn ensure_marker_is_inert(rules: &CompiledRules, marker: &str) -> Result<(), ScrubError> {
    match rules.first_rule_matching(marker) {
        Some(name) => Err(ScrubError::InvalidRule(format!(
            "Marker '{}' is matched by rule '{}'; redaction would re-match its own output.",
            marker, name
        ))),
        None => Ok(()),
    }
}
