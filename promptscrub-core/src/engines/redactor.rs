//! The PII redactor: threads text through the ordered rule registry.
//!
//! Each rule scans the output of the previous one, so once a span has become a
//! bracketed token it is out of reach of every later numeric or shape rule.
//! License: MIT OR APACHE 2.0

use std::borrow::Cow;

use regex::Captures;

use crate::redaction_match::{log_captured_match_debug, RedactionEvent};
use crate::sanitizers::compiler::CompiledRules;

#[derive(Debug, Clone)]
pub struct Redactor {
    rules: CompiledRules,
}

impl Redactor {
    pub fn new(rules: CompiledRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &CompiledRules {
        &self.rules
    }

    /// Applies every rule in precedence order and returns the redacted text with
    /// one event per label that matched, in pass order.
    pub fn redact(&self, text: &str) -> (String, Vec<RedactionEvent>) {
        let mut current = text.to_string();
        let mut events = Vec::new();

        for rule in &self.rules.rules {
            let mut event = RedactionEvent::new(rule.name.as_str());
            for regex in &rule.regexes {
                let replaced = regex.replace_all(&current, |caps: &Captures| {
                    let matched = caps.get(0).map_or("", |m| m.as_str());
                    log_captured_match_debug(module_path!(), &rule.name, matched);
                    event.record(matched);
                    rule.token.as_str()
                });
                let next = match replaced {
                    Cow::Owned(s) => Some(s),
                    Cow::Borrowed(_) => None,
                };
                if let Some(next) = next {
                    current = next;
                }
            }
            if event.count > 0 {
                events.push(event);
            }
        }

        (current, events)
    }
}
