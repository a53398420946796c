//! Trigger-gated personal name heuristic.
//!
//! Rewrites a run of two or three capitalized words to its initials
//! ("John Smith" -> "J.S.") only when it sits next to a recognized trigger: a
//! salutation, a title, an attribution phrase or a sign-off. Bare capitalized
//! pairs are left alone.
//!
//! This is not entity recognition. An organization that follows "Dear" is
//! rewritten like a person, and a person with no trigger nearby is never
//! touched.

use std::borrow::Cow;

use log::debug;
use regex::{Captures, Regex, RegexBuilder};

use crate::errors::ScrubError;
use crate::redaction_match::{log_redaction_action_debug, RedactionEvent, NAMES_LABEL};

/// Which family of cue a trigger belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerCategory {
    Title,
    Salutation,
    Attribution,
    SignOff,
}

/// Whether the trigger precedes or follows the name it gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    BeforeName,
    AfterName,
}

/// One row of the trigger table: a category, where its triggers sit relative
/// to the name, the trigger fragments and the longest name span it accepts.
#[derive(Debug)]
pub struct TriggerContext {
    pub category: TriggerCategory,
    pub placement: Placement,
    pub triggers: &'static [&'static str],
    pub case_insensitive: bool,
    pub max_words: usize,
}

/// Generational suffixes kept verbatim when captured as the last word.
const NAME_SUFFIXES: &[&str] = &["Jr", "Sr"];

/// The trigger table, evaluated top to bottom, one pass per row.
///
/// Titles run first so that "Dear Mr. John Smith" is claimed by the title.
pub static TRIGGER_CONTEXTS: &[TriggerContext] = &[
    TriggerContext {
        category: TriggerCategory::Title,
        placement: Placement::BeforeName,
        triggers: &[
            r"Mrs\.?", r"Mr\.?", r"Ms\.?", r"Dr\.?", r"Prof\.?",
            "Director", "Manager", "CEO", "President",
        ],
        case_insensitive: false,
        max_words: 3,
    },
    TriggerContext {
        category: TriggerCategory::Salutation,
        placement: Placement::BeforeName,
        triggers: &["dear", "hello", "hi", "greetings", "from:", "to:", "attn:"],
        case_insensitive: true,
        max_words: 3,
    },
    TriggerContext {
        category: TriggerCategory::Attribution,
        placement: Placement::BeforeName,
        triggers: &[
            r"according\s+to", r"as\s+per", "contact", r"signed\s+by", r"prepared\s+by",
            r"reviewed\s+by", r"authored\s+by", r"written\s+by", r"approved\s+by",
            r"discussed\s+with",
        ],
        case_insensitive: true,
        max_words: 3,
    },
    TriggerContext {
        category: TriggerCategory::SignOff,
        placement: Placement::BeforeName,
        triggers: &[
            r"best\s+regards", r"kind\s+regards", r"warm\s+regards", "regards",
            "sincerely", r"thank\s+you", "thanks", "cheers", r"yours\s+truly",
        ],
        case_insensitive: true,
        max_words: 3,
    },
    TriggerContext {
        category: TriggerCategory::Attribution,
        placement: Placement::AfterName,
        triggers: &[
            "said", "wrote", "stated", "reported", "mentioned", "noted", "explained",
            "argued", "claimed", "replied", "added", "confirmed",
        ],
        case_insensitive: true,
        max_words: 2,
    },
];

const NAME_WORD: &str = r"\p{Lu}\p{Ll}+";

#[derive(Debug, Clone)]
struct CompiledTrigger {
    category: TriggerCategory,
    regex: Regex,
}

fn build_pattern(context: &TriggerContext) -> String {
    let alternation = context.triggers.join("|");
    let trigger = if context.case_insensitive {
        format!("(?i:{})", alternation)
    } else {
        format!("(?:{})", alternation)
    };
    let name = format!(
        r"(?P<name>{word}(?:\s+{word}){{1,{extra}}})",
        word = NAME_WORD,
        extra = context.max_words.saturating_sub(1).max(1)
    );
    match context.placement {
        Placement::BeforeName => format!(r"\b{}[:,]?\s+{}\b", trigger, name),
        Placement::AfterName => format!(r"\b{},?\s+{}\b", name, trigger),
    }
}

/// Builds "J.S." from "John Smith"; a trailing "Jr"/"Sr" stays as written.
pub fn initials(name: &str) -> String {
    let mut words: Vec<&str> = name.split_whitespace().collect();
    let suffix = match words.last() {
        Some(last) if words.len() > 2 && NAME_SUFFIXES.contains(last) => words.pop(),
        _ => None,
    };

    let mut out: String = words
        .iter()
        .filter_map(|w| w.chars().next())
        .flat_map(|c| [c, '.'])
        .collect();
    if let Some(suffix) = suffix {
        out.push(' ');
        out.push_str(suffix);
    }
    out
}

/// Compiled trigger table.
#[derive(Debug, Clone)]
pub struct NameHeuristic {
    passes: Vec<CompiledTrigger>,
}

impl NameHeuristic {
    pub fn new() -> Result<Self, ScrubError> {
        let mut passes = Vec::with_capacity(TRIGGER_CONTEXTS.len());
        for context in TRIGGER_CONTEXTS {
            let pattern = build_pattern(context);
            let regex = RegexBuilder::new(&pattern).build().map_err(|e| {
                ScrubError::RuleCompilationError(format!("names:{:?}", context.category), e)
            })?;
            passes.push(CompiledTrigger {
                category: context.category,
                regex,
            });
        }
        Ok(Self { passes })
    }

    /// Rewrites every trigger-adjacent name to initials. Returns the new text
    /// and a `names` event tallying the rewritten spans.
    pub fn apply(&self, text: &str) -> (String, RedactionEvent) {
        let mut current = text.to_string();
        let mut event = RedactionEvent::new(NAMES_LABEL);

        for pass in &self.passes {
            let replaced = pass.regex.replace_all(&current, |caps: &Captures| {
                let whole = &caps[0];
                let Some(name) = caps.name("name") else {
                    return whole.to_string();
                };
                let offset = caps.get(0).map_or(0, |m| m.start());
                let (start, end) = (name.start() - offset, name.end() - offset);
                let short = initials(name.as_str());
                log_redaction_action_debug(module_path!(), name.as_str(), &short, NAMES_LABEL);
                event.record(name.as_str());
                format!("{}{}{}", &whole[..start], short, &whole[end..])
            });
            if let Cow::Owned(next) = replaced {
                debug!("Name pass {:?} rewrote text.", pass.category);
                current = next;
            }
        }

        (current, event)
    }
}
