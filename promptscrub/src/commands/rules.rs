// promptscrub/src/commands/rules.rs
//! The `rules` command: print the compiled rule table in precedence order.

use anyhow::Result;
use comfy_table::{presets::ASCII_MARKDOWN, Table};
use std::io::{self, Write};

use promptscrub_core::CompiledRules;

/// Renders the rules as a table: precedence, name, token, pattern count.
pub fn rules_table(rules: &CompiledRules) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_MARKDOWN)
        .set_header(vec!["Precedence", "Name", "Token", "Patterns"]);
    for rule in &rules.rules {
        table.add_row(vec![
            rule.precedence.to_string(),
            rule.name.clone(),
            rule.token.clone(),
            rule.regexes.len().to_string(),
        ]);
    }
    table
}

pub fn run_rules(rules: &CompiledRules) -> Result<()> {
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    writeln!(writer, "{}", rules_table(rules))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptscrub_core::{PromptEngine, SanitizationEngine};

    #[test]
    fn table_lists_rules_in_precedence_order() {
        let engine = PromptEngine::with_defaults().unwrap();
        let rendered = rules_table(engine.compiled_rules()).to_string();
        let ssn = rendered.find("[SSN_FILTERED]").unwrap();
        let email = rendered.find("[EMAIL_FILTERED]").unwrap();
        assert!(ssn < email);
        assert!(rendered.contains("Precedence"));
    }
}
