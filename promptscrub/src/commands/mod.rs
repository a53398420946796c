// promptscrub/src/commands/mod.rs
//! Command implementations and the helpers they share.

pub mod batch;
pub mod profiles;
pub mod rules;
pub mod sanitize;
pub mod scan;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use promptscrub_core::config::{merge_rules, RedactionConfig};
use promptscrub_core::{apply_profile_to_config, load_profile_by_name, PromptEngine};

use crate::cli::PolicyArgs;
use crate::ui::output_format;
use crate::ui::theme::ThemeMap;

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Helper for printing success messages to stderr.
pub fn success_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_success_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Default rules merged with an optional user configuration file.
pub fn load_config(config_path: Option<&Path>) -> Result<RedactionConfig> {
    let defaults = RedactionConfig::load_default_rules()?;
    let user = config_path
        .map(|path| RedactionConfig::load_from_file(path))
        .transpose()?;
    Ok(merge_rules(defaults, user))
}

/// Resolves the full configuration for a command.
///
/// Order: defaults, `--config`, `--profile`, `-e`/`-x`, then `--names` and `--max-length`.
pub fn resolve_config(args: &PolicyArgs) -> Result<RedactionConfig> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(name) = &args.profile {
        let profile = load_profile_by_name(name)?;
        profile
            .validate(&config)
            .with_context(|| format!("Profile '{}' is not valid for the active rule set", profile.profile_name))?;
        info!("Applying profile '{}'.", profile.profile_name);
        config = apply_profile_to_config(&profile, config);
    }

    if !args.enable.is_empty() || !args.disable.is_empty() {
        config.set_active_rules(&args.enable, &args.disable);
    }
    if args.names {
        config.settings.enable_name_heuristic = Some(true);
    }
    if let Some(max_length) = args.max_length {
        config.settings.max_length = Some(max_length);
    }
    debug!("Resolved {} rules for this run.", config.rules.len());
    Ok(config)
}

/// Builds the engine every command runs against.
pub fn build_engine(args: &PolicyArgs) -> Result<PromptEngine> {
    let config = resolve_config(args)?;
    PromptEngine::new(config).context("Failed to build sanitization policy")
}

/// Reads the whole input as bytes from a file, or from stdin when no path is given.
pub fn read_input(input_file: Option<&PathBuf>) -> Result<Vec<u8>> {
    match input_file {
        Some(path) => {
            fs::read(path).with_context(|| format!("Failed to read input file: {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
