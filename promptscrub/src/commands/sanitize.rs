// promptscrub/src/commands/sanitize.rs
//! The `sanitize` command: clean one input and write it out.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use promptscrub_core::pipeline::decode_lossless_utf8;
use promptscrub_core::{validate_prompt, SanitizationEngine, SanitizationResult};

use super::info_msg;
use crate::ui::diff_viewer;
use crate::ui::redaction_summary;
use crate::ui::theme::ThemeMap;

/// Options for a single `sanitize` run.
pub struct SanitizeOptions {
    pub input: Vec<u8>,
    pub output_path: Option<PathBuf>,
    pub json: bool,
    pub diff: bool,
    pub validate: bool,
    pub no_summary: bool,
    pub quiet: bool,
}

/// Runs the sanitize command against `engine`.
pub fn run_sanitize(
    engine: &dyn SanitizationEngine,
    opts: SanitizeOptions,
    theme_map: &ThemeMap,
) -> Result<()> {
    info!("Starting sanitize operation.");

    let text = decode_lossless_utf8(&opts.input);
    if opts.validate {
        validate_prompt(&text).context("Input rejected")?;
    }

    let result = engine.sanitize(&text);
    debug!(
        "Content sanitized. Original length: {}, Sanitized length: {}",
        result.stats.original_length, result.stats.filtered_length
    );

    handle_primary_output(&opts, &text, &result, theme_map)?;
    handle_redaction_summary(&result, &opts, theme_map)?;

    info!("Sanitize operation completed.");
    Ok(())
}

fn render_output<W: Write>(
    writer: &mut W,
    opts: &SanitizeOptions,
    original: &str,
    result: &SanitizationResult,
    theme_map: &ThemeMap,
    supports_color: bool,
) -> Result<()> {
    if opts.json {
        serde_json::to_writer_pretty(&mut *writer, result)
            .context("Failed to serialize sanitization result")?;
        writeln!(writer)?;
    } else if opts.diff {
        diff_viewer::print_diff(original, &result.cleaned_text, writer, theme_map, supports_color)?;
    } else {
        writeln!(writer, "{}", result.cleaned_text)?;
    }
    Ok(())
}

fn handle_primary_output(
    opts: &SanitizeOptions,
    original: &str,
    result: &SanitizationResult,
    theme_map: &ThemeMap,
) -> Result<()> {
    if let Some(path) = &opts.output_path {
        if !opts.quiet {
            info_msg(format!("Writing sanitized content to file: {}", path.display()), theme_map);
        }
        let mut file = fs::File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        render_output(&mut file, opts, original, result, theme_map, false)
    } else {
        let stdout = io::stdout();
        let supports_color = stdout.is_terminal();
        let mut writer = stdout.lock();
        render_output(&mut writer, opts, original, result, theme_map, supports_color)
    }
}

fn handle_redaction_summary(
    result: &SanitizationResult,
    opts: &SanitizeOptions,
    theme_map: &ThemeMap,
) -> Result<()> {
    if !opts.no_summary && !opts.quiet && !opts.json {
        let stderr_supports_color = io::stderr().is_terminal();
        redaction_summary::print_summary(
            &result.events,
            &result.stats,
            &mut io::stderr(),
            theme_map,
            stderr_supports_color,
        )?;
    }
    Ok(())
}
