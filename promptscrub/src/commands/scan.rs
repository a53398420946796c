// promptscrub/src/commands/scan.rs
//! The `scan` command: report what would be filtered, never the text itself.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::info;
use std::io::{self, Write};

use promptscrub_core::pipeline::decode_lossless_utf8;
use promptscrub_core::{SanitizationEngine, ScanReport};

use super::warn_msg;
use crate::ui::output_format::write_styled;
use crate::ui::redaction_summary;
use crate::ui::theme::{ThemeEntry, ThemeMap};

/// Options for a single `scan` run.
pub struct ScanOptions {
    pub input: Vec<u8>,
    pub json_stdout: bool,
    pub fail_over_threshold: Option<usize>,
    pub quiet: bool,
}

/// Outcome of a scan, used by `main` to pick the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    WithinThreshold,
    ThresholdExceeded,
}

/// Runs the scan command against `engine`.
pub fn run_scan(engine: &dyn SanitizationEngine, opts: ScanOptions, theme_map: &ThemeMap) -> Result<ScanOutcome> {
    info!("Starting scan operation.");
    let text = decode_lossless_utf8(&opts.input);
    let report = engine.analyze_for_stats(&text);

    let stdout = io::stdout();
    let supports_color = stdout.is_terminal();
    let mut writer = stdout.lock();
    if opts.json_stdout {
        serde_json::to_writer_pretty(&mut writer, &report).context("Failed to serialize scan report")?;
        writeln!(writer)?;
    } else {
        print_scan_report(&report, &mut writer, theme_map, supports_color)?;
    }

    let outcome = evaluate_threshold(&report, opts.fail_over_threshold);
    if outcome == ScanOutcome::ThresholdExceeded && !opts.quiet {
        warn_msg(
            format!(
                "{} item(s) filtered, exceeding the threshold of {}.",
                report.stats.items_filtered,
                opts.fail_over_threshold.unwrap_or_default()
            ),
            theme_map,
        );
    }
    Ok(outcome)
}

/// Compares the filtered item count with an optional threshold.
pub fn evaluate_threshold(report: &ScanReport, threshold: Option<usize>) -> ScanOutcome {
    match threshold {
        Some(limit) if report.stats.items_filtered > limit => ScanOutcome::ThresholdExceeded,
        _ => ScanOutcome::WithinThreshold,
    }
}

fn print_scan_report<W: Write>(
    report: &ScanReport,
    writer: &mut W,
    theme_map: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    redaction_summary::print_summary(&report.events, &report.stats, writer, theme_map, supports_color)?;
    if report.injection_findings.is_empty() {
        return Ok(());
    }
    write_styled(writer, "Injection phrases:", ThemeEntry::Header, theme_map, supports_color)?;
    writeln!(writer)?;
    for finding in &report.injection_findings {
        writeln!(writer, "  {} at {}..{}", finding.pattern, finding.start, finding.end)?;
    }
    Ok(())
}
