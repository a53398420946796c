// promptscrub/src/main.rs
//! promptscrub entry point.
//!
//! Loads `.env`, parses the command line, initializes logging and dispatches
//! to the command implementations.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;

use promptscrub::cli::{Cli, Commands, ProfilesCommand};
use promptscrub::commands::{self, batch, profiles, rules, sanitize, scan};
use promptscrub::logger;
use promptscrub::ui::theme::{build_theme_map, ThemeMap, ThemeStyle};
use promptscrub_core::SanitizationEngine;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logger::init_logger(logger::level_from_flags(cli.quiet, cli.debug));

    let theme_map = match build_theme_map(cli.theme.as_ref()).context("Theme error") {
        Ok(theme) => theme,
        Err(e) => {
            let fallback = ThemeStyle::default_theme_map();
            commands::error_msg(format!("{:#}", e), &fallback);
            return ExitCode::FAILURE;
        }
    };

    match run(cli, &theme_map) {
        Ok(code) => code,
        Err(e) => {
            commands::error_msg(format!("{:#}", e), &theme_map);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, theme_map: &ThemeMap) -> Result<ExitCode> {
    let quiet = cli.quiet;
    match cli.command {
        Commands::Sanitize(cmd) => {
            let engine = commands::build_engine(&cmd.policy)?;
            let input = commands::read_input(cmd.input_file.as_ref())?;
            let opts = sanitize::SanitizeOptions {
                input,
                output_path: cmd.output,
                json: cmd.json,
                diff: cmd.diff,
                validate: cmd.validate,
                no_summary: cmd.no_summary,
                quiet,
            };
            sanitize::run_sanitize(&engine, opts, theme_map)?;
        }
        Commands::Scan(cmd) => {
            let engine = commands::build_engine(&cmd.policy)?;
            let input = commands::read_input(cmd.input_file.as_ref())?;
            let opts = scan::ScanOptions {
                input,
                json_stdout: cmd.json_stdout,
                fail_over_threshold: cmd.fail_over_threshold,
                quiet,
            };
            if scan::run_scan(&engine, opts, theme_map)? == scan::ScanOutcome::ThresholdExceeded {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Batch(cmd) => {
            let engine = commands::build_engine(&cmd.policy)?;
            batch::run_batch(&engine, &cmd.files, cmd.prompt.as_deref())?;
        }
        Commands::Rules(cmd) => {
            let engine = commands::build_engine(&cmd.policy)?;
            rules::run_rules(engine.compiled_rules())?;
        }
        Commands::Profiles(ProfilesCommand::List) => profiles::run_list(theme_map)?,
        Commands::Profiles(ProfilesCommand::Validate { name, config }) => {
            profiles::run_validate(&name, config.as_deref(), theme_map)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
