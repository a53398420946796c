// promptscrub/src/cli.rs
//! This file defines the command-line interface (CLI) for the promptscrub application,
//! including all available commands and their arguments.
//! License: MIT OR APACHE 2.0

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "promptscrub",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Scrub PII and prompt-injection phrasing from text bound for an LLM",
    long_about = "promptscrub cleans free-form text before it is forwarded to a third-party language model. It redacts personally identifiable information with an ordered rule set, optionally shortens personal names to initials, neutralizes known prompt-injection phrasing and reports what it filtered.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, conflicts_with = "quiet", help = "Enable debug logging.")]
    pub debug: bool,

    /// Specify the path to a custom YAML theme file.
    #[arg(long = "theme", value_name = "FILE", global = true, help = "Specify the path to a custom YAML theme file.")]
    pub theme: Option<PathBuf>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `promptscrub` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sanitizes an input file or stdin and prints the cleaned text.
    #[command(about = "Sanitizes an input file or stdin and prints the cleaned text.")]
    Sanitize(SanitizeCommand),

    /// Reports what would be filtered without printing the cleaned text.
    #[command(about = "Reports what would be filtered without printing the cleaned text.")]
    Scan(ScanCommand),

    /// Sanitizes several files and prints a JSON batch report.
    #[command(about = "Sanitizes several files and prints a JSON batch report.")]
    Batch(BatchCommand),

    /// Lists the active redaction rules in precedence order.
    #[command(about = "Lists the active redaction rules in precedence order.")]
    Rules(RulesCommand),

    /// Provides tools for managing redaction profiles.
    #[command(subcommand, about = "Provides tools for managing redaction profiles.")]
    Profiles(ProfilesCommand),
}

/// Options shared by every command that builds a sanitization policy.
#[derive(Args, Debug, Clone, Default)]
pub struct PolicyArgs {
    /// Path to a custom redaction configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", help = "Path to a custom redaction configuration file (YAML), merged over the defaults.")]
    pub config: Option<PathBuf>,

    /// Loads a profile by name from the profile directories, or by path.
    #[arg(long = "profile", value_name = "NAME", env = "PROMPTSCRUB_PROFILE", help = "Loads a profile by name from the profile directories, or by path.")]
    pub profile: Option<String>,

    /// Enable opt-in rules by name (comma-separated).
    #[arg(long, short = 'e', value_delimiter = ',', help = "Enable these opt-in rule names (comma-separated).")]
    pub enable: Vec<String>,

    /// Disable rules by name (comma-separated).
    #[arg(long, short = 'x', value_delimiter = ',', help = "Disable these rule names (comma-separated).")]
    pub disable: Vec<String>,

    /// Shorten personal names to initials.
    #[arg(long = "names", env = "PROMPTSCRUB_ENABLE_NAMES", help = "Shorten personal names to initials.")]
    pub names: bool,

    /// Maximum output length in characters.
    #[arg(long = "max-length", value_name = "N", env = "PROMPTSCRUB_MAX_LENGTH", help = "Truncate output longer than N characters.")]
    pub max_length: Option<usize>,
}

/// Arguments for the `sanitize` command.
#[derive(Parser, Debug)]
pub struct SanitizeCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write sanitized output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Print the full result (text, events, stats) as JSON.
    #[arg(long = "json", conflicts_with = "diff", help = "Print the full sanitization result as JSON.")]
    pub json: bool,

    /// Show a unified diff to highlight the changes made.
    #[arg(long, short = 'D', help = "Show a unified diff to highlight the changes made.")]
    pub diff: bool,

    /// Reject input that is not an acceptable prompt.
    #[arg(long = "validate", help = "Reject empty, too short, too long or spam-like input with a non-zero exit.")]
    pub validate: bool,

    /// Suppress the redaction summary.
    #[arg(long = "no-summary", help = "Suppress the redaction summary.")]
    pub no_summary: bool,
}

/// Arguments for the `scan` command.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Exit with a non-zero code if the number of filtered items exceeds this threshold.
    #[arg(long = "fail-over-threshold", value_name = "N", help = "Exit with a non-zero code if the number of filtered items exceeds this threshold.")]
    pub fail_over_threshold: Option<usize>,

    /// Print the scan report as JSON to stdout.
    #[arg(long = "json-stdout", help = "Print the scan report to stdout as JSON.")]
    pub json_stdout: bool,
}

/// Arguments for the `batch` command.
#[derive(Parser, Debug)]
pub struct BatchCommand {
    /// Files to sanitize.
    #[arg(value_name = "FILES", required = true, help = "Files to sanitize.")]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Compose this prompt with the cleaned documents and sanitize the result.
    #[arg(long = "prompt", value_name = "TEXT", help = "Compose this prompt with the cleaned documents and sanitize the result.")]
    pub prompt: Option<String>,
}

/// Arguments for the `rules` command.
#[derive(Parser, Debug)]
pub struct RulesCommand {
    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// Subcommands for the `profiles` command.
#[derive(Subcommand, Debug)]
pub enum ProfilesCommand {
    #[command(about = "Lists all available local profiles.")]
    List,
    #[command(about = "Loads a profile and validates it against the rule set.")]
    Validate {
        /// Profile name or path.
        #[arg(value_name = "NAME", help = "Profile name or path to a profile YAML file.")]
        name: String,
        /// Path to a custom redaction configuration file (YAML).
        #[arg(long = "config", value_name = "FILE", help = "Validate against the defaults merged with this configuration file.")]
        config: Option<PathBuf>,
    },
}
