// promptscrub/src/logger.rs
//! env_logger setup for the CLI.
//!
//! `RUST_LOG` is honoured unless `--quiet` or `--debug` pins the level.
//! Log records go to stderr; stdout is reserved for sanitized output.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Initializes the global logger once; later calls are no-ops.
pub fn init_logger(level_override: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level_override {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).target(Target::Stderr);
    let _ = builder.try_init();
}

/// Maps the global `--quiet` / `--debug` flags to a level override.
pub fn level_from_flags(quiet: bool, debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if debug {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}
