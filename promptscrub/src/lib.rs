// promptscrub/src/lib.rs
//! # promptscrub CLI
//!
//! Command-line front end for `promptscrub-core`: sanitize a prompt from a
//! file or stdin, scan it without printing the text, batch several files into
//! a JSON report, and inspect rules and profiles.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
