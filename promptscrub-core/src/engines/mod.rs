// promptscrub-core/src/engines/mod.rs
//! The sanitization stages and the engine that composes them.
//!
//! `redactor`, `names` and `injection` are the individual matching stages;
//! `prompt_engine` is the `SanitizationEngine` implementation that runs them
//! through the pipeline.
//!
//! # License
//! MIT OR APACHE 2.0

pub mod injection;
pub mod names;
pub mod prompt_engine;
pub mod redactor;
