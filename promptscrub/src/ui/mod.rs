// promptscrub/src/ui/mod.rs
//! Terminal presentation: themes, status messages, diffs and summaries.

pub mod diff_viewer;
pub mod output_format;
pub mod redaction_summary;
pub mod theme;
