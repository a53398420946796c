// promptscrub/src/commands/batch.rs
//! The `batch` command: sanitize several files into one JSON report.
//!
//! A file that cannot be read becomes a failed entry; the rest still run.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use promptscrub_core::pipeline::decode_lossless_utf8;
use promptscrub_core::{
    compose_prompt, process_documents, BatchReport, DocumentInput, ExtractionError, SanitizationEngine,
};

/// What `batch` prints: the report, plus the composed prompt when one was asked for.
#[derive(Debug, Serialize)]
pub struct BatchOutput {
    #[serde(flatten)]
    pub report: BatchReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composed_prompt: Option<String>,
}

/// Reads one file into a document, turning read errors into extraction failures.
pub fn read_document(path: &PathBuf) -> DocumentInput {
    let source_id = path.display().to_string();
    match fs::read(path) {
        Ok(bytes) => DocumentInput::ok(source_id, decode_lossless_utf8(&bytes)),
        Err(e) => {
            warn!("Could not read '{}': {}", source_id, e);
            DocumentInput::failed(source_id, ExtractionError::from(e))
        }
    }
}

/// Processes `files` and, when `prompt` is given, sanitizes the composed prompt.
pub fn build_batch_output(
    engine: &dyn SanitizationEngine,
    files: &[PathBuf],
    prompt: Option<&str>,
) -> BatchOutput {
    let documents = files.iter().map(read_document).collect();
    let report = process_documents(engine, documents);
    info!(
        "Batch finished: {} succeeded, {} failed.",
        report.summary.successful, report.summary.failed
    );

    let composed_prompt = prompt.map(|p| {
        let composed = compose_prompt(p, &report.cleaned_texts());
        engine.sanitize(&composed).cleaned_text
    });
    BatchOutput { report, composed_prompt }
}

/// Runs the batch command and prints the JSON output to stdout.
pub fn run_batch(engine: &dyn SanitizationEngine, files: &[PathBuf], prompt: Option<&str>) -> Result<()> {
    let output = build_batch_output(engine, files, prompt);
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    serde_json::to_writer_pretty(&mut writer, &output).context("Failed to serialize batch report")?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptscrub_core::PromptEngine;
    use tempfile::TempDir;

    #[test]
    fn unreadable_file_does_not_abort_the_batch() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.txt");
        fs::write(&good, "Reach me at a@b.com please.").unwrap();
        let missing = dir.path().join("missing.txt");

        let engine = PromptEngine::with_defaults().unwrap();
        let output = build_batch_output(&engine, &[good, missing], Some("Summarize these."));

        assert_eq!(output.report.summary.total_files, 2);
        assert_eq!(output.report.summary.successful, 1);
        assert_eq!(output.report.summary.failed, 1);
        assert!(output.report.documents[1].error.as_deref().unwrap().contains("Failed to read input"));
        assert_eq!(
            output.composed_prompt.as_deref(),
            Some("Summarize these. Document Contents: --- Document 1 --- Reach me at [EMAIL_FILTERED] please.")
        );

        let json = serde_json::to_value(&output).unwrap();
        assert!(json.get("run_id").is_some());
        assert!(json.get("composed_prompt").is_some());
    }
}
