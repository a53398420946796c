//! batch.rs - Multi-document processing with per-document failures.
//!
//! Text extraction happens upstream; each document arrives either as text or
//! as the `ExtractionError` the extractor reported. Every document is
//! sanitized independently, and one failure never aborts the others.
//!
//! License: MIT OR APACHE 2.0

use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::engine::SanitizationEngine;
use crate::errors::ExtractionError;
use crate::stats::FilterStats;

/// One document as handed over by the extraction layer.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub source_id: String,
    pub extracted: Result<String, ExtractionError>,
}

impl DocumentInput {
    pub fn ok(source_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            extracted: Ok(text.into()),
        }
    }

    pub fn failed(source_id: impl Into<String>, error: ExtractionError) -> Self {
        Self {
            source_id: source_id.into(),
            extracted: Err(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    pub source_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaned_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<FilterStats>,
    pub pii_detected: bool,
    /// SHA-256 of the raw extracted text, hex encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_sha256: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_files: usize,
    pub successful: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: String,
    /// RFC 3339 timestamp.
    pub processed_at: String,
    pub documents: Vec<DocumentReport>,
    pub summary: BatchSummary,
}

impl BatchReport {
    /// Cleaned texts of the successful documents, in input order.
    pub fn cleaned_texts(&self) -> Vec<&str> {
        self.documents
            .iter()
            .filter_map(|d| d.cleaned_text.as_deref())
            .collect()
    }
}

pub fn sha256_hex(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

fn process_document(engine: &dyn SanitizationEngine, doc: DocumentInput) -> DocumentReport {
    match doc.extracted {
        Ok(text) => {
            let result = engine.sanitize(&text);
            debug!(
                "Document '{}': {} item(s) filtered.",
                doc.source_id, result.stats.items_filtered
            );
            DocumentReport {
                pii_detected: result.stats.items_filtered > 0,
                input_sha256: Some(sha256_hex(&text)),
                source_id: doc.source_id,
                success: true,
                error: None,
                cleaned_text: Some(result.cleaned_text),
                stats: Some(result.stats),
            }
        }
        Err(e) => {
            warn!("Document '{}' could not be processed: {}", doc.source_id, e);
            DocumentReport {
                source_id: doc.source_id,
                success: false,
                error: Some(e.to_string()),
                cleaned_text: None,
                stats: None,
                pii_detected: false,
                input_sha256: None,
            }
        }
    }
}

/// Sanitizes every document and reports each outcome.
pub fn process_documents(engine: &dyn SanitizationEngine, documents: Vec<DocumentInput>) -> BatchReport {
    let reports: Vec<DocumentReport> = documents
        .into_iter()
        .map(|doc| process_document(engine, doc))
        .collect();

    let successful = reports.iter().filter(|r| r.success).count();
    let summary = BatchSummary {
        total_files: reports.len(),
        successful,
        failed: reports.len() - successful,
    };
    info!(
        "Processed {} document(s): {} successful, {} failed.",
        summary.total_files, summary.successful, summary.failed
    );

    BatchReport {
        run_id: Uuid::new_v4().to_string(),
        processed_at: Utc::now().to_rfc3339(),
        documents: reports,
        summary,
    }
}

/// Appends document contents to a prompt, one numbered section per document.
///
/// The result is meant to be sanitized as a whole before it is forwarded.
pub fn compose_prompt<S: AsRef<str>>(prompt: &str, documents: &[S]) -> String {
    if documents.is_empty() {
        return prompt.to_string();
    }
    let mut out = format!("{}\n\nDocument Contents:\n", prompt);
    for (i, content) in documents.iter().enumerate() {
        out.push_str(&format!("\n--- Document {} ---\n{}\n", i + 1, content.as_ref()));
    }
    out
}
