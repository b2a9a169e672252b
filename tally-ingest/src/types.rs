use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Statement export formats we can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Delimited-text export with a `Transaction History` section (Bank of Valletta)
    Csv,
    /// Text-extracted PDF statement (Wamo)
    Pdf,
}

impl SourceFormat {
    /// Detect from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "pdf" => Ok(SourceFormat::Pdf),
            _ => Err(IngestError::UnsupportedFormat(ext)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "CSV (Bank of Valletta)",
            SourceFormat::Pdf => "PDF (Wamo)",
        }
    }
}

/// Structural problems with a statement. Field-level defects never show up here.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported file type: '.{0}' (supported: .csv, .pdf)")]
    UnsupportedFormat(String),
    #[error("could not find the '{0}' section marker")]
    MissingSectionMarker(&'static str),
    #[error("expected columns Date, Detail, Amount; found: {}", found.join(", "))]
    MissingColumns { found: Vec<String> },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("pdf text extraction failed: {0}")]
    Pdf(String),
}
