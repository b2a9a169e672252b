//! tally-ingest: statement ingestion (CSV/PDF text) and bank-specific parsers.

pub mod parsers;
pub mod types;

use std::path::Path;

use tally_core::RawRow;
use tracing::info;

pub use types::{IngestError, SourceFormat};

/// Read a statement file with the parser matching its extension.
pub fn read_statement(path: impl AsRef<Path>) -> Result<Vec<RawRow>, IngestError> {
    let path = path.as_ref();
    let format = SourceFormat::from_path(path)?;
    let rows = match format {
        SourceFormat::Csv => parsers::parse_bov_csv(path)?,
        SourceFormat::Pdf => parsers::parse_wamo_pdf(path)?,
    };
    info!(path = %path.display(), ?format, rows = rows.len(), "read statement");
    Ok(rows)
}
