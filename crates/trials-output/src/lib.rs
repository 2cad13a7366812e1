//! Export of normalized study tables.
//!
//! - **CSV**: header row of field names, one row per study
//! - **JSON**: array of objects keyed by field name

mod csv_export;
pub mod error;
mod json_export;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use trials_model::NormalizedTable;

pub use crate::csv_export::{csv_string, write_csv, write_csv_file};
pub use crate::error::{OutputError, Result};
pub use crate::json_export::{write_json, write_json_file};

/// File format for exported tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Format implied by a file extension, if any.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(OutputError::UnknownFormat(other.to_string())),
        }
    }
}

/// Writes `table` to `path` in `format`.
pub fn export(table: &NormalizedTable, path: &Path, format: ExportFormat) -> Result<()> {
    let span = tracing::info_span!("export", format = %format, path = %path.display());
    let _guard = span.enter();
    match format {
        ExportFormat::Csv => write_csv_file(table, path)?,
        ExportFormat::Json => write_json_file(table, path, true)?,
    }
    tracing::info!(rows = table.len(), "export complete");
    Ok(())
}
