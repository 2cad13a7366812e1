//! Normalization, filtering and export of one response document.
//!
//! Printing stays with the commands; everything here returns data so the
//! policy for malformed responses can be checked without a terminal.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use trials_model::NormalizedTable;
use trials_normalize::{Normalizer, studies_at};
use trials_output::{ExportFormat, export};

use crate::report::filter_by_country;

/// Inputs for [`prepare`].
pub struct PrepareConfig<'a> {
    pub normalizer: &'a Normalizer,
    /// Keep only studies with a site in this country.
    pub country: Option<&'a str>,
    /// Render the document when it has no study list.
    pub keep_raw: bool,
}

/// A normalized response, ready to print or export.
#[derive(Debug)]
pub struct PreparedResponse {
    /// Raw studies, aligned with `table` rows.
    pub studies: Vec<Value>,
    pub table: NormalizedTable,
    /// The document had no study list at the configured path.
    pub malformed_response: bool,
    /// Pretty-printed document, when malformed and `keep_raw` was set.
    pub raw_response: Option<String>,
}

/// Normalizes `document` and applies the country filter.
///
/// A document without a study list is logged and yields an empty table.
///
/// # Errors
///
/// Fails only when the raw document cannot be rendered for display.
pub fn prepare(document: &Value, config: PrepareConfig<'_>) -> Result<PreparedResponse> {
    let normalizer = config.normalizer;
    let (studies, table, malformed_response) = match normalizer.try_normalize_all(document) {
        Ok(table) => {
            let studies = studies_at(document, normalizer.studies_path())
                .map(<[Value]>::to_vec)
                .unwrap_or_default();
            (studies, table, false)
        }
        Err(err) => {
            warn!(%err, "response has no study list; treating as empty");
            (Vec::new(), NormalizedTable::default(), true)
        }
    };

    let raw_response = if malformed_response && config.keep_raw {
        Some(serde_json::to_string_pretty(document).context("render raw response")?)
    } else {
        None
    };

    let (studies, table) = match config.country {
        Some(country) => {
            let before = table.len();
            let (studies, table) = filter_by_country(&studies, table, normalizer, country);
            info!(country, before, after = table.len(), "filtered by site country");
            (studies, table)
        }
        None => (studies, table),
    };

    Ok(PreparedResponse {
        studies,
        table,
        malformed_response,
        raw_response,
    })
}

/// Writes `table` to `path`, in `format` or else the one implied by the
/// extension (CSV when there is none). Returns the format used.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn export_table(
    table: &NormalizedTable,
    path: &Path,
    format: Option<ExportFormat>,
) -> Result<ExportFormat> {
    let format = format
        .or_else(|| ExportFormat::from_path(path))
        .unwrap_or_default();
    export(table, path, format).with_context(|| format!("export {}", path.display()))?;
    Ok(format)
}
