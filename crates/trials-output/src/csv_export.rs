//! CSV export.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use trials_model::NormalizedTable;

use crate::error::{OutputError, Result};

/// Writes a header row of field names followed by one row per record.
pub fn write_csv<W: Write>(table: &NormalizedTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(table.headers())?;
    for row in table.rows() {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// CSV text of a table.
pub fn csv_string(table: &NormalizedTable) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Writes the table as CSV to `path`, replacing any existing file.
pub fn write_csv_file(table: &NormalizedTable, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(table, file)?;
    tracing::debug!(path = %path.display(), rows = table.len(), "wrote csv");
    Ok(())
}
