//! JSON export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use trials_model::NormalizedTable;

use crate::error::{OutputError, Result};

/// Writes the table as a JSON array of records keyed by field name.
pub fn write_json<W: Write>(table: &NormalizedTable, writer: W, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, table)?;
    } else {
        serde_json::to_writer(writer, table)?;
    }
    Ok(())
}

/// Writes the table as JSON to `path`, replacing any existing file.
pub fn write_json_file(table: &NormalizedTable, path: &Path, pretty: bool) -> Result<()> {
    let io_error = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    write_json(table, &mut writer, pretty)?;
    writer.write_all(b"\n").map_err(io_error)?;
    writer.flush().map_err(io_error)?;
    tracing::debug!(path = %path.display(), rows = table.len(), "wrote json");
    Ok(())
}
