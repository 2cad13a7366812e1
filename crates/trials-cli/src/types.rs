use std::path::PathBuf;

use trials_output::ExportFormat;

#[derive(Debug)]
pub struct RunSummary {
    pub studies: usize,
    pub total_count: Option<u64>,
    pub malformed_response: bool,
    pub output: Option<(PathBuf, ExportFormat)>,
}
