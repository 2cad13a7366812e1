//! Library components of the `trial-search` CLI.

pub mod logging;
pub mod pipeline;
pub mod report;
pub mod types;
