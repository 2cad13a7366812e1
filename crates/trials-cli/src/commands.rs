use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, info_span};

use trials_cli::pipeline::{PrepareConfig, export_table, prepare};
use trials_cli::report::{fields_table, location_lines, parse_columns, study_table};
use trials_cli::types::RunSummary;
use trials_fetch::{RegistryClient, SearchQuery};
use trials_normalize::{Normalizer, SchemaKind};
use trials_output::ExportFormat;

use crate::cli::{FieldsArgs, NormalizeArgs, NormalizeFlags, OutputFlags, SearchArgs};

pub fn run_search(args: &SearchArgs) -> Result<RunSummary> {
    let span = info_span!("search", term = args.term.as_deref().unwrap_or(""));
    let _guard = span.enter();

    let mut query = SearchQuery::new()
        .page_size(args.page_size)
        .max_pages(args.max_pages);
    if let Some(term) = &args.term {
        query = query.term(term);
    }
    if let Some(condition) = &args.condition {
        query = query.condition(condition);
    }
    if let Some(location) = &args.location {
        query = query.location(location);
    }
    for status in &args.statuses {
        query = query.status(*status);
    }

    let client = RegistryClient::with_base_url(&args.base_url)
        .context("create registry client")?
        .with_studies_path(args.normalize.studies_path.clone());
    let start = Instant::now();
    let response = client.search(&query)?;
    let total_count = response.total_count;
    info!(
        studies = response.studies.len(),
        duration_ms = start.elapsed().as_millis(),
        "fetched studies"
    );

    let document = response.into_document();
    let mut summary = present(&document, &args.normalize, &args.output)?;
    summary.total_count = total_count;
    Ok(summary)
}

pub fn run_normalize(args: &NormalizeArgs) -> Result<RunSummary> {
    let span = info_span!("normalize", input = %args.input.display());
    let _guard = span.enter();

    let text = read_input(&args.input)?;
    let document: Value = serde_json::from_str(&text)
        .with_context(|| format!("parse JSON from {}", args.input.display()))?;
    present(&document, &args.normalize, &args.output)
}

pub fn run_fields(args: &FieldsArgs) -> Result<()> {
    let kind: SchemaKind = args.schema.into();
    println!("Schema: {kind}");
    println!("{}", fields_table(&kind.schema()));
    Ok(())
}

/// Normalizes a response document, then prints and exports it.
fn present(document: &Value, flags: &NormalizeFlags, output: &OutputFlags) -> Result<RunSummary> {
    let columns = parse_columns(&output.columns)?;
    let normalizer = Normalizer::new(&flags.options());
    let prepared = prepare(
        document,
        PrepareConfig {
            normalizer: &normalizer,
            country: flags.country.as_deref(),
            keep_raw: flags.show_raw,
        },
    )?;

    if let Some(raw) = &prepared.raw_response {
        eprintln!("Raw response:");
        eprintln!("{raw}");
    }
    if !output.quiet_table {
        println!("{}", study_table(&prepared.table, &columns));
    }
    if output.locations {
        for line in location_lines(&prepared.studies, &normalizer) {
            println!("{line}");
        }
    }

    let mut summary = RunSummary {
        studies: prepared.table.len(),
        total_count: None,
        malformed_response: prepared.malformed_response,
        output: None,
    };
    if let Some(path) = &output.output {
        let format = export_table(&prepared.table, path, output.format.map(ExportFormat::from))?;
        summary.output = Some((path.clone(), format));
    }
    Ok(summary)
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("read response from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}
