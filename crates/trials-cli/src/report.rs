//! Terminal rendering and post-filtering of normalized tables.

use anyhow::{Result, anyhow};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use serde_json::Value;

use trials_model::{Field, Location, NormalizedTable};
use trials_normalize::{FieldSchema, FieldSource, Normalizer};

/// Longest cell text shown in the terminal before eliding.
const MAX_CELL_CHARS: usize = 80;

/// Parses `--columns` values into fields, keeping their order.
pub fn parse_columns(names: &[String]) -> Result<Vec<Field>> {
    let mut fields = Vec::with_capacity(names.len());
    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        let field: Field = name.parse().map_err(|err| {
            anyhow!("{err} (expected one of: {})", Field::headers().join(", "))
        })?;
        if !fields.contains(&field) {
            fields.push(field);
        }
    }
    if fields.is_empty() {
        return Err(anyhow!("no columns selected"));
    }
    Ok(fields)
}

/// Table of the selected columns, one row per study.
pub fn study_table(table: &NormalizedTable, columns: &[Field]) -> Table {
    let mut out = Table::new();
    out.set_header(columns.iter().map(|field| header_cell(field.label())));
    apply_table_style(&mut out);
    for record in table {
        out.add_row(
            columns
                .iter()
                .map(|field| value_cell(record.get(*field))),
        );
    }
    out
}

/// Table listing each output field and its source in `schema`.
pub fn fields_table(schema: &FieldSchema) -> Table {
    let mut out = Table::new();
    out.set_header(vec![
        header_cell("Field"),
        header_cell("Label"),
        header_cell("Source"),
    ]);
    apply_table_style(&mut out);
    for (field, source) in schema.iter() {
        let source_cell = match source {
            FieldSource::StudyUrl => Cell::new(source.describe()).fg(Color::DarkGrey),
            FieldSource::Rule(_) => Cell::new(source.describe()),
        };
        out.add_row(vec![
            Cell::new(field.header()).fg(Color::Cyan),
            Cell::new(field.label()),
            source_cell,
        ]);
    }
    out
}

/// Sites of each study as printable lines, in table order.
pub fn location_lines(studies: &[Value], normalizer: &Normalizer) -> Vec<String> {
    let mut lines = Vec::new();
    for study in studies {
        let record = normalizer.normalize(study);
        let id = match record.get(Field::Identifier) {
            "" => "(no identifier)",
            id => id,
        };
        let sites = normalizer.locations(study);
        lines.push(format!("{id}: {} site(s)", sites.len()));
        lines.extend(sites.iter().map(|site| format!("  - {}", describe_location(site))));
    }
    lines
}

/// Keeps studies (and their records) with at least one site in `country`.
///
/// `studies` and `table` must be the same response in the same order.
pub fn filter_by_country(
    studies: &[Value],
    table: NormalizedTable,
    normalizer: &Normalizer,
    country: &str,
) -> (Vec<Value>, NormalizedTable) {
    let mut kept_studies = Vec::new();
    let mut kept_records = Vec::new();
    for (study, record) in studies.iter().zip(table) {
        if normalizer
            .locations(study)
            .iter()
            .any(|site| site.in_country(country))
        {
            kept_studies.push(study.clone());
            kept_records.push(record);
        }
    }
    (kept_studies, NormalizedTable::new(kept_records))
}

fn describe_location(site: &Location) -> String {
    let parts: Vec<&str> = [&site.facility, &site.city, &site.country]
        .into_iter()
        .map(String::as_str)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        "(unspecified site)".to_string()
    } else {
        parts.join(", ")
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn value_cell(value: &str) -> Cell {
    if value.is_empty() {
        return Cell::new("-").fg(Color::DarkGrey);
    }
    Cell::new(elide(value, MAX_CELL_CHARS))
}

/// Shortens `text` to `max` characters, marking the cut with an ellipsis.
pub fn elide(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
