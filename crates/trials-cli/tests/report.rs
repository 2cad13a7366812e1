//! Tests for terminal rendering and country filtering.

use serde_json::{Value, json};

use trials_cli::report::{
    elide, fields_table, filter_by_country, location_lines, parse_columns, study_table,
};
use trials_model::Field;
use trials_normalize::{NormalizeOptions, Normalizer, SchemaKind};

fn protocol_normalizer() -> Normalizer {
    Normalizer::new(&NormalizeOptions::default().with_schema(SchemaKind::ProtocolSection))
}

fn study(id: &str, countries: &[&str]) -> Value {
    let locations: Vec<Value> = countries
        .iter()
        .map(|country| json!({"facility": format!("{id} site"), "city": "Town", "country": country}))
        .collect();
    json!({
        "protocolSection": {
            "identificationModule": {"nctId": id, "briefTitle": format!("Study {id}")},
            "statusModule": {"overallStatus": "RECRUITING"},
            "contactsLocationsModule": {"locations": locations}
        }
    })
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

#[test]
fn parse_columns_keeps_order_and_drops_duplicates() {
    let fields = parse_columns(&names(&["status", " identifier ", "STATUS", ""])).unwrap();
    assert_eq!(fields, vec![Field::Status, Field::Identifier]);
}

#[test]
fn parse_columns_rejects_unknown_names() {
    let error = parse_columns(&names(&["identifier", "enrollment"])).unwrap_err();
    let message = error.to_string();
    assert!(message.contains("enrollment"), "{message}");
    assert!(message.contains("identifier"), "{message}");
}

#[test]
fn parse_columns_requires_at_least_one_field() {
    assert!(parse_columns(&names(&[" ", ""])).is_err());
}

#[test]
fn study_table_lists_every_study() {
    let response = json!({"studies": [study("NCT001", &["Japan"]), study("NCT002", &[])]});
    let table = protocol_normalizer().normalize_all(&response);
    let rendered = study_table(&table, &[Field::Identifier, Field::Status]).to_string();
    assert!(rendered.contains("NCT001"));
    assert!(rendered.contains("NCT002"));
    assert!(rendered.contains("RECRUITING"));
}

#[test]
fn fields_table_names_every_field() {
    let rendered = fields_table(&SchemaKind::Flat.schema()).to_string();
    for header in Field::headers() {
        assert!(rendered.contains(header), "missing {header}");
    }
}

#[test]
fn filter_by_country_keeps_matching_studies_in_order() {
    let normalizer = protocol_normalizer();
    let studies = vec![
        study("NCT001", &["Japan"]),
        study("NCT002", &["Germany"]),
        study("NCT003", &["Germany", "japan"]),
    ];
    let response = json!({"studies": studies.clone()});
    let table = normalizer.normalize_all(&response);

    let (kept, table) = filter_by_country(&studies, table, &normalizer, "Japan");

    assert_eq!(kept.len(), 2);
    let ids: Vec<&str> = table.column(Field::Identifier).collect();
    assert_eq!(ids, vec!["NCT001", "NCT003"]);
}

#[test]
fn location_lines_describe_each_site() {
    let normalizer = protocol_normalizer();
    let studies = vec![study("NCT001", &["Japan", "Korea"]), json!({})];

    let lines = location_lines(&studies, &normalizer);

    assert_eq!(
        lines,
        vec![
            "NCT001: 2 site(s)",
            "  - NCT001 site, Town, Japan",
            "  - NCT001 site, Town, Korea",
            "(no identifier): 0 site(s)",
        ]
    );
}

#[test]
fn elide_shortens_long_text_by_characters() {
    assert_eq!(elide("short", 10), "short");
    assert_eq!(elide("abcdefghij", 5), "abcd…");
    assert_eq!(elide("ééééé", 3), "éé…");
}
