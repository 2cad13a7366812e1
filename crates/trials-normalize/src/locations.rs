//! Study site extraction.

use serde_json::Value;
use tracing::debug;

use trials_model::Location;

use crate::rule::{scalar_text, type_name};
use crate::schema::FieldSchema;

/// Sites listed for a study, in source order.
///
/// Non-object entries are skipped; missing keys are empty strings.
#[must_use]
pub fn locations(study: &Value, schema: &FieldSchema) -> Vec<Location> {
    let Some(Value::Array(entries)) = schema.locations_path().lookup(study) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let Some(site) = entry.as_object() else {
                debug!(found = type_name(entry), "skipped location entry");
                return None;
            };
            let text = |key: &str| site.get(key).and_then(scalar_text).unwrap_or_default();
            Some(Location {
                facility: text("facility"),
                city: text("city"),
                country: text("country"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_flat_locations() {
        let study = json!({"locations": [
            {"facility": "Kyoto University Hospital", "country": "Japan"},
            "bogus",
            {"city": "Osaka"},
        ]});
        let sites = locations(&study, &FieldSchema::flat());
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].facility, "Kyoto University Hospital");
        assert_eq!(sites[0].city, "");
        assert_eq!(sites[1].city, "Osaka");
    }

    #[test]
    fn reads_protocol_section_locations() {
        let study = json!({"protocolSection": {"contactsLocationsModule": {"locations": [
            {"facility": "Site A", "city": "Tokyo", "country": "Japan"}
        ]}}});
        let sites = locations(&study, &FieldSchema::protocol_section());
        assert_eq!(sites.len(), 1);
        assert!(sites[0].in_country("japan"));
        assert!(locations(&study, &FieldSchema::flat()).is_empty());
    }
}
