//! Per-field extraction rules.
//!
//! A field value is coerced to text by the first matching rule:
//!
//! 1. absent or `null` gives the empty string
//! 2. a list is joined with `", "` in source order
//! 3. a mapping yields its `name`, else its `agency` (named fields only)
//! 4. a scalar is used as-is
//!
//! Anything else is a shape mismatch and degrades to the empty string.

use serde_json::{Map, Value};
use tracing::debug;

use trials_model::{Field, KeyPath, ShapeError};

/// Separator between list elements.
pub const LIST_DELIMITER: &str = ", ";

/// Base URL for study pages on ClinicalTrials.gov.
pub const STUDY_URL_BASE: &str = "https://clinicaltrials.gov/study";

/// Keys tried, in order, when a named field holds a mapping.
const NAME_KEYS: [&str; 2] = ["name", "agency"];

/// Where a field's value lives and how to coerce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    path: KeyPath,
    item_key: Option<String>,
    named: bool,
}

impl FieldRule {
    /// Rule reading a top-level key.
    pub fn key(key: &str) -> Self {
        Self::at(KeyPath::key(key))
    }

    /// Rule reading a nested key path.
    pub fn nested(segments: &[&str]) -> Self {
        Self::at(KeyPath::new(segments.iter().copied()))
    }

    #[must_use]
    pub fn at(path: KeyPath) -> Self {
        Self {
            path,
            item_key: None,
            named: false,
        }
    }

    /// Mappings are reduced to their `name` or `agency`.
    #[must_use]
    pub fn named(mut self) -> Self {
        self.named = true;
        self
    }

    /// List elements that are mappings contribute this key.
    #[must_use]
    pub fn items(mut self, key: &str) -> Self {
        self.item_key = Some(key.to_string());
        self
    }

    /// Same coercion, different source path.
    #[must_use]
    pub fn with_path(mut self, path: KeyPath) -> Self {
        self.path = path;
        self
    }

    #[must_use]
    pub fn path(&self) -> &KeyPath {
        &self.path
    }

    #[must_use]
    pub fn item_key(&self) -> Option<&str> {
        self.item_key.as_deref()
    }

    #[must_use]
    pub fn is_named(&self) -> bool {
        self.named
    }

    /// Text value of `field` in `study`.
    ///
    /// Never fails; shape mismatches are logged and give the empty string.
    #[must_use]
    pub fn extract(&self, study: &Value, field: Field) -> String {
        self.try_extract(study, field).unwrap_or_else(|err| {
            debug!(%err, "absorbed field shape mismatch");
            String::new()
        })
    }

    /// Like [`extract`](Self::extract) but reports mismatches.
    pub fn try_extract(&self, study: &Value, field: Field) -> Result<String, ShapeError> {
        match self.path.lookup(study) {
            None | Some(Value::Null) => Ok(String::new()),
            Some(Value::Array(items)) => Ok(self.join_items(items, field)),
            Some(Value::Object(map)) if self.named => Ok(named_text(map)),
            Some(Value::Object(_)) => Err(ShapeError::FieldShapeMismatch {
                field,
                found: "object",
            }),
            Some(scalar) => Ok(scalar_text(scalar).unwrap_or_default()),
        }
    }

    fn join_items(&self, items: &[Value], field: Field) -> String {
        let parts: Vec<String> = items
            .iter()
            .filter_map(|item| {
                let text = match item {
                    Value::Object(map) => self.item_text(map),
                    other => scalar_text(other),
                };
                if text.is_none() && !item.is_null() {
                    debug!(%field, found = type_name(item), "skipped list element");
                }
                text
            })
            .collect();
        parts.join(LIST_DELIMITER)
    }

    fn item_text(&self, map: &Map<String, Value>) -> Option<String> {
        match &self.item_key {
            Some(key) => map.get(key).and_then(scalar_text),
            None if self.named => Some(named_text(map)),
            None => None,
        }
    }
}

/// Text form of a JSON scalar; `None` for null, lists and mappings.
#[must_use]
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// `name`, else `agency`, else empty. Does not recurse.
fn named_text(map: &Map<String, Value>) -> String {
    NAME_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(scalar_text))
        .unwrap_or_default()
}

/// Study page URL for an identifier, empty when the identifier is blank.
#[must_use]
pub fn study_url(identifier: &str) -> String {
    let id = identifier.trim();
    if id.is_empty() {
        String::new()
    } else {
        format!("{STUDY_URL_BASE}/{id}")
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn scalars_render_as_text() {
        let rule = FieldRule::key("v");
        assert_eq!(rule.extract(&json!({"v": "x"}), Field::Title), "x");
        assert_eq!(rule.extract(&json!({"v": 42}), Field::Title), "42");
        assert_eq!(rule.extract(&json!({"v": true}), Field::Title), "true");
        assert_eq!(rule.extract(&json!({"v": null}), Field::Title), "");
    }

    #[test]
    fn unnamed_mapping_is_a_mismatch() {
        let rule = FieldRule::key("v");
        let study = json!({"v": {"name": "x"}});
        assert_eq!(
            rule.try_extract(&study, Field::Title),
            Err(ShapeError::FieldShapeMismatch {
                field: Field::Title,
                found: "object"
            })
        );
        assert_eq!(rule.extract(&study, Field::Title), "");
    }

    #[test]
    fn named_mapping_prefers_name_then_agency() {
        let rule = FieldRule::key("sponsor").named();
        let both = json!({"sponsor": {"agency": "NIH", "name": "Acme"}});
        assert_eq!(rule.extract(&both, Field::Sponsor), "Acme");
        let null_name = json!({"sponsor": {"name": null, "agency": "NIH"}});
        assert_eq!(rule.extract(&null_name, Field::Sponsor), "NIH");
        let deep = json!({"sponsor": {"name": {"first": "x"}}});
        assert_eq!(rule.extract(&deep, Field::Sponsor), "");
    }

    #[test]
    fn list_items_use_item_key() {
        let rule = FieldRule::key("interventions").items("name");
        let study = json!({"interventions": [
            {"type": "DRUG", "name": "Osimertinib"},
            {"type": "DRUG"},
            "Placebo",
            [1, 2],
        ]});
        assert_eq!(
            rule.extract(&study, Field::Interventions),
            "Osimertinib, Placebo"
        );
    }

    #[test]
    fn list_keeps_duplicates_and_order() {
        let rule = FieldRule::key("phase");
        let study = json!({"phase": ["PHASE3", "PHASE1", "PHASE3", 2]});
        assert_eq!(rule.extract(&study, Field::Phase), "PHASE3, PHASE1, PHASE3, 2");
    }

    #[test]
    fn study_url_from_identifier() {
        assert_eq!(
            study_url("NCT01234567"),
            "https://clinicaltrials.gov/study/NCT01234567"
        );
        assert_eq!(study_url("  "), "");
    }
}
