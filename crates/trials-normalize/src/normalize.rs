//! Study and response normalization.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use trials_model::{Location, NormalizedRecord, NormalizedTable, ShapeError, StudiesPath};

use crate::locations::locations;
use crate::rule::type_name;
use crate::schema::{FieldSchema, SchemaKind};

/// Normalizes one study. Never fails; missing or odd fields become `""`.
#[must_use]
pub fn normalize(study: &Value, schema: &FieldSchema) -> NormalizedRecord {
    NormalizedRecord::from_fn(|field| schema.value_of(study, field))
}

/// The study list at `path`.
///
/// # Errors
///
/// [`ShapeError::MalformedResponse`] when the path is missing or does not
/// hold a list.
pub fn studies_at<'a>(response: &'a Value, path: &StudiesPath) -> Result<&'a [Value], ShapeError> {
    match path.key_path().lookup(response) {
        Some(Value::Array(studies)) => Ok(studies),
        found => {
            debug!(
                path = %path,
                found = found.map_or("nothing", type_name),
                "no study list in response"
            );
            Err(ShapeError::MalformedResponse {
                path: path.to_string(),
            })
        }
    }
}

/// Normalizes every study at `path`, keeping source order.
///
/// # Errors
///
/// [`ShapeError::MalformedResponse`] when there is no study list, so callers
/// can tell an empty result from a bad response.
pub fn try_normalize_all(
    response: &Value,
    path: &StudiesPath,
    schema: &FieldSchema,
) -> Result<NormalizedTable, ShapeError> {
    let studies = studies_at(response, path)?;
    let table: NormalizedTable = studies.iter().map(|study| normalize(study, schema)).collect();
    debug!(path = %path, studies = table.len(), "normalized response");
    Ok(table)
}

/// Normalizes every study at `path`; an empty table when there is no list.
///
/// An empty result is ambiguous between "no matching studies" and "malformed
/// response". Use [`try_normalize_all`] to distinguish them.
#[must_use]
pub fn normalize_all(response: &Value, path: &StudiesPath, schema: &FieldSchema) -> NormalizedTable {
    try_normalize_all(response, path, schema).unwrap_or_default()
}

/// Normalizer configuration for one deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Study shape.
    #[serde(default)]
    pub schema: SchemaKind,
    /// Where the study list lives in a response.
    #[serde(default)]
    pub studies_path: StudiesPath,
}

impl NormalizeOptions {
    #[must_use]
    pub fn with_schema(mut self, schema: SchemaKind) -> Self {
        self.schema = schema;
        self
    }

    #[must_use]
    pub fn with_studies_path(mut self, path: StudiesPath) -> Self {
        self.studies_path = path;
        self
    }
}

/// A schema and studies path bound together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalizer {
    schema: FieldSchema,
    studies_path: StudiesPath,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&NormalizeOptions::default())
    }
}

impl Normalizer {
    #[must_use]
    pub fn new(options: &NormalizeOptions) -> Self {
        Self {
            schema: options.schema.schema(),
            studies_path: options.studies_path.clone(),
        }
    }

    /// Swaps in a customised schema (e.g. with overridden paths), including
    /// its site path.
    #[must_use]
    pub fn with_schema(mut self, schema: FieldSchema) -> Self {
        self.schema = schema;
        self
    }

    #[must_use]
    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    #[must_use]
    pub fn studies_path(&self) -> &StudiesPath {
        &self.studies_path
    }

    #[must_use]
    pub fn normalize(&self, study: &Value) -> NormalizedRecord {
        normalize(study, &self.schema)
    }

    #[must_use]
    pub fn normalize_all(&self, response: &Value) -> NormalizedTable {
        normalize_all(response, &self.studies_path, &self.schema)
    }

    /// # Errors
    ///
    /// See [`try_normalize_all`].
    pub fn try_normalize_all(&self, response: &Value) -> Result<NormalizedTable, ShapeError> {
        try_normalize_all(response, &self.studies_path, &self.schema)
    }

    /// Study sites of one study, in source order.
    #[must_use]
    pub fn locations(&self, study: &Value) -> Vec<Location> {
        locations(study, &self.schema)
    }
}
