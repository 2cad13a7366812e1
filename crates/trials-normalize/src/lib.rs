//! Study record normalization.
//!
//! Turns registry study JSON, whose fields may be missing, scalars, lists or
//! nested objects, into flat [`NormalizedRecord`]s with a fixed set of
//! columns. Normalization is a pure function of its input and never fails:
//! unexpected shapes degrade to empty strings, and a response without a study
//! list degrades to an empty table.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use trials_model::Field;
//! use trials_normalize::{FieldSchema, normalize};
//!
//! let study = json!({
//!     "nctId": "NCT001",
//!     "conditions": ["Lung Cancer", "EGFR+"],
//!     "phase": ["Phase 2"],
//! });
//! let record = normalize(&study, &FieldSchema::flat());
//! assert_eq!(record.get(Field::Conditions), "Lung Cancer, EGFR+");
//! ```

pub mod locations;
pub mod normalize;
pub mod rule;
pub mod schema;

pub use locations::locations;
pub use normalize::{
    NormalizeOptions, Normalizer, normalize, normalize_all, studies_at, try_normalize_all,
};
pub use rule::{FieldRule, LIST_DELIMITER, STUDY_URL_BASE, scalar_text, study_url};
pub use schema::{FieldSchema, FieldSource, SchemaKind};

pub use trials_model::{
    Field, InvalidPath, KeyPath, Location, NormalizedRecord, NormalizedTable, ShapeError,
    StudiesPath,
};
