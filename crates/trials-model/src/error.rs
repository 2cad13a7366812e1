use thiserror::Error;

use crate::field::Field;

/// Shape problems found while normalizing a response.
///
/// The normalizer absorbs both kinds (empty table, empty field); they are
/// surfaced only to callers that ask for a diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("no study list at `{path}`")]
    MalformedResponse { path: String },
    #[error("field `{field}` has unexpected shape: {found}")]
    FieldShapeMismatch { field: Field, found: &'static str },
}
