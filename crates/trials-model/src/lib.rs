//! Data model for normalized clinical-trial search results.

pub mod error;
pub mod field;
pub mod location;
pub mod path;
pub mod record;
pub mod table;

pub use error::ShapeError;
pub use field::{Field, UnknownField};
pub use location::Location;
pub use path::{InvalidPath, KeyPath, StudiesPath};
pub use record::NormalizedRecord;
pub use table::NormalizedTable;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_in_column_order() {
        let record = NormalizedRecord::from_fn(|field| match field {
            Field::Identifier => "NCT001".to_string(),
            Field::Phase => "Phase 2".to_string(),
            _ => String::new(),
        });
        let json = serde_json::to_string(&record).expect("serialize record");
        assert!(json.starts_with(r#"{"identifier":"NCT001","title":"","url":"#));
        assert!(json.ends_with(r#""last_update_date":""}"#));
    }

    #[test]
    fn shape_error_messages() {
        let err = ShapeError::MalformedResponse {
            path: "data.studies".to_string(),
        };
        assert_eq!(err.to_string(), "no study list at `data.studies`");

        let err = ShapeError::FieldShapeMismatch {
            field: Field::Title,
            found: "object",
        };
        assert_eq!(err.to_string(), "field `title` has unexpected shape: object");
    }
}
