use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::field::Field;

/// Flat, fixed-schema form of one study.
///
/// Every [`Field`] always has a value; missing source data is the empty
/// string. Records are immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NormalizedRecord {
    values: [String; Field::COUNT],
}

impl NormalizedRecord {
    /// Builds a record by computing each field in column order.
    pub fn from_fn(mut value_of: impl FnMut(Field) -> String) -> Self {
        Self {
            values: Field::ALL.map(&mut value_of),
        }
    }

    /// Value of a single field.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    /// Field values in column order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// `(field, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL
            .into_iter()
            .zip(self.values.iter().map(String::as_str))
    }

    /// True when every field is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }
}

impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Field::COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.header(), value)?;
        }
        map.end()
    }
}
