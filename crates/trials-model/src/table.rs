use serde::Serialize;

use crate::field::Field;
use crate::record::NormalizedRecord;

/// Ordered collection of normalized records, one per study in a response.
///
/// Order matches the order of the source study list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedTable {
    records: Vec<NormalizedRecord>,
}

impl NormalizedTable {
    #[must_use]
    pub fn new(records: Vec<NormalizedRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    /// Header row equal to the field names.
    #[must_use]
    pub fn headers(&self) -> [&'static str; Field::COUNT] {
        Field::headers()
    }

    /// Rows of field values in column order.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.records.iter().map(NormalizedRecord::values)
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, field: Field) -> impl Iterator<Item = &str> {
        self.records.iter().map(move |record| record.get(field))
    }

    /// Appends the records of another table, keeping both orders.
    pub fn extend(&mut self, other: NormalizedTable) {
        self.records.extend(other.records);
    }
}

impl FromIterator<NormalizedRecord> for NormalizedTable {
    fn from_iter<I: IntoIterator<Item = NormalizedRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for NormalizedTable {
    type Item = NormalizedRecord;
    type IntoIter = std::vec::IntoIter<NormalizedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a NormalizedTable {
    type Item = &'a NormalizedRecord;
    type IntoIter = std::slice::Iter<'a, NormalizedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
