use serde::{Deserialize, Serialize};

/// A study site as listed by the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub facility: String,
    pub city: String,
    pub country: String,
}

impl Location {
    /// Case-insensitive match on the country name.
    #[must_use]
    pub fn in_country(&self, country: &str) -> bool {
        self.country.trim().eq_ignore_ascii_case(country.trim())
    }
}
