//! Output columns of a normalized study record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One column of a [`NormalizedRecord`](crate::NormalizedRecord).
///
/// The declaration order is the column order used for tables, CSV headers
/// and JSON objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Identifier,
    Title,
    Url,
    Status,
    Summary,
    Conditions,
    Interventions,
    Sponsor,
    Phase,
    StartDate,
    PrimaryCompletionDate,
    CompletionDate,
    LastUpdateDate,
}

impl Field {
    /// Number of columns in a record.
    pub const COUNT: usize = 13;

    /// All fields in column order.
    pub const ALL: [Field; Field::COUNT] = [
        Field::Identifier,
        Field::Title,
        Field::Url,
        Field::Status,
        Field::Summary,
        Field::Conditions,
        Field::Interventions,
        Field::Sponsor,
        Field::Phase,
        Field::StartDate,
        Field::PrimaryCompletionDate,
        Field::CompletionDate,
        Field::LastUpdateDate,
    ];

    /// Column position of this field.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Header name used in CSV and JSON output.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Title => "title",
            Self::Url => "url",
            Self::Status => "status",
            Self::Summary => "summary",
            Self::Conditions => "conditions",
            Self::Interventions => "interventions",
            Self::Sponsor => "sponsor",
            Self::Phase => "phase",
            Self::StartDate => "start_date",
            Self::PrimaryCompletionDate => "primary_completion_date",
            Self::CompletionDate => "completion_date",
            Self::LastUpdateDate => "last_update_date",
        }
    }

    /// Human-readable label for terminal tables.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Identifier => "NCT ID",
            Self::Title => "Title",
            Self::Url => "URL",
            Self::Status => "Status",
            Self::Summary => "Summary",
            Self::Conditions => "Conditions",
            Self::Interventions => "Interventions",
            Self::Sponsor => "Sponsor",
            Self::Phase => "Phase",
            Self::StartDate => "Start",
            Self::PrimaryCompletionDate => "Primary Completion",
            Self::CompletionDate => "Completion",
            Self::LastUpdateDate => "Last Update",
        }
    }

    /// Header names of all fields in column order.
    #[must_use]
    pub fn headers() -> [&'static str; Field::COUNT] {
        Self::ALL.map(Field::header)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Error returned when a header name does not match any field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.header().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}
