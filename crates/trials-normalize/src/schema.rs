//! Declarative field schemas.
//!
//! A schema maps every output [`Field`] to where it is read from. Registry
//! variants that name or nest fields differently are expressed as different
//! schemas over the same extraction rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use trials_model::{Field, KeyPath};

use crate::rule::{FieldRule, study_url};

const PROTOCOL_SECTION: &str = "protocolSection";

/// Source of one output field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    /// Read from the study document.
    Rule(FieldRule),
    /// Study page URL built from the identifier.
    StudyUrl,
}

impl FieldSource {
    /// Short description of the source, for listings.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::StudyUrl => "derived from identifier".to_string(),
            Self::Rule(rule) => {
                let mut text = rule.path().to_string();
                if let Some(key) = rule.item_key() {
                    text.push_str(&format!("[].{key}"));
                }
                if rule.is_named() {
                    text.push_str(" (name | agency)");
                }
                text
            }
        }
    }
}

/// Built-in schema presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaKind {
    /// Flat study objects (`nctId`, `conditions`, ...).
    #[default]
    Flat,
    /// ClinicalTrials.gov v2 `protocolSection` modules.
    ProtocolSection,
}

impl SchemaKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::ProtocolSection => "protocol-section",
        }
    }

    #[must_use]
    pub fn schema(self) -> FieldSchema {
        match self {
            Self::Flat => FieldSchema::flat(),
            Self::ProtocolSection => FieldSchema::protocol_section(),
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "protocol-section" | "protocol_section" | "nested" => Ok(Self::ProtocolSection),
            other => Err(format!("unknown schema: {other}")),
        }
    }
}

/// Field-to-source table used by the normalizer, plus where study sites live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    sources: [FieldSource; Field::COUNT],
    locations: KeyPath,
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::flat()
    }
}

impl FieldSchema {
    /// Schema built from one source per field, with sites under `locations`.
    pub fn from_fn(source_of: impl FnMut(Field) -> FieldSource) -> Self {
        Self {
            sources: Field::ALL.map(source_of),
            locations: KeyPath::key("locations"),
        }
    }

    #[must_use]
    pub fn with_locations_path(mut self, path: KeyPath) -> Self {
        self.locations = path;
        self
    }

    /// Path of the study site list.
    #[must_use]
    pub fn locations_path(&self) -> &KeyPath {
        &self.locations
    }

    /// Flat study objects with camel-case keys at the top level.
    #[must_use]
    pub fn flat() -> Self {
        Self::from_fn(|field| {
            let rule = match field {
                Field::Identifier => FieldRule::key("nctId"),
                Field::Title => FieldRule::key("title"),
                Field::Url => FieldRule::key("url"),
                Field::Status => FieldRule::key("overallStatus"),
                Field::Summary => FieldRule::key("briefSummary"),
                Field::Conditions => FieldRule::key("conditions"),
                Field::Interventions => FieldRule::key("interventions"),
                Field::Sponsor => FieldRule::key("sponsor").named(),
                Field::Phase => FieldRule::key("phase"),
                Field::StartDate => FieldRule::key("startDate"),
                Field::PrimaryCompletionDate => FieldRule::key("primaryCompletionDate"),
                Field::CompletionDate => FieldRule::key("completionDate"),
                Field::LastUpdateDate => FieldRule::key("lastUpdatePostDate"),
            };
            FieldSource::Rule(rule)
        })
    }

    /// ClinicalTrials.gov v2 studies with `protocolSection` modules.
    #[must_use]
    pub fn protocol_section() -> Self {
        Self::from_fn(|field| {
            let rule = match field {
                Field::Url => return FieldSource::StudyUrl,
                Field::Identifier => section(&["identificationModule", "nctId"]),
                Field::Title => section(&["identificationModule", "briefTitle"]),
                Field::Status => section(&["statusModule", "overallStatus"]),
                Field::Summary => section(&["descriptionModule", "briefSummary"]),
                Field::Conditions => section(&["conditionsModule", "conditions"]),
                Field::Interventions => {
                    section(&["armsInterventionsModule", "interventions"]).items("name")
                }
                Field::Sponsor => {
                    section(&["sponsorCollaboratorsModule", "leadSponsor"]).named()
                }
                Field::Phase => section(&["designModule", "phases"]),
                Field::StartDate => section(&["statusModule", "startDateStruct", "date"]),
                Field::PrimaryCompletionDate => {
                    section(&["statusModule", "primaryCompletionDateStruct", "date"])
                }
                Field::CompletionDate => {
                    section(&["statusModule", "completionDateStruct", "date"])
                }
                Field::LastUpdateDate => {
                    section(&["statusModule", "lastUpdatePostDateStruct", "date"])
                }
            };
            FieldSource::Rule(rule)
        })
        .with_locations_path(KeyPath::new([
            PROTOCOL_SECTION,
            "contactsLocationsModule",
            "locations",
        ]))
    }

    /// Replaces the source path of one field, keeping its coercion.
    #[must_use]
    pub fn override_path(mut self, field: Field, path: KeyPath) -> Self {
        let source = match self.source(field) {
            FieldSource::Rule(rule) => FieldSource::Rule(rule.clone().with_path(path)),
            FieldSource::StudyUrl => FieldSource::Rule(FieldRule::at(path)),
        };
        self.sources[field.index()] = source;
        self
    }

    #[must_use]
    pub fn source(&self, field: Field) -> &FieldSource {
        &self.sources[field.index()]
    }

    /// `(field, source)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldSource)> {
        Field::ALL.into_iter().zip(self.sources.iter())
    }

    /// Text value of one field of `study`.
    #[must_use]
    pub fn value_of(&self, study: &Value, field: Field) -> String {
        match self.source(field) {
            FieldSource::Rule(rule) => rule.extract(study, field),
            FieldSource::StudyUrl => match self.source(Field::Identifier) {
                FieldSource::Rule(rule) => study_url(&rule.extract(study, Field::Identifier)),
                FieldSource::StudyUrl => String::new(),
            },
        }
    }
}

fn section(segments: &[&str]) -> FieldRule {
    let mut path = Vec::with_capacity(segments.len() + 1);
    path.push(PROTOCOL_SECTION);
    path.extend_from_slice(segments);
    FieldRule::nested(&path)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn flat_schema_reads_top_level_keys() {
        let schema = FieldSchema::flat();
        let study = json!({"nctId": "NCT001", "overallStatus": "RECRUITING"});
        assert_eq!(schema.value_of(&study, Field::Identifier), "NCT001");
        assert_eq!(schema.value_of(&study, Field::Status), "RECRUITING");
        assert_eq!(schema.value_of(&study, Field::Url), "");
    }

    #[test]
    fn protocol_section_derives_url() {
        let schema = FieldSchema::protocol_section();
        let study = json!({"protocolSection": {"identificationModule": {"nctId": "NCT009"}}});
        assert_eq!(
            schema.value_of(&study, Field::Url),
            "https://clinicaltrials.gov/study/NCT009"
        );
        assert_eq!(schema.value_of(&json!({}), Field::Url), "");
    }

    #[test]
    fn override_keeps_coercion() {
        let schema = FieldSchema::flat().override_path(Field::Sponsor, KeyPath::key("leadSponsor"));
        let study = json!({"leadSponsor": {"agency": "NIH"}});
        assert_eq!(schema.value_of(&study, Field::Sponsor), "NIH");
    }

    #[test]
    fn presets_carry_their_site_paths() {
        assert_eq!(FieldSchema::flat().locations_path().to_string(), "locations");
        assert_eq!(
            FieldSchema::protocol_section().locations_path().to_string(),
            "protocolSection.contactsLocationsModule.locations"
        );
    }

    #[test]
    fn describe_sources() {
        let schema = FieldSchema::protocol_section();
        assert_eq!(
            schema.source(Field::Interventions).describe(),
            "protocolSection.armsInterventionsModule.interventions[].name"
        );
        assert_eq!(
            schema.source(Field::Sponsor).describe(),
            "protocolSection.sponsorCollaboratorsModule.leadSponsor (name | agency)"
        );
        assert_eq!(schema.source(Field::Url).describe(), "derived from identifier");
    }

    #[test]
    fn schema_kind_parses() {
        assert_eq!("flat".parse::<SchemaKind>(), Ok(SchemaKind::Flat));
        assert_eq!(
            "protocol-section".parse::<SchemaKind>(),
            Ok(SchemaKind::ProtocolSection)
        );
        assert!("xml".parse::<SchemaKind>().is_err());
    }
}
