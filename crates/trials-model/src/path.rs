//! Key paths into JSON documents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error for a dotted path with an empty segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid key path `{0}`: segments must be non-empty")]
pub struct InvalidPath(pub String);

/// Sequence of object keys, written in dotted form (`data.studies`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Path from literal segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Single-key path.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            segments: vec![key.into()],
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Walks the path through nested objects.
    ///
    /// Returns `None` when any step is missing or is not an object.
    #[must_use]
    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(root, |node, segment| node.as_object()?.get(segment))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl FromStr for KeyPath {
    type Err = InvalidPath;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<String> = s.split('.').map(|seg| seg.trim().to_string()).collect();
        if segments.iter().any(String::is_empty) {
            return Err(InvalidPath(s.to_string()));
        }
        Ok(Self { segments })
    }
}

impl TryFrom<String> for KeyPath {
    type Error = InvalidPath;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyPath> for String {
    fn from(path: KeyPath) -> Self {
        path.to_string()
    }
}

/// Location of the study list within a response document.
///
/// Fixed by the caller per deployment; never guessed from the response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudiesPath(KeyPath);

impl StudiesPath {
    /// `studies` at the document root (ClinicalTrials.gov v2).
    #[must_use]
    pub fn top_level() -> Self {
        Self(KeyPath::key("studies"))
    }

    /// `data.studies` (older beta responses).
    #[must_use]
    pub fn data() -> Self {
        Self(KeyPath::new(["data", "studies"]))
    }

    #[must_use]
    pub fn key_path(&self) -> &KeyPath {
        &self.0
    }
}

impl Default for StudiesPath {
    fn default() -> Self {
        Self::top_level()
    }
}

impl fmt::Display for StudiesPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for StudiesPath {
    type Err = InvalidPath;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn lookup_walks_nested_objects() {
        let doc = json!({"a": {"b": {"c": 1}}});
        let path: KeyPath = "a.b.c".parse().unwrap();
        assert_eq!(path.lookup(&doc), Some(&json!(1)));
    }

    #[test]
    fn lookup_stops_at_non_objects() {
        let doc = json!({"a": [{"b": 1}]});
        let path: KeyPath = "a.b".parse().unwrap();
        assert_eq!(path.lookup(&doc), None);
        assert_eq!(path.lookup(&json!("a")), None);
    }

    #[test]
    fn rejects_empty_segments() {
        assert!("data..studies".parse::<KeyPath>().is_err());
        assert!("".parse::<StudiesPath>().is_err());
    }

    #[test]
    fn studies_path_round_trips_through_display() {
        assert_eq!(StudiesPath::data().to_string(), "data.studies");
        assert_eq!(
            "data.studies".parse::<StudiesPath>().unwrap(),
            StudiesPath::data()
        );
        assert_eq!(StudiesPath::default(), StudiesPath::top_level());
    }
}
