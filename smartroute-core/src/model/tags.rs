//! OSM tag values as they appear on road edges.

use serde::{Deserialize, Serialize};

/// A tag value that is either a single string or an ordered list of strings.
///
/// Edges produced from OSM data can carry several values for the same key
/// (`maxspeed=30;50`). The first entry is always the authoritative one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Scalar(String),
    List(Vec<String>),
}

impl TagValue {
    /// Parses a raw OSM value, splitting `;`-separated alternatives into a list.
    pub fn parse(raw: &str) -> Self {
        if raw.contains(';') {
            TagValue::List(
                raw.split(';')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(String::from)
                    .collect(),
            )
        } else {
            TagValue::Scalar(raw.trim().to_string())
        }
    }

    /// Canonical scalar: the value itself or the first element of the list.
    pub fn first(&self) -> Option<&str> {
        match self {
            TagValue::Scalar(value) => Some(value.as_str()),
            TagValue::List(values) => values.first().map(String::as_str),
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Scalar(value.to_string())
    }
}

impl From<Vec<&str>> for TagValue {
    fn from(values: Vec<&str>) -> Self {
        TagValue::List(values.into_iter().map(String::from).collect())
    }
}
