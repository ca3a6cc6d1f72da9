use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Response body of a SOQL query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub total_size: u64,
    #[serde(default = "default_done")]
    pub done: bool,
    #[serde(default)]
    pub records: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_records_url: Option<String>,
}

fn default_done() -> bool {
    true
}

/// Response body of a SOSL search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(default)]
    pub search_records: Vec<Value>,
}

/// Record count attached to a [`RecordSet`].
///
/// Searches have no meaningful total, so they carry the literal `"n/a"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalSize {
    Count(u64),
    NotApplicable,
}

impl TotalSize {
    const NOT_APPLICABLE: &'static str = "n/a";
}

impl fmt::Display for TotalSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TotalSize::Count(n) => write!(f, "{}", n),
            TotalSize::NotApplicable => f.write_str(Self::NOT_APPLICABLE),
        }
    }
}

impl Serialize for TotalSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TotalSize::Count(n) => serializer.serialize_u64(*n),
            TotalSize::NotApplicable => serializer.serialize_str(Self::NOT_APPLICABLE),
        }
    }
}

impl<'de> Deserialize<'de> for TotalSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => n
                .as_u64()
                .map(TotalSize::Count)
                .ok_or_else(|| de::Error::custom("totalSize must be a non-negative integer")),
            Value::String(s) if s == Self::NOT_APPLICABLE => Ok(TotalSize::NotApplicable),
            other => Err(de::Error::custom(format!("invalid totalSize: {}", other))),
        }
    }
}

/// The record listing shape rendered by the interface, shared by query and
/// search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSet {
    pub records: Vec<Value>,
    pub total_size: TotalSize,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<QueryResult> for RecordSet {
    fn from(result: QueryResult) -> Self {
        Self {
            records: result.records,
            total_size: TotalSize::Count(result.total_size),
        }
    }
}

impl From<SearchResult> for RecordSet {
    fn from(result: SearchResult) -> Self {
        Self {
            records: result.search_records,
            total_size: TotalSize::NotApplicable,
        }
    }
}
