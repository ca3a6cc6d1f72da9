use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// API name of an object type, e.g. `Account` or `Invoice__c`.
///
/// Only ASCII letters, digits and underscores are accepted since the name is
/// placed in a URL path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SObjectName(String);

impl SObjectName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if valid {
            Ok(Self(name))
        } else {
            Err(DomainError::InvalidObjectName(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One field entry of a describe result.
///
/// Only `name` is interpreted; everything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescribe {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Object metadata returned by a describe call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SObjectDescribe {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescribe>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SObjectDescribe {
    /// Field names in the order the remote side returned them.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}
