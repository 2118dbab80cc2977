//! Stored document representation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored document: a JSON object with arbitrary fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// String value of `field`, if present and a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Canonical JSON rendering. Object keys are emitted in sorted order so
    /// equal documents always serialize identically.
    pub fn to_json(&self) -> String {
        // Serializing a Map<String, Value> cannot fail.
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

impl TryFrom<Value> for Document {
    type Error = Value;

    /// Only JSON objects convert; anything else is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}
