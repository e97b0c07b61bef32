mod config;
mod profile;

pub use config::SiteConfig;
pub use profile::{Ci, Profile};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A backend value that may be a single scalar or a sequence of them.
///
/// Both the label table and the profile attributes mix the two shapes
/// (`"libro": "C"` next to `"libro": ["A", "B"]`), so everything is
/// normalised through this type before it reaches the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "Value", into = "Value")]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Join a sequence with `sep`, or return the scalar as is.
    pub fn joined(&self, sep: &str) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::List(items) => items.iter().join(sep),
        }
    }

    /// Display form used for profile rows: `"A, B"` or the scalar.
    pub fn display(&self) -> String {
        self.joined(", ")
    }
}

/// Display text for an optional attribute; absence renders as "".
pub fn display_or_empty(value: Option<&FieldValue>) -> String {
    value.map(FieldValue::display).unwrap_or_default()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => {
                FieldValue::List(items.iter().filter_map(scalar_text).collect())
            }
            other => FieldValue::Text(scalar_text(&other).unwrap_or_default()),
        }
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Text(text) => Value::String(text),
            FieldValue::List(items) => {
                Value::Array(items.into_iter().map(Value::String).collect())
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}
