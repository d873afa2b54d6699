use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{FieldValue, ListRecord};

/// Fields searched when a dynamic record carries no typed definition
const DEFAULT_SEARCH_FIELDS: &[&str] = &["name", "title", "email", "code", "company"];

/// Errors that can occur when building a dynamic record
#[derive(Debug, thiserror::Error)]
pub enum DynamicRecordError {
    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),
}

/// A record backed by a JSON object, for lists whose shape is only known at runtime
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DynamicRecord {
    fields: Map<String, Value>,
}

impl DynamicRecord {
    pub fn from_json(json: Value) -> Result<Self, DynamicRecordError> {
        match json {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(DynamicRecordError::InvalidJson("Expected JSON object".to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

impl ListRecord for DynamicRecord {
    fn id(&self) -> String {
        match self.fields.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        self.fields.get(name).map(FieldValue::from_json)
    }

    fn searchable_fields(&self) -> &'static [&'static str] {
        DEFAULT_SEARCH_FIELDS
    }

    fn columns(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }
}
