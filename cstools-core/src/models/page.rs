use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// One header record as returned by the platform; keys keep server order.
pub type Record = Map<String, Value>;

/// One response of a paginated listing endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPage {
    #[serde(default)]
    pub headers: Vec<Record>,

    #[serde(rename = "isLastBatch")]
    pub is_last_batch: bool,
}

impl ListPage {
    pub fn new(headers: Vec<Record>, is_last_batch: bool) -> Self {
        Self {
            headers,
            is_last_batch,
        }
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Offset of the page following this one.
    pub fn next_offset(&self, offset: usize) -> usize {
        offset + self.headers.len()
    }
}

/// Lookup of `id -> name` for every header seen so far in one aggregation run.
#[derive(Debug, Clone, Default)]
pub struct GuidTracker {
    names: HashMap<String, String>,
}

impl GuidTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, record: &Record) {
        if let Some(id) = record.get("id").and_then(Value::as_str) {
            let name = record
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default();
            self.names.insert(id.to_string(), name.to_string());
        }
    }

    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Read a string field, treating absence and non-strings alike.
pub fn str_field<'a>(record: &'a Record, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}
