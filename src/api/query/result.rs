//! Query result handling
//!
//! Handles paged query responses from the Salesforce REST API

use serde_json::{Map, Value};

use crate::api::session::SessionError;

/// A queried record with its `attributes` envelope removed
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    pub records: Vec<Record>,
    pub total_size: Option<u64>,
    pub done: bool,
    pub next_records_url: Option<String>,
}

impl QueryResponse {
    /// Parse a query response body
    pub fn from_json(json: Value) -> Result<Self, SessionError> {
        let records = json
            .get("records")
            .and_then(|v| v.as_array())
            .ok_or_else(|| SessionError::Decode("missing or invalid 'records' array in response".to_string()))?
            .iter()
            .filter_map(|record| record.as_object())
            .map(|record| {
                let mut record = record.clone();
                record.remove("attributes");
                record
            })
            .collect();

        let total_size = json.get("totalSize").and_then(|c| c.as_u64());
        let done = json.get("done").and_then(|d| d.as_bool()).unwrap_or(true);
        let next_records_url = json
            .get("nextRecordsUrl")
            .and_then(|n| n.as_str())
            .map(|s| s.to_string());

        Ok(Self {
            records,
            total_size,
            done,
            next_records_url,
        })
    }

    /// Check if there are more results available
    pub fn has_more(&self) -> bool {
        !self.done && self.next_records_url.is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read a string field from a queried record
pub fn field_str<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(|v| v.as_str())
}
