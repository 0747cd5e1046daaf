//! The platform session seam
//!
//! The loader only talks to the platform through `PlatformSession`, so tests
//! can swap in a scripted fake while the binary uses `SalesforceClient`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::query::Record;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("expected {expected} insert results, received {actual}")]
    UnexpectedResultCount { expected: usize, actual: usize },
}

/// One per-record error from a bulk insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertError {
    pub status_code: String,
    pub message: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

/// Outcome of inserting one record, in submission order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertResult {
    pub id: Option<String>,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<InsertError>,
}

impl InsertResult {
    pub fn created(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            success: true,
            errors: Vec::new(),
        }
    }

    pub fn failed(status_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: None,
            success: false,
            errors: vec![InsertError {
                status_code: status_code.into(),
                message: message.into(),
                fields: Vec::new(),
            }],
        }
    }

    /// Identifier of the created record, only for successful inserts
    pub fn created_id(&self) -> Option<&str> {
        if self.success { self.id.as_deref() } else { None }
    }

    /// `CODE: message` pairs joined for logging
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.status_code, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[async_trait]
pub trait PlatformSession: Send + Sync {
    /// Run a SOQL query and return every page of records
    async fn query(&self, soql: &str) -> Result<Vec<Record>, SessionError>;

    /// Insert one chunk of records of a single sobject type. Results come back
    /// in the order the records were submitted.
    async fn insert(&self, sobject: &str, records: &[Value]) -> Result<Vec<InsertResult>, SessionError>;

    /// Host name of the org instance the session is bound to
    fn instance_host(&self) -> &str;
}
