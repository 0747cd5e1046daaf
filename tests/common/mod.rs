//! Test doubles shared by the integration tests
//!
//! `FakeOrg` is an in-memory org: inserts assign sequential ids and queries
//! answer `Name IN (...)` and `Id IN (...)` lookups from what was seeded or
//! created. Every query and insert call is recorded.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use salesforce_seed::api::{InsertResult, PlatformSession, Record, SessionError};
use salesforce_seed::loader::{Reporter, StageReport, error_chain};
use salesforce_seed::sheet::{Cell, Row};

#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub sobject: String,
    /// Record type scope, only set for RecordType rows
    pub scope: Option<String>,
    pub id: String,
    pub name: String,
    pub fields: Value,
}

#[derive(Default)]
pub struct FakeOrg {
    instance_host: String,
    records: Mutex<Vec<StoredRecord>>,
    next_id: Mutex<usize>,
    failing_names: HashSet<String>,
    failing_inserts: HashSet<String>,
    failing_queries: HashSet<String>,
    short_results: HashSet<String>,
    pub queries: Mutex<Vec<String>>,
    pub inserts: Mutex<Vec<(String, Vec<Value>)>>,
}

impl FakeOrg {
    pub fn new() -> Self {
        Self {
            instance_host: "acme--dev.sandbox.my.salesforce.com".to_string(),
            ..Self::default()
        }
    }

    pub fn with_record(self, sobject: &str, name: &str, id: &str) -> Self {
        self.store(sobject, None, id, name, json!({}));
        self
    }

    pub fn with_record_type(self, sobject_type: &str, name: &str, id: &str) -> Self {
        self.store("RecordType", Some(sobject_type), id, name, json!({}));
        self
    }

    /// Inserting a record with this name yields a per-row failure
    pub fn failing_name(mut self, name: &str) -> Self {
        self.failing_names.insert(name.to_string());
        self
    }

    /// Any insert of this sobject fails as a whole
    pub fn failing_insert(mut self, sobject: &str) -> Self {
        self.failing_inserts.insert(sobject.to_string());
        self
    }

    pub fn failing_query(mut self, sobject: &str) -> Self {
        self.failing_queries.insert(sobject.to_string());
        self
    }

    /// Inserts of this sobject return one result fewer than submitted
    pub fn short_results(mut self, sobject: &str) -> Self {
        self.short_results.insert(sobject.to_string());
        self
    }

    pub fn created(&self, sobject: &str) -> Vec<StoredRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.sobject == sobject && r.id.starts_with("NEW"))
            .cloned()
            .collect()
    }

    pub fn query_log(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn insert_log(&self) -> Vec<(String, Vec<Value>)> {
        self.inserts.lock().unwrap().clone()
    }

    /// Sobjects in the order they were first inserted
    pub fn insert_order(&self) -> Vec<String> {
        let mut order: Vec<String> = Vec::new();
        for (sobject, _) in self.insert_log() {
            if order.last() != Some(&sobject) {
                order.push(sobject);
            }
        }
        order
    }

    fn store(&self, sobject: &str, scope: Option<&str>, id: &str, name: &str, fields: Value) {
        self.records.lock().unwrap().push(StoredRecord {
            sobject: sobject.to_string(),
            scope: scope.map(str::to_string),
            id: id.to_string(),
            name: name.to_string(),
            fields,
        });
    }

    fn allocate_id(&self) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        format!("NEW{:03}", next)
    }
}

/// The name the platform would compute for a record
pub fn record_name(record: &Value) -> String {
    if let Some(name) = record.get("Name").and_then(Value::as_str) {
        return name.to_string();
    }
    let first = record.get("FirstName").and_then(Value::as_str).unwrap_or("");
    let last = record.get("LastName").and_then(Value::as_str).unwrap_or("");
    format!("{} {}", first, last).trim().to_string()
}

/// Quoted literals inside `<field> IN (...)`
fn in_values(soql: &str, field: &str) -> Option<Vec<String>> {
    let marker = format!("{} IN (", field);
    let start = soql.find(&marker)? + marker.len();
    let mut values = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = soql[start..].chars();
    while let Some(c) = chars.next() {
        match (quoted, c) {
            (false, ')') => break,
            (false, '\'') => quoted = true,
            (true, '\\') => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            (true, '\'') => {
                quoted = false;
                values.push(std::mem::take(&mut current));
            }
            (true, c) => current.push(c),
            _ => {}
        }
    }
    Some(values)
}

fn eq_value(soql: &str, field: &str) -> Option<String> {
    let marker = format!("{} = '", field);
    let start = soql.find(&marker)? + marker.len();
    let end = soql[start..].find('\'')?;
    Some(soql[start..start + end].to_string())
}

fn sobject_of(soql: &str) -> String {
    soql.split_whitespace()
        .skip_while(|word| *word != "FROM")
        .nth(1)
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl PlatformSession for FakeOrg {
    async fn query(&self, soql: &str) -> Result<Vec<Record>, SessionError> {
        self.queries.lock().unwrap().push(soql.to_string());
        let sobject = sobject_of(soql);
        if self.failing_queries.contains(&sobject) {
            return Err(SessionError::Api {
                status: 400,
                code: "INVALID_QUERY".to_string(),
                message: format!("query on {} rejected", sobject),
            });
        }

        let scope = eq_value(soql, "SobjectType");
        let ids = in_values(soql, "Id");
        let names = in_values(soql, "Name");

        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| r.sobject == sobject)
            .filter(|r| scope.is_none() || r.scope == scope)
            .filter(|r| ids.as_ref().is_none_or(|ids| ids.contains(&r.id)))
            .filter(|r| names.as_ref().is_none_or(|names| names.contains(&r.name)))
            .map(|r| {
                let mut record = Map::new();
                record.insert("Id".to_string(), json!(r.id));
                record.insert("Name".to_string(), json!(r.name));
                record
            })
            .collect())
    }

    async fn insert(&self, sobject: &str, records: &[Value]) -> Result<Vec<InsertResult>, SessionError> {
        self.inserts
            .lock()
            .unwrap()
            .push((sobject.to_string(), records.to_vec()));

        if self.failing_inserts.contains(sobject) {
            return Err(SessionError::Api {
                status: 500,
                code: "UNKNOWN_EXCEPTION".to_string(),
                message: format!("insert of {} failed", sobject),
            });
        }

        let mut results = Vec::with_capacity(records.len());
        for record in records {
            let name = record_name(record);
            if self.failing_names.contains(&name) {
                results.push(InsertResult::failed(
                    "REQUIRED_FIELD_MISSING",
                    format!("{} is missing a required field", name),
                ));
                continue;
            }
            let id = self.allocate_id();
            self.store(sobject, None, &id, &name, record.clone());
            results.push(InsertResult::created(id));
        }

        if self.short_results.contains(sobject) {
            results.pop();
        }
        Ok(results)
    }

    fn instance_host(&self) -> &str {
        &self.instance_host
    }
}

/// Collects everything a run reports
#[derive(Default)]
pub struct RecordingReporter {
    pub messages: Mutex<Vec<String>>,
    pub failures: Mutex<Vec<(String, String)>>,
    pub finished: Mutex<Vec<StageReport>>,
}

impl RecordingReporter {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<(String, String)> {
        self.failures.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn detail(&self, _message: &str) {}

    fn failure(&self, summary: &str, error: &dyn std::error::Error) {
        self.failures
            .lock()
            .unwrap()
            .push((summary.to_string(), error_chain(error)));
    }

    fn stage_finished(&self, report: &StageReport) {
        self.finished.lock().unwrap().push(report.clone());
    }
}

/// A row from `(column, text)` pairs, other columns empty
pub fn row(cells: &[(usize, &str)]) -> Row {
    let width = cells.iter().map(|(col, _)| col + 1).max().unwrap_or(0);
    let mut values = vec![Cell::Empty; width];
    for (col, text) in cells {
        values[*col] = Cell::from(*text);
    }
    Row::new(values)
}
