use chrono::NaiveDate;
use serde::Serialize;

use super::raw;
use crate::loader::reference::{Reference, ReferenceMap};
use crate::sheet::Row;

pub struct TaskLookups<'a> {
    pub users: &'a ReferenceMap,
    pub accounts: &'a ReferenceMap,
    pub contacts: &'a ReferenceMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskRecord {
    pub subject: String,
    #[serde(rename = "Type")]
    pub task_type: Option<String>,
    /// Contact the task is about
    pub who_id: Reference,
    pub activity_date: Option<NaiveDate>,
    /// Account the task is related to
    pub what_id: Reference,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub owner_id: Reference,
}

pub fn build_task(row: &Row, lookups: &TaskLookups) -> Option<TaskRecord> {
    Some(TaskRecord {
        subject: raw(row, 0)?,
        task_type: raw(row, 1),
        who_id: lookups.contacts.resolve_cell(row.get(2)),
        activity_date: row.get(3).as_date(),
        what_id: lookups.accounts.resolve_cell(row.get(4)),
        priority: raw(row, 5),
        status: raw(row, 6),
        owner_id: lookups.users.resolve_cell(row.get(9)),
    })
}
