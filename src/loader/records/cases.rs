use serde::Serialize;

use super::raw;
use crate::loader::reference::{Reference, ReferenceMap};
use crate::sheet::Row;

pub struct CaseLookups<'a> {
    pub producers: &'a ReferenceMap,
    pub accounts: &'a ReferenceMap,
    pub contacts: &'a ReferenceMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CaseRecord {
    #[serde(rename = "Type")]
    pub case_type: String,
    pub origin: Option<String>,
    #[serde(rename = "EEP_Producer__c")]
    pub producer: Reference,
    pub contact_id: Reference,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub account_id: Reference,
}

pub fn build_case(row: &Row, lookups: &CaseLookups) -> Option<CaseRecord> {
    Some(CaseRecord {
        case_type: raw(row, 0)?,
        origin: raw(row, 1),
        producer: lookups.producers.resolve_cell(row.get(2)),
        contact_id: lookups.contacts.resolve_cell(row.get(3)),
        status: raw(row, 4),
        priority: raw(row, 5),
        account_id: lookups.accounts.resolve_cell(row.get(6)),
    })
}
