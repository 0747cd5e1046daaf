use chrono::NaiveDate;
use serde::Serialize;

use super::raw;
use crate::loader::reference::{Reference, ReferenceMap};
use crate::sheet::Row;

pub struct ProducerLookups<'a> {
    pub users: &'a ReferenceMap,
    pub accounts: &'a ReferenceMap,
    pub contacts: &'a ReferenceMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProducerRecord {
    pub name: String,
    pub account_id: Reference,
    pub contact_id: Reference,
    #[serde(rename = "EEP_Producer_Contract_Date__c")]
    pub contract_date: Option<NaiveDate>,
    #[serde(rename = "EEP_Producer_Id__c")]
    pub producer_id: Option<String>,
    pub owner_id: Reference,
}

pub fn build_producer(row: &Row, lookups: &ProducerLookups) -> Option<ProducerRecord> {
    Some(ProducerRecord {
        name: raw(row, 0)?,
        account_id: lookups.accounts.resolve_cell(row.get(1)),
        contact_id: lookups.contacts.resolve_cell(row.get(2)),
        contract_date: row.get(3).as_date(),
        producer_id: raw(row, 4),
        owner_id: lookups.users.resolve_cell(row.get(5)),
    })
}
