use chrono::NaiveDate;
use serde::Serialize;

use super::raw;
use crate::loader::reference::{Reference, ReferenceMap};
use crate::sheet::Row;

pub struct OpportunityLookups<'a> {
    pub record_types: &'a ReferenceMap,
    pub users: &'a ReferenceMap,
    pub accounts: &'a ReferenceMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OpportunityRecord {
    pub record_type_id: Reference,
    pub owner_id: Reference,
    pub account_id: Reference,
    pub name: Option<String>,
    #[serde(rename = "Type")]
    pub opportunity_type: Option<String>,
    #[serde(rename = "Budget_Confirmed__c")]
    pub budget_confirmed: Option<bool>,
    #[serde(rename = "Discovery_Completed__c")]
    pub discovery_completed: Option<bool>,
    #[serde(rename = "ROI_Analysis_Completed__c")]
    pub roi_analysis_completed: Option<bool>,
    pub close_date: Option<NaiveDate>,
    pub stage_name: Option<String>,
    pub amount: f64,
    pub lead_source: Option<String>,
    #[serde(rename = "EEP_Producer_CBU__c")]
    pub producer_cbu: Option<String>,
    #[serde(rename = "EEP_Producer_Distribution_Channel__c")]
    pub distribution_channel: Option<String>,
    #[serde(rename = "EEP_Restricted_Access__c")]
    pub restricted_access: Option<String>,
}

pub fn build_opportunity(row: &Row, lookups: &OpportunityLookups) -> Option<OpportunityRecord> {
    if row.get(0).is_empty() {
        return None;
    }

    Some(OpportunityRecord {
        record_type_id: lookups.record_types.resolve_cell(row.get(0)),
        owner_id: lookups.users.resolve_cell(row.get(1)),
        account_id: lookups.accounts.resolve_cell(row.get(2)),
        name: raw(row, 3),
        opportunity_type: raw(row, 4),
        budget_confirmed: row.get(5).as_bool(),
        discovery_completed: row.get(6).as_bool(),
        roi_analysis_completed: row.get(7).as_bool(),
        close_date: row.get(9).as_date(),
        stage_name: raw(row, 10),
        amount: row.get(12).as_number().unwrap_or(0.0),
        lead_source: raw(row, 13),
        producer_cbu: raw(row, 14),
        distribution_channel: raw(row, 15),
        restricted_access: raw(row, 16),
    })
}
