use chrono::NaiveDate;
use serde::Serialize;

use super::{raw, text};
use crate::loader::reference::{Reference, ReferenceMap};
use crate::sheet::Row;

/// Every generated lead shares this birth date
pub fn lead_birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 5, 9).unwrap_or_default()
}

pub struct LeadLookups<'a> {
    pub record_types: &'a ReferenceMap,
    pub users: &'a ReferenceMap,
    pub accounts: &'a ReferenceMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LeadRecord {
    pub record_type_id: Reference,
    pub owner_id: Reference,
    pub salutation: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
    pub suffix: String,
    #[serde(rename = "EEP_Preferred_Name__c")]
    pub preferred_name: String,
    pub company: Option<String>,
    #[serde(rename = "EEP_Gender__c")]
    pub gender: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile_phone: Option<String>,
    #[serde(rename = "EEP_Preferred_Day__c")]
    pub preferred_day: Option<String>,
    #[serde(rename = "EEP_Producer_Account_Tax_Id__c")]
    pub producer_tax_id: String,
    #[serde(rename = "EEP_National_Producer_Number__c")]
    pub national_producer_number: String,
    #[serde(rename = "EEP_Producer_CBU__c")]
    pub producer_cbu: Option<String>,
    #[serde(rename = "EEP_Producer_Distribution_Channel__c")]
    pub distribution_channel: String,
    pub status: Option<String>,
    #[serde(rename = "EEP_Closed_Lost_Reason__c")]
    pub closed_lost_reason: Option<String>,
    pub lead_source: Option<String>,
    #[serde(rename = "EEP_Source_Campaign__c")]
    pub source_campaign: String,
    #[serde(rename = "EEP_Restricted_Access__c")]
    pub restricted_access: Option<String>,
    #[serde(rename = "EEP_Firm_Segment__c")]
    pub firm_segment: Option<String>,
    pub has_opted_out_of_email: Option<bool>,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(rename = "FinServ__RelatedAccount__c")]
    pub related_account: Reference,
    #[serde(rename = "FinServ__ReferredByUser__c")]
    pub referred_by_user: Reference,
    #[serde(rename = "EEP_Date_Of_Birth__c")]
    pub date_of_birth: NaiveDate,
}

/// Column 0 holds the record type name and doubles as the primary cell
pub fn build_lead(row: &Row, lookups: &LeadLookups) -> Option<LeadRecord> {
    if row.get(0).is_empty() {
        return None;
    }

    Some(LeadRecord {
        record_type_id: lookups.record_types.resolve_cell(row.get(0)),
        owner_id: lookups.users.resolve_cell(row.get(1)),
        salutation: text(row, 2),
        first_name: text(row, 3),
        last_name: text(row, 4),
        middle_name: text(row, 5),
        suffix: text(row, 6),
        preferred_name: text(row, 7),
        company: raw(row, 8),
        gender: raw(row, 9),
        email: raw(row, 10),
        phone: raw(row, 11),
        mobile_phone: raw(row, 12),
        preferred_day: raw(row, 13),
        producer_tax_id: text(row, 15),
        national_producer_number: text(row, 16),
        producer_cbu: raw(row, 17),
        distribution_channel: text(row, 18),
        status: raw(row, 19),
        closed_lost_reason: raw(row, 20),
        lead_source: raw(row, 21),
        source_campaign: text(row, 22),
        restricted_access: raw(row, 23),
        firm_segment: raw(row, 24),
        has_opted_out_of_email: row.get(25).as_bool(),
        street: text(row, 26),
        city: text(row, 27),
        state: text(row, 28),
        postal_code: text(row, 29),
        country: text(row, 30),
        related_account: lookups.accounts.resolve_cell(row.get(31)),
        referred_by_user: lookups.users.resolve_cell(row.get(32)),
        date_of_birth: lead_birth_date(),
    })
}
