use serde::Serialize;

use super::{raw, text};
use crate::loader::reference::{Reference, ReferenceMap};
use crate::sheet::Row;

/// The three account sheets share one column layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Parent,
    Child,
    Person,
}

pub struct AccountLookups<'a> {
    pub record_types: &'a ReferenceMap,
    pub users: &'a ReferenceMap,
    /// Only consulted for child accounts
    pub parents: Option<&'a ReferenceMap>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountRecord {
    /// Person account names are derived from the person fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "EEP_Legal_Name_Of_Business__c")]
    pub legal_name: String,
    pub record_type_id: Reference,
    pub owner_id: Reference,
    pub billing_street: String,
    pub billing_city: String,
    pub billing_state: String,
    pub billing_postal_code: String,
    pub billing_country: String,
    pub phone: String,
    #[serde(rename = "EEP_Other_Phone__c")]
    pub other_phone: String,
    pub fax: String,
    #[serde(rename = "EEP_Restricted_Access__c")]
    pub restricted_access: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Reference>,
    #[serde(rename = "EEP_Producer_Account_Tax_Id__c")]
    pub producer_tax_id: String,
    pub website: String,
    pub number_of_employees: Option<i64>,
    #[serde(rename = "FinServ__ClientCategory__c")]
    pub client_category: String,
    #[serde(rename = "FinServ__Status__c")]
    pub status: String,
    #[serde(rename = "FinServ__PersonalInterests__c")]
    pub personal_interests: String,
    #[serde(rename = "FinServ__MarketingSegment__c")]
    pub marketing_segment: String,
    #[serde(rename = "FinServ__FinancialInterests__c")]
    pub financial_interests: String,
    #[serde(rename = "FinServ__ServiceModel__c")]
    pub service_model: String,
    #[serde(rename = "FinServ__ReviewFrequency__c")]
    pub review_frequency: String,
    #[serde(rename = "FinServ__InvestmentExperience__c")]
    pub investment_experience: String,
    #[serde(rename = "FinServ__InvestmentObjectives__c")]
    pub investment_objectives: String,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub person: Option<PersonAccountFields>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PersonAccountFields {
    pub salutation: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
    pub suffix: String,
    pub person_email: String,
    pub industry: String,
}

pub fn build_account(row: &Row, kind: AccountKind, lookups: &AccountLookups) -> Option<AccountRecord> {
    let name = raw(row, 0)?;

    let parent_id = match kind {
        AccountKind::Child => Some(
            lookups
                .parents
                .map(|parents| parents.resolve_cell(row.get(13)))
                .unwrap_or_default(),
        ),
        AccountKind::Parent | AccountKind::Person => None,
    };

    let person = match kind {
        AccountKind::Person => Some(PersonAccountFields {
            salutation: text(row, 26),
            first_name: text(row, 27),
            last_name: text(row, 28),
            middle_name: text(row, 29),
            suffix: text(row, 30),
            person_email: text(row, 31),
            industry: text(row, 32),
        }),
        AccountKind::Parent | AccountKind::Child => None,
    };

    Some(AccountRecord {
        name: (kind != AccountKind::Person).then_some(name),
        legal_name: text(row, 1),
        record_type_id: lookups.record_types.resolve_cell(row.get(2)),
        owner_id: lookups.users.resolve_cell(row.get(3)),
        billing_street: text(row, 4),
        billing_city: text(row, 5),
        billing_state: text(row, 6),
        billing_postal_code: text(row, 7),
        billing_country: text(row, 8),
        phone: text(row, 9),
        other_phone: text(row, 10),
        fax: text(row, 11),
        restricted_access: text(row, 12),
        parent_id,
        producer_tax_id: text(row, 14),
        website: text(row, 15),
        number_of_employees: row.get(16).as_integer(),
        client_category: text(row, 17),
        status: text(row, 18),
        personal_interests: text(row, 19),
        marketing_segment: text(row, 20),
        financial_interests: text(row, 21),
        service_model: text(row, 22),
        review_frequency: text(row, 23),
        investment_experience: text(row, 24),
        investment_objectives: text(row, 25),
        person,
    })
}
