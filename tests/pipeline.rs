mod common;

use std::collections::HashMap;

use anyhow::Result;
use serde_json::{Value, json};

use common::{FakeOrg, RecordingReporter, row};
use salesforce_seed::loader::{
    LoadContext, LoadOptions, PipelineError, Pipeline, STANDARD_STAGES, StageError, StageId, UserMode,
};
use salesforce_seed::sheet::Row;

fn workbook() -> HashMap<String, Vec<Row>> {
    let mut sheets = HashMap::new();
    sheets.insert(
        "Users".to_string(),
        vec![row(&[
            (0, "Alice"),
            (1, "Smith"),
            (2, "alice@example.com"),
            (3, "alice@example.com"),
            (5, "Standard User"),
            (6, "CEO"),
        ])],
    );
    sheets.insert(
        "ParentAccounts".to_string(),
        vec![row(&[(0, "Acme"), (2, "Business"), (3, "Alice Smith")])],
    );
    sheets.insert(
        "ChildAccounts".to_string(),
        vec![row(&[(0, "Acme West"), (2, "Business"), (3, "Alice Smith"), (13, "Acme")])],
    );
    sheets.insert(
        "PersonAccounts".to_string(),
        vec![row(&[(0, "Jane"), (2, "Person"), (3, "Alice Smith"), (27, "Jane"), (28, "Doe")])],
    );
    sheets.insert(
        "Contacts".to_string(),
        vec![row(&[(0, "John"), (1, "Doe"), (2, "Business"), (3, "Alice Smith")])],
    );
    sheets.insert(
        "Producers".to_string(),
        vec![row(&[(0, "Acme Agency"), (1, "Acme West"), (2, "John Doe"), (5, "Alice Smith")])],
    );
    sheets.insert(
        "Leads".to_string(),
        vec![row(&[(0, "Prospect"), (1, "Alice Smith"), (4, "Lee"), (31, "Jane Doe")])],
    );
    sheets.insert(
        "Opportunities".to_string(),
        vec![row(&[(0, "Sales"), (1, "Alice Smith"), (2, "Acme"), (3, "Big deal")])],
    );
    sheets.insert(
        "Tasks".to_string(),
        vec![row(&[(0, "Follow up"), (2, "John Doe"), (4, "Jane Doe"), (9, "Alice Smith")])],
    );
    sheets.insert(
        "Cases".to_string(),
        vec![row(&[(0, "Question"), (2, "Acme Agency"), (3, "John Doe"), (6, "Acme")])],
    );
    sheets
}

fn seeded_org() -> FakeOrg {
    FakeOrg::new()
        .with_record("User", "Alice Smith", "005A")
        .with_record_type("Account", "Business", "RT_BUS")
        .with_record_type("Account", "Person", "RT_PER")
        .with_record_type("Contact", "Business", "RT_CON")
        .with_record_type("Lead", "Prospect", "RT_LEAD")
        .with_record_type("Opportunity", "Sales", "RT_OPP")
}

/// Payload of the only record inserted for `sobject` whose name matches
fn inserted(org: &FakeOrg, sobject: &str, name: &str) -> Value {
    org.created(sobject)
        .into_iter()
        .find(|record| record.name == name)
        .map(|record| record.fields)
        .unwrap_or_else(|| panic!("no {} named {}", sobject, name))
}

fn id_of(org: &FakeOrg, sobject: &str, name: &str) -> String {
    org.created(sobject)
        .into_iter()
        .find(|record| record.name == name)
        .map(|record| record.id)
        .unwrap_or_else(|| panic!("no {} named {}", sobject, name))
}

#[tokio::test]
async fn test_full_run_links_every_stage() -> Result<()> {
    let org = seeded_org();
    let mut sheets = workbook();
    let options = LoadOptions::default();
    let reporter = RecordingReporter::default();
    let mut ctx = LoadContext {
        session: &org,
        sheets: &mut sheets,
        options: &options,
        reporter: &reporter,
    };

    let summary = Pipeline::standard().run(&mut ctx).await?;
    assert_eq!(summary.stages.len(), 15);
    assert_eq!(summary.total_failed(), 0);
    assert!(reporter.failures().is_empty());

    assert_eq!(
        org.insert_order(),
        vec![
            "Account",
            "Contact",
            "Producer",
            "Lead",
            "Opportunity",
            "Task",
            "Case",
            "OperatingHours",
            "WorkType",
            "ServiceTerritory",
            "ServiceTerritoryWorkType",
            "WorkTypeGroup",
        ]
    );

    let parent_id = id_of(&org, "Account", "Acme");
    let child_id = id_of(&org, "Account", "Acme West");
    let person_id = id_of(&org, "Account", "Jane Doe");
    let contact_id = id_of(&org, "Contact", "John Doe");
    let producer_id = id_of(&org, "Producer", "Acme Agency");

    let parent = inserted(&org, "Account", "Acme");
    assert_eq!(parent["RecordTypeId"], json!("RT_BUS"));
    assert_eq!(parent["OwnerId"], json!("005A"));

    let child = inserted(&org, "Account", "Acme West");
    assert_eq!(child["ParentId"], json!(parent_id));

    let person = inserted(&org, "Account", "Jane Doe");
    assert!(person.get("Name").is_none());
    assert_eq!(person["RecordTypeId"], json!("RT_PER"));

    let producer = inserted(&org, "Producer", "Acme Agency");
    assert_eq!(producer["AccountId"], json!(child_id));
    assert_eq!(producer["ContactId"], json!(contact_id));

    let lead = &org.created("Lead")[0].fields;
    assert_eq!(lead["RecordTypeId"], json!("RT_LEAD"));
    assert_eq!(lead["FinServ__RelatedAccount__c"], json!(person_id));
    assert_eq!(lead["EEP_Date_Of_Birth__c"], json!("1970-05-09"));

    let opportunity = inserted(&org, "Opportunity", "Big deal");
    assert_eq!(opportunity["AccountId"], json!(parent_id));
    assert_eq!(opportunity["Amount"], json!(0.0));

    let task = &org.created("Task")[0].fields;
    assert_eq!(task["WhoId"], json!(contact_id));
    assert_eq!(task["WhatId"], json!(person_id));

    let case = &org.created("Case")[0].fields;
    assert_eq!(case["EEP_Producer__c"], json!(producer_id));
    assert_eq!(case["AccountId"], json!(parent_id));

    let link = &org.created("ServiceTerritoryWorkType")[0].fields;
    assert_eq!(
        link["ServiceTerritoryId"],
        json!(id_of(&org, "ServiceTerritory", "test service territory"))
    );
    assert_eq!(link["WorkTypeId"], json!(id_of(&org, "WorkType", "test work type")));

    let users = summary.stage(StageId::Users).unwrap();
    assert_eq!(users.linked, Some(1));
    assert_eq!(users.submitted, 0);
    Ok(())
}

#[tokio::test]
async fn test_create_users_mode() -> Result<()> {
    let org = seeded_org()
        .with_record("Profile", "Standard User", "00eP")
        .with_record("UserRole", "CEO", "00ER");
    let mut sheets = workbook();
    let options = LoadOptions {
        user_mode: UserMode::Create,
        ..LoadOptions::default()
    };
    let reporter = RecordingReporter::default();
    let mut ctx = LoadContext {
        session: &org,
        sheets: &mut sheets,
        options: &options,
        reporter: &reporter,
    };

    let summary = Pipeline::standard().run(&mut ctx).await?;

    let user = inserted(&org, "User", "Alice Smith");
    assert_eq!(user["Username"], json!("alice@example.com.dev"));
    assert_eq!(user["Alias"], json!("ASmith"));
    assert_eq!(user["ProfileId"], json!("00eP"));
    assert_eq!(user["UserRoleId"], json!("00ER"));
    assert_eq!(user["IsActive"], json!(true));

    let new_user_id = id_of(&org, "User", "Alice Smith");
    let parent = inserted(&org, "Account", "Acme");
    assert_eq!(parent["OwnerId"], json!(new_user_id));

    assert_eq!(summary.stage(StageId::Users).map(|s| s.created), Some(1));
    Ok(())
}

#[tokio::test]
async fn test_write_failure_stops_the_run() {
    let org = seeded_org().failing_insert("Contact");
    let mut sheets = workbook();
    let options = LoadOptions::default();
    let reporter = RecordingReporter::default();
    let mut ctx = LoadContext {
        session: &org,
        sheets: &mut sheets,
        options: &options,
        reporter: &reporter,
    };

    let error = Pipeline::standard().run(&mut ctx).await.unwrap_err();
    assert!(matches!(
        error,
        PipelineError::Stage {
            stage: StageId::Contacts,
            source: StageError::Write { .. }
        }
    ));

    let failures = reporter.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "Could not create Contacts");
    assert!(failures[0].1.contains("insert of Contact failed"));

    assert!(org.created("Producer").is_empty());
    assert!(!org.insert_order().contains(&"Producer".to_string()));
}

#[tokio::test]
async fn test_missing_sheet_stops_the_run() {
    let org = seeded_org();
    let mut sheets = workbook();
    sheets.remove("Leads");
    let options = LoadOptions::default();
    let reporter = RecordingReporter::default();
    let mut ctx = LoadContext {
        session: &org,
        sheets: &mut sheets,
        options: &options,
        reporter: &reporter,
    };

    let error = Pipeline::standard().run(&mut ctx).await.unwrap_err();
    assert!(matches!(
        error,
        PipelineError::Stage {
            stage: StageId::Leads,
            source: StageError::Read(_)
        }
    ));
    assert_eq!(reporter.failures()[0].0, "Could not read Leads from Excel");
    assert_eq!(org.created("Producer").len(), 1);
    assert!(org.created("Opportunity").is_empty());
}

#[tokio::test]
async fn test_lookup_failure_is_reported_as_query_error() {
    let org = seeded_org().failing_query("RecordType");
    let mut sheets = workbook();
    let options = LoadOptions::default();
    let reporter = RecordingReporter::default();
    let mut ctx = LoadContext {
        session: &org,
        sheets: &mut sheets,
        options: &options,
        reporter: &reporter,
    };

    let error = Pipeline::standard().run(&mut ctx).await.unwrap_err();
    assert!(matches!(
        error,
        PipelineError::Stage {
            stage: StageId::ParentAccounts,
            source: StageError::Resolution { .. }
        }
    ));
    assert_eq!(reporter.failures()[0].0, "Could not query account record types");
    assert!(org.insert_log().is_empty());
}

#[tokio::test]
async fn test_failed_row_is_unresolved_downstream() -> Result<()> {
    let org = seeded_org().failing_name("John Doe");
    let mut sheets = workbook();
    let options = LoadOptions::default();
    let reporter = RecordingReporter::default();
    let mut ctx = LoadContext {
        session: &org,
        sheets: &mut sheets,
        options: &options,
        reporter: &reporter,
    };

    let summary = Pipeline::standard().run(&mut ctx).await?;
    let contacts = summary.stage(StageId::Contacts).unwrap();
    assert_eq!(contacts.failed, 1);
    assert_eq!(contacts.linked, Some(0));

    let producer = inserted(&org, "Producer", "Acme Agency");
    assert_eq!(producer["ContactId"], Value::Null);
    assert_eq!(summary.total_failed(), 1);
    Ok(())
}

#[tokio::test]
async fn test_scheduling_only_pipeline() -> Result<()> {
    let stages = STANDARD_STAGES
        .iter()
        .filter(|stage| stage.sheet.is_none())
        .cloned()
        .collect();
    let pipeline = Pipeline::new(stages)?;

    let org = FakeOrg::new();
    let mut sheets: HashMap<String, Vec<Row>> = HashMap::new();
    let options = LoadOptions::default();
    let reporter = RecordingReporter::default();
    let mut ctx = LoadContext {
        session: &org,
        sheets: &mut sheets,
        options: &options,
        reporter: &reporter,
    };

    let summary = pipeline.run(&mut ctx).await?;
    assert_eq!(summary.stages.len(), 5);
    assert_eq!(summary.total_created(), 5);

    let work_type = inserted(&org, "WorkType", "test work type");
    assert_eq!(
        work_type["OperatingHoursId"],
        json!(id_of(&org, "OperatingHours", "test hours"))
    );
    assert_eq!(work_type["EstimatedDuration"], json!(20.0));
    Ok(())
}

#[test]
fn test_rejects_stage_list_with_missing_producer() {
    let stages = STANDARD_STAGES
        .iter()
        .filter(|stage| stage.id != StageId::ParentAccounts)
        .cloned()
        .collect();

    assert!(matches!(
        Pipeline::new(stages),
        Err(PipelineError::InvalidOrder {
            stage: StageId::ChildAccounts,
            ..
        })
    ));
}
