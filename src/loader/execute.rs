//! Running a single stage
//!
//! Each stage reads its sheet, resolves the record types and names its
//! builder needs, builds typed records, inserts them in batches and, when it
//! publishes a map, links the created records back to their names.

use std::collections::HashMap;

use serde::Serialize;

use super::batch::{DEFAULT_BATCH_SIZE, insert_in_batches};
use super::error::StageError;
use super::linker::link_created;
use super::records::{
    AccountKind, AccountLookups, CaseLookups, ContactLookups, LeadLookups, OpportunityLookups,
    OperatingHoursRecord, ProducerLookups, ServiceTerritoryRecord, ServiceTerritoryWorkTypeRecord,
    TaskLookups, UserLookups, WorkTypeGroupRecord, WorkTypeRecord, build_account, build_case,
    build_contact, build_lead, build_opportunity, build_producer, build_task, build_user,
    username_suffix,
};
use super::reference::ReferenceMap;
use super::report::{Reporter, StageReport};
use super::resolver::{distinct_names, existing_users, lookup_by_name, record_types};
use super::stage::{DeclaredMaps, MapKey, StageDef, StageId};
use crate::api::{PlatformSession, SessionError};
use crate::config::{Config, SchedulingDefaults, UserDefaults};
use crate::sheet::{Row, SheetSource};

const PROFILE_COLUMN: usize = 5;
const ROLE_COLUMN: usize = 6;
const ACCOUNT_RECORD_TYPE_COLUMN: usize = 2;
const CONTACT_RECORD_TYPE_COLUMN: usize = 2;
const LEAD_RECORD_TYPE_COLUMN: usize = 0;
const OPPORTUNITY_RECORD_TYPE_COLUMN: usize = 0;

/// Whether the Users stage creates users or looks up existing ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserMode {
    Create,
    #[default]
    Lookup,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub batch_size: usize,
    pub user_mode: UserMode,
    pub users: UserDefaults,
    pub scheduling: SchedulingDefaults,
}

impl LoadOptions {
    pub fn from_config(config: &Config, user_mode: UserMode) -> Self {
        Self {
            batch_size: config.load.batch_size,
            user_mode,
            users: config.users.clone(),
            scheduling: config.scheduling.clone(),
        }
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            user_mode: UserMode::default(),
            users: UserDefaults::default(),
            scheduling: SchedulingDefaults::default(),
        }
    }
}

/// Everything a stage talks to
pub struct LoadContext<'a> {
    pub session: &'a dyn PlatformSession,
    pub sheets: &'a mut dyn SheetSource,
    pub options: &'a LoadOptions,
    pub reporter: &'a dyn Reporter,
}

#[derive(Debug)]
pub struct StageOutput {
    pub report: StageReport,
    /// The map published under the stage's `produces` key
    pub produced: Option<ReferenceMap>,
}

pub async fn execute(
    def: &StageDef,
    ctx: &mut LoadContext<'_>,
    maps: &HashMap<MapKey, ReferenceMap>,
) -> Result<StageOutput, StageError> {
    let declared = DeclaredMaps::new(def, maps);

    match def.id {
        StageId::Users => users(def, ctx).await,
        StageId::ParentAccounts => accounts(def, ctx, &declared, AccountKind::Parent).await,
        StageId::ChildAccounts => accounts(def, ctx, &declared, AccountKind::Child).await,
        StageId::PersonAccounts => accounts(def, ctx, &declared, AccountKind::Person).await,
        StageId::Contacts => {
            let rows = read_rows(def, ctx)?;
            let record_types = query_record_types(ctx, "Contact", &rows, CONTACT_RECORD_TYPE_COLUMN).await?;
            let lookups = ContactLookups {
                record_types: &record_types,
                users: declared.get(MapKey::Users)?,
            };
            let records = rows.iter().filter_map(|row| build_contact(row, &lookups)).collect();
            load_records(def, ctx, records).await
        }
        StageId::Producers => {
            let rows = read_rows(def, ctx)?;
            let accounts = declared.accounts()?;
            let lookups = ProducerLookups {
                users: declared.get(MapKey::Users)?,
                accounts: &accounts,
                contacts: declared.get(MapKey::Contacts)?,
            };
            let records = rows.iter().filter_map(|row| build_producer(row, &lookups)).collect();
            load_records(def, ctx, records).await
        }
        StageId::Leads => {
            let rows = read_rows(def, ctx)?;
            let record_types = query_record_types(ctx, "Lead", &rows, LEAD_RECORD_TYPE_COLUMN).await?;
            let accounts = declared.accounts()?;
            let lookups = LeadLookups {
                record_types: &record_types,
                users: declared.get(MapKey::Users)?,
                accounts: &accounts,
            };
            let records = rows.iter().filter_map(|row| build_lead(row, &lookups)).collect();
            load_records(def, ctx, records).await
        }
        StageId::Opportunities => {
            let rows = read_rows(def, ctx)?;
            let record_types =
                query_record_types(ctx, "Opportunity", &rows, OPPORTUNITY_RECORD_TYPE_COLUMN).await?;
            let accounts = declared.accounts()?;
            let lookups = OpportunityLookups {
                record_types: &record_types,
                users: declared.get(MapKey::Users)?,
                accounts: &accounts,
            };
            let records = rows.iter().filter_map(|row| build_opportunity(row, &lookups)).collect();
            load_records(def, ctx, records).await
        }
        StageId::Tasks => {
            let rows = read_rows(def, ctx)?;
            let accounts = declared.accounts()?;
            let lookups = TaskLookups {
                users: declared.get(MapKey::Users)?,
                accounts: &accounts,
                contacts: declared.get(MapKey::Contacts)?,
            };
            let records = rows.iter().filter_map(|row| build_task(row, &lookups)).collect();
            load_records(def, ctx, records).await
        }
        StageId::Cases => {
            let rows = read_rows(def, ctx)?;
            let accounts = declared.accounts()?;
            let lookups = CaseLookups {
                producers: declared.get(MapKey::Producers)?,
                accounts: &accounts,
                contacts: declared.get(MapKey::Contacts)?,
            };
            let records = rows.iter().filter_map(|row| build_case(row, &lookups)).collect();
            load_records(def, ctx, records).await
        }
        StageId::OperatingHours => {
            let record = OperatingHoursRecord::from_settings(&ctx.options.scheduling);
            load_records(def, ctx, vec![record]).await
        }
        StageId::WorkType => {
            let record =
                WorkTypeRecord::from_settings(&ctx.options.scheduling, declared.get(MapKey::OperatingHours)?);
            load_records(def, ctx, vec![record]).await
        }
        StageId::ServiceTerritory => {
            let record = ServiceTerritoryRecord::from_settings(
                &ctx.options.scheduling,
                declared.get(MapKey::OperatingHours)?,
            );
            load_records(def, ctx, vec![record]).await
        }
        StageId::ServiceTerritoryWorkType => {
            let record = ServiceTerritoryWorkTypeRecord::from_settings(
                &ctx.options.scheduling,
                declared.get(MapKey::ServiceTerritories)?,
                declared.get(MapKey::WorkTypes)?,
            );
            load_records(def, ctx, vec![record]).await
        }
        StageId::WorkTypeGroup => {
            let record = WorkTypeGroupRecord::from_settings(&ctx.options.scheduling);
            load_records(def, ctx, vec![record]).await
        }
    }
}

async fn users(def: &StageDef, ctx: &mut LoadContext<'_>) -> Result<StageOutput, StageError> {
    let rows = read_rows(def, ctx)?;

    match ctx.options.user_mode {
        UserMode::Lookup => {
            ctx.reporter.info("Querying existing users");
            let map = existing_users(ctx.session, &rows)
                .await
                .map_err(resolution("existing users"))?;

            let mut report = StageReport::new(def.id);
            report.linked = Some(map.len());
            Ok(StageOutput {
                report,
                produced: Some(map),
            })
        }
        UserMode::Create => {
            ctx.reporter.info("Querying user profiles");
            let profiles = lookup_by_name(
                ctx.session,
                "Profile",
                &distinct_names(&rows, PROFILE_COLUMN),
                Vec::new(),
            )
            .await
            .map_err(resolution("user profiles"))?;

            ctx.reporter.info("Querying user roles");
            let roles = lookup_by_name(ctx.session, "UserRole", &distinct_names(&rows, ROLE_COLUMN), Vec::new())
                .await
                .map_err(resolution("user roles"))?;

            let suffix = username_suffix(ctx.session.instance_host());
            let lookups = UserLookups {
                profiles: &profiles,
                roles: &roles,
                username_suffix: &suffix,
                defaults: &ctx.options.users,
            };
            let records = rows.iter().filter_map(|row| build_user(row, &lookups)).collect();
            load_records(def, ctx, records).await
        }
    }
}

async fn accounts(
    def: &StageDef,
    ctx: &mut LoadContext<'_>,
    declared: &DeclaredMaps<'_>,
    kind: AccountKind,
) -> Result<StageOutput, StageError> {
    let rows = read_rows(def, ctx)?;
    let record_types = query_record_types(ctx, "Account", &rows, ACCOUNT_RECORD_TYPE_COLUMN).await?;
    let parents = match kind {
        AccountKind::Child => Some(declared.get(MapKey::ParentAccounts)?),
        AccountKind::Parent | AccountKind::Person => None,
    };

    let lookups = AccountLookups {
        record_types: &record_types,
        users: declared.get(MapKey::Users)?,
        parents,
    };
    let records = rows
        .iter()
        .filter_map(|row| build_account(row, kind, &lookups))
        .collect();
    load_records(def, ctx, records).await
}

fn read_rows(def: &StageDef, ctx: &mut LoadContext<'_>) -> Result<Vec<Row>, StageError> {
    let Some(sheet) = def.sheet else {
        return Ok(Vec::new());
    };
    ctx.reporter.info(&format!("Reading {} from Excel", def.label()));
    let rows = ctx.sheets.rows(sheet)?;
    ctx.reporter.detail(&format!("Read {} rows from sheet {}", rows.len(), sheet));
    Ok(rows)
}

async fn query_record_types(
    ctx: &LoadContext<'_>,
    sobject_type: &str,
    rows: &[Row],
    column: usize,
) -> Result<ReferenceMap, StageError> {
    let what = format!("{} record types", sobject_type.to_lowercase());
    ctx.reporter.info(&format!("Querying {}", what));
    record_types(ctx.session, sobject_type, rows, column)
        .await
        .map_err(|source| StageError::Resolution { what, source })
}

fn resolution(what: &'static str) -> impl FnOnce(SessionError) -> StageError {
    move |source| StageError::Resolution {
        what: what.to_string(),
        source,
    }
}

/// Insert built records and link them when the stage publishes a map
async fn load_records<R: Serialize>(
    def: &StageDef,
    ctx: &LoadContext<'_>,
    records: Vec<R>,
) -> Result<StageOutput, StageError> {
    let mut report = StageReport::new(def.id);
    report.built = records.len();

    let payload = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| StageError::Encode {
            sobject: def.sobject.to_string(),
            source,
        })?;
    for record in &payload {
        ctx.reporter.detail(&format!("{} record: {}", def.sobject, record));
    }

    ctx.reporter.info(&format!("Creating {}", def.label()));
    let results = insert_in_batches(ctx.session, def.sobject, &payload, ctx.options.batch_size)
        .await
        .map_err(|source| StageError::Write {
            sobject: def.sobject.to_string(),
            source,
        })?;
    for result in &results {
        if let Ok(line) = serde_json::to_string(result) {
            ctx.reporter.detail(&format!("{} insert result: {}", def.sobject, line));
        }
    }

    report.submitted = payload.len();
    report.created = results.iter().filter(|result| result.success).count();
    report.failed = results.len() - report.created;

    let produced = match def.produces {
        Some(_) => {
            let map = link_created(ctx.session, def.sobject, &results)
                .await
                .map_err(|source| StageError::Resolution {
                    what: format!("created {} records", def.sobject),
                    source,
                })?;
            report.linked = Some(map.len());
            Some(map)
        }
        None => None,
    };

    Ok(StageOutput { report, produced })
}
