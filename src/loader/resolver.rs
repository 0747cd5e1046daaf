//! Name lookups against existing platform data
//!
//! Every lookup is two-phase: gather the distinct names a sheet column
//! mentions, then resolve them all with one query. A column with no names
//! issues no query at all.

use std::collections::BTreeSet;

use log::debug;

use super::reference::ReferenceMap;
use crate::api::query::result::field_str;
use crate::api::{Filter, PlatformSession, QueryBuilder, SessionError};
use crate::sheet::Row;

/// Distinct, non-empty values of `column` across `rows`
pub fn distinct_names(rows: &[Row], column: usize) -> BTreeSet<String> {
    rows.iter()
        .filter_map(|row| row.get(column).text())
        .filter(|name| !name.is_empty())
        .collect()
}

/// `"First Last"` for every row that has both name columns filled
pub fn user_full_names(rows: &[Row]) -> BTreeSet<String> {
    rows.iter()
        .filter_map(|row| match (row.get(0).text(), row.get(1).text()) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            _ => None,
        })
        .collect()
}

/// Query `Id, Name` of `sobject` records whose name is in `names`
pub async fn lookup_by_name(
    session: &dyn PlatformSession,
    sobject: &str,
    names: &BTreeSet<String>,
    scope: Vec<Filter>,
) -> Result<ReferenceMap, SessionError> {
    if names.is_empty() {
        debug!("No {} names to look up, skipping query", sobject);
        return Ok(ReferenceMap::new(sobject));
    }

    let mut conditions = scope;
    conditions.push(Filter::is_in("Name", names));

    let soql = QueryBuilder::id_and_name(sobject)
        .filter(Filter::and(conditions))
        .to_soql();

    let records = session.query(&soql).await?;
    let map = ReferenceMap::from_pairs(
        sobject,
        records.iter().filter_map(|record| {
            Some((field_str(record, "Name")?, field_str(record, "Id")?))
        }),
    );
    debug!("Resolved {} of {} {} names", map.len(), names.len(), sobject);
    Ok(map)
}

/// Active record types of `sobject_type` named in `column`
pub async fn record_types(
    session: &dyn PlatformSession,
    sobject_type: &str,
    rows: &[Row],
    column: usize,
) -> Result<ReferenceMap, SessionError> {
    let names = distinct_names(rows, column);
    let scope = vec![
        Filter::eq("SobjectType", sobject_type),
        Filter::eq("IsActive", true),
    ];
    lookup_by_name(session, "RecordType", &names, scope).await
}

/// Existing users named by the first two columns of the Users sheet
pub async fn existing_users(session: &dyn PlatformSession, rows: &[Row]) -> Result<ReferenceMap, SessionError> {
    lookup_by_name(session, "User", &user_full_names(rows), Vec::new()).await
}
