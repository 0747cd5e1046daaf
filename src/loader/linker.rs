//! Maps newly created records back to their names
//!
//! Insert results only carry identifiers, so the names later stages refer to
//! are fetched with a follow-up query over exactly those identifiers.

use std::collections::HashMap;

use log::debug;

use super::reference::ReferenceMap;
use crate::api::query::result::{Record, field_str};
use crate::api::{Filter, InsertResult, PlatformSession, QueryBuilder, SessionError};

/// Identifiers of the successful results, in row order
pub fn created_ids(results: &[InsertResult]) -> Vec<&str> {
    results.iter().filter_map(InsertResult::created_id).collect()
}

pub async fn link_created(
    session: &dyn PlatformSession,
    sobject: &str,
    results: &[InsertResult],
) -> Result<ReferenceMap, SessionError> {
    let ids = created_ids(results);
    if ids.is_empty() {
        debug!("No {} records were created, nothing to link", sobject);
        return Ok(ReferenceMap::new(sobject));
    }

    let soql = QueryBuilder::id_and_name(sobject)
        .filter(Filter::is_in("Id", ids.iter().copied()))
        .to_soql();

    let records = session.query(&soql).await?;

    let map = ReferenceMap::from_pairs(sobject, in_creation_order(&ids, &records));

    debug!("Linked {} created {} records by name", map.len(), sobject);
    Ok(map)
}

/// (name, id) pairs ordered by creation, so a repeated name keeps the last
/// created record once inserted into a map
fn in_creation_order<'a>(ids: &[&str], records: &'a [Record]) -> Vec<(&'a str, &'a str)> {
    let positions: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let mut pairs: Vec<(usize, &str, &str)> = records
        .iter()
        .filter_map(|record| {
            let id = field_str(record, "Id")?;
            let position = *positions.get(id)?;
            Some((position, field_str(record, "Name")?, id))
        })
        .collect();
    pairs.sort_by_key(|(position, _, _)| *position);

    pairs.into_iter().map(|(_, name, id)| (name, id)).collect()
}
