//! Row to record builders, one module per entity kind
//!
//! Builders are pure: a row plus the lookup maps in, a typed record out, or
//! `None` when the row's primary cell is empty. Field names are the platform
//! API names, set through serde renames.

pub mod accounts;
pub mod cases;
pub mod contacts;
pub mod leads;
pub mod opportunities;
pub mod producers;
pub mod scheduling;
pub mod tasks;
pub mod users;

pub use accounts::{AccountKind, AccountLookups, AccountRecord, PersonAccountFields, build_account};
pub use cases::{CaseLookups, CaseRecord, build_case};
pub use contacts::{ContactLookups, ContactRecord, build_contact};
pub use leads::{LeadLookups, LeadRecord, build_lead};
pub use opportunities::{OpportunityLookups, OpportunityRecord, build_opportunity};
pub use producers::{ProducerLookups, ProducerRecord, build_producer};
pub use scheduling::{
    OperatingHoursRecord, ServiceTerritoryRecord, ServiceTerritoryWorkTypeRecord, WorkTypeGroupRecord,
    WorkTypeRecord,
};
pub use tasks::{TaskLookups, TaskRecord, build_task};
pub use users::{UserLookups, UserRecord, build_user, user_alias, username_suffix};

use crate::sheet::Row;

/// Text field that is sent as `""` when the cell is empty
pub(crate) fn text(row: &Row, column: usize) -> String {
    row.get(column).text_or_default()
}

/// Text field that is sent as `null` when the cell is empty
pub(crate) fn raw(row: &Row, column: usize) -> Option<String> {
    row.get(column).text()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::sheet::{Cell, Row};

    /// Row with the given cells at the given positions and empties elsewhere
    pub fn row_with(cells: &[(usize, Cell)]) -> Row {
        let width = cells.iter().map(|(i, _)| i + 1).max().unwrap_or(0);
        let mut row = vec![Cell::Empty; width];
        for (index, cell) in cells {
            row[*index] = cell.clone();
        }
        Row::new(row)
    }
}
