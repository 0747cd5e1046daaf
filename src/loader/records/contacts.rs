use serde::Serialize;

use super::raw;
use crate::loader::reference::{Reference, ReferenceMap};
use crate::sheet::Row;

pub struct ContactLookups<'a> {
    pub record_types: &'a ReferenceMap,
    pub users: &'a ReferenceMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContactRecord {
    pub first_name: String,
    pub last_name: Option<String>,
    pub record_type_id: Reference,
    pub owner_id: Reference,
}

pub fn build_contact(row: &Row, lookups: &ContactLookups) -> Option<ContactRecord> {
    Some(ContactRecord {
        first_name: raw(row, 0)?,
        last_name: raw(row, 1),
        record_type_id: lookups.record_types.resolve_cell(row.get(2)),
        owner_id: lookups.users.resolve_cell(row.get(3)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::records::test_support::row_with;
    use crate::sheet::Cell;

    #[test]
    fn test_build_contact() {
        let record_types = ReferenceMap::from_pairs("RecordType", [("Individual", "RTC")]);
        let users = ReferenceMap::from_pairs("User", [("Alice Smith", "005A")]);
        let lookups = ContactLookups {
            record_types: &record_types,
            users: &users,
        };

        let row = row_with(&[
            (0, Cell::from("John")),
            (1, Cell::from("Doe")),
            (2, Cell::from("Individual")),
            (3, Cell::from("Alice Smith")),
        ]);
        let record = build_contact(&row, &lookups).unwrap();
        assert_eq!(record.record_type_id, Reference::Resolved("RTC".into()));
        assert_eq!(record.owner_id, Reference::Resolved("005A".into()));

        assert!(build_contact(&row_with(&[(1, Cell::from("Doe"))]), &lookups).is_none());
    }
}
