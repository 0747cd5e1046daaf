//! Name to identifier maps
//!
//! Each stage that creates records publishes a `ReferenceMap` keyed by the
//! display name the sheets use. Later stages resolve foreign keys against it.

use std::collections::HashMap;

use log::warn;
use serde::{Serialize, Serializer};

use crate::sheet::Cell;

/// A resolved foreign key, or `null` when the name was not found
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Reference {
    Resolved(String),
    #[default]
    Unresolved,
}

impl Reference {
    pub fn id(&self) -> Option<&str> {
        match self {
            Reference::Resolved(id) => Some(id),
            Reference::Unresolved => None,
        }
    }
}

impl Serialize for Reference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reference::Resolved(id) => serializer.serialize_str(id),
            Reference::Unresolved => serializer.serialize_none(),
        }
    }
}

/// Case-sensitive display name to identifier map for one entity kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceMap {
    entity: String,
    ids: HashMap<String, String>,
    overwritten: Vec<String>,
}

impl ReferenceMap {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            ids: HashMap::new(),
            overwritten: Vec::new(),
        }
    }

    /// Build a map from `(name, id)` pairs in order. Later pairs win on a
    /// repeated name.
    pub fn from_pairs<I, N, V>(entity: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        let mut map = Self::new(entity);
        for (name, id) in pairs {
            map.insert(name, id);
        }
        map
    }

    pub fn insert(&mut self, name: impl Into<String>, id: impl Into<String>) {
        let name = name.into();
        let id = id.into();
        if let Some(previous) = self.ids.insert(name.clone(), id.clone()) {
            if previous != id {
                warn!(
                    "{} name '{}' maps to more than one record, keeping {} over {}",
                    self.entity, name, id, previous
                );
                self.overwritten.push(name);
            }
        }
    }

    pub fn resolve(&self, name: &str) -> Reference {
        match self.ids.get(name) {
            Some(id) => Reference::Resolved(id.clone()),
            None => Reference::Unresolved,
        }
    }

    /// Resolve a cell's text; empty cells are always unresolved
    pub fn resolve_cell(&self, cell: &Cell) -> Reference {
        match cell.text() {
            Some(name) => self.resolve(&name),
            None => Reference::Unresolved,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.ids.get(name).map(String::as_str)
    }

    /// Union of several maps, applied in order so later maps win on collision
    pub fn merged(entity: impl Into<String>, maps: &[&ReferenceMap]) -> Self {
        let mut merged = Self::new(entity);
        for map in maps {
            let mut names: Vec<&String> = map.ids.keys().collect();
            names.sort();
            for name in names {
                merged.insert(name.as_str(), map.ids[name].as_str());
            }
        }
        merged
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Names whose earlier identifier was replaced by a later one
    pub fn overwritten(&self) -> &[String] {
        &self.overwritten
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_is_exact_and_case_sensitive() {
        let map = ReferenceMap::from_pairs("Account", [("Acme", "001A")]);
        assert_eq!(map.resolve("Acme"), Reference::Resolved("001A".to_string()));
        assert_eq!(map.resolve("acme"), Reference::Unresolved);
        assert_eq!(map.resolve("Acme "), Reference::Unresolved);
        assert_eq!(map.resolve_cell(&Cell::Empty), Reference::Unresolved);
    }

    #[test]
    fn test_reference_serializes_as_id_or_null() {
        assert_eq!(serde_json::to_value(Reference::Resolved("005X".into())).unwrap(), json!("005X"));
        assert_eq!(serde_json::to_value(Reference::Unresolved).unwrap(), json!(null));
    }

    #[test]
    fn test_last_write_wins() {
        let map = ReferenceMap::from_pairs("Account", [("Acme", "001A"), ("Acme", "001B")]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("Acme"), Some("001B"));
        assert_eq!(map.overwritten(), ["Acme".to_string()]);
    }

    #[test]
    fn test_merged_later_maps_win() {
        let parents = ReferenceMap::from_pairs("Account", [("Acme", "P1"), ("Globex", "P2")]);
        let children = ReferenceMap::from_pairs("Account", [("Acme Europe", "C1")]);
        let people = ReferenceMap::from_pairs("Account", [("Acme", "X1")]);

        let accounts = ReferenceMap::merged("Account", &[&parents, &children, &people]);
        assert_eq!(accounts.len(), 3);
        assert_eq!(accounts.get("Acme"), Some("X1"));
        assert_eq!(accounts.get("Acme Europe"), Some("C1"));
    }
}
