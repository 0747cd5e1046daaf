//! Stage definitions and the static stage table
//!
//! A stage creates the records of one entity kind. It reads the name maps it
//! declares in `requires` and may publish one map under `produces`.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::error::StageError;
use super::reference::ReferenceMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StageId {
    Users,
    ParentAccounts,
    ChildAccounts,
    PersonAccounts,
    Contacts,
    Producers,
    Leads,
    Opportunities,
    Tasks,
    Cases,
    OperatingHours,
    WorkType,
    ServiceTerritory,
    ServiceTerritoryWorkType,
    WorkTypeGroup,
}

impl StageId {
    pub fn label(self) -> &'static str {
        match self {
            StageId::Users => "Users",
            StageId::ParentAccounts => "Parent Accounts",
            StageId::ChildAccounts => "Child Accounts",
            StageId::PersonAccounts => "Person Accounts",
            StageId::Contacts => "Contacts",
            StageId::Producers => "Producers",
            StageId::Leads => "Leads",
            StageId::Opportunities => "Opportunities",
            StageId::Tasks => "Tasks",
            StageId::Cases => "Cases",
            StageId::OperatingHours => "Operating Hours",
            StageId::WorkType => "Work Type",
            StageId::ServiceTerritory => "Service Territory",
            StageId::ServiceTerritoryWorkType => "Service Territory Work Type",
            StageId::WorkTypeGroup => "Work Type Group",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Name maps passed between stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MapKey {
    Users,
    ParentAccounts,
    ChildAccounts,
    PersonAccounts,
    Contacts,
    Producers,
    OperatingHours,
    WorkTypes,
    ServiceTerritories,
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MapKey::Users => "users",
            MapKey::ParentAccounts => "parent accounts",
            MapKey::ChildAccounts => "child accounts",
            MapKey::PersonAccounts => "person accounts",
            MapKey::Contacts => "contacts",
            MapKey::Producers => "producers",
            MapKey::OperatingHours => "operating hours",
            MapKey::WorkTypes => "work types",
            MapKey::ServiceTerritories => "service territories",
        };
        f.write_str(name)
    }
}

/// The three account maps, merged in this order for account lookups
pub const ACCOUNT_MAPS: &[MapKey] = &[MapKey::ParentAccounts, MapKey::ChildAccounts, MapKey::PersonAccounts];

#[derive(Debug, Clone, PartialEq)]
pub struct StageDef {
    pub id: StageId,
    pub sobject: &'static str,
    /// Worksheet the rows come from; scheduling stages have none
    pub sheet: Option<&'static str>,
    pub requires: &'static [MapKey],
    pub produces: Option<MapKey>,
}

impl StageDef {
    pub fn label(&self) -> &'static str {
        self.id.label()
    }
}

const fn stage(
    id: StageId,
    sobject: &'static str,
    sheet: Option<&'static str>,
    requires: &'static [MapKey],
    produces: Option<MapKey>,
) -> StageDef {
    StageDef {
        id,
        sobject,
        sheet,
        requires,
        produces,
    }
}

use MapKey::*;

/// Creation order for a full run
pub static STANDARD_STAGES: [StageDef; 15] = [
    stage(StageId::Users, "User", Some("Users"), &[], Some(Users)),
    stage(StageId::ParentAccounts, "Account", Some("ParentAccounts"), &[Users], Some(ParentAccounts)),
    stage(
        StageId::ChildAccounts,
        "Account",
        Some("ChildAccounts"),
        &[Users, ParentAccounts],
        Some(ChildAccounts),
    ),
    stage(StageId::PersonAccounts, "Account", Some("PersonAccounts"), &[Users], Some(PersonAccounts)),
    stage(StageId::Contacts, "Contact", Some("Contacts"), &[Users], Some(Contacts)),
    stage(
        StageId::Producers,
        "Producer",
        Some("Producers"),
        &[Users, ParentAccounts, ChildAccounts, PersonAccounts, Contacts],
        Some(Producers),
    ),
    stage(
        StageId::Leads,
        "Lead",
        Some("Leads"),
        &[Users, ParentAccounts, ChildAccounts, PersonAccounts],
        None,
    ),
    stage(
        StageId::Opportunities,
        "Opportunity",
        Some("Opportunities"),
        &[Users, ParentAccounts, ChildAccounts, PersonAccounts],
        None,
    ),
    stage(
        StageId::Tasks,
        "Task",
        Some("Tasks"),
        &[Users, ParentAccounts, ChildAccounts, PersonAccounts, Contacts],
        None,
    ),
    stage(
        StageId::Cases,
        "Case",
        Some("Cases"),
        &[Producers, ParentAccounts, ChildAccounts, PersonAccounts, Contacts],
        None,
    ),
    stage(StageId::OperatingHours, "OperatingHours", None, &[], Some(OperatingHours)),
    stage(StageId::WorkType, "WorkType", None, &[OperatingHours], Some(WorkTypes)),
    stage(
        StageId::ServiceTerritory,
        "ServiceTerritory",
        None,
        &[OperatingHours],
        Some(ServiceTerritories),
    ),
    stage(
        StageId::ServiceTerritoryWorkType,
        "ServiceTerritoryWorkType",
        None,
        &[ServiceTerritories, WorkTypes],
        None,
    ),
    stage(StageId::WorkTypeGroup, "WorkTypeGroup", None, &[], None),
];

/// The maps a stage declared, and nothing else
pub struct DeclaredMaps<'a> {
    stage: &'a StageDef,
    maps: &'a HashMap<MapKey, ReferenceMap>,
}

impl<'a> DeclaredMaps<'a> {
    pub fn new(stage: &'a StageDef, maps: &'a HashMap<MapKey, ReferenceMap>) -> Self {
        Self { stage, maps }
    }

    pub fn get(&self, key: MapKey) -> Result<&'a ReferenceMap, StageError> {
        if !self.stage.requires.contains(&key) {
            return Err(StageError::UndeclaredDependency(key));
        }
        self.maps.get(&key).ok_or(StageError::MissingDependency(key))
    }

    /// Parent, child and person accounts as one lookup, later maps winning
    pub fn accounts(&self) -> Result<ReferenceMap, StageError> {
        let maps = ACCOUNT_MAPS
            .iter()
            .map(|key| self.get(*key))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ReferenceMap::merged("Account", &maps))
    }
}
