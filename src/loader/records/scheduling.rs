//! Field service scheduling records
//!
//! These have no sheet. Each stage creates exactly one record from the
//! `[scheduling]` settings, and the link record joins the territory and the
//! work type created earlier in the run.

use serde::Serialize;

use crate::config::SchedulingDefaults;
use crate::loader::reference::{Reference, ReferenceMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OperatingHoursRecord {
    pub name: String,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkTypeRecord {
    pub name: String,
    pub operating_hours_id: Reference,
    pub estimated_duration: f64,
    pub duration_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceTerritoryRecord {
    pub name: String,
    pub operating_hours_id: Reference,
    pub is_active: bool,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceTerritoryWorkTypeRecord {
    pub service_territory_id: Reference,
    pub work_type_id: Reference,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkTypeGroupRecord {
    pub name: String,
    pub is_active: bool,
    pub group_type: String,
}

impl OperatingHoursRecord {
    pub fn from_settings(settings: &SchedulingDefaults) -> Self {
        Self {
            name: settings.operating_hours_name.clone(),
            time_zone: settings.time_zone.clone(),
        }
    }
}

impl WorkTypeRecord {
    pub fn from_settings(settings: &SchedulingDefaults, operating_hours: &ReferenceMap) -> Self {
        Self {
            name: settings.work_type_name.clone(),
            operating_hours_id: operating_hours.resolve(&settings.operating_hours_name),
            estimated_duration: settings.estimated_duration,
            duration_type: settings.duration_type.clone(),
        }
    }
}

impl ServiceTerritoryRecord {
    pub fn from_settings(settings: &SchedulingDefaults, operating_hours: &ReferenceMap) -> Self {
        Self {
            name: settings.service_territory_name.clone(),
            operating_hours_id: operating_hours.resolve(&settings.operating_hours_name),
            is_active: true,
            country: settings.country.clone(),
        }
    }
}

impl ServiceTerritoryWorkTypeRecord {
    pub fn from_settings(
        settings: &SchedulingDefaults,
        territories: &ReferenceMap,
        work_types: &ReferenceMap,
    ) -> Self {
        Self {
            service_territory_id: territories.resolve(&settings.service_territory_name),
            work_type_id: work_types.resolve(&settings.work_type_name),
        }
    }
}

impl WorkTypeGroupRecord {
    pub fn from_settings(settings: &SchedulingDefaults) -> Self {
        Self {
            name: settings.work_type_group_name.clone(),
            is_active: true,
            group_type: settings.group_type.clone(),
        }
    }
}
