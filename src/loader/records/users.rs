use serde::Serialize;

use super::raw;
use crate::config::UserDefaults;
use crate::loader::reference::{Reference, ReferenceMap};
use crate::sheet::Row;

pub struct UserLookups<'a> {
    pub profiles: &'a ReferenceMap,
    pub roles: &'a ReferenceMap,
    /// Appended to every sheet username, e.g. `.dev`
    pub username_suffix: &'a str,
    pub defaults: &'a UserDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: String,
    pub email: Option<String>,
    pub title: Option<String>,
    pub profile_id: Reference,
    pub user_role_id: Reference,
    pub alias: String,
    pub is_active: bool,
    pub time_zone_sid_key: String,
    pub locale_sid_key: String,
    pub email_encoding_key: String,
    pub language_locale_key: String,
}

pub fn build_user(row: &Row, lookups: &UserLookups) -> Option<UserRecord> {
    let first_name = raw(row, 0)?;
    let last_name = raw(row, 1);

    Some(UserRecord {
        alias: user_alias(&first_name, last_name.as_deref().unwrap_or_default()),
        username: format!("{}{}", row.get(2).text_or_default(), lookups.username_suffix),
        first_name: Some(first_name),
        last_name,
        email: raw(row, 3),
        title: raw(row, 4),
        profile_id: lookups.profiles.resolve_cell(row.get(5)),
        user_role_id: lookups.roles.resolve_cell(row.get(6)),
        is_active: true,
        time_zone_sid_key: lookups.defaults.time_zone.clone(),
        locale_sid_key: lookups.defaults.locale.clone(),
        email_encoding_key: lookups.defaults.email_encoding.clone(),
        language_locale_key: lookups.defaults.language.clone(),
    })
}

/// First character of the first name and up to seven of the last name
pub fn user_alias(first_name: &str, last_name: &str) -> String {
    first_name
        .chars()
        .take(1)
        .chain(last_name.chars().take(7))
        .collect()
}

/// Suffix that makes sheet usernames unique to a sandbox, e.g.
/// `acme--dev.sandbox.my.salesforce.com` becomes `.dev`
pub fn username_suffix(instance_host: &str) -> String {
    let org = instance_host
        .trim_end_matches(".my.salesforce.com")
        .trim_end_matches(".sandbox");
    let name = org.rsplit("--").next().unwrap_or(org);
    format!(".{}", name)
}
