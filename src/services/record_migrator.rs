use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::LoadError;
use crate::providers::crypto_provider::is_recognized_password_hash;
use crate::services::permission_registry::{
    ALL_PERMISSIONS, ANNOUNCEMENT, DIRECT_MESSAGE, LEGACY_MESSAGE, SERVER_LOG_VIEW,
};
use crate::types::admin::{ADMIN_SCHEMA_VERSION, normalize_key};
use crate::types::{AdminRecord, ProviderKind, ProviderLink, ProviderLinks};

const MIN_NAME_LENGTH: usize = 3;

/// Identifier used when a citizenfx link carries no usable forum user id
pub const CITIZENFX_PLACEHOLDER_IDENTIFIER: &str = "fivem:00000000";

/// Validated, current-schema content of an admins file
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedAdmins {
    pub admins: Vec<AdminRecord>,

    /// At least one record was upgraded or had an identifier derived;
    /// the file should be rewritten in the current shape.
    pub migrated: bool,
}

#[derive(Debug, Deserialize)]
struct StoredProviderLink {
    id: String,
    #[serde(default)]
    identifier: Option<String>,
    data: Map<String, Value>,
}

/// Records written before the `$schema` tag existed
#[derive(Debug, Deserialize)]
struct StoredAdminV0 {
    name: String,
    master: bool,
    password_hash: String,
    #[serde(default)]
    password_temporary: bool,
    providers: BTreeMap<ProviderKind, StoredProviderLink>,
    permissions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct StoredAdminV1 {
    name: String,
    master: bool,
    password_hash: String,
    #[serde(default)]
    password_temporary: bool,
    providers: BTreeMap<ProviderKind, StoredProviderLink>,
    permissions: Vec<String>,
}

impl From<StoredAdminV0> for StoredAdminV1 {
    fn from(legacy: StoredAdminV0) -> Self {
        Self {
            name: legacy.name,
            master: legacy.master,
            password_hash: legacy.password_hash,
            password_temporary: legacy.password_temporary,
            providers: legacy.providers,
            permissions: migrate_permissions_v0_to_v1(legacy.permissions),
        }
    }
}

/// Parse and validate raw admins file bytes, upgrading legacy records
///
/// Passes run in order: JSON shape, per-record decode and migration,
/// uniqueness of names and provider ids, then the single-master rule.
pub fn parse_admins(raw: &[u8]) -> Result<LoadedAdmins, LoadError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Err(LoadError::Empty);
    }

    let document: Value = serde_json::from_slice(raw).map_err(LoadError::MalformedJson)?;
    let Value::Array(entries) = document else {
        return Err(LoadError::NotAList);
    };
    if entries.is_empty() {
        return Err(LoadError::EmptyList);
    }

    let mut admins = Vec::with_capacity(entries.len());
    let mut migrated = false;
    for (index, entry) in entries.into_iter().enumerate() {
        let (record, record_migrated) = decode_record(index, entry)?;
        migrated |= record_migrated;
        admins.push(record);
    }

    check_uniqueness(&admins)?;

    let masters = admins.iter().filter(|admin| admin.is_master).count();
    if masters != 1 {
        return Err(LoadError::MasterCountInvalid { count: masters });
    }

    Ok(LoadedAdmins { admins, migrated })
}

fn decode_record(index: usize, entry: Value) -> Result<(AdminRecord, bool), LoadError> {
    let Value::Object(fields) = entry else {
        return Err(LoadError::structurally_invalid(index, "entry is not an object"));
    };

    let (stored, upgraded) = match fields.get("$schema").cloned() {
        None => {
            let legacy: StoredAdminV0 = decode_shape(index, fields)?;
            (StoredAdminV1::from(legacy), true)
        }
        Some(tag) if tag.as_u64() == Some(u64::from(ADMIN_SCHEMA_VERSION)) => {
            (decode_shape::<StoredAdminV1>(index, fields)?, false)
        }
        Some(tag) => {
            return Err(LoadError::structurally_invalid(
                index,
                format!("unsupported schema version {}", tag),
            ));
        }
    };

    let (record, derived) = finish_record(index, stored)?;
    Ok((record, upgraded || derived))
}

fn decode_shape<T: serde::de::DeserializeOwned>(
    index: usize,
    fields: Map<String, Value>,
) -> Result<T, LoadError> {
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| LoadError::structurally_invalid(index, e.to_string()))
}

/// Field-level checks plus identifier derivation for links that lack one
fn finish_record(index: usize, stored: StoredAdminV1) -> Result<(AdminRecord, bool), LoadError> {
    if stored.name.chars().count() < MIN_NAME_LENGTH {
        return Err(LoadError::structurally_invalid(
            index,
            format!("name must be at least {} characters", MIN_NAME_LENGTH),
        ));
    }
    if !is_recognized_password_hash(&stored.password_hash) {
        return Err(LoadError::structurally_invalid(
            index,
            "password_hash is not a recognized hash",
        ));
    }

    let mut derived = false;
    let mut providers = ProviderLinks::new();
    for (kind, link) in stored.providers {
        ProviderLink::check_field(kind, "id", &link.id)
            .map_err(|reason| LoadError::structurally_invalid(index, reason))?;

        let identifier = match link.identifier {
            Some(identifier) => {
                ProviderLink::check_field(kind, "identifier", &identifier)
                    .map_err(|reason| LoadError::structurally_invalid(index, reason))?;
                identifier
            }
            None => {
                derived = true;
                derive_identifier(kind, &link.id, &link.data)
            }
        };

        providers.insert(kind, ProviderLink::new(link.id, identifier).with_data(link.data));
    }

    let record = AdminRecord {
        schema_version: ADMIN_SCHEMA_VERSION,
        name: stored.name,
        is_master: stored.master,
        password_hash: stored.password_hash,
        password_temporary: stored.password_temporary,
        providers,
        permissions: stored.permissions,
    };
    Ok((record, derived))
}

/// Best-effort identifier for a link persisted without one
pub fn derive_identifier(kind: ProviderKind, id: &str, data: &Map<String, Value>) -> String {
    match kind {
        ProviderKind::Citizenfx => data
            .get("nameid")
            .and_then(Value::as_str)
            .and_then(forum_user_id)
            .map(|user_id| format!("{}:{}", kind.identifier_namespace(), user_id))
            .unwrap_or_else(|| {
                tracing::warn!(
                    id = %id,
                    "Could not derive citizenfx identifier, using placeholder"
                );
                CITIZENFX_PLACEHOLDER_IDENTIFIER.to_string()
            }),
        ProviderKind::Discord => format!("{}:{}", kind.identifier_namespace(), id),
    }
}

/// Numeric user id (1 to 8 digits) following `/user/` in a forum profile URL
fn forum_user_id(nameid: &str) -> Option<&str> {
    let (_, tail) = nameid.split_once("/user/")?;
    let end = tail
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(tail.len())
        .min(8);

    if end == 0 { None } else { Some(&tail[..end]) }
}

/// Legacy "players.message" splits into direct messages and announcements;
/// restricted admins gain server log access.
fn migrate_permissions_v0_to_v1(permissions: Vec<String>) -> Vec<String> {
    let mut upgraded: Vec<String> = Vec::with_capacity(permissions.len() + 2);
    let mut had_legacy_message = false;
    for permission in permissions {
        if permission == LEGACY_MESSAGE {
            had_legacy_message = true;
        } else {
            upgraded.push(permission);
        }
    }

    if had_legacy_message {
        push_unique(&mut upgraded, DIRECT_MESSAGE);
        push_unique(&mut upgraded, ANNOUNCEMENT);
    }

    if !upgraded.is_empty() && !upgraded.iter().any(|p| p == ALL_PERMISSIONS) {
        push_unique(&mut upgraded, SERVER_LOG_VIEW);
    }

    upgraded
}

fn push_unique(permissions: &mut Vec<String>, permission: &str) {
    if !permissions.iter().any(|p| p == permission) {
        permissions.push(permission.to_string());
    }
}

fn check_uniqueness(admins: &[AdminRecord]) -> Result<(), LoadError> {
    let mut names = HashSet::new();
    let mut provider_ids = HashSet::new();

    for (index, admin) in admins.iter().enumerate() {
        let name = normalize_key(&admin.name).unwrap_or_default();
        if !names.insert(name) {
            return Err(LoadError::structurally_invalid(
                index,
                format!("duplicate name '{}'", admin.name),
            ));
        }

        for (kind, link) in &admin.providers {
            let id = normalize_key(&link.id).unwrap_or_default();
            if !provider_ids.insert((*kind, id)) {
                return Err(LoadError::structurally_invalid(
                    index,
                    format!("{} id '{}' is linked to another admin", kind, link.id),
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "record_migrator_test.rs"]
mod record_migrator_test;
