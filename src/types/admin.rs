use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schema version stamped on every record written by this crate
pub const ADMIN_SCHEMA_VERSION: u32 = 1;

/// External identity systems an admin can be linked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Citizenfx,
    Discord,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Citizenfx, ProviderKind::Discord];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Citizenfx => "citizenfx",
            ProviderKind::Discord => "discord",
        }
    }

    /// Namespace used by in-game connection identifiers for this provider
    pub fn identifier_namespace(&self) -> &'static str {
        match self {
            ProviderKind::Citizenfx => "fivem",
            ProviderKind::Discord => "discord",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum length of a provider link `id` and `identifier`, ignoring surrounding whitespace
pub const MIN_PROVIDER_FIELD_LENGTH: usize = 3;

/// Association between an admin and an account on an external identity provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderLink {
    /// Provider-specific stable user id
    pub id: String,

    /// Namespaced form (`<namespace>:<value>`) matched against connection identifiers
    pub identifier: String,

    /// Provider payload, opaque outside of migration
    pub data: Map<String, Value>,
}

impl ProviderLink {
    pub fn new(id: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            identifier: identifier.into(),
            data: Map::new(),
        }
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Length rule for one link field, shared by the loader and the mutation API
    pub fn check_field(provider: ProviderKind, field: &str, value: &str) -> Result<(), String> {
        if value.trim().chars().count() < MIN_PROVIDER_FIELD_LENGTH {
            return Err(format!(
                "{} {} must be at least {} characters",
                provider, field, MIN_PROVIDER_FIELD_LENGTH
            ));
        }
        Ok(())
    }

    pub fn validate(&self, provider: ProviderKind) -> Result<(), String> {
        Self::check_field(provider, "id", &self.id)?;
        Self::check_field(provider, "identifier", &self.identifier)
    }
}

pub type ProviderLinks = BTreeMap<ProviderKind, ProviderLink>;

/// One administrator as persisted in the admins file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminRecord {
    #[serde(rename = "$schema")]
    pub schema_version: u32,

    pub name: String,

    #[serde(rename = "master")]
    pub is_master: bool,

    pub password_hash: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub password_temporary: bool,

    pub providers: ProviderLinks,

    pub permissions: Vec<String>,
}

impl AdminRecord {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// Case-insensitive name match against an already normalized key
    pub(crate) fn matches_name(&self, normalized: &str) -> bool {
        normalize_key(&self.name).as_deref() == Some(normalized)
    }

    pub(crate) fn has_provider_id(&self, kind: ProviderKind, normalized_id: &str) -> bool {
        self.providers
            .get(&kind)
            .and_then(|link| normalize_key(&link.id))
            .is_some_and(|id| id == normalized_id)
    }

    pub(crate) fn matches_any_identifier(&self, normalized: &[String]) -> bool {
        self.providers.values().any(|link| {
            normalize_key(&link.identifier).is_some_and(|id| normalized.contains(&id))
        })
    }
}

/// Admin view safe to hand to the web layer: everything except the password hash
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicAdmin {
    pub name: String,
    #[serde(rename = "master")]
    pub is_master: bool,
    pub password_temporary: bool,
    pub providers: ProviderLinks,
    pub permissions: Vec<String>,
}

impl From<&AdminRecord> for PublicAdmin {
    fn from(record: &AdminRecord) -> Self {
        Self {
            name: record.name.clone(),
            is_master: record.is_master,
            password_temporary: record.password_temporary,
            providers: record.providers.clone(),
            permissions: record.permissions.clone(),
        }
    }
}

/// Password supplied when creating the master account
#[derive(Clone, PartialEq, Eq)]
pub enum MasterPassword {
    /// Hashed before it is stored
    Plaintext(String),
    /// Stored as-is; must carry a recognized hash prefix
    Hashed(String),
}

impl fmt::Debug for MasterPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plaintext(_) => f.write_str("Plaintext(<redacted>)"),
            Self::Hashed(_) => f.write_str("Hashed(<redacted>)"),
        }
    }
}

/// Trim and lowercase a lookup key; blank input yields `None`
pub fn normalize_key(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Order-preserving de-duplication applied to permission lists at the API boundary
pub fn dedup_permissions(permissions: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(permissions.len());
    for permission in permissions {
        if !unique.contains(&permission) {
            unique.push(permission);
        }
    }
    unique
}
