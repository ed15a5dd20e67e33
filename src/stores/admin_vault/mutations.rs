use std::collections::BTreeMap;

use super::{AdminVault, PendingFlush, VaultState};
use crate::errors::AdminVaultError;
use crate::types::admin::{ADMIN_SCHEMA_VERSION, dedup_permissions, normalize_key};
use crate::types::{AdminRecord, ProviderKind, ProviderLink, ProviderLinks};

const NAME_LENGTH: std::ops::RangeInclusive<usize> = 3..=20;

/// Change to one provider link during an edit
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderUpdate {
    Unlink,
    Link(ProviderLink),
}

/// Fields to change on an existing admin; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct AdminEdit {
    pub password: Option<String>,
    pub providers: BTreeMap<ProviderKind, ProviderUpdate>,
    pub permissions: Option<Vec<String>>,
}

impl AdminEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn link(mut self, provider: ProviderKind, link: ProviderLink) -> Self {
        self.providers.insert(provider, ProviderUpdate::Link(link));
        self
    }

    pub fn unlink(mut self, provider: ProviderKind) -> Self {
        self.providers.insert(provider, ProviderUpdate::Unlink);
        self
    }

    pub fn permissions(mut self, permissions: Vec<String>) -> Self {
        self.permissions = Some(permissions);
        self
    }
}

/// Name rule for accounts created through the API: trimmed, 3 to 20 characters of `[A-Za-z0-9_.-]`
pub(crate) fn validate_new_name(name: &str) -> Result<String, AdminVaultError> {
    let trimmed = name.trim();
    if !NAME_LENGTH.contains(&trimmed.chars().count()) {
        return Err(AdminVaultError::invalid_name(format!(
            "'{}' must be between {} and {} characters",
            trimmed,
            NAME_LENGTH.start(),
            NAME_LENGTH.end()
        )));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(AdminVaultError::invalid_name(format!(
            "'{}' may only contain letters, digits, '_', '.' and '-'",
            trimmed
        )));
    }
    Ok(trimmed.to_string())
}

/// Reject links the loader would refuse on the next start
pub(crate) fn validate_links<'a>(
    links: impl IntoIterator<Item = (ProviderKind, &'a ProviderLink)>,
) -> Result<(), AdminVaultError> {
    for (kind, link) in links {
        link.validate(kind)
            .map_err(|reason| AdminVaultError::invalid_provider_link(kind, reason))?;
    }
    Ok(())
}

fn ready_admins(state: &VaultState) -> Result<&Vec<AdminRecord>, AdminVaultError> {
    match state {
        VaultState::Ready { admins } => Ok(admins),
        _ => Err(AdminVaultError::Uninitialized),
    }
}

fn ready_admins_mut(state: &mut VaultState) -> Result<&mut Vec<AdminRecord>, AdminVaultError> {
    match state {
        VaultState::Ready { admins } => Ok(admins),
        _ => Err(AdminVaultError::Uninitialized),
    }
}

/// Reject links whose provider id already belongs to an admin other than `owner`
fn check_links_available<'a>(
    admins: &[AdminRecord],
    owner: Option<&str>,
    links: impl IntoIterator<Item = (ProviderKind, &'a ProviderLink)>,
) -> Result<(), AdminVaultError> {
    for (kind, link) in links {
        let Some(id) = normalize_key(&link.id) else {
            continue;
        };
        let taken = admins.iter().any(|admin| {
            owner.is_none_or(|owner| !admin.matches_name(owner)) && admin.has_provider_id(kind, &id)
        });
        if taken {
            return Err(AdminVaultError::provider_id_taken(kind, &link.id));
        }
    }
    Ok(())
}

fn check_add(admins: &[AdminRecord], name: &str, providers: &ProviderLinks) -> Result<(), AdminVaultError> {
    let key = normalize_key(name).unwrap_or_default();
    if admins.iter().any(|admin| admin.matches_name(&key)) {
        return Err(AdminVaultError::name_taken(name));
    }
    check_links_available(admins, None, providers.iter().map(|(kind, link)| (*kind, link)))
}

fn linked(edit: &AdminEdit) -> impl Iterator<Item = (ProviderKind, &ProviderLink)> {
    edit.providers.iter().filter_map(|(kind, update)| match update {
        ProviderUpdate::Link(link) => Some((*kind, link)),
        ProviderUpdate::Unlink => None,
    })
}

impl AdminVault {
    /// Add a non-master admin with a temporary password
    ///
    /// The record is visible to lookups as soon as this returns.
    pub async fn add_admin(
        &self,
        name: &str,
        providers: ProviderLinks,
        password: &str,
        permissions: Vec<String>,
    ) -> Result<PendingFlush, AdminVaultError> {
        let name = validate_new_name(name)?;
        validate_links(providers.iter().map(|(kind, link)| (*kind, link)))?;
        check_add(ready_admins(&self.read_state())?, &name, &providers)?;

        let password_hash = self.inner.hasher.hash_password(password)?;

        {
            let mut state = self.write_state();
            let admins = ready_admins_mut(&mut state)?;
            check_add(admins, &name, &providers)?;

            admins.push(AdminRecord {
                schema_version: ADMIN_SCHEMA_VERSION,
                name: name.clone(),
                is_master: false,
                password_hash,
                password_temporary: true,
                providers,
                permissions: dedup_permissions(permissions),
            });
        }

        tracing::info!(admin = %name, "Admin added");
        Ok(self.schedule_flush(std::time::Duration::ZERO))
    }

    /// Apply an edit to an existing admin
    ///
    /// A new password clears the temporary flag. The notification waits for
    /// the configured delay so session state can settle first.
    pub async fn edit_admin(&self, name: &str, edit: AdminEdit) -> Result<PendingFlush, AdminVaultError> {
        let key = normalize_key(name).ok_or_else(|| AdminVaultError::not_found(name))?;
        validate_links(linked(&edit))?;
        self.check_edit(ready_admins(&self.read_state())?, &key, name, &edit)?;

        let password_hash = match &edit.password {
            Some(password) => Some(self.inner.hasher.hash_password(password)?),
            None => None,
        };

        let edited_name = {
            let mut state = self.write_state();
            let admins = ready_admins_mut(&mut state)?;
            self.check_edit(admins, &key, name, &edit)?;

            let admin = admins
                .iter_mut()
                .find(|admin| admin.matches_name(&key))
                .ok_or_else(|| AdminVaultError::not_found(name))?;

            if let Some(password_hash) = password_hash {
                admin.password_hash = password_hash;
                admin.password_temporary = false;
            }
            for (kind, update) in edit.providers {
                match update {
                    ProviderUpdate::Unlink => {
                        admin.providers.remove(&kind);
                    }
                    ProviderUpdate::Link(link) => {
                        admin.providers.insert(kind, link);
                    }
                }
            }
            if let Some(permissions) = edit.permissions {
                admin.permissions = dedup_permissions(permissions);
            }
            admin.name.clone()
        };

        tracing::info!(admin = %edited_name, "Admin edited");
        Ok(self.schedule_flush(self.inner.notify_delay))
    }

    /// Remove a non-master admin
    pub async fn delete_admin(&self, name: &str) -> Result<PendingFlush, AdminVaultError> {
        let key = normalize_key(name).ok_or_else(|| AdminVaultError::not_found(name))?;

        let removed = {
            let mut state = self.write_state();
            let admins = ready_admins_mut(&mut state)?;
            let index = admins
                .iter()
                .position(|admin| admin.matches_name(&key))
                .ok_or_else(|| AdminVaultError::not_found(name))?;
            if admins[index].is_master {
                return Err(AdminVaultError::MasterProtected(admins[index].name.clone()));
            }
            admins.remove(index)
        };

        tracing::info!(admin = %removed.name, "Admin deleted");
        Ok(self.schedule_flush(std::time::Duration::ZERO))
    }

    fn check_edit(
        &self,
        admins: &[AdminRecord],
        key: &str,
        name: &str,
        edit: &AdminEdit,
    ) -> Result<(), AdminVaultError> {
        if !admins.iter().any(|admin| admin.matches_name(key)) {
            return Err(AdminVaultError::not_found(name));
        }
        check_links_available(admins, Some(key), linked(edit))
    }
}
