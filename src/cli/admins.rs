// Listing commands

use crate::errors::LoadError;
use crate::services::{PermissionRegistry, parse_admins};
use crate::stores::AdminVault;
use crate::types::PublicAdmin;

/// Parse the admins file without loading it into the vault
///
/// Legacy records are upgraded in memory only; the file is left as found.
pub async fn read_public_admins(vault: &AdminVault) -> Result<Vec<PublicAdmin>, LoadError> {
    let raw = vault.store().load().await?;
    let loaded = parse_admins(&raw)?;
    Ok(loaded.admins.iter().map(PublicAdmin::from).collect())
}

pub async fn print_admins(vault: &AdminVault) -> Result<(), Box<dyn std::error::Error>> {
    let admins = read_public_admins(vault).await?;
    println!("{}", serde_json::to_string_pretty(&admins)?);
    Ok(())
}

pub fn print_permissions() {
    for permission in PermissionRegistry::list() {
        println!("{:<24} {}", permission.key, permission.label);
    }
}
