// Run and create-master commands

use crate::app_data::AppData;
use crate::errors::LoadError;
use crate::stores::{AdminVault, BootstrapOutcome, FlushOutcome};
use crate::types::{MasterPassword, ProviderLinks};

/// Bootstrap the vault and keep it monitored until Ctrl-C
pub async fn run(app_data: &AppData) -> Result<(), Box<dyn std::error::Error>> {
    let vault = &app_data.vault;

    match vault.init(app_data.settings.default_master()).await? {
        BootstrapOutcome::Loaded { admins } => {
            println!("✓ Loaded {} admin(s) from {}", admins, vault.admins_file().display());
        }
        BootstrapOutcome::Created { name } => {
            println!("✓ Master admin '{}' created from default credentials", name);
        }
        BootstrapOutcome::AwaitingMaster { pin } => {
            println!("\n⚠️  No admins file found at {}", vault.admins_file().display());
            println!("   Use this PIN to create the master account: {}\n", pin);
        }
    }

    println!("Integrity monitor active, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    match vault.shutdown().await {
        FlushOutcome::Persisted { fingerprint } => println!("✓ Admins saved ({})", fingerprint),
        FlushOutcome::Skipped => println!("No admins to save"),
        FlushOutcome::Failed { reason } => println!("⚠️  Final save failed: {}", reason),
    }

    Ok(())
}

/// Create the master account, refusing if an admins file already exists
pub async fn create_master(
    vault: &AdminVault,
    name: &str,
    password: Option<String>,
    password_hash: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    match vault.load().await {
        Ok(_) => return Err("Admins file already exists, master account cannot be created".into()),
        Err(LoadError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    let password = match (password, password_hash) {
        (Some(plaintext), None) => MasterPassword::Plaintext(plaintext),
        (None, Some(hash)) => MasterPassword::Hashed(hash),
        _ => return Err("Provide exactly one of --password or --password-hash".into()),
    };

    vault.create_master(name, ProviderLinks::new(), password).await?;
    println!("✓ Master admin '{}' created at {}", name.trim(), vault.admins_file().display());

    vault.stop_monitor().await;
    Ok(())
}
