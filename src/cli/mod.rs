// CLI module: operator console hosting the admin vault

pub mod admins;
pub mod bootstrap;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;

/// Admin vault operator console
#[derive(Parser, Debug)]
#[command(name = "admin-vault")]
#[command(about = "Persistent, integrity-checked administrator directory", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Load or bootstrap the directory and keep it monitored until Ctrl-C
    Run,

    /// Create the master account when no admins file exists yet
    CreateMaster {
        /// Master account name
        #[arg(long)]
        name: String,

        /// Plaintext password, hashed before it is stored
        #[arg(long, conflicts_with = "password_hash", required_unless_present = "password_hash")]
        password: Option<String>,

        /// Pre-computed bcrypt or argon2 hash
        #[arg(long)]
        password_hash: Option<String>,
    },

    /// Print the admins (without password hashes) as JSON
    Admins,

    /// Print the permission registry
    Permissions,
}

/// Execute CLI command
///
/// Routes the parsed CLI command to the appropriate handler function.
pub async fn execute_command(cli: Cli, app_data: &AppData) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Run => {
            bootstrap::run(app_data).await?;
        }
        Commands::CreateMaster {
            name,
            password,
            password_hash,
        } => {
            bootstrap::create_master(&app_data.vault, &name, password, password_hash).await?;
        }
        Commands::Admins => {
            admins::print_admins(&app_data.vault).await?;
        }
        Commands::Permissions => {
            admins::print_permissions();
        }
    }

    Ok(())
}
