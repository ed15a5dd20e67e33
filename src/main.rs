use std::sync::Arc;

use clap::Parser;

use admin_vault::app_data::AppData;
use admin_vault::cli::{Cli, execute_command};
use admin_vault::config::{SystemEnvironment, init_logging};
use admin_vault::services::OnlineAdminsNotifier;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let env_provider = Arc::new(SystemEnvironment);
    init_logging(env_provider.as_ref())?;

    // The console runs without a game server host attached
    let app_data = AppData::init(env_provider, OnlineAdminsNotifier::detached())?;

    execute_command(cli, &app_data).await
}
