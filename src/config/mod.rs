// Config layer - Environment-driven settings and logging bootstrap
pub mod config_spec;
pub mod env_provider;
pub mod errors;
mod logging;
pub mod vault_settings;

pub use config_spec::{ConfigSpec, ConfigValue, ConfigValueSource};
pub use env_provider::{EnvironmentProvider, MockEnvironment, SystemEnvironment};
pub use errors::ApplicationError;
pub use logging::{LoggingConfig, LoggingError, init_logging};
pub use vault_settings::{DefaultMaster, VaultSettings};
