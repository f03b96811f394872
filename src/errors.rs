use money_config::ConfigError;
use money_core::AccountManagementError;
use thiserror::Error;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] AccountManagementError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid input: {0}")]
    Input(String),
}

