//! money-config
//!
//! Configuration model for the account stores plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, DepositSettings, StoreFiles};
