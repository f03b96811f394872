use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

/// Environment variable that overrides the default data directory.
pub const HOME_ENV_VAR: &str = "ACCOUNT_MANAGER_HOME";
const DEFAULT_DIR_NAME: &str = ".account_manager";

/// Where the stores live and which optional deposit rules apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Directory holding the store files. Falls back to `ACCOUNT_MANAGER_HOME`, then `~/.account_manager`.
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub files: StoreFiles,
    #[serde(default)]
    pub deposit: DepositSettings,
}

impl Config {
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }
        if let Some(custom) = env::var_os(HOME_ENV_VAR) {
            return PathBuf::from(custom);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn transactions_path(&self) -> PathBuf {
        self.resolve_data_dir().join(&self.files.transactions)
    }

    pub fn balances_path(&self) -> PathBuf {
        self.resolve_data_dir().join(&self.files.balances)
    }

    pub fn deposits_path(&self) -> PathBuf {
        self.resolve_data_dir().join(&self.files.deposits)
    }

    pub fn transfers_path(&self) -> PathBuf {
        self.resolve_data_dir().join(&self.files.transfers)
    }
}

/// File names of the four stores, relative to the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreFiles {
    pub transactions: String,
    pub balances: String,
    pub deposits: String,
    pub transfers: String,
}

impl Default for StoreFiles {
    fn default() -> Self {
        Self {
            transactions: "transactions.json".into(),
            balances: "balances.json".into(),
            deposits: "deposits.json".into(),
            transfers: "transfers.json".into(),
        }
    }
}

/// Optional amount rules for deposits. Both are off unless configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositSettings {
    /// Require deposits of at least 10.00.
    #[serde(default)]
    pub enforce_minimum: bool,
    /// Reject deposits with more than two decimal places.
    #[serde(default)]
    pub enforce_precision: bool,
}
