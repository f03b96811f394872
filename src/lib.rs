#![doc(test(attr(deny(warnings))))]

//! Account Manager validates and records balance calculations, deposits and
//! transfers against JSON-array stores kept in a local data directory.

pub mod cli;
pub mod errors;
pub mod manager;
pub mod utils;

pub use manager::{AccountManager, AccountStores};
pub use money_core::{AccountManagementError, BalanceOutcome};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Account Manager tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
