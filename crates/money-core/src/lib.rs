//! money-core
//!
//! Validation rules and services for balances, deposits and transfers.
//! Depends on money-domain. No CLI, no terminal I/O, no direct filesystem access:
//! persistence goes through [`storage::RecordStore`] and time through [`time::Clock`].

pub mod balance_service;
pub mod deposit_service;
pub mod error;
pub mod storage;
pub mod time;
pub mod transfer_service;
pub mod validation;

pub use balance_service::*;
pub use deposit_service::*;
pub use error::{AccountManagementError, Result};
pub use transfer_service::*;

#[cfg(test)]
mod tests;
