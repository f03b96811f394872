//! money-domain
//!
//! Pure record models for balances, deposits and transfers.
//! No I/O, no validation rules, no storage. Only data types and digests.

pub mod balance;
pub mod common;
pub mod deposit;
pub mod transfer;

pub use balance::*;
pub use common::*;
pub use deposit::*;
pub use transfer::*;
