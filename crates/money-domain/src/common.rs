//! Shared enums and digest helpers for account records.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Algorithm tag written next to every deposit signature.
pub const SIGNATURE_ALGORITHM: &str = "SHA-256";

/// Lowercase hex SHA-256 digest of `input`.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Renders an amount the way it enters canonical digest strings.
///
/// Trailing zeros are dropped so `10.50` and `10.5` hash identically, which keeps
/// digests stable after a record has been written as a JSON number and read back.
pub fn canonical_amount(amount: &Decimal) -> String {
    amount.normalize().to_string()
}

/// Significant digits kept for amounts persisted as JSON numbers.
///
/// Stored amounts pass through an `f64`. Twelve digits sit well inside its
/// precision, so a stored amount read back rounds to the same value.
pub const STORED_AMOUNT_DIGITS: u32 = 12;

/// The value an amount takes once it is persisted as a JSON number.
pub fn stored_amount(amount: Decimal) -> Decimal {
    amount
        .round_sf(STORED_AMOUNT_DIGITS)
        .unwrap_or(amount)
        .normalize()
}

/// Settlement speed requested for a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransferType {
    Ordinary,
    Urgent,
    Immediate,
}

impl TransferType {
    pub const ALL: [TransferType; 3] = [
        TransferType::Ordinary,
        TransferType::Urgent,
        TransferType::Immediate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferType::Ordinary => "ORDINARY",
            TransferType::Urgent => "URGENT",
            TransferType::Immediate => "IMMEDIATE",
        }
    }
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a label is not one of the known transfer types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTransferType(pub String);

impl fmt::Display for UnknownTransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown transfer type `{}`", self.0)
    }
}

impl std::error::Error for UnknownTransferType {}

impl FromStr for TransferType {
    type Err = UnknownTransferType;

    /// Matching is exact: `ordinary` is rejected.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TransferType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| UnknownTransferType(value.to_string()))
    }
}
