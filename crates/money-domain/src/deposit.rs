//! Deposit requests and signed deposit records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::{canonical_amount, sha256_hex, stored_amount, SIGNATURE_ALGORITHM};

/// Record type tag carried by every deposit.
pub const DEPOSIT_TYPE: &str = "DEPOSIT";

/// Raw deposit instruction as found in an input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRequest {
    #[serde(rename = "IBAN")]
    pub iban: String,
    /// Currency-prefixed amount, e.g. `EUR 2500.00`.
    #[serde(rename = "AMOUNT")]
    pub amount: String,
}

impl DepositRequest {
    pub fn new(iban: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            iban: iban.into(),
            amount: amount.into(),
        }
    }
}

/// Immutable, signed record of an accepted deposit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositRecord {
    pub alg: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub to_iban: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub deposit_amount: Decimal,
    /// Seconds since the Unix epoch (UTC), with sub-second precision.
    pub deposit_date: f64,
    pub deposit_signature: String,
}

impl DepositRecord {
    /// Builds and signs a record. The amount is reduced to [`stored_amount`] first so
    /// the signed value is the one that survives persistence.
    pub fn new(to_iban: impl Into<String>, deposit_amount: Decimal, deposit_date: f64) -> Self {
        let mut record = Self {
            alg: SIGNATURE_ALGORITHM.to_string(),
            kind: DEPOSIT_TYPE.to_string(),
            to_iban: to_iban.into(),
            deposit_amount: stored_amount(deposit_amount),
            deposit_date,
            deposit_signature: String::new(),
        };
        record.deposit_signature = record.compute_signature();
        record
    }

    /// Canonical string the signature is computed over.
    pub fn signature_string(&self) -> String {
        format!(
            "{{alg:{},typ:{},iban:{},amount:{},deposit_date:{}}}",
            self.alg,
            self.kind,
            self.to_iban,
            canonical_amount(&stored_amount(self.deposit_amount)),
            self.deposit_date
        )
    }

    pub fn compute_signature(&self) -> String {
        sha256_hex(&self.signature_string())
    }

    /// True when the stored signature still matches the record's fields.
    pub fn has_valid_signature(&self) -> bool {
        self.deposit_signature == self.compute_signature()
    }
}
