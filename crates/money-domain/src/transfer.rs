//! Transfer requests and the content-addressed records they produce.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::{canonical_amount, sha256_hex, TransferType};

/// Transfer instruction exactly as submitted, before any validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub from_iban: String,
    pub to_iban: String,
    pub concept: String,
    pub transfer_type: String,
    /// Execution date in `DD/MM/YYYY` form.
    pub date: String,
    pub amount: Decimal,
}

impl TransferRequest {
    pub fn new(
        from_iban: impl Into<String>,
        to_iban: impl Into<String>,
        concept: impl Into<String>,
        transfer_type: impl Into<String>,
        date: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            from_iban: from_iban.into(),
            to_iban: to_iban.into(),
            concept: concept.into(),
            transfer_type: transfer_type.into(),
            date: date.into(),
            amount,
        }
    }

    /// Canonical concatenation of the business fields. The creation time is not included.
    pub fn canonical_string(&self) -> String {
        format!(
            "{{from_iban:{},to_iban:{},concept:{},type:{},date:{},amount:{}}}",
            self.from_iban,
            self.to_iban,
            self.concept,
            self.transfer_type,
            self.date,
            canonical_amount(&self.amount)
        )
    }

    pub fn transfer_code(&self) -> String {
        sha256_hex(&self.canonical_string())
    }
}

/// Persisted transfer. `transfer_code` doubles as the record's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub from_iban: String,
    pub to_iban: String,
    pub transfer_concept: String,
    pub transfer_type: TransferType,
    pub transfer_date: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub transfer_amount: Decimal,
    pub time_stamp: f64,
    pub transfer_code: String,
}

impl TransferRecord {
    /// Builds the record for an already validated request.
    pub fn from_request(request: &TransferRequest, transfer_type: TransferType, time_stamp: f64) -> Self {
        Self {
            from_iban: request.from_iban.clone(),
            to_iban: request.to_iban.clone(),
            transfer_concept: request.concept.clone(),
            transfer_type,
            transfer_date: request.date.clone(),
            transfer_amount: request.amount,
            time_stamp,
            transfer_code: request.transfer_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(amount: Decimal) -> TransferRequest {
        TransferRequest::new(
            "ES9121000418450200051001",
            "ES9121000418450200051002",
            "text valid",
            "ORDINARY",
            "01/01/2026",
            amount,
        )
    }

    #[test]
    fn canonical_string_orders_business_fields() {
        assert_eq!(
            request(dec!(10.00)).canonical_string(),
            "{from_iban:ES9121000418450200051001,to_iban:ES9121000418450200051002,\
             concept:text valid,type:ORDINARY,date:01/01/2026,amount:10}"
        );
    }

    #[test]
    fn code_does_not_depend_on_amount_scale() {
        assert_eq!(request(dec!(10.0)).transfer_code(), request(dec!(10.00)).transfer_code());
        assert_ne!(request(dec!(10.01)).transfer_code(), request(dec!(10.00)).transfer_code());
    }

    #[test]
    fn record_code_ignores_timestamp() {
        let req = request(dec!(15.20));
        let first = TransferRecord::from_request(&req, TransferType::Ordinary, 1.0);
        let second = TransferRecord::from_request(&req, TransferType::Ordinary, 2.0);
        assert_eq!(first.transfer_code, second.transfer_code);
    }
}
