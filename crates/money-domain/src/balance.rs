//! Balance snapshots and the transaction entries they are computed from.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single movement read from the transactions source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionEntry {
    pub iban: String,
    pub amount: Decimal,
}

/// Sum of all movements for one IBAN on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub iban: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub date: NaiveDate,
}

impl BalanceRecord {
    pub fn new(iban: impl Into<String>, amount: Decimal, date: NaiveDate) -> Self {
        Self {
            iban: iban.into(),
            amount,
            date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn balance_record_writes_iso_date_and_numeric_amount() {
        let record = BalanceRecord::new(
            "ES9121000418450200051332",
            dec!(150.25),
            NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["iban"], "ES9121000418450200051332");
        assert_eq!(value["amount"], 150.25);
        assert_eq!(value["date"], "2026-03-04");
    }
}
