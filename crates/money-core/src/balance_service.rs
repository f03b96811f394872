use money_domain::{BalanceRecord, TransactionEntry};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::{
    error::{AccountManagementError, Result},
    storage::{RecordStore, StoreError},
    time::Clock,
    validation::{parse_decimal, validate_iban},
};

/// Result of a successful balance calculation.
#[derive(Debug, Clone, PartialEq)]
pub enum BalanceOutcome {
    /// The balance was appended to the balances store.
    Recorded(BalanceRecord),
    /// Matching movements cancel out; nothing was written.
    ZeroBalance,
}

/// Sums an IBAN's movements and records the resulting balance.
pub struct BalanceService<'a> {
    transactions: &'a dyn RecordStore,
    balances: &'a dyn RecordStore,
    clock: &'a dyn Clock,
}

impl<'a> BalanceService<'a> {
    pub fn new(
        transactions: &'a dyn RecordStore,
        balances: &'a dyn RecordStore,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            transactions,
            balances,
            clock,
        }
    }

    pub fn calculate(&self, iban: &str) -> Result<BalanceOutcome> {
        if !validate_iban(iban) {
            return Err(AccountManagementError::InvalidInput(format!(
                "`{}` is not a valid IBAN",
                iban
            )));
        }

        let raw = self.transactions.load().map_err(|err| {
            AccountManagementError::NotFound(format!("transactions source unavailable: {}", err))
        })?;
        let entries = parse_transaction_entries(&raw)?;
        tracing::debug!(
            store = %self.transactions.describe(),
            entries = entries.len(),
            "loaded transactions"
        );

        let mut matched = false;
        let mut total = Decimal::ZERO;
        for entry in entries.iter().filter(|entry| entry.iban == iban) {
            matched = true;
            total = total.checked_add(entry.amount).ok_or_else(|| {
                AccountManagementError::InvalidData(format!(
                    "transactions for IBAN {} overflow the balance",
                    iban
                ))
            })?;
        }
        if !matched {
            return Err(AccountManagementError::NotFound(format!(
                "no transactions found for IBAN {}",
                iban
            )));
        }
        if total.is_zero() {
            tracing::info!(%iban, "balance is zero; nothing recorded");
            return Ok(BalanceOutcome::ZeroBalance);
        }

        let record = BalanceRecord::new(iban, total, self.clock.today());
        let value = serde_json::to_value(&record)
            .map_err(|err| AccountManagementError::Storage(err.to_string()))?;
        self.balances.append(value).map_err(|err| match err {
            StoreError::Missing(store) => {
                AccountManagementError::NotFound(format!("balances store `{}` does not exist", store))
            }
            StoreError::Corrupt { .. } => AccountManagementError::InvalidData(err.to_string()),
            StoreError::Io { .. } => AccountManagementError::Storage(err.to_string()),
        })?;
        tracing::info!(%iban, amount = %record.amount, "balance recorded");
        Ok(BalanceOutcome::Recorded(record))
    }
}

/// Converts raw transaction rows into typed entries.
///
/// Every row must be an object with a string `IBAN` and an `amount` given either as a
/// JSON number or as a numeric string. The first malformed row fails the whole scan.
pub fn parse_transaction_entries(records: &[Value]) -> Result<Vec<TransactionEntry>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let iban = record
                .get("IBAN")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    AccountManagementError::InvalidData(format!(
                        "transaction #{} has no IBAN",
                        index
                    ))
                })?;
            let amount = match record.get("amount") {
                Some(Value::Number(number)) => parse_decimal(&number.to_string()),
                Some(Value::String(text)) => parse_decimal(text),
                _ => None,
            }
            .ok_or_else(|| {
                AccountManagementError::InvalidData(format!(
                    "transaction #{} has an amount that is not a number",
                    index
                ))
            })?;
            Ok(TransactionEntry {
                iban: iban.to_string(),
                amount,
            })
        })
        .collect()
}
