use money_domain::{DepositRecord, DepositRequest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::{
    error::{AccountManagementError, Result},
    storage::RecordStore,
    time::Clock,
    validation::{ensure_precision, parse_decimal, validate_iban, MAX_AMOUNT},
};

pub const DEPOSIT_CURRENCY_PREFIX: &str = "EUR ";
pub const MIN_DEPOSIT_AMOUNT: Decimal = dec!(10.00);

/// Extra amount rules applied after the request-level checks.
///
/// The default enforces neither rule: deposit requests only need a positive amount
/// no larger than 10000.00.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepositPolicy {
    /// Smallest accepted amount, inclusive.
    pub minimum: Option<Decimal>,
    /// Reject amounts with more than two decimal places.
    pub enforce_precision: bool,
}

impl DepositPolicy {
    pub fn from_flags(enforce_minimum: bool, enforce_precision: bool) -> Self {
        Self {
            minimum: enforce_minimum.then_some(MIN_DEPOSIT_AMOUNT),
            enforce_precision,
        }
    }

    pub fn check(&self, amount: &Decimal) -> Result<()> {
        if let Some(minimum) = self.minimum {
            if *amount < minimum {
                return Err(AccountManagementError::InvalidInput(format!(
                    "deposit amount must be at least {}",
                    minimum
                )));
            }
        }
        if self.enforce_precision {
            ensure_precision(amount)?;
        }
        Ok(())
    }
}

/// Validates deposit instructions and appends signed records to the deposits store.
pub struct DepositService<'a> {
    deposits: &'a dyn RecordStore,
    clock: &'a dyn Clock,
    policy: DepositPolicy,
}

impl<'a> DepositService<'a> {
    pub fn new(deposits: &'a dyn RecordStore, clock: &'a dyn Clock, policy: DepositPolicy) -> Self {
        Self {
            deposits,
            clock,
            policy,
        }
    }

    /// Processes the contents of a deposit input file.
    pub fn process_json(&self, raw: &str) -> Result<String> {
        let request = parse_deposit_request(raw)?;
        self.process(&request)
    }

    /// Records the deposit and returns its signature.
    pub fn process(&self, request: &DepositRequest) -> Result<String> {
        if !validate_iban(&request.iban) {
            return Err(AccountManagementError::InvalidInput(format!(
                "`{}` is not a valid IBAN",
                request.iban
            )));
        }
        let amount = parse_deposit_amount(&request.amount)?;
        self.policy.check(&amount)?;

        let record = DepositRecord::new(request.iban.clone(), amount, self.clock.epoch_seconds());
        let value = serde_json::to_value(&record)
            .map_err(|err| AccountManagementError::Storage(err.to_string()))?;

        let mut records = self
            .deposits
            .load_or_empty()
            .map_err(|err| AccountManagementError::Storage(err.to_string()))?;
        records.push(value);
        self.deposits
            .persist(&records)
            .map_err(|err| AccountManagementError::Storage(err.to_string()))?;

        tracing::info!(
            iban = %record.to_iban,
            amount = %record.deposit_amount,
            signature = %record.deposit_signature,
            "deposit recorded"
        );
        Ok(record.deposit_signature)
    }
}

/// Checks that `raw` is a JSON object with string `IBAN` and `AMOUNT` fields.
pub fn parse_deposit_request(raw: &str) -> Result<DepositRequest> {
    let value: Value = serde_json::from_str(raw).map_err(|err| {
        AccountManagementError::InvalidData(format!("deposit input is not valid JSON: {}", err))
    })?;
    let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
    match (value.is_object(), field("IBAN"), field("AMOUNT")) {
        (true, Some(iban), Some(amount)) => Ok(DepositRequest::new(iban, amount)),
        _ => Err(AccountManagementError::InvalidData(
            "deposit input must be an object with string IBAN and AMOUNT fields".into(),
        )),
    }
}

/// Parses `EUR <amount>` and enforces `0 < amount <= 10000.00`.
pub fn parse_deposit_amount(raw: &str) -> Result<Decimal> {
    let digits = raw.strip_prefix(DEPOSIT_CURRENCY_PREFIX).ok_or_else(|| {
        AccountManagementError::InvalidInput(format!(
            "amount `{}` must be expressed in EUR",
            raw
        ))
    })?;
    let amount = parse_decimal(digits).ok_or_else(|| {
        AccountManagementError::InvalidInput(format!("amount `{}` is not a number", digits))
    })?;
    if amount <= Decimal::ZERO {
        return Err(AccountManagementError::InvalidInput(
            "deposit amount must be greater than zero".into(),
        ));
    }
    if amount > MAX_AMOUNT {
        return Err(AccountManagementError::InvalidInput(format!(
            "deposit amount must not exceed {}",
            MAX_AMOUNT
        )));
    }
    Ok(amount)
}
