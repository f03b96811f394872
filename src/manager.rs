use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use money_config::Config;
use money_core::{
    storage::RecordStore,
    time::{Clock, SystemClock},
    validation::{parse_amount, validate_iban},
    AccountManagementError, BalanceOutcome, BalanceService, DepositPolicy, DepositService,
    Result, TransferService,
};
use money_domain::TransferRequest;
use money_storage_json::JsonRecordStore;
use rust_decimal::Decimal;

/// The four stores an [`AccountManager`] reads from and appends to.
pub struct AccountStores {
    /// Read-only source of `{IBAN, amount}` movements.
    pub transactions: Box<dyn RecordStore>,
    pub balances: Box<dyn RecordStore>,
    pub deposits: Box<dyn RecordStore>,
    pub transfers: Box<dyn RecordStore>,
}

impl AccountStores {
    /// JSON files laid out as described by `config`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            transactions: Box::new(JsonRecordStore::new(config.transactions_path())),
            balances: Box::new(JsonRecordStore::new(config.balances_path())),
            deposits: Box::new(JsonRecordStore::new(config.deposits_path())),
            transfers: Box::new(JsonRecordStore::new(config.transfers_path())),
        }
    }
}

/// Facade that wires stores, clock and deposit policy to the account services.
pub struct AccountManager {
    stores: AccountStores,
    clock: Box<dyn Clock>,
    deposit_policy: DepositPolicy,
}

impl AccountManager {
    pub fn new(stores: AccountStores, clock: Box<dyn Clock>, deposit_policy: DepositPolicy) -> Self {
        Self {
            stores,
            clock,
            deposit_policy,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        tracing::debug!(data_dir = %config.resolve_data_dir().display(), "opening stores");
        Self::new(
            AccountStores::from_config(config),
            Box::new(SystemClock),
            DepositPolicy::from_flags(
                config.deposit.enforce_minimum,
                config.deposit.enforce_precision,
            ),
        )
    }

    /// Default store names inside `dir`, default deposit policy.
    pub fn with_data_dir(dir: impl Into<PathBuf>) -> Self {
        let config = Config {
            data_dir: Some(dir.into()),
            ..Config::default()
        };
        Self::from_config(&config)
    }

    pub fn deposit_policy(&self) -> &DepositPolicy {
        &self.deposit_policy
    }

    pub fn validate_iban(iban: &str) -> bool {
        validate_iban(iban)
    }

    pub fn calculate_balance(&self, iban: &str) -> Result<BalanceOutcome> {
        BalanceService::new(
            self.stores.transactions.as_ref(),
            self.stores.balances.as_ref(),
            self.clock.as_ref(),
        )
        .calculate(iban)
    }

    /// Reads a deposit instruction file and records the deposit, returning its signature.
    pub fn deposit_into_account(&self, input: &Path) -> Result<String> {
        let raw = read_deposit_input(input)?;
        DepositService::new(
            self.stores.deposits.as_ref(),
            self.clock.as_ref(),
            self.deposit_policy.clone(),
        )
        .process_json(&raw)
    }

    /// Records a transfer and returns its transfer code.
    pub fn transfer_request(
        &self,
        from_iban: &str,
        to_iban: &str,
        concept: &str,
        transfer_type: &str,
        date: &str,
        amount: Decimal,
    ) -> Result<String> {
        let request =
            TransferRequest::new(from_iban, to_iban, concept, transfer_type, date, amount);
        TransferService::new(self.stores.transfers.as_ref(), self.clock.as_ref()).process(&request)
    }

    /// Same as [`Self::transfer_request`] with the amount given as text.
    ///
    /// Field rules still run in order, so a bad IBAN is reported before a bad amount.
    pub fn transfer_request_str(
        &self,
        from_iban: &str,
        to_iban: &str,
        concept: &str,
        transfer_type: &str,
        date: &str,
        amount: &str,
    ) -> Result<String> {
        let service = TransferService::new(self.stores.transfers.as_ref(), self.clock.as_ref());
        let parsed = match parse_amount(amount) {
            Ok(value) => value,
            Err(err) => {
                let probe = TransferRequest::new(
                    from_iban,
                    to_iban,
                    concept,
                    transfer_type,
                    date,
                    Decimal::ONE_HUNDRED,
                );
                service.validate(&probe)?;
                return Err(err);
            }
        };
        self.transfer_request(from_iban, to_iban, concept, transfer_type, date, parsed)
    }
}

fn read_deposit_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => AccountManagementError::NotFound(format!(
            "deposit input `{}` not found",
            path.display()
        )),
        ErrorKind::InvalidData => AccountManagementError::InvalidData(format!(
            "deposit input `{}` is not valid JSON",
            path.display()
        )),
        _ => AccountManagementError::NotFound(format!(
            "deposit input `{}` cannot be read: {}",
            path.display(),
            err
        )),
    })
}
