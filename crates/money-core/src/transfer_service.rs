use money_domain::{TransferRecord, TransferRequest};

use crate::{
    error::{AccountManagementError, Result},
    storage::RecordStore,
    time::Clock,
    validation::{
        ensure_iban, validate_concept, validate_transfer_amount, validate_transfer_date,
        validate_transfer_type,
    },
};

/// Field of a stored transfer that identifies it.
pub const TRANSFER_KEY: &str = "transfer_code";

/// Validates transfer requests and stores each distinct one exactly once.
pub struct TransferService<'a> {
    transfers: &'a dyn RecordStore,
    clock: &'a dyn Clock,
}

impl<'a> TransferService<'a> {
    pub fn new(transfers: &'a dyn RecordStore, clock: &'a dyn Clock) -> Self {
        Self { transfers, clock }
    }

    /// Stores the transfer and returns its code.
    ///
    /// Two requests with identical business fields share a code, so the second one is
    /// rejected as a duplicate whatever time it was issued.
    pub fn process(&self, request: &TransferRequest) -> Result<String> {
        let record = self.validate(request)?;
        let value = serde_json::to_value(&record)
            .map_err(|err| AccountManagementError::Storage(err.to_string()))?;

        let appended = self
            .transfers
            .append_if_absent(value, TRANSFER_KEY)
            .map_err(|err| AccountManagementError::Storage(err.to_string()))?;
        if !appended {
            tracing::warn!(code = %record.transfer_code, "duplicate transfer rejected");
            return Err(AccountManagementError::DuplicateRequest(format!(
                "transfer {} already exists",
                record.transfer_code
            )));
        }

        tracing::info!(
            from = %record.from_iban,
            to = %record.to_iban,
            amount = %record.transfer_amount,
            code = %record.transfer_code,
            "transfer recorded"
        );
        Ok(record.transfer_code)
    }

    /// Runs every field rule in order and builds the record without touching storage.
    pub fn validate(&self, request: &TransferRequest) -> Result<TransferRecord> {
        ensure_iban("from_iban", &request.from_iban)?;
        ensure_iban("to_iban", &request.to_iban)?;
        validate_concept(&request.concept)?;
        let transfer_type = validate_transfer_type(&request.transfer_type)?;
        validate_transfer_date(&request.date, self.clock.today())?;
        validate_transfer_amount(&request.amount)?;
        Ok(TransferRecord::from_request(
            request,
            transfer_type,
            self.clock.epoch_seconds(),
        ))
    }
}
