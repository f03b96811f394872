use money_domain::{DepositRecord, DepositRequest, TransferRecord, TransferRequest};
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use crate::{
    balance_service::{BalanceOutcome, BalanceService},
    deposit_service::{DepositPolicy, DepositService},
    error::AccountManagementError,
    storage::MemoryRecordStore,
    time::{Clock, FixedClock},
    transfer_service::TransferService,
};

const IBAN: &str = "ES9121000418450200051332";
const OTHER_IBAN: &str = "ES9820385778983000760236";

fn clock() -> FixedClock {
    FixedClock::on(2025, 6, 1).expect("valid date")
}

fn is_sha256_hex(value: &str) -> bool {
    Regex::new(r"^[0-9a-f]{64}$").unwrap().is_match(value)
}

fn transactions() -> MemoryRecordStore {
    MemoryRecordStore::with_records(
        "transactions.json",
        vec![
            json!({"IBAN": IBAN, "amount": "100.50"}),
            json!({"IBAN": OTHER_IBAN, "amount": "20.00"}),
            json!({"IBAN": IBAN, "amount": -40.25}),
            json!({"IBAN": "ES3000491500051234567892", "amount": "-20.00"}),
            json!({"IBAN": "ES3000491500051234567892", "amount": "20.00"}),
        ],
    )
}

#[test]
fn balance_sums_matching_transactions_and_records_them() {
    let source = transactions();
    let balances = MemoryRecordStore::empty("balances.json");
    let clock = clock();
    let service = BalanceService::new(&source, &balances, &clock);

    let outcome = service.calculate(IBAN).expect("balance");
    let BalanceOutcome::Recorded(record) = outcome else {
        panic!("expected a recorded balance");
    };
    assert_eq!(record.amount, dec!(60.25));
    assert_eq!(record.date, clock.today());

    let stored = balances.snapshot().expect("balances exist");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["iban"], IBAN);
    assert_eq!(stored[0]["date"], "2025-06-01");
}

#[test]
fn balance_is_not_idempotent() {
    let source = transactions();
    let balances = MemoryRecordStore::empty("balances.json");
    let clock = clock();
    let service = BalanceService::new(&source, &balances, &clock);

    service.calculate(IBAN).expect("first");
    service.calculate(IBAN).expect("second");
    assert_eq!(balances.len(), 2);
}

#[test]
fn zero_balance_succeeds_without_writing() {
    let source = transactions();
    let balances = MemoryRecordStore::empty("balances.json");
    let clock = clock();
    let service = BalanceService::new(&source, &balances, &clock);

    let outcome = service
        .calculate("ES3000491500051234567892")
        .expect("zero balance");
    assert_eq!(outcome, BalanceOutcome::ZeroBalance);
    assert!(balances.is_empty());
}

#[test]
fn balance_rejects_invalid_iban() {
    let source = transactions();
    let balances = MemoryRecordStore::empty("balances.json");
    let clock = clock();
    let service = BalanceService::new(&source, &balances, &clock);

    let err = service.calculate("INVALID_IBAN").unwrap_err();
    assert!(matches!(err, AccountManagementError::InvalidInput(_)));
}

#[test]
fn balance_reports_missing_or_corrupt_source_as_not_found() {
    let balances = MemoryRecordStore::empty("balances.json");
    let clock = clock();

    let missing = MemoryRecordStore::missing("transactions.json");
    let err = BalanceService::new(&missing, &balances, &clock)
        .calculate(IBAN)
        .unwrap_err();
    assert!(matches!(err, AccountManagementError::NotFound(_)));

    let corrupt = MemoryRecordStore::corrupt("transactions.json", "not an array");
    let err = BalanceService::new(&corrupt, &balances, &clock)
        .calculate(IBAN)
        .unwrap_err();
    assert!(matches!(err, AccountManagementError::NotFound(_)));
}

#[test]
fn balance_rejects_unparseable_amount_anywhere_in_source() {
    let source = MemoryRecordStore::with_records(
        "transactions.json",
        vec![
            json!({"IBAN": IBAN, "amount": "10.00"}),
            json!({"IBAN": OTHER_IBAN, "amount": "ten"}),
        ],
    );
    let balances = MemoryRecordStore::empty("balances.json");
    let clock = clock();

    let err = BalanceService::new(&source, &balances, &clock)
        .calculate(IBAN)
        .unwrap_err();
    assert!(matches!(err, AccountManagementError::InvalidData(_)));
    assert!(balances.is_empty());
}

#[test]
fn balance_overflow_is_invalid_data() {
    let source = MemoryRecordStore::with_records(
        "transactions.json",
        vec![
            json!({"IBAN": IBAN, "amount": "50000000000000000000000000000"}),
            json!({"IBAN": IBAN, "amount": "5e28"}),
        ],
    );
    let balances = MemoryRecordStore::empty("balances.json");
    let clock = clock();

    let err = BalanceService::new(&source, &balances, &clock)
        .calculate(IBAN)
        .unwrap_err();
    assert!(matches!(err, AccountManagementError::InvalidData(_)));
    assert!(err.message().contains("overflow"));
    assert!(balances.is_empty());
}

#[test]
fn balance_without_matches_is_not_found() {
    let source = transactions();
    let balances = MemoryRecordStore::empty("balances.json");
    let clock = clock();

    let err = BalanceService::new(&source, &balances, &clock)
        .calculate("ES0000000000000000000001")
        .unwrap_err();
    assert!(matches!(err, AccountManagementError::NotFound(_)));
}

#[test]
fn balance_requires_existing_and_valid_balances_store() {
    let source = transactions();
    let clock = clock();

    let missing = MemoryRecordStore::missing("balances.json");
    let err = BalanceService::new(&source, &missing, &clock)
        .calculate(IBAN)
        .unwrap_err();
    assert!(matches!(err, AccountManagementError::NotFound(_)));

    let corrupt = MemoryRecordStore::corrupt("balances.json", "trailing characters");
    let err = BalanceService::new(&source, &corrupt, &clock)
        .calculate(IBAN)
        .unwrap_err();
    assert!(matches!(err, AccountManagementError::InvalidData(_)));
}

#[test]
fn deposit_returns_signature_and_appends_record() {
    let deposits = MemoryRecordStore::missing("deposits.json");
    let clock = clock();
    let service = DepositService::new(&deposits, &clock, DepositPolicy::default());

    let signature = service
        .process_json(r#"{"IBAN": "ES9121000418450200051332", "AMOUNT": "EUR 2500.00"}"#)
        .expect("deposit");
    assert!(is_sha256_hex(&signature));

    let stored = deposits.snapshot().expect("deposits created");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["alg"], "SHA-256");
    assert_eq!(stored[0]["type"], "DEPOSIT");
    assert_eq!(stored[0]["deposit_signature"], signature.as_str());

    let record: DepositRecord = serde_json::from_value(stored[0].clone()).expect("record");
    assert_eq!(record.compute_signature(), signature);
}

#[test]
fn high_precision_deposit_signature_recomputes_from_stored_record() {
    let deposits = MemoryRecordStore::empty("deposits.json");
    let clock = clock();
    let service = DepositService::new(&deposits, &clock, DepositPolicy::default());

    let signature = service
        .process(&DepositRequest::new(
            "ES9121000418450200051332",
            "EUR 12.345678901234567891",
        ))
        .expect("deposit");

    let stored = deposits.snapshot().expect("deposits created");
    let record: DepositRecord = serde_json::from_value(stored[0].clone()).expect("record");
    assert_eq!(record.compute_signature(), signature);
    assert!(record.has_valid_signature());
}

#[test]
fn deposit_repairs_corrupt_store() {
    let deposits = MemoryRecordStore::corrupt("deposits.json", "expected an array");
    let clock = clock();
    let service = DepositService::new(&deposits, &clock, DepositPolicy::default());

    service
        .process(&DepositRequest::new(IBAN, "EUR 100.00"))
        .expect("deposit");
    assert_eq!(deposits.len(), 1);
}

#[test]
fn deposit_validation_order() {
    let deposits = MemoryRecordStore::empty("deposits.json");
    let clock = clock();
    let service = DepositService::new(&deposits, &clock, DepositPolicy::default());

    let cases = [
        ("not a json", "valid JSON"),
        (r#"["ES9121000418450200051332"]"#, "IBAN and AMOUNT"),
        (r#"{"IBAN": "ES9121000418450200051332"}"#, "IBAN and AMOUNT"),
        (r#"{"IBAN": 12, "AMOUNT": "EUR 10.00"}"#, "IBAN and AMOUNT"),
        (r#"{"IBAN": "INVALID_IBAN", "AMOUNT": "EUR 100.00"}"#, "IBAN"),
        (r#"{"IBAN": "ES9121000418450200051332", "AMOUNT": "USD 100.00"}"#, "EUR"),
        (r#"{"IBAN": "ES9121000418450200051332", "AMOUNT": "EUR one hundred"}"#, "number"),
        (r#"{"IBAN": "ES9121000418450200051332", "AMOUNT": "EUR -100.00"}"#, "greater than zero"),
        (r#"{"IBAN": "ES9121000418450200051332", "AMOUNT": "EUR 15000.00"}"#, "exceed"),
    ];
    for (input, expected) in cases {
        let err = service.process_json(input).unwrap_err();
        assert!(
            err.message().contains(expected),
            "input {input} produced `{}`",
            err.message()
        );
    }
    assert!(deposits.is_empty());
}

#[test]
fn deposit_minimum_is_only_enforced_by_policy() {
    let clock = clock();
    let request = DepositRequest::new(IBAN, "EUR 5.00");

    let lenient_store = MemoryRecordStore::empty("deposits.json");
    DepositService::new(&lenient_store, &clock, DepositPolicy::default())
        .process(&request)
        .expect("small deposit accepted by default");

    let strict_store = MemoryRecordStore::empty("deposits.json");
    let service = DepositService::new(&strict_store, &clock, DepositPolicy::from_flags(true, true));
    assert!(service.process(&request).is_err());
    assert!(service
        .process(&DepositRequest::new(IBAN, "EUR 10.005"))
        .is_err());
    assert!(strict_store.is_empty());
}

fn transfer(amount: Decimal) -> TransferRequest {
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
fn transfer_returns_code_and_rejects_duplicate() {
    let transfers = MemoryRecordStore::missing("transfers.json");
    let clock = clock();
    let service = TransferService::new(&transfers, &clock);

    let code = service.process(&transfer(dec!(10.00))).expect("transfer");
    assert!(is_sha256_hex(&code));
    assert_eq!(code, transfer(dec!(10.00)).transfer_code());

    let err = service.process(&transfer(dec!(10.00))).unwrap_err();
    assert!(matches!(err, AccountManagementError::DuplicateRequest(_)));
    assert_eq!(transfers.len(), 1);

    let stored: TransferRecord =
        serde_json::from_value(transfers.snapshot().unwrap()[0].clone()).expect("record");
    assert_eq!(stored.transfer_code, code);
    assert_eq!(stored.transfer_concept, "text valid");
}

#[test]
fn distinct_transfers_get_distinct_codes() {
    let transfers = MemoryRecordStore::empty("transfers.json");
    let clock = clock();
    let service = TransferService::new(&transfers, &clock);

    let first = service.process(&transfer(dec!(10.00))).expect("first");
    let second = service.process(&transfer(dec!(10.01))).expect("second");
    assert_ne!(first, second);
    assert_eq!(transfers.len(), 2);
}

#[test]
fn transfer_reports_first_failing_field() {
    let transfers = MemoryRecordStore::empty("transfers.json");
    let clock = clock();
    let service = TransferService::new(&transfers, &clock);

    let mut request = transfer(dec!(9.99));
    request.from_iban = "15".into();
    request.concept = "textvalid".into();
    let err = service.process(&request).unwrap_err();
    assert!(err.message().contains("from_iban"));

    request.from_iban = "ES9121000418450200051001".into();
    let err = service.process(&request).unwrap_err();
    assert!(err.message().contains("concept"));

    request.concept = "text validd".into();
    request.transfer_type = "RANDOM".into();
    let err = service.process(&request).unwrap_err();
    assert!(err.message().contains("RANDOM"));

    request.transfer_type = "URGENT".into();
    request.date = "01/01/2024".into();
    let err = service.process(&request).unwrap_err();
    assert!(err.message().contains("year"));

    request.date = "31/12/2050".into();
    let err = service.process(&request).unwrap_err();
    assert!(err.message().contains("amount"));
    assert!(transfers.is_empty());
}

#[test]
fn transfer_treats_corrupt_store_as_empty() {
    let transfers = MemoryRecordStore::corrupt("transfers.json", "not json");
    let clock = clock();
    TransferService::new(&transfers, &clock)
        .process(&transfer(dec!(15.20)))
        .expect("transfer");
    assert_eq!(transfers.len(), 1);
}
