#![allow(dead_code)]

use std::{fs, path::Path};

use serde_json::{json, Value};
use tempfile::TempDir;

pub const IBAN: &str = "ES9121000418450200051332";
pub const ZERO_IBAN: &str = "ES3000491500051234567892";
pub const UNKNOWN_IBAN: &str = "ES7620770024003102575766";

/// Creates a data directory with a transaction source and an empty balances store.
pub fn seeded_data_dir() -> TempDir {
    let temp = TempDir::new().expect("create temp dir");
    write_json(
        &temp.path().join("transactions.json"),
        &json!([
            {"IBAN": IBAN, "amount": "1500.00"},
            {"IBAN": IBAN, "amount": "-250.50"},
            {"IBAN": "ES9820385778983000760236", "amount": "75.00"},
            {"IBAN": ZERO_IBAN, "amount": "100.00"},
            {"IBAN": ZERO_IBAN, "amount": "-100.00"}
        ]),
    );
    write_json(&temp.path().join("balances.json"), &json!([]));
    temp
}

pub fn write_json(path: &Path, value: &Value) {
    let data = serde_json::to_string_pretty(value).expect("serialize fixture");
    fs::write(path, data).expect("write fixture");
}

pub fn read_array(path: &Path) -> Vec<Value> {
    let data = fs::read_to_string(path).expect("read store");
    serde_json::from_str(&data).expect("store is a JSON array")
}
