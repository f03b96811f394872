//! Business rules shared by the balance, deposit and transfer operations.
//!
//! The predicates here never touch storage. IBAN checking returns a plain `bool`;
//! everything else returns [`AccountManagementError::InvalidInput`] describing the
//! first rule that failed.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use money_domain::TransferType;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{AccountManagementError, Result};

pub const IBAN_COUNTRY_CODE: &str = "ES";
pub const IBAN_LENGTH: usize = 24;

pub const MIN_TRANSFER_AMOUNT: Decimal = dec!(10.00);
pub const MAX_AMOUNT: Decimal = dec!(10000.00);
pub const MAX_FRACTION_DIGITS: u32 = 2;

pub const CONCEPT_MIN_CHARS: usize = 10;
pub const CONCEPT_MAX_CHARS: usize = 30;

pub const TRANSFER_DATE_FORMAT: &str = "%d/%m/%Y";
pub const MIN_TRANSFER_YEAR: i32 = 2025;
pub const MAX_TRANSFER_YEAR: i32 = 2050;

/// Spanish IBAN shape check: `ES` followed by 22 decimal digits. No mod-97 checksum.
pub fn validate_iban(iban: &str) -> bool {
    iban.len() == IBAN_LENGTH
        && iban.starts_with(IBAN_COUNTRY_CODE)
        && iban[IBAN_COUNTRY_CODE.len()..]
            .chars()
            .all(|c| c.is_ascii_digit())
}

/// Parses plain (`12.50`) or scientific (`1.25e1`) decimal notation.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Parses a textual amount for operations that take a numeric value.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    parse_decimal(raw).ok_or_else(|| {
        AccountManagementError::InvalidInput(format!("amount `{}` is not a number", raw))
    })
}

/// Number of significant fractional digits, so `10.10` counts as one.
pub fn fraction_digits(amount: &Decimal) -> u32 {
    amount.normalize().scale()
}

pub fn ensure_iban(field: &str, iban: &str) -> Result<()> {
    if validate_iban(iban) {
        Ok(())
    } else {
        Err(AccountManagementError::InvalidInput(format!(
            "{} `{}` is not a valid IBAN",
            field, iban
        )))
    }
}

/// Concepts hold 10 to 30 characters, at least two words, and only letters, digits and spaces.
pub fn validate_concept(concept: &str) -> Result<()> {
    let length = concept.chars().count();
    if !(CONCEPT_MIN_CHARS..=CONCEPT_MAX_CHARS).contains(&length) {
        return Err(AccountManagementError::InvalidInput(format!(
            "concept must be between {} and {} characters long, got {}",
            CONCEPT_MIN_CHARS, CONCEPT_MAX_CHARS, length
        )));
    }
    if !concept
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ')
    {
        return Err(AccountManagementError::InvalidInput(
            "concept may only contain letters, digits and spaces".into(),
        ));
    }
    if concept.split_whitespace().count() < 2 {
        return Err(AccountManagementError::InvalidInput(
            "concept must contain at least two words".into(),
        ));
    }
    Ok(())
}

pub fn validate_transfer_type(value: &str) -> Result<TransferType> {
    TransferType::from_str(value).map_err(|err| {
        AccountManagementError::InvalidInput(format!(
            "{}; expected one of ORDINARY, URGENT, IMMEDIATE",
            err
        ))
    })
}

/// Accepts `DD/MM/YYYY` dates between 2025 and 2050 that are not earlier than `today`.
pub fn validate_transfer_date(value: &str, today: NaiveDate) -> Result<NaiveDate> {
    if !has_date_shape(value) {
        return Err(AccountManagementError::InvalidInput(format!(
            "date `{}` must use the DD/MM/YYYY format",
            value
        )));
    }
    let date = NaiveDate::parse_from_str(value, TRANSFER_DATE_FORMAT).map_err(|_| {
        AccountManagementError::InvalidInput(format!("date `{}` is not a calendar date", value))
    })?;
    if !(MIN_TRANSFER_YEAR..=MAX_TRANSFER_YEAR).contains(&date.year()) {
        return Err(AccountManagementError::InvalidInput(format!(
            "year must be between {} and {}",
            MIN_TRANSFER_YEAR, MAX_TRANSFER_YEAR
        )));
    }
    if date < today {
        return Err(AccountManagementError::InvalidInput(format!(
            "date `{}` is in the past",
            value
        )));
    }
    Ok(date)
}

fn has_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(idx, byte)| match idx {
            2 | 5 => *byte == b'/',
            _ => byte.is_ascii_digit(),
        })
}

/// Transfer amounts: 10.00 to 10000.00 inclusive with at most two decimals.
pub fn validate_transfer_amount(amount: &Decimal) -> Result<()> {
    ensure_precision(amount)?;
    if *amount < MIN_TRANSFER_AMOUNT || *amount > MAX_AMOUNT {
        return Err(AccountManagementError::InvalidInput(format!(
            "amount must be between {} and {}, got {}",
            MIN_TRANSFER_AMOUNT, MAX_AMOUNT, amount
        )));
    }
    Ok(())
}

pub fn ensure_precision(amount: &Decimal) -> Result<()> {
    if fraction_digits(amount) > MAX_FRACTION_DIGITS {
        return Err(AccountManagementError::InvalidInput(format!(
            "amount {} has more than {} decimal places",
            amount, MAX_FRACTION_DIGITS
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn iban_shape_rules() {
        assert!(validate_iban("ES9121000418450200051332"));
        assert!(!validate_iban("INVALID_IBAN"));
        assert!(!validate_iban("DE9121000418450200051332"));
        assert!(!validate_iban("ES912100041845020005133"));
        assert!(!validate_iban("ES91210004184502000513321"));
        assert!(!validate_iban("ES91210004184502000513X2"));
        assert!(!validate_iban(""));
    }

    #[test]
    fn iban_with_multibyte_characters_is_rejected() {
        assert!(!validate_iban("ESé12100041845020005133"));
    }

    #[test]
    fn concept_rules() {
        assert!(validate_concept("text validd").is_ok());
        assert!(validate_concept("text valid").is_ok());
        assert!(validate_concept("textvalidxx").is_err());
        assert!(validate_concept("textvalid").is_err());
        assert!(validate_concept("random te").is_err());
        assert!(validate_concept("text invaliddddddddddddddddddddd").is_err());
        assert!(validate_concept("text valid**").is_err());
        assert!(validate_concept("text validddddddddddddddddddd").is_ok());
    }

    #[test]
    fn transfer_type_rules() {
        assert_eq!(validate_transfer_type("ORDINARY"), Ok(TransferType::Ordinary));
        assert_eq!(validate_transfer_type("IMMEDIATE"), Ok(TransferType::Immediate));
        assert!(validate_transfer_type("RANDOM").is_err());
        assert!(validate_transfer_type("15").is_err());
    }

    #[test]
    fn date_rules() {
        assert!(validate_transfer_date("31/12/2050", today()).is_ok());
        assert!(validate_transfer_date("01/06/2025", today()).is_ok());
        assert!(validate_transfer_date("31/05/2025", today()).is_err());
        assert!(validate_transfer_date("01/13/2026", today()).is_err());
        assert!(validate_transfer_date("02/31/2026", today()).is_err());
        assert!(validate_transfer_date("00/01/2026", today()).is_err());
        assert!(validate_transfer_date("32/01/2026", today()).is_err());
        assert!(validate_transfer_date("01/00/2026", today()).is_err());
        assert!(validate_transfer_date("01/01/2024", today()).is_err());
        assert!(validate_transfer_date("01/01/2051", today()).is_err());
        assert!(validate_transfer_date("1/2/2026", today()).is_err());
        assert!(validate_transfer_date("15", today()).is_err());
    }

    #[test]
    fn amount_rules() {
        assert!(validate_transfer_amount(&dec!(10.00)).is_ok());
        assert!(validate_transfer_amount(&dec!(10000.00)).is_ok());
        assert!(validate_transfer_amount(&dec!(15.2)).is_ok());
        assert!(validate_transfer_amount(&dec!(9.99)).is_err());
        assert!(validate_transfer_amount(&dec!(10000.01)).is_err());
        assert!(validate_transfer_amount(&dec!(10.001)).is_err());
        assert!(validate_transfer_amount(&dec!(10.100)).is_ok());
    }

    #[test]
    fn parse_amount_accepts_plain_and_scientific_notation() {
        assert_eq!(parse_amount("2500.00"), Ok(dec!(2500.00)));
        assert_eq!(parse_amount(" 12.5 "), Ok(dec!(12.5)));
        assert_eq!(parse_amount("1.25e1"), Ok(dec!(12.5)));
        assert!(parse_amount("text").is_err());
        assert!(parse_amount("").is_err());
    }
}
