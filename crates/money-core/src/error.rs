use thiserror::Error;

/// Every failure surfaced by the account operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountManagementError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Duplicate request: {0}")]
    DuplicateRequest(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AccountManagementError {
    /// Human-readable message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            AccountManagementError::InvalidInput(message)
            | AccountManagementError::NotFound(message)
            | AccountManagementError::InvalidData(message)
            | AccountManagementError::DuplicateRequest(message)
            | AccountManagementError::Storage(message) => message,
        }
    }
}

pub type Result<T> = std::result::Result<T, AccountManagementError>;
