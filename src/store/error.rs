//! Waitlist store error types

use thiserror::Error;

/// Errors that can occur in the waitlist store
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O operation failed (creating the data directory)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite rejected a statement
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A new entry failed presence or length checks
    #[error("Validation error: {0}")]
    Validation(String),

    /// No entry with the requested id
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// A stored row could not be decoded
    #[error("Corrupt data: {0}")]
    Corruption(String),

    /// The connection mutex was poisoned by a panicking writer
    #[error("Lock error: {0}")]
    Lock(String),

    /// A blocking store task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
