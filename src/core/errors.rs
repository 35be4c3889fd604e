// src/core/errors.rs

//! Defines the primary error type for the entire engine.

use std::num::ParseIntError;
use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all possible failures within the engine.
/// Using `thiserror` allows for clean error definitions and automatic `From` trait implementations.
#[derive(Error, Debug)]
pub enum SpinelKvError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Transaction has already been committed or rolled back")]
    TransactionClosed,

    #[error("Transaction is read-only")]
    TransactionNotWritable,

    #[error("Bucket not found")]
    BucketNotFound,

    #[error("Key not found")]
    KeyNotFound,

    /// A list key passed to a push operation contains the reserved separator.
    #[error("List key contains the reserved separator (|)")]
    SeparatorViolation,

    #[error("Count is out of range")]
    CountOutOfRange,

    #[error("Index is out of range")]
    IndexOutOfRange,

    #[error("Start or end of range is invalid")]
    InvalidRange,

    #[error("List is empty")]
    EmptyList,

    #[error("Failed to marshal command payload: {0}")]
    MarshalFailure(String),

    #[error("Malformed command record: {0}")]
    MalformedRecord(String),

    #[error("Command log is corrupted: {0}")]
    LogCorrupted(String),

    #[error("READONLY {0}")]
    ReadOnly(String),

    #[error("Internal Error: {0}")]
    Internal(String),
}

// Manual implementation of Clone because `std::io::Error` is not cloneable.
// We wrap it in an Arc to allow for cheap, shared cloning.
impl Clone for SpinelKvError {
    fn clone(&self) -> Self {
        match self {
            SpinelKvError::Io(e) => SpinelKvError::Io(Arc::clone(e)),
            SpinelKvError::TransactionClosed => SpinelKvError::TransactionClosed,
            SpinelKvError::TransactionNotWritable => SpinelKvError::TransactionNotWritable,
            SpinelKvError::BucketNotFound => SpinelKvError::BucketNotFound,
            SpinelKvError::KeyNotFound => SpinelKvError::KeyNotFound,
            SpinelKvError::SeparatorViolation => SpinelKvError::SeparatorViolation,
            SpinelKvError::CountOutOfRange => SpinelKvError::CountOutOfRange,
            SpinelKvError::IndexOutOfRange => SpinelKvError::IndexOutOfRange,
            SpinelKvError::InvalidRange => SpinelKvError::InvalidRange,
            SpinelKvError::EmptyList => SpinelKvError::EmptyList,
            SpinelKvError::MarshalFailure(s) => SpinelKvError::MarshalFailure(s.clone()),
            SpinelKvError::MalformedRecord(s) => SpinelKvError::MalformedRecord(s.clone()),
            SpinelKvError::LogCorrupted(s) => SpinelKvError::LogCorrupted(s.clone()),
            SpinelKvError::ReadOnly(s) => SpinelKvError::ReadOnly(s.clone()),
            SpinelKvError::Internal(s) => SpinelKvError::Internal(s.clone()),
        }
    }
}

impl PartialEq for SpinelKvError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SpinelKvError::Io(e1), SpinelKvError::Io(e2)) => e1.to_string() == e2.to_string(),
            (SpinelKvError::MarshalFailure(s1), SpinelKvError::MarshalFailure(s2)) => s1 == s2,
            (SpinelKvError::MalformedRecord(s1), SpinelKvError::MalformedRecord(s2)) => s1 == s2,
            (SpinelKvError::LogCorrupted(s1), SpinelKvError::LogCorrupted(s2)) => s1 == s2,
            (SpinelKvError::ReadOnly(s1), SpinelKvError::ReadOnly(s2)) => s1 == s2,
            (SpinelKvError::Internal(s1), SpinelKvError::Internal(s2)) => s1 == s2,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for SpinelKvError {
    fn from(e: std::io::Error) -> Self {
        SpinelKvError::Io(Arc::new(e))
    }
}

impl From<ParseIntError> for SpinelKvError {
    fn from(e: ParseIntError) -> Self {
        SpinelKvError::MalformedRecord(format!("invalid integer field: {e}"))
    }
}

impl From<std::str::Utf8Error> for SpinelKvError {
    fn from(e: std::str::Utf8Error) -> Self {
        SpinelKvError::MalformedRecord(format!("invalid utf-8 field: {e}"))
    }
}

impl From<bincode::error::EncodeError> for SpinelKvError {
    fn from(e: bincode::error::EncodeError) -> Self {
        SpinelKvError::MarshalFailure(e.to_string())
    }
}

impl From<bincode::error::DecodeError> for SpinelKvError {
    fn from(e: bincode::error::DecodeError) -> Self {
        SpinelKvError::MalformedRecord(format!("invalid index set: {e}"))
    }
}
