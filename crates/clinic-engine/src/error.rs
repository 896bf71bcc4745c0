//! Error types for clinic-engine operations.
//!
//! Scheduling conflicts are deliberately NOT errors — availability checks
//! report a boolean and the caller decides whether a conflict is fatal.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Slot duration must be a positive number of minutes")]
    InvalidSlotDuration,

    #[error("Invalid line item at position {index}: {reason}")]
    InvalidLineItem { index: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, ClinicError>;
