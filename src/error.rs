//! Error types for calendar calculations and argument handling.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GestcalError {
    /// Missing, unparsable or out-of-range date input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Visit table that breaks ordering or offset rules.
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),
}

pub type Result<T> = std::result::Result<T, GestcalError>;
