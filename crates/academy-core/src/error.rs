//! Domain error types.
//!
//! Validation failures that callers are expected to match on (for example to
//! show "please select date range" instead of a generic failure) are typed
//! here. File and parse failures use `anyhow` with context instead.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by the academy engine and its report/invoice workflows.
#[derive(Debug, Error, PartialEq)]
pub enum AcademyError {
    /// An amount to be written in words was negative.
    #[error("amount must not be negative, got {0}")]
    NegativeAmount(f64),

    /// An amount to be written in words was NaN or infinite.
    #[error("amount must be a finite number")]
    NonFiniteAmount,

    /// An amount to be written in words does not fit in `u64`.
    #[error("amount is too large to write in words: {0}")]
    AmountTooLarge(f64),

    /// One or both ends of the report date range were not provided.
    #[error("please select date range")]
    MissingDateRange,

    /// The date range ends before it starts.
    #[error("invalid date range: {to} is before {from}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    /// The roster for the selected batch has no students.
    #[error("no students found for selected batch")]
    EmptyRoster,

    /// The selected session id does not exist.
    #[error("selected session not found: {0}")]
    SessionNotFound(u32),

    /// Neither a single session nor the summary was selected.
    #[error("please select a session or summary option")]
    NoSelection,

    /// The selected data has no result rows to analyse.
    #[error("no assessment results to analyse")]
    NoResults,

    /// An invoice line item could not be parsed.
    #[error("invalid line item '{0}', expected \"description=amount\"")]
    InvalidLineItem(String),
}

impl AcademyError {
    /// Returns `true` if the error comes from incomplete report filters
    /// rather than from the data itself.
    pub fn is_filter_error(&self) -> bool {
        matches!(
            self,
            AcademyError::MissingDateRange
                | AcademyError::InvalidDateRange { .. }
                | AcademyError::NoSelection
        )
    }
}
