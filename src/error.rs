// ⚠️ Calculation Errors
// Every public calculator returns one of these instead of panicking

use crate::dates::CalendarDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// ERROR KIND (serializable tag)
// ============================================================================

/// ErrorKind - The failure taxonomy shared by all calculators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidAmount,
    InvalidWeeks,
    InvalidTerm,
    InvalidDate,
    DateOrderError,
    ZeroDenominator,
}

impl ErrorKind {
    pub fn name(&self) -> &str {
        match self {
            ErrorKind::InvalidAmount => "InvalidAmount",
            ErrorKind::InvalidWeeks => "InvalidWeeks",
            ErrorKind::InvalidTerm => "InvalidTerm",
            ErrorKind::InvalidDate => "InvalidDate",
            ErrorKind::DateOrderError => "DateOrderError",
            ErrorKind::ZeroDenominator => "ZeroDenominator",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// CALC ERROR
// ============================================================================

/// CalcError - A local validation failure for one calculation call
///
/// Variants keep the offending raw input so the host can echo it back.
/// `Display` gives the message shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Please enter a valid amount greater than 0 (got {0:?})")]
    InvalidAmount(String),

    #[error("Remaining weeks must be a whole number greater than 0 (got {0:?})")]
    InvalidWeeks(String),

    #[error("Please select a valid lease term (got {0:?})")]
    InvalidTerm(String),

    #[error("Please enter valid dates in DD/MM/YYYY format (got {0:?})")]
    InvalidDate(String),

    #[error("Move out date ({move_out}) cannot be after end date ({end_date})")]
    DateOrder {
        move_out: CalendarDate,
        end_date: CalendarDate,
    },

    #[error("Three-quarter term of a {term_weeks}-week lease is zero")]
    ZeroDenominator { term_weeks: u32 },
}

impl CalcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CalcError::InvalidAmount(_) => ErrorKind::InvalidAmount,
            CalcError::InvalidWeeks(_) => ErrorKind::InvalidWeeks,
            CalcError::InvalidTerm(_) => ErrorKind::InvalidTerm,
            CalcError::InvalidDate(_) => ErrorKind::InvalidDate,
            CalcError::DateOrder { .. } => ErrorKind::DateOrderError,
            CalcError::ZeroDenominator { .. } => ErrorKind::ZeroDenominator,
        }
    }
}

/// CalculationResult - Success breakdown or a tagged failure
pub type CalculationResult<T> = Result<T, CalcError>;

// ============================================================================
// TESTS
// ============================================================================
