//! # Error Types
//!
//! Domain-specific error types for xpense-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  xpense-core errors (this file)                                        │
//! │  ├── AmountError      - Money parsing / non-positive amounts           │
//! │  ├── LedgerError      - Normalizer and query failures                  │
//! │  ├── ValidationError  - Write-path field checks                        │
//! │  └── SourceError      - Record source failures                         │
//! │                                                                         │
//! │  xpense-cli errors (app)                                               │
//! │  └── ConfigError / anyhow at the binary edge                           │
//! │                                                                         │
//! │  Flow: AmountError → LedgerError → SourceError → CLI                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (record id, user id, input)
//! 3. Errors are enum variants, never String
//! 4. Every core error is local and non-retryable: it means malformed input

use thiserror::Error;

use crate::money::Money;
use crate::types::UserId;

// =============================================================================
// Amount Error
// =============================================================================

/// Why an amount was rejected.
///
/// Every variant is an `InvalidAmount` condition: the system never represents
/// a zero or negative user-entered amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Nothing numeric survived cleaning (e.g. `"abc"`, `"₹"`).
    #[error("'{0}' contains no digits")]
    NoDigits(String),

    /// More than one decimal separator (e.g. `"1.2.3"`).
    #[error("'{0}' has more than one decimal separator")]
    MultipleSeparators(String),

    /// A minus sign was present.
    #[error("'{0}' is negative")]
    Negative(String),

    /// NaN or infinity.
    #[error("{0} is not a finite number")]
    NotFinite(String),

    /// Value does not fit in i64 paise.
    #[error("'{0}' is too large")]
    Overflow(String),

    /// Value is zero (or rounds to zero paise) or below.
    #[error("amount must be greater than zero, got {0}")]
    NotPositive(Money),
}

// =============================================================================
// Ledger Error
// =============================================================================

/// Errors raised while normalizing records or answering ledger queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// An amount failed parsing or is not strictly positive.
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// An expense has no participants.
    ///
    /// ## When This Occurs
    /// - A record source hands over an expense with an empty participant set
    ///
    /// The expense is rejected before aggregation instead of being skipped,
    /// so money never silently disappears from the ledger.
    #[error("Expense {expense_id} has no participants")]
    EmptyParticipantSet { expense_id: String },

    /// `balance_with` was asked about someone who never shared a transfer
    /// with the observer. A settled friend returns zero instead.
    #[error("No recorded history between {observer} and {friend_id}")]
    UnknownFriend { observer: UserId, friend_id: UserId },

    /// A settlement names the same user on both sides.
    #[error("Settlement {settlement_id} has {user_id} paying themselves")]
    SelfSettlement {
        settlement_id: String,
        user_id: UserId,
    },

    /// The records add up to more paise than an i64 holds.
    ///
    /// Checked once over every transfer amount, which bounds every balance
    /// and total derived from them.
    #[error("Ledger amounts exceed the representable range")]
    AmountOverflow,

    /// Write-path validation failure (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level validation errors for new expenses and settlements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Collection has too many entries.
    #[error("{field} cannot have more than {max} entries")]
    TooMany { field: String, max: usize },

    /// Two fields that must differ hold the same value.
    #[error("{first} and {second} must be different users")]
    SameUser { first: String, second: String },
}

// =============================================================================
// Source Error
// =============================================================================

/// Failures reported by a [`crate::source::RecordSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    /// The backing store could not be read.
    #[error("Record source unavailable: {0}")]
    Unavailable(String),

    /// The store returned records that could not be decoded.
    #[error("Malformed records: {0}")]
    Malformed(String),

    /// Records were read but violate ledger rules.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Convenience type alias for record source Results.
pub type SourceResult<T> = Result<T, SourceError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LedgerError::EmptyParticipantSet {
            expense_id: "exp-1".to_string(),
        };
        assert_eq!(err.to_string(), "Expense exp-1 has no participants");

        let err = LedgerError::UnknownFriend {
            observer: UserId::from("u1"),
            friend_id: UserId::from("u9"),
        };
        assert_eq!(err.to_string(), "No recorded history between u1 and u9");
    }

    #[test]
    fn test_amount_error_messages() {
        let err = AmountError::NotPositive(Money::zero());
        assert_eq!(err.to_string(), "amount must be greater than zero, got ₹0.00");

        let err = AmountError::MultipleSeparators("1.2.3".to_string());
        assert_eq!(err.to_string(), "'1.2.3' has more than one decimal separator");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "description".to_string(),
        };
        assert_eq!(err.to_string(), "description is required");

        let err = ValidationError::TooMany {
            field: "participants".to_string(),
            max: 50,
        };
        assert_eq!(err.to_string(), "participants cannot have more than 50 entries");
    }

    #[test]
    fn test_conversions_into_ledger_error() {
        let err: LedgerError = AmountError::Negative("-5".to_string()).into();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));

        let err: LedgerError = ValidationError::Required {
            field: "payer".to_string(),
        }
        .into();
        assert!(matches!(err, LedgerError::Validation(_)));

        let source_err: SourceError = err.into();
        assert!(matches!(source_err, SourceError::Ledger(_)));
    }
}
