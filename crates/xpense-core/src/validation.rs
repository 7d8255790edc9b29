//! # Validation Module
//!
//! Write-path checks applied before an expense or settlement becomes an
//! immutable record.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser form                                                 │
//! │  ├── Money::parse on the typed amount                                  │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Expense::create / Settlement::create                         │
//! │  └── THIS MODULE: field rules, limits from LedgerPolicy                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Normalizer                                                   │
//! │  └── Structural invariants (non-empty participants, amount > 0)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeSet;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::UserId;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an expense description.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most `max_len` characters
///
/// ## Returns
/// The trimmed description.
///
/// ## Example
/// ```rust
/// use xpense_core::validation::validate_description;
///
/// assert_eq!(validate_description("  Groceries ", 200).unwrap(), "Groceries");
/// assert!(validate_description("   ", 200).is_err());
/// ```
pub fn validate_description(description: &str, max_len: usize) -> ValidationResult<String> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    if description.chars().count() > max_len {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: max_len,
        });
    }

    Ok(description.to_string())
}

/// Validates that a user id is present.
pub fn validate_user_id(id: &UserId, field: &str) -> ValidationResult<()> {
    if id.as_str().trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates that the two parties of a settlement differ.
pub fn validate_distinct_users(from: &UserId, to: &UserId) -> ValidationResult<()> {
    if from == to {
        return Err(ValidationError::SameUser {
            first: "fromUser".to_string(),
            second: "toUser".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a record amount.
///
/// ## Rules
/// - Must be at least one paisa
/// - Must not exceed `max`
pub fn validate_amount(amount: Money, max: Money, field: &str) -> ValidationResult<()> {
    if !amount.is_positive() || amount > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: max.paise(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates and deduplicates a participant list.
///
/// ## Rules
/// - At least one participant
/// - Every id non-empty
/// - At most `max` distinct participants
pub fn validate_participants(
    participants: Vec<UserId>,
    max: usize,
) -> ValidationResult<BTreeSet<UserId>> {
    if participants.is_empty() {
        return Err(ValidationError::Required {
            field: "participants".to_string(),
        });
    }

    for participant in &participants {
        validate_user_id(participant, "participant")?;
    }

    let unique: BTreeSet<UserId> = participants.into_iter().collect();
    if unique.len() > max {
        return Err(ValidationError::TooMany {
            field: "participants".to_string(),
            max,
        });
    }

    Ok(unique)
}

// =============================================================================
// Unit Tests
// =============================================================================
