//! # Ledger Policy
//!
//! The tunable rules of a ledger: how expenses are split and what the write
//! path accepts.
//!
//! ## Payer Share Modes
//! ```text
//! Expense ₹900, payer U1, participants [U2, U3]
//!
//! AsRecorded (default)          AlwaysIncludePayer
//! ─────────────────────         ──────────────────────────
//! split over [U2, U3]           split over [U1, U2, U3]
//! U2 → U1 ₹450                  U2 → U1 ₹300
//! U3 → U1 ₹450                  U3 → U1 ₹300
//!                               (U1's ₹300 is self-owed)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::money::{DigitGrouping, Money, CURRENCY_SYMBOL};
use crate::{MAX_DESCRIPTION_LEN, MAX_EXPENSE_RUPEES, MAX_PARTICIPANTS};

/// Whether the payer is part of the split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayerShare {
    /// Split over the participants exactly as recorded.
    #[default]
    AsRecorded,
    /// Add the payer to the participants before splitting.
    AlwaysIncludePayer,
}

impl fmt::Display for PayerShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayerShare::AsRecorded => write!(f, "as_recorded"),
            PayerShare::AlwaysIncludePayer => write!(f, "always_include_payer"),
        }
    }
}

impl FromStr for PayerShare {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "as_recorded" | "recorded" => Ok(PayerShare::AsRecorded),
            "always_include_payer" | "include_payer" => Ok(PayerShare::AlwaysIncludePayer),
            other => Err(format!(
                "Unknown payer share mode: '{}'. Valid options: as_recorded, always_include_payer",
                other
            )),
        }
    }
}

/// Ledger rules.
///
/// ## Defaults
/// - Payer share: as recorded
/// - Max expense: ₹10,00,000
/// - Max participants: 50
/// - Max description: 200 characters
/// - Display: `₹`, Indian grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerPolicy {
    pub payer_share: PayerShare,

    /// Largest amount a single expense or settlement may carry.
    pub max_expense_amount: Money,

    pub max_participants: usize,

    pub max_description_len: usize,

    pub currency_symbol: String,

    pub grouping: DigitGrouping,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        LedgerPolicy {
            payer_share: PayerShare::AsRecorded,
            max_expense_amount: Money::from_rupees(MAX_EXPENSE_RUPEES),
            max_participants: MAX_PARTICIPANTS,
            max_description_len: MAX_DESCRIPTION_LEN,
            currency_symbol: CURRENCY_SYMBOL.to_string(),
            grouping: DigitGrouping::Indian,
        }
    }
}

impl LedgerPolicy {
    /// Formats an amount with this policy's symbol and grouping.
    pub fn display(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol, self.grouping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = LedgerPolicy::default();
        assert_eq!(policy.payer_share, PayerShare::AsRecorded);
        assert_eq!(policy.max_expense_amount.paise(), 100_000_000);
        assert_eq!(policy.max_participants, 50);
        assert_eq!(policy.display(Money::from_rupees(150_000)), "₹1,50,000.00");
    }

    #[test]
    fn test_payer_share_parsing() {
        assert_eq!("as_recorded".parse::<PayerShare>(), Ok(PayerShare::AsRecorded));
        assert_eq!(
            "always-include-payer".parse::<PayerShare>(),
            Ok(PayerShare::AlwaysIncludePayer)
        );
        assert!("sometimes".parse::<PayerShare>().is_err());
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let policy: LedgerPolicy =
            serde_json::from_str(r#"{"payer_share": "always_include_payer", "grouping": "western"}"#)
                .unwrap();
        assert_eq!(policy.payer_share, PayerShare::AlwaysIncludePayer);
        assert_eq!(policy.grouping, DigitGrouping::Western);
        assert_eq!(policy.max_participants, MAX_PARTICIPANTS);
        assert_eq!(policy.display(Money::from_rupees(150_000)), "₹150,000.00");
    }
}
