//! # xpense-core: Pure Ledger Logic for EasyXpense
//!
//! This crate turns a user's shared expenses and settlements into per-friend
//! net balances. Everything here is a pure function of the records it is
//! handed: no I/O, no clock reads on the query path, no shared state.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        EasyXpense Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation (browser client, xpense CLI)          │   │
//! │  │    Dashboard ──► Friends ──► Expense list ──► Settle up        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ LedgerSnapshot                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ xpense-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌──────────┐  │   │
//! │  │   │   money   │  │ normalizer │  │  balance  │  │  ledger  │  │   │
//! │  │   │   Money   │─►│  Transfer  │─►│ Balances  │─►│  facade  │  │   │
//! │  │   │ parse/fmt │  │   splits   │  │ Pairwise  │  │ queries  │  │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────▲───────────────────────────────────┘   │
//! │                                │ RecordSource                           │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │           Record store (REST backend, JSON snapshot file)       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money in paise, parsing and Indian/Western formatting
//! - [`types`] - Records (Expense, Settlement) and derived Transfers
//! - [`normalizer`] - Expense splitting into Transfers
//! - [`balance`] - Observer and all-pairs balance folds
//! - [`ledger`] - Query facade
//! - [`source`] - Record-source boundary
//! - [`policy`] - Split mode, limits, display currency
//! - [`validation`] - Write-path rules
//! - [`error`] - Error types
//!
//! ## Design Principles
//!
//! 1. **Integer Money**: all amounts are paise (i64); floats only at the parse boundary
//! 2. **Lossless Splits**: shares always sum to the expense amount
//! 3. **Recompute, Don't Mutate**: balances are derived fresh on every query
//! 4. **Explicit Errors**: malformed records fail the query, never get skipped
//!
//! ## Example Usage
//!
//! ```rust
//! use xpense_core::{Expense, Ledger, Money, UserId};
//! use chrono::Utc;
//!
//! let dinner = Expense {
//!     id: "e1".to_string(),
//!     description: "Dinner".to_string(),
//!     amount: Money::parse("₹900").unwrap(),
//!     payer_id: UserId::from("u1"),
//!     participant_ids: ["u1", "u2", "u3"].into_iter().map(UserId::from).collect(),
//!     date: Utc::now(),
//! };
//!
//! let expenses = [dinner];
//! let ledger = Ledger::new(&expenses, &[]);
//! let me = UserId::from("u1");
//!
//! assert_eq!(ledger.total_owed(&me).unwrap().to_string(), "₹600.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod balance;
pub mod error;
pub mod ledger;
pub mod money;
pub mod normalizer;
pub mod policy;
pub mod source;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use balance::{ActiveDebt, Balances, DebtDirection, PairwiseBalances};
pub use error::{AmountError, LedgerError, LedgerResult, SourceError, SourceResult, ValidationError};
pub use ledger::{DashboardSummary, HistoryEntry, Ledger};
pub use money::{DigitGrouping, Money};
pub use policy::{LedgerPolicy, PayerShare};
pub use source::{InMemoryRecordSource, LedgerSnapshot, RecordSource};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest single expense or settlement, in rupees (₹10,00,000).
pub const MAX_EXPENSE_RUPEES: i64 = 1_000_000;

/// Maximum distinct participants on one expense.
pub const MAX_PARTICIPANTS: usize = 50;

/// Maximum expense description length, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 200;
