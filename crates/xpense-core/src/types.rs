//! # Domain Types
//!
//! Ledger records and the transfers derived from them.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Stored (immutable, owned by the record source)                        │
//! │  ┌─────────────────────┐          ┌─────────────────────┐              │
//! │  │      Expense        │          │     Settlement      │              │
//! │  │  ─────────────────  │          │  ─────────────────  │              │
//! │  │  id (UUID v7)       │          │  id (UUID v7)       │              │
//! │  │  description        │          │  from_user_id       │              │
//! │  │  amount (paise)     │          │  to_user_id         │              │
//! │  │  payer_id           │          │  amount (paise)     │              │
//! │  │  participant_ids    │          │  date               │              │
//! │  │  date               │          └──────────┬──────────┘              │
//! │  └──────────┬──────────┘                     │                         │
//! │             │ split                          │ pass-through            │
//! │             ▼                                ▼                         │
//! │  Derived (disposable)                                                  │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  Transfer { from, to, amount > 0, kind, source_id, date }   │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! JSON field names are camelCase (`payerId`, `participantIds`,
//! `fromUserId`, `toUserId`) to match what the browser client sends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::LedgerResult;
use crate::money::Money;
use crate::policy::LedgerPolicy;
use crate::validation;

/// Generates a time-ordered record id.
///
/// UUID v7 strings sort by creation time, which history relies on as the
/// tie-break for records sharing a date.
pub fn new_record_id() -> String {
    Uuid::now_v7().to_string()
}

// =============================================================================
// User Identity
// =============================================================================

/// Opaque user identifier.
///
/// Ordering is plain string ordering; it is the "stable, deterministic order"
/// used when handing out split remainders.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        UserId(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        UserId(id)
    }
}

/// The account a ledger view is computed for.
///
/// Passed explicitly to record sources instead of living in ambient session
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountScope {
    pub user_id: UserId,
}

impl AccountScope {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        AccountScope {
            user_id: user_id.into(),
        }
    }
}

// =============================================================================
// Expense
// =============================================================================

/// A shared expense: one payer fronted `amount` for `participant_ids`.
///
/// The payer need not be a participant. When excluded, the payer fronts the
/// whole amount and owes nothing back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Unique identifier (UUID v7 when created here).
    pub id: String,

    /// What the money was spent on.
    pub description: String,

    /// Total amount in paise.
    pub amount: Money,

    /// Who paid.
    pub payer_id: UserId,

    /// Who shares the cost. Ascending order is the split order.
    pub participant_ids: BTreeSet<UserId>,

    /// When the expense happened.
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
}

impl Expense {
    /// Validates a draft and stamps it into an immutable record.
    ///
    /// ## Rules (from `policy`)
    /// - Description required, at most `max_description_len` characters
    /// - Amount at most `max_expense_amount`
    /// - Payer required
    /// - 1 to `max_participants` distinct participants
    pub fn create(draft: ExpenseDraft, policy: &LedgerPolicy) -> LedgerResult<Expense> {
        let description =
            validation::validate_description(&draft.description, policy.max_description_len)?;
        validation::validate_amount(draft.amount, policy.max_expense_amount, "amount")?;
        validation::validate_user_id(&draft.payer_id, "payer")?;
        let participant_ids =
            validation::validate_participants(draft.participant_ids, policy.max_participants)?;

        Ok(Expense {
            id: new_record_id(),
            description,
            amount: draft.amount,
            payer_id: draft.payer_id,
            participant_ids,
            date: draft.date.unwrap_or_else(Utc::now),
        })
    }

    /// Returns true if `user` paid for or shares this expense.
    pub fn involves(&self, user: &UserId) -> bool {
        &self.payer_id == user || self.participant_ids.contains(user)
    }
}

/// Input for [`Expense::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: Money,
    pub payer_id: UserId,
    pub participant_ids: Vec<UserId>,
    /// Defaults to now.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

// =============================================================================
// Settlement
// =============================================================================

/// A real payment from one user to another that reduces debt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub id: String,
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    /// Amount paid in paise.
    pub amount: Money,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
}

impl Settlement {
    /// Validates a draft and stamps it into an immutable record.
    ///
    /// Rejects settling with yourself and amounts above
    /// `max_expense_amount`.
    pub fn create(draft: SettlementDraft, policy: &LedgerPolicy) -> LedgerResult<Settlement> {
        validation::validate_user_id(&draft.from_user_id, "fromUser")?;
        validation::validate_user_id(&draft.to_user_id, "toUser")?;
        validation::validate_distinct_users(&draft.from_user_id, &draft.to_user_id)?;
        validation::validate_amount(draft.amount, policy.max_expense_amount, "amount")?;

        Ok(Settlement {
            id: new_record_id(),
            from_user_id: draft.from_user_id,
            to_user_id: draft.to_user_id,
            amount: draft.amount,
            date: draft.date.unwrap_or_else(Utc::now),
        })
    }

    pub fn involves(&self, user: &UserId) -> bool {
        &self.from_user_id == user || &self.to_user_id == user
    }
}

/// Input for [`Settlement::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementDraft {
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub amount: Money,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

// =============================================================================
// Transfer
// =============================================================================

/// Where a transfer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    /// A participant's share of an expense, owed to the payer.
    Expense,
    /// An actual payment.
    Settlement,
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferKind::Expense => write!(f, "expense"),
            TransferKind::Settlement => write!(f, "settlement"),
        }
    }
}

/// A directed movement of value between two users, `amount` always > 0.
///
/// `from`/`to` read the way the record reads: for an expense share `from`
/// owes `to`, for a settlement `from` paid `to`. Use [`Transfer::debtor`] and
/// [`Transfer::creditor`] for the balance effect, which points the other way
/// for settlements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub from: UserId,
    pub to: UserId,
    pub amount: Money,
    pub kind: TransferKind,
    /// Id of the expense or settlement this came from.
    pub source_id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
}

impl Transfer {
    pub fn involves(&self, user: &UserId) -> bool {
        &self.from == user || &self.to == user
    }

    /// The other side of the transfer as seen by `observer`.
    pub fn counterparty(&self, observer: &UserId) -> Option<&UserId> {
        if &self.to == observer {
            Some(&self.from)
        } else if &self.from == observer {
            Some(&self.to)
        } else {
            None
        }
    }

    /// The side whose debt grows by `amount`.
    pub fn debtor(&self) -> &UserId {
        match self.kind {
            TransferKind::Expense => &self.from,
            TransferKind::Settlement => &self.to,
        }
    }

    /// The side that is owed `amount` more.
    pub fn creditor(&self) -> &UserId {
        match self.kind {
            TransferKind::Expense => &self.to,
            TransferKind::Settlement => &self.from,
        }
    }

    /// Signed effect on `observer`'s balance with the counterparty.
    ///
    /// Positive when the counterparty now owes `observer` more. A settlement
    /// paid to `observer` is negative: it cancels what the payer owed.
    pub fn signed_for(&self, observer: &UserId) -> Option<Money> {
        if self.creditor() == observer {
            Some(self.amount)
        } else if self.debtor() == observer {
            Some(-self.amount)
        } else {
            None
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
