//! # Query Facade
//!
//! Read-only ledger queries over a borrowed snapshot of records.
//!
//! ## Query Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  &[Expense] + &[Settlement]                                             │
//! │        │                                                                │
//! │        ▼  normalizer::normalize (policy.payer_share)                    │
//! │  Vec<Transfer>  (date, source id, split order)                          │
//! │        │                                                                │
//! │        ├──► Balances::fold(me)       ──► net_balances / balance_with    │
//! │        │                                 total_owed / total_owe         │
//! │        ├──► filter(involves me)      ──► history                        │
//! │        └──► PairwiseBalances::fold   ──► pairwise                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is cached. Every query recomputes from the records, so two calls
//! over the same snapshot always agree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::balance::{ActiveDebt, Balances, PairwiseBalances};
use crate::error::{LedgerError, LedgerResult};
use crate::money::Money;
use crate::normalizer;
use crate::policy::LedgerPolicy;
use crate::source::LedgerSnapshot;
use crate::types::{Expense, Settlement, Transfer, TransferKind, UserId};

// =============================================================================
// Result Types
// =============================================================================

/// One line of a user's history, seen from that user's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub kind: TransferKind,
    pub source_id: String,
    pub counterparty: UserId,
    /// Positive: the counterparty owes more (or paid less) afterwards.
    pub amount: Money,
}

/// The dashboard figures for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// "You are owed"
    pub total_owed: Money,
    /// "You owe"
    pub total_owe: Money,
    /// Sum of every expense the user paid for or shares.
    pub total_expenses: Money,
    pub expense_count: usize,
    pub active_debts: Vec<ActiveDebt>,
}

// =============================================================================
// Ledger
// =============================================================================

/// Query facade over one snapshot of records.
#[derive(Debug, Clone)]
pub struct Ledger<'a> {
    expenses: &'a [Expense],
    settlements: &'a [Settlement],
    policy: LedgerPolicy,
}

impl<'a> Ledger<'a> {
    /// Facade with the default policy.
    pub fn new(expenses: &'a [Expense], settlements: &'a [Settlement]) -> Self {
        Ledger {
            expenses,
            settlements,
            policy: LedgerPolicy::default(),
        }
    }

    pub fn from_snapshot(snapshot: &'a LedgerSnapshot) -> Self {
        Ledger::new(&snapshot.expenses, &snapshot.settlements)
    }

    pub fn with_policy(mut self, policy: LedgerPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &LedgerPolicy {
        &self.policy
    }

    /// Every transfer in chronological order.
    pub fn transfers(&self) -> LedgerResult<Vec<Transfer>> {
        normalizer::normalize(self.expenses, self.settlements, self.policy.payer_share)
    }

    /// Net balance with every counterparty of `me`.
    pub fn net_balances(&self, me: &UserId) -> LedgerResult<Balances> {
        let transfers = self.transfers()?;
        let balances = Balances::fold(me, &transfers);
        debug!(
            user_id = %me,
            counterparties = balances.len(),
            owed = %balances.total_owed(),
            owe = %balances.total_owe(),
            "Computed net balances"
        );
        Ok(balances)
    }

    /// Net balance between `me` and `friend`.
    ///
    /// ## Errors
    /// - `UnknownFriend` if they never shared a transfer. A fully settled
    ///   friend returns zero.
    pub fn balance_with(&self, me: &UserId, friend: &UserId) -> LedgerResult<Money> {
        self.net_balances(me)?
            .get(friend)
            .ok_or_else(|| LedgerError::UnknownFriend {
                observer: me.clone(),
                friend_id: friend.clone(),
            })
    }

    pub fn total_owed(&self, me: &UserId) -> LedgerResult<Money> {
        Ok(self.net_balances(me)?.total_owed())
    }

    pub fn total_owe(&self, me: &UserId) -> LedgerResult<Money> {
        Ok(self.net_balances(me)?.total_owe())
    }

    /// Transfers involving `me`, oldest first.
    pub fn history(&self, me: &UserId) -> LedgerResult<Vec<HistoryEntry>> {
        let entries: Vec<HistoryEntry> = self
            .transfers()?
            .into_iter()
            .filter_map(|t| {
                let amount = t.signed_for(me)?;
                let counterparty = t.counterparty(me)?.clone();
                Some(HistoryEntry {
                    date: t.date,
                    kind: t.kind,
                    source_id: t.source_id,
                    counterparty,
                    amount,
                })
            })
            .collect();
        debug!(user_id = %me, entries = entries.len(), "Built history");
        Ok(entries)
    }

    /// Every transfer regardless of who is involved, oldest first.
    pub fn history_all(&self) -> LedgerResult<Vec<Transfer>> {
        self.transfers()
    }

    /// Unsettled balances, largest first.
    pub fn active_debts(&self, me: &UserId) -> LedgerResult<Vec<ActiveDebt>> {
        Ok(self.net_balances(me)?.active_debts())
    }

    /// Expenses `user` paid for or shares, newest first.
    pub fn expenses_involving(&self, user: &UserId) -> Vec<&'a Expense> {
        let mut expenses: Vec<&'a Expense> =
            self.expenses.iter().filter(|e| e.involves(user)).collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        expenses
    }

    /// Sum of the expenses `user` paid for or shares.
    ///
    /// ## Errors
    /// - `AmountOverflow` if the sum does not fit in i64 paise
    pub fn total_expenses(&self, user: &UserId) -> LedgerResult<Money> {
        self.expenses
            .iter()
            .filter(|e| e.involves(user))
            .try_fold(Money::zero(), |acc, e| acc.checked_add(e.amount))
            .ok_or(LedgerError::AmountOverflow)
    }

    /// Everything the dashboard shows, from one normalization pass.
    pub fn summary(&self, me: &UserId) -> LedgerResult<DashboardSummary> {
        let balances = self.net_balances(me)?;
        let expense_count = self.expenses.iter().filter(|e| e.involves(me)).count();

        Ok(DashboardSummary {
            total_owed: balances.total_owed(),
            total_owe: balances.total_owe(),
            total_expenses: self.total_expenses(me)?,
            expense_count,
            active_debts: balances.active_debts(),
        })
    }

    /// Net amount between every pair of users in the snapshot.
    pub fn pairwise(&self) -> LedgerResult<PairwiseBalances> {
        let transfers = self.transfers()?;
        Ok(PairwiseBalances::fold(&transfers))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
