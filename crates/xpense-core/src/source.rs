//! # Record Source
//!
//! The boundary between the ledger and whatever stores the records.
//!
//! ```text
//! ┌──────────────────┐   list_expenses(scope)     ┌──────────────────┐
//! │  RecordSource    │ ─────────────────────────► │  LedgerSnapshot  │
//! │  (backend, file, │   list_settlements(scope)  │  expenses        │
//! │   in-memory)     │ ─────────────────────────► │  settlements     │
//! └──────────────────┘                            └────────┬─────────┘
//!                                                          │ borrow
//!                                                          ▼
//!                                                 Ledger::from_snapshot
//! ```
//!
//! The scope is passed explicitly on every call. Sources never consult an
//! ambient session.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LedgerError, SourceResult};
use crate::policy::LedgerPolicy;
use crate::types::{AccountScope, Expense, ExpenseDraft, Settlement, SettlementDraft};

/// A consistent read of one user's records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSnapshot {
    pub expenses: Vec<Expense>,
    pub settlements: Vec<Settlement>,
}

impl LedgerSnapshot {
    pub fn new(expenses: Vec<Expense>, settlements: Vec<Settlement>) -> Self {
        LedgerSnapshot {
            expenses,
            settlements,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty() && self.settlements.is_empty()
    }

    /// Keeps only the records `scope` is party to.
    pub fn scoped(self, scope: &AccountScope) -> Self {
        LedgerSnapshot {
            expenses: self
                .expenses
                .into_iter()
                .filter(|e| e.involves(&scope.user_id))
                .collect(),
            settlements: self
                .settlements
                .into_iter()
                .filter(|s| s.involves(&scope.user_id))
                .collect(),
        }
    }
}

/// Anything that can list a user's expenses and settlements.
pub trait RecordSource {
    /// Expenses the scoped user paid for or participates in.
    fn list_expenses(&self, scope: &AccountScope) -> SourceResult<Vec<Expense>>;

    /// Settlements the scoped user sent or received.
    fn list_settlements(&self, scope: &AccountScope) -> SourceResult<Vec<Settlement>>;

    /// Reads both lists into a snapshot.
    fn snapshot(&self, scope: &AccountScope) -> SourceResult<LedgerSnapshot> {
        let expenses = self.list_expenses(scope)?;
        let settlements = self.list_settlements(scope)?;
        debug!(
            user_id = %scope.user_id,
            expenses = expenses.len(),
            settlements = settlements.len(),
            "Loaded ledger snapshot"
        );
        Ok(LedgerSnapshot::new(expenses, settlements))
    }
}

// =============================================================================
// In-Memory Source
// =============================================================================

/// Append-only record store held in memory.
///
/// Records go in through the validating write path and are never edited.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordSource {
    policy: LedgerPolicy,
    records: LedgerSnapshot,
}

impl InMemoryRecordSource {
    pub fn new(policy: LedgerPolicy) -> Self {
        InMemoryRecordSource {
            policy,
            records: LedgerSnapshot::default(),
        }
    }

    /// Wraps records that were validated elsewhere.
    pub fn from_snapshot(policy: LedgerPolicy, records: LedgerSnapshot) -> Self {
        InMemoryRecordSource { policy, records }
    }

    /// Validates and appends an expense, returning the stored record.
    pub fn record_expense(&mut self, draft: ExpenseDraft) -> Result<&Expense, LedgerError> {
        let expense = Expense::create(draft, &self.policy)?;
        debug!(expense_id = %expense.id, amount = %expense.amount, "Recorded expense");
        self.records.expenses.push(expense);
        let last = self.records.expenses.len() - 1;
        Ok(&self.records.expenses[last])
    }

    /// Validates and appends a settlement, returning the stored record.
    pub fn record_settlement(
        &mut self,
        draft: SettlementDraft,
    ) -> Result<&Settlement, LedgerError> {
        let settlement = Settlement::create(draft, &self.policy)?;
        debug!(settlement_id = %settlement.id, amount = %settlement.amount, "Recorded settlement");
        self.records.settlements.push(settlement);
        let last = self.records.settlements.len() - 1;
        Ok(&self.records.settlements[last])
    }

    pub fn policy(&self) -> &LedgerPolicy {
        &self.policy
    }

    /// Every stored record, unscoped.
    pub fn all(&self) -> &LedgerSnapshot {
        &self.records
    }
}

impl RecordSource for InMemoryRecordSource {
    fn list_expenses(&self, scope: &AccountScope) -> SourceResult<Vec<Expense>> {
        Ok(self
            .records
            .expenses
            .iter()
            .filter(|e| e.involves(&scope.user_id))
            .cloned()
            .collect())
    }

    fn list_settlements(&self, scope: &AccountScope) -> SourceResult<Vec<Settlement>> {
        Ok(self
            .records
            .settlements
            .iter()
            .filter(|s| s.involves(&scope.user_id))
            .cloned()
            .collect())
    }
}
