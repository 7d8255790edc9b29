//! # Balance Aggregator
//!
//! Folds transfers into net balances.
//!
//! ## Observer View
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  observer = U1                                                          │
//! │                                                                         │
//! │  Share    U2 ──300──► U1     balance[U2] += 300   (U2 owes U1 more)    │
//! │  Share    U1 ──120──► U3     balance[U3] -= 120   (U1 owes U3 more)    │
//! │  Settle   U2 ──100──► U1     balance[U2] -= 100   (U2 paid some back)  │
//! │  Share    U2 ──50───► U3     ignored (U1 not involved)                 │
//! │                                                                         │
//! │  total_owed = Σ positive balances                                      │
//! │  total_owe  = Σ |negative balances|                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every fold is a sum of signed integers, so the result does not depend on
//! transfer order. Counterparties that net to zero stay in the map: they are
//! settled, which is different from never having interacted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Transfer, UserId};

// =============================================================================
// Observer Balances
// =============================================================================

/// Net signed balance per counterparty, from one user's point of view.
///
/// Positive: the friend owes the observer. Negative: the observer owes the
/// friend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Balances {
    observer: UserId,
    entries: BTreeMap<UserId, Money>,
}

impl Balances {
    /// Creates an empty view for `observer`.
    pub fn new(observer: UserId) -> Self {
        Balances {
            observer,
            entries: BTreeMap::new(),
        }
    }

    /// Folds `transfers` into a fresh view for `observer`.
    pub fn fold<'a, I>(observer: &UserId, transfers: I) -> Self
    where
        I: IntoIterator<Item = &'a Transfer>,
    {
        let mut balances = Balances::new(observer.clone());
        for transfer in transfers {
            balances.apply(transfer);
        }
        trace!(observer = %observer, counterparties = balances.entries.len(), "Folded balances");
        balances
    }

    /// Applies one transfer. Transfers not involving the observer are ignored.
    pub fn apply(&mut self, transfer: &Transfer) {
        let Some(delta) = transfer.signed_for(&self.observer) else {
            return;
        };
        let Some(counterparty) = transfer.counterparty(&self.observer) else {
            return;
        };
        *self.entries.entry(counterparty.clone()).or_default() += delta;
    }

    pub fn observer(&self) -> &UserId {
        &self.observer
    }

    /// Balance with `friend`, or `None` if they never shared a transfer.
    pub fn get(&self, friend: &UserId) -> Option<Money> {
        self.entries.get(friend).copied()
    }

    /// True if `friend` ever shared a transfer with the observer.
    pub fn knows(&self, friend: &UserId) -> bool {
        self.entries.contains_key(friend)
    }

    /// All counterparties in ascending id order, settled ones included.
    pub fn iter(&self) -> impl Iterator<Item = (&UserId, Money)> {
        self.entries.iter().map(|(id, m)| (id, *m))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of what friends owe the observer.
    pub fn total_owed(&self) -> Money {
        self.entries.values().filter(|m| m.is_positive()).sum()
    }

    /// Sum of what the observer owes friends (as a positive amount).
    pub fn total_owe(&self) -> Money {
        self.entries
            .values()
            .filter(|m| m.is_negative())
            .map(Money::abs)
            .sum()
    }

    /// `total_owed - total_owe`.
    pub fn net(&self) -> Money {
        self.entries.values().sum()
    }

    /// Non-zero balances, largest magnitude first, then by friend id.
    pub fn active_debts(&self) -> Vec<ActiveDebt> {
        let mut debts: Vec<ActiveDebt> = self
            .entries
            .iter()
            .filter(|(_, m)| !m.is_zero())
            .map(|(friend, m)| ActiveDebt::new(friend.clone(), *m))
            .collect();
        debts.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.friend_id.cmp(&b.friend_id))
        });
        debts
    }

    /// Consumes the view, returning the underlying map.
    pub fn into_map(self) -> BTreeMap<UserId, Money> {
        self.entries
    }
}

// =============================================================================
// Active Debt
// =============================================================================

/// Which way an unsettled balance points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DebtDirection {
    /// "owes you"
    OwesYou,
    /// "you owe"
    YouOwe,
}

/// One unsettled balance, as the dashboard lists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ActiveDebt {
    pub friend_id: UserId,
    /// Always positive.
    pub amount: Money,
    pub direction: DebtDirection,
}

impl ActiveDebt {
    fn new(friend_id: UserId, signed: Money) -> Self {
        let direction = if signed.is_negative() {
            DebtDirection::YouOwe
        } else {
            DebtDirection::OwesYou
        };
        ActiveDebt {
            friend_id,
            amount: signed.abs(),
            direction,
        }
    }

    /// Signed amount from the observer's side.
    pub fn signed(&self) -> Money {
        match self.direction {
            DebtDirection::OwesYou => self.amount,
            DebtDirection::YouOwe => -self.amount,
        }
    }
}

// =============================================================================
// All-Pairs View
// =============================================================================

/// Net balance for every pair of users that ever exchanged a transfer.
///
/// Stored once per unordered pair as `(low, high) → amount`, where a positive
/// amount means `high` owes `low`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairwiseBalances {
    pairs: BTreeMap<(UserId, UserId), Money>,
}

impl PairwiseBalances {
    /// Folds every transfer into the all-pairs view.
    pub fn fold<'a, I>(transfers: I) -> Self
    where
        I: IntoIterator<Item = &'a Transfer>,
    {
        let mut view = PairwiseBalances::default();
        for transfer in transfers {
            view.apply(transfer);
        }
        view
    }

    pub fn apply(&mut self, transfer: &Transfer) {
        let (debtor, creditor) = (transfer.debtor(), transfer.creditor());
        let (key, delta) = if creditor < debtor {
            ((creditor.clone(), debtor.clone()), transfer.amount)
        } else {
            ((debtor.clone(), creditor.clone()), -transfer.amount)
        };
        *self.pairs.entry(key).or_default() += delta;
    }

    /// What `b` owes `a` (negative when `a` owes `b`). Zero for strangers.
    pub fn between(&self, a: &UserId, b: &UserId) -> Money {
        if a <= b {
            self.pairs
                .get(&(a.clone(), b.clone()))
                .copied()
                .unwrap_or_default()
        } else {
            -self
                .pairs
                .get(&(b.clone(), a.clone()))
                .copied()
                .unwrap_or_default()
        }
    }

    /// What everyone else owes `user`, net.
    pub fn net_position(&self, user: &UserId) -> Money {
        self.pairs
            .iter()
            .map(|((low, high), amount)| {
                if low == user {
                    *amount
                } else if high == user {
                    -*amount
                } else {
                    Money::zero()
                }
            })
            .sum()
    }

    /// Net position of every user seen, in ascending id order.
    pub fn positions(&self) -> BTreeMap<UserId, Money> {
        let mut positions: BTreeMap<UserId, Money> = BTreeMap::new();
        for ((low, high), amount) in &self.pairs {
            *positions.entry(low.clone()).or_default() += *amount;
            *positions.entry(high.clone()).or_default() -= *amount;
        }
        positions
    }

    /// Unsettled pairs as `(debtor, creditor, amount)`.
    pub fn outstanding(&self) -> Vec<(UserId, UserId, Money)> {
        self.pairs
            .iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|((low, high), amount)| {
                if amount.is_positive() {
                    (high.clone(), low.clone(), *amount)
                } else {
                    (low.clone(), high.clone(), amount.abs())
                }
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
