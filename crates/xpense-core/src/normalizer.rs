//! # Ledger Entry Normalizer
//!
//! Turns expenses and settlements into [`Transfer`]s.
//!
//! ## Expense Split
//! ```text
//! Expense ₹100.00 paid by U1, participants {U1, U2, U3}
//!
//!   10000 paise / 3  ──►  U1: 3334   U2: 3333   U3: 3333
//!                         ▲ remainder goes to the first participants
//!                           in ascending id order
//!
//!   U1's own share is self-owed  ──► no transfer
//!   U2 ──3333──► U1
//!   U3 ──3333──► U1
//! ```
//!
//! Settlements are already transfers and pass through tagged
//! [`TransferKind::Settlement`].

use std::borrow::Cow;
use std::collections::BTreeSet;

use tracing::{debug, trace, warn};

use crate::error::{AmountError, LedgerError, LedgerResult};
use crate::money::Money;
use crate::policy::PayerShare;
use crate::types::{Expense, Settlement, Transfer, TransferKind, UserId};

/// Computes every participant's share of an expense, payer included.
///
/// Shares are returned in ascending participant order and always sum to
/// `expense.amount`.
///
/// ## Errors
/// - `InvalidAmount` if the amount is not positive
/// - `EmptyParticipantSet` if nobody shares the cost
pub fn split_expense(
    expense: &Expense,
    payer_share: PayerShare,
) -> LedgerResult<Vec<(UserId, Money)>> {
    if !expense.amount.is_positive() {
        warn!(expense_id = %expense.id, amount = %expense.amount, "Rejecting expense with non-positive amount");
        return Err(AmountError::NotPositive(expense.amount).into());
    }

    let participants: Cow<'_, BTreeSet<UserId>> = match payer_share {
        PayerShare::AlwaysIncludePayer if !expense.participant_ids.contains(&expense.payer_id) => {
            let mut with_payer = expense.participant_ids.clone();
            with_payer.insert(expense.payer_id.clone());
            Cow::Owned(with_payer)
        }
        _ => Cow::Borrowed(&expense.participant_ids),
    };

    let empty = || LedgerError::EmptyParticipantSet {
        expense_id: expense.id.clone(),
    };
    if participants.is_empty() {
        warn!(expense_id = %expense.id, "Rejecting expense with no participants");
        return Err(empty());
    }

    let shares = expense
        .amount
        .divide_evenly(participants.len())
        .ok_or_else(empty)?;

    Ok(participants.iter().cloned().zip(shares).collect())
}

/// Transfers implied by one expense.
///
/// Each participant other than the payer owes the payer their share.
/// Zero shares (amount smaller than the head count) produce nothing.
pub fn expense_transfers(expense: &Expense, payer_share: PayerShare) -> LedgerResult<Vec<Transfer>> {
    let shares = split_expense(expense, payer_share)?;

    let transfers: Vec<Transfer> = shares
        .into_iter()
        .filter(|(participant, share)| participant != &expense.payer_id && share.is_positive())
        .map(|(participant, share)| Transfer {
            from: participant,
            to: expense.payer_id.clone(),
            amount: share,
            kind: TransferKind::Expense,
            source_id: expense.id.clone(),
            date: expense.date,
        })
        .collect();

    trace!(
        expense_id = %expense.id,
        participants = expense.participant_ids.len(),
        transfers = transfers.len(),
        "Split expense"
    );

    Ok(transfers)
}

/// The transfer a settlement represents.
///
/// ## Errors
/// - `InvalidAmount` if the amount is not positive
/// - `SelfSettlement` if both sides are the same user
pub fn settlement_transfer(settlement: &Settlement) -> LedgerResult<Transfer> {
    if !settlement.amount.is_positive() {
        warn!(settlement_id = %settlement.id, "Rejecting settlement with non-positive amount");
        return Err(AmountError::NotPositive(settlement.amount).into());
    }

    if settlement.from_user_id == settlement.to_user_id {
        warn!(settlement_id = %settlement.id, "Rejecting self-settlement");
        return Err(LedgerError::SelfSettlement {
            settlement_id: settlement.id.clone(),
            user_id: settlement.from_user_id.clone(),
        });
    }

    Ok(Transfer {
        from: settlement.from_user_id.clone(),
        to: settlement.to_user_id.clone(),
        amount: settlement.amount,
        kind: TransferKind::Settlement,
        source_id: settlement.id.clone(),
        date: settlement.date,
    })
}

/// Normalizes a whole ledger into chronological transfers.
///
/// Ordered by date, then source record id; transfers from the same record
/// keep their split order. Any malformed record fails the whole call.
///
/// ## Errors
/// - Any error from [`expense_transfers`] or [`settlement_transfer`]
/// - `AmountOverflow` if the transfer amounts do not sum within i64 paise
pub fn normalize(
    expenses: &[Expense],
    settlements: &[Settlement],
    payer_share: PayerShare,
) -> LedgerResult<Vec<Transfer>> {
    let mut transfers = Vec::with_capacity(expenses.len() * 2 + settlements.len());

    for expense in expenses {
        transfers.extend(expense_transfers(expense, payer_share)?);
    }
    for settlement in settlements {
        transfers.push(settlement_transfer(settlement)?);
    }

    // Every balance is a signed partial sum of these positive amounts
    let volume = transfers
        .iter()
        .try_fold(Money::zero(), |acc, t| acc.checked_add(t.amount));
    if volume.is_none() {
        warn!(transfers = transfers.len(), "Rejecting ledger whose amounts overflow");
        return Err(LedgerError::AmountOverflow);
    }

    // Stable sort keeps split order within a record
    transfers.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.source_id.cmp(&b.source_id)));

    debug!(
        expenses = expenses.len(),
        settlements = settlements.len(),
        transfers = transfers.len(),
        %payer_share,
        "Normalized ledger"
    );

    Ok(transfers)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn expense(id: &str, paise: i64, payer: &str, participants: &[&str]) -> Expense {
        Expense {
            id: id.to_string(),
            description: "Test".to_string(),
            amount: Money::from_paise(paise),
            payer_id: UserId::from(payer),
            participant_ids: participants.iter().map(|p| UserId::from(*p)).collect(),
            date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_even_split() {
        let e = expense("e1", 90_000, "u1", &["u1", "u2", "u3"]);
        let transfers = expense_transfers(&e, PayerShare::AsRecorded).unwrap();

        assert_eq!(transfers.len(), 2);
        for t in &transfers {
            assert_eq!(t.to, UserId::from("u1"));
            assert_eq!(t.amount, Money::from_paise(30_000));
            assert_eq!(t.kind, TransferKind::Expense);
            assert_eq!(t.source_id, "e1");
        }
    }

    #[test]
    fn test_remainder_goes_to_first_participant() {
        let e = expense("e1", 10_000, "u1", &["u3", "u2", "u1"]);
        let shares = split_expense(&e, PayerShare::AsRecorded).unwrap();
        let paise: Vec<(&str, i64)> = shares
            .iter()
            .map(|(u, m)| (u.as_str(), m.paise()))
            .collect();
        assert_eq!(paise, vec![("u1", 3334), ("u2", 3333), ("u3", 3333)]);
    }

    #[test]
    fn test_payer_excluded_owes_nothing() {
        let e = expense("e1", 90_000, "u1", &["u2", "u3"]);
        let transfers = expense_transfers(&e, PayerShare::AsRecorded).unwrap();
        let total: Money = transfers.iter().map(|t| t.amount).sum();
        assert_eq!(total, Money::from_paise(90_000));
    }

    #[test]
    fn test_always_include_payer() {
        let e = expense("e1", 90_000, "u1", &["u2", "u3"]);
        let transfers = expense_transfers(&e, PayerShare::AlwaysIncludePayer).unwrap();
        assert_eq!(transfers.len(), 2);
        assert!(transfers.iter().all(|t| t.amount == Money::from_paise(30_000)));
    }

    #[test]
    fn test_payer_only_expense_has_no_transfers() {
        let e = expense("e1", 5_000, "u1", &["u1"]);
        assert!(expense_transfers(&e, PayerShare::AsRecorded).unwrap().is_empty());
    }

    #[test]
    fn test_tiny_amount_skips_zero_shares() {
        let e = expense("e1", 2, "u1", &["u2", "u3", "u4"]);
        let transfers = expense_transfers(&e, PayerShare::AsRecorded).unwrap();
        assert_eq!(transfers.len(), 2);
        assert!(transfers.iter().all(|t| t.amount == Money::from_paise(1)));
    }

    #[test]
    fn test_empty_participants_fail_fast() {
        let e = expense("e-empty", 1_000, "u1", &[]);
        assert_eq!(
            expense_transfers(&e, PayerShare::AsRecorded),
            Err(LedgerError::EmptyParticipantSet {
                expense_id: "e-empty".to_string()
            })
        );
        // Including the payer makes the set non-empty, but there is nobody to owe
        assert!(expense_transfers(&e, PayerShare::AlwaysIncludePayer)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_non_positive_expense_rejected() {
        let e = expense("e1", 0, "u1", &["u2"]);
        assert!(matches!(
            expense_transfers(&e, PayerShare::AsRecorded),
            Err(LedgerError::InvalidAmount(AmountError::NotPositive(_)))
        ));
    }

    #[test]
    fn test_settlement_passes_through() {
        let s = Settlement {
            id: "s1".to_string(),
            from_user_id: UserId::from("u2"),
            to_user_id: UserId::from("u1"),
            amount: Money::from_paise(50_000),
            date: Utc::now(),
        };
        let t = settlement_transfer(&s).unwrap();
        assert_eq!(t.kind, TransferKind::Settlement);
        assert_eq!(t.amount, s.amount);
        assert_eq!(t.from, s.from_user_id);
    }

    #[test]
    fn test_self_settlement_rejected() {
        let s = Settlement {
            id: "s1".to_string(),
            from_user_id: UserId::from("u1"),
            to_user_id: UserId::from("u1"),
            amount: Money::from_paise(100),
            date: Utc::now(),
        };
        assert!(matches!(
            settlement_transfer(&s),
            Err(LedgerError::SelfSettlement { .. })
        ));
    }

    #[test]
    fn test_overflowing_volume_rejected() {
        let huge = i64::MAX / 2 + 1;
        let expenses = [
            expense("e1", huge, "u1", &["u2"]),
            expense("e2", huge, "u1", &["u2"]),
        ];
        assert_eq!(
            normalize(&expenses, &[], PayerShare::AsRecorded),
            Err(LedgerError::AmountOverflow)
        );
        assert_eq!(normalize(&expenses[..1], &[], PayerShare::AsRecorded).unwrap().len(), 1);
    }

    #[test]
    fn test_normalize_orders_by_date_then_id() {
        let mut late = expense("e-b", 200, "u1", &["u2"]);
        late.date = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let early_b = expense("e-b0", 200, "u1", &["u2"]);
        let early_a = expense("e-a", 200, "u1", &["u2"]);

        let transfers =
            normalize(&[late, early_b, early_a], &[], PayerShare::AsRecorded).unwrap();
        let ids: Vec<&str> = transfers.iter().map(|t| t.source_id.as_str()).collect();
        assert_eq!(ids, vec!["e-a", "e-b0", "e-b"]);
    }
}
