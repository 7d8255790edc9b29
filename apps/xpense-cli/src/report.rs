//! Plain-text rendering of ledger query results.

use std::fmt::Write;
use xpense_core::{
    Balances, DashboardSummary, DebtDirection, Expense, HistoryEntry, LedgerPolicy, Money,
    PairwiseBalances, TransferKind,
};

/// One line per counterparty, settled friends included.
pub fn balances(balances: &Balances, policy: &LedgerPolicy) -> String {
    if balances.is_empty() {
        return "No balances yet.\n".to_string();
    }

    let mut out = String::new();
    for (friend, amount) in balances.iter() {
        let line = if amount.is_positive() {
            format!("{friend} owes you {}", policy.display(amount))
        } else if amount.is_negative() {
            format!("you owe {friend} {}", policy.display(amount.abs()))
        } else {
            format!("{friend} settled up")
        };
        let _ = writeln!(out, "{line}");
    }
    out
}

/// The dashboard cards.
pub fn summary(summary: &DashboardSummary, policy: &LedgerPolicy) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "You are owed:   {}", policy.display(summary.total_owed));
    let _ = writeln!(out, "You owe:        {}", policy.display(summary.total_owe));
    let _ = writeln!(
        out,
        "Total expenses: {} ({} expenses)",
        policy.display(summary.total_expenses),
        summary.expense_count
    );

    if summary.active_debts.is_empty() {
        let _ = writeln!(out, "All settled up.");
    } else {
        let _ = writeln!(out, "Active debts:");
        for debt in &summary.active_debts {
            let direction = match debt.direction {
                DebtDirection::OwesYou => "owes you",
                DebtDirection::YouOwe => "you owe",
            };
            let _ = writeln!(
                out,
                "  {:<12} {:<9} {}",
                debt.friend_id.as_str(),
                direction,
                policy.display(debt.amount)
            );
        }
    }
    out
}

/// Chronological history from the observer's side.
pub fn history(entries: &[HistoryEntry], policy: &LedgerPolicy) -> String {
    let mut out = String::new();
    for entry in entries {
        let label = match entry.kind {
            TransferKind::Expense => "expense",
            TransferKind::Settlement => "settle",
        };
        let _ = writeln!(
            out,
            "{}  {:<8} {:<12} {:>14}  {}",
            entry.date.format("%Y-%m-%d"),
            label,
            entry.counterparty.as_str(),
            signed(entry.amount, policy),
            entry.source_id
        );
    }
    out
}

/// Expenses newest first.
pub fn expenses(expenses: &[&Expense], policy: &LedgerPolicy) -> String {
    let mut out = String::new();
    for expense in expenses {
        let _ = writeln!(
            out,
            "{}  {:<24} {:>14}  paid by {} for {} people",
            expense.date.format("%Y-%m-%d"),
            expense.description,
            policy.display(expense.amount),
            expense.payer_id,
            expense.participant_ids.len()
        );
    }
    out
}

/// Unsettled pairs across everyone in the snapshot.
pub fn pairwise(pairs: &PairwiseBalances, policy: &LedgerPolicy) -> String {
    let outstanding = pairs.outstanding();
    if outstanding.is_empty() {
        return "Everyone is settled up.\n".to_string();
    }

    let mut out = String::new();
    for (debtor, creditor, amount) in outstanding {
        let _ = writeln!(out, "{debtor} owes {creditor} {}", policy.display(amount));
    }
    out
}

fn signed(amount: Money, policy: &LedgerPolicy) -> String {
    if amount.is_positive() {
        format!("+{}", policy.display(amount))
    } else {
        policy.display(amount)
    }
}
