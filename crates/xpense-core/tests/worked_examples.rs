//! The ledger scenarios the dashboard is expected to show, end to end through
//! the write path, the in-memory record source and the query facade.

use xpense_core::{
    AccountScope, DebtDirection, ExpenseDraft, InMemoryRecordSource, Ledger, LedgerError,
    LedgerPolicy, Money, PayerShare, RecordSource, SettlementDraft, TransferKind, UserId,
};

fn u(id: &str) -> UserId {
    UserId::from(id)
}

fn expense(amount: &str, payer: &str, participants: &[&str]) -> ExpenseDraft {
    ExpenseDraft {
        description: "Shared".to_string(),
        amount: Money::parse(amount).unwrap(),
        payer_id: u(payer),
        participant_ids: participants.iter().map(|p| u(p)).collect(),
        date: None,
    }
}

fn settle(amount: &str, from: &str, to: &str) -> SettlementDraft {
    SettlementDraft {
        from_user_id: u(from),
        to_user_id: u(to),
        amount: Money::parse(amount).unwrap(),
        date: None,
    }
}

#[test]
fn dinner_for_three() {
    let mut source = InMemoryRecordSource::default();
    source.record_expense(expense("₹900", "U1", &["U1", "U2", "U3"])).unwrap();

    let snapshot = source.snapshot(&AccountScope::new("U1")).unwrap();
    let ledger = Ledger::from_snapshot(&snapshot);
    let me = u("U1");

    let balances = ledger.net_balances(&me).unwrap();
    assert_eq!(balances.get(&u("U2")), Some(Money::from_rupees(300)));
    assert_eq!(balances.get(&u("U3")), Some(Money::from_rupees(300)));
    assert_eq!(ledger.total_owed(&me).unwrap(), Money::from_rupees(600));
    assert_eq!(ledger.total_owe(&me).unwrap(), Money::zero());
}

#[test]
fn hundred_rupees_three_ways_keeps_every_paisa() {
    let mut source = InMemoryRecordSource::default();
    source.record_expense(expense("100", "U2", &["U1", "U2", "U3"])).unwrap();

    let snapshot = source.snapshot(&AccountScope::new("U2")).unwrap();
    let ledger = Ledger::from_snapshot(&snapshot);
    let shares = xpense_core::normalizer::split_expense(&snapshot.expenses[0], PayerShare::AsRecorded)
        .unwrap();
    let paise: Vec<i64> = shares.iter().map(|(_, m)| m.paise()).collect();
    assert_eq!(paise, vec![3334, 3333, 3333]);

    // U1 sorts first and carries the extra paisa
    assert_eq!(ledger.balance_with(&u("U2"), &u("U1")).unwrap(), Money::from_paise(3334));
    assert_eq!(ledger.balance_with(&u("U2"), &u("U3")).unwrap(), Money::from_paise(3333));
}

#[test]
fn full_settlement_clears_the_debt() {
    let mut source = InMemoryRecordSource::default();
    source.record_expense(expense("500", "U1", &["U2"])).unwrap();
    source.record_settlement(settle("500", "U2", "U1")).unwrap();

    let snapshot = source.snapshot(&AccountScope::new("U1")).unwrap();
    let ledger = Ledger::from_snapshot(&snapshot);

    assert_eq!(ledger.balance_with(&u("U1"), &u("U2")).unwrap(), Money::zero());
    assert_eq!(ledger.balance_with(&u("U2"), &u("U1")).unwrap(), Money::zero());
    assert!(ledger.active_debts(&u("U1")).unwrap().is_empty());

    let kinds: Vec<TransferKind> = ledger
        .history(&u("U1"))
        .unwrap()
        .iter()
        .map(|h| h.kind)
        .collect();
    assert_eq!(kinds.len(), 2);
    assert!(kinds.contains(&TransferKind::Settlement));
}

#[test]
fn overpayment_flips_the_direction() {
    let mut source = InMemoryRecordSource::default();
    source.record_expense(expense("500", "U1", &["U2"])).unwrap();
    source.record_settlement(settle("650", "U2", "U1")).unwrap();

    let snapshot = source.snapshot(&AccountScope::new("U1")).unwrap();
    let ledger = Ledger::from_snapshot(&snapshot);
    let debts = ledger.active_debts(&u("U1")).unwrap();

    assert_eq!(debts.len(), 1);
    assert_eq!(debts[0].direction, DebtDirection::YouOwe);
    assert_eq!(debts[0].amount, Money::from_rupees(150));
    assert_eq!(ledger.total_owe(&u("U1")).unwrap(), Money::from_rupees(150));
}

#[test]
fn never_interacted_is_not_zero() {
    let mut source = InMemoryRecordSource::default();
    source.record_expense(expense("500", "U1", &["U2"])).unwrap();

    let snapshot = source.snapshot(&AccountScope::new("U1")).unwrap();
    let ledger = Ledger::from_snapshot(&snapshot);

    assert!(matches!(
        ledger.balance_with(&u("U1"), &u("U9")),
        Err(LedgerError::UnknownFriend { .. })
    ));
}

#[test]
fn include_payer_policy_matches_the_old_backend() {
    let policy = LedgerPolicy {
        payer_share: PayerShare::AlwaysIncludePayer,
        ..LedgerPolicy::default()
    };
    let mut source = InMemoryRecordSource::new(policy.clone());
    source.record_expense(expense("900", "U1", &["U2", "U3"])).unwrap();

    let snapshot = source.snapshot(&AccountScope::new("U1")).unwrap();
    let ledger = Ledger::from_snapshot(&snapshot).with_policy(policy);
    let summary = ledger.summary(&u("U1")).unwrap();

    assert_eq!(summary.total_owed, Money::from_rupees(600));
    assert_eq!(summary.total_expenses, Money::from_rupees(900));
    assert_eq!(summary.expense_count, 1);
}

#[test]
fn write_path_enforces_limits() {
    let mut source = InMemoryRecordSource::default();

    let too_big = expense("10,00,000.01", "U1", &["U2"]);
    assert!(matches!(
        source.record_expense(too_big),
        Err(LedgerError::Validation(_))
    ));

    let crowd: Vec<String> = (0..51).map(|i| format!("U{i}")).collect();
    let crowd: Vec<&str> = crowd.iter().map(String::as_str).collect();
    assert!(source.record_expense(expense("100", "U1", &crowd)).is_err());

    let mut blank = expense("100", "U1", &["U2"]);
    blank.description = "   ".to_string();
    assert!(source.record_expense(blank).is_err());

    assert!(source.record_settlement(settle("10", "U1", "U1")).is_err());
    assert!(source.all().is_empty());
}
