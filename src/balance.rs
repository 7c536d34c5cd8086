//! Net balance calculation: a pure function of expenses, splits, and
//! confirmed settlements. Balances are derived on every read, never stored.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::domain::{GroupSnapshot, MemberId, SettlementStatus};

/// Member id -> signed net position. Positive means the group owes this
/// member money; negative means the member owes the group.
///
/// A BTreeMap so iteration order is stable and the transfer plan built from
/// it is reproducible.
pub type Balances = BTreeMap<MemberId, Decimal>;

/// Compute every member's net position from a group snapshot.
///
/// Each expense credits its payer, each split debits its participant, and
/// each *confirmed* settlement credits the debtor and debits the creditor
/// (the debt was extinguished outside the system). Pending and sent claims
/// do not move balances. Members untouched by any record stay at zero.
pub fn compute_balances(snapshot: &GroupSnapshot) -> Balances {
    let mut balances: Balances = snapshot
        .group
        .members
        .iter()
        .map(|&member| (member, Decimal::ZERO))
        .collect();

    for expense in &snapshot.expenses {
        *balances.entry(expense.payer).or_default() += expense.amount;
    }

    for split in &snapshot.splits {
        *balances.entry(split.participant).or_default() -= split.amount;
    }

    for settlement in &snapshot.settlements {
        if settlement.status == SettlementStatus::Confirmed {
            *balances.entry(settlement.from).or_default() += settlement.amount;
            *balances.entry(settlement.to).or_default() -= settlement.amount;
        }
    }

    balances
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::{
        Expense, ExpenseId, Group, GroupId, Settlement, SettlementId, Split,
    };

    fn snapshot_with(
        settlement_status: Option<SettlementStatus>,
    ) -> GroupSnapshot {
        let group = GroupId(1);
        let (a, b, c) = (MemberId(1), MemberId(2), MemberId(3));
        let expense = Expense::new(
            ExpenseId(1),
            group,
            a,
            dec!(90),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        let splits = [a, b, c]
            .into_iter()
            .map(|participant| Split {
                expense_id: ExpenseId(1),
                participant,
                amount: dec!(30),
            })
            .collect();
        let settlements = settlement_status
            .map(|status| {
                let mut s = Settlement::new(
                    SettlementId(1),
                    group,
                    b,
                    a,
                    dec!(30),
                    Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap(),
                );
                s.status = status;
                vec![s]
            })
            .unwrap_or_default();

        GroupSnapshot {
            group: Group::new(group, vec![a, b, c]),
            expenses: vec![expense],
            splits,
            settlements,
        }
    }

    #[test]
    fn payer_is_credited_and_participants_debited() {
        let balances = compute_balances(&snapshot_with(None));

        assert_eq!(balances[&MemberId(1)], dec!(60));
        assert_eq!(balances[&MemberId(2)], dec!(-30));
        assert_eq!(balances[&MemberId(3)], dec!(-30));
    }

    #[test]
    fn confirmed_settlement_extinguishes_debt() {
        let balances = compute_balances(&snapshot_with(Some(SettlementStatus::Confirmed)));

        assert_eq!(balances[&MemberId(1)], dec!(30));
        assert_eq!(balances[&MemberId(2)], dec!(0));
        assert_eq!(balances[&MemberId(3)], dec!(-30));
    }

    #[test]
    fn sent_claim_is_not_yet_trusted() {
        let balances = compute_balances(&snapshot_with(Some(SettlementStatus::PaymentSent)));

        assert_eq!(balances[&MemberId(1)], dec!(60));
        assert_eq!(balances[&MemberId(2)], dec!(-30));
    }

    #[test]
    fn credits_and_debits_conserve_to_zero() {
        for status in [None, Some(SettlementStatus::Confirmed), Some(SettlementStatus::Rejected)] {
            let balances = compute_balances(&snapshot_with(status));
            let total: Decimal = balances.values().copied().sum();
            assert!(total.abs() <= dec!(0.02), "sum drifted: {total}");
        }
    }

    #[test]
    fn roster_members_without_activity_stay_at_zero() {
        let mut snapshot = snapshot_with(None);
        snapshot.group.members.push(MemberId(9));

        let balances = compute_balances(&snapshot);
        assert_eq!(balances[&MemberId(9)], dec!(0));
    }
}
