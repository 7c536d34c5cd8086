//! Debt simplification: reduce net balances to a short list of suggested
//! transfers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::balance::Balances;
use crate::domain::{GroupSnapshot, MemberId, money};

/// A suggested payment from a debtor to a creditor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Decimal,
}

/// Greedily match debtors against creditors into a transfer plan.
///
/// Walks both lists (in the balance map's iteration order) with
/// independent cursors, transferring `min(remaining debt, remaining
/// credit)` at each step and suppressing sub-cent noise. This is a greedy
/// heuristic, deliberately not a minimum-transfer solver: callers depend
/// on the ordering it produces.
pub fn plan_transfers(balances: &Balances) -> Vec<Transfer> {
    let mut debtors: Vec<(MemberId, Decimal)> = Vec::new();
    let mut creditors: Vec<(MemberId, Decimal)> = Vec::new();
    for (&member, &balance) in balances {
        if balance < -money::EPSILON {
            debtors.push((member, -balance));
        } else if balance > money::EPSILON {
            creditors.push((member, balance));
        }
    }

    let mut plan = Vec::new();
    let (mut d, mut c) = (0, 0);
    while d < debtors.len() && c < creditors.len() {
        let amount = debtors[d].1.min(creditors[c].1);
        if amount > money::EPSILON {
            plan.push(Transfer {
                from: debtors[d].0,
                to: creditors[c].0,
                amount,
            });
        }
        debtors[d].1 -= amount;
        creditors[c].1 -= amount;
        if debtors[d].1 < money::EPSILON {
            d += 1;
        }
        if creditors[c].1 < money::EPSILON {
            c += 1;
        }
    }
    plan
}

/// A group is balanced only when the plan is empty *and* no settlement is
/// still pending or sent — an unconfirmed "I paid" claim is an open item
/// even though it does not move the numbers yet.
pub fn is_balanced(snapshot: &GroupSnapshot) -> bool {
    let no_open_claims = snapshot
        .settlements
        .iter()
        .all(|s| s.status.is_terminal());
    no_open_claims && plan_transfers(&crate::balance::compute_balances(snapshot)).is_empty()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;

    fn balances(entries: &[(u32, Decimal)]) -> Balances {
        entries
            .iter()
            .map(|&(id, amount)| (MemberId(id), amount))
            .collect()
    }

    fn transfer(from: u32, to: u32, amount: Decimal) -> Transfer {
        Transfer {
            from: MemberId(from),
            to: MemberId(to),
            amount,
        }
    }

    #[rstest]
    #[case::one_debtor_one_creditor(
        balances(&[(1, dec!(30)), (2, dec!(-30))]),
        vec![transfer(2, 1, dec!(30))]
    )]
    #[case::two_debtors_one_creditor(
        balances(&[(1, dec!(60)), (2, dec!(-30)), (3, dec!(-30))]),
        vec![transfer(2, 1, dec!(30)), transfer(3, 1, dec!(30))]
    )]
    #[case::one_debtor_two_creditors(
        balances(&[(1, dec!(25)), (2, dec!(-40)), (3, dec!(15))]),
        vec![transfer(2, 1, dec!(25)), transfer(2, 3, dec!(15))]
    )]
    #[case::all_even(balances(&[(1, dec!(0)), (2, dec!(0))]), vec![])]
    #[case::sub_cent_noise_suppressed(
        balances(&[(1, dec!(0.005)), (2, dec!(-0.005))]),
        vec![]
    )]
    fn greedy_matching(#[case] balances: Balances, #[case] expected: Vec<Transfer>) {
        assert_eq!(plan_transfers(&balances), expected);
    }

    #[test]
    fn plan_conserves_total_credit() {
        let balances = balances(&[
            (1, dec!(73.21)),
            (2, dec!(-12.40)),
            (3, dec!(-50.81)),
            (4, dec!(-10.00)),
        ]);
        let plan = plan_transfers(&balances);

        let planned: Decimal = plan.iter().map(|t| t.amount).sum();
        let credit: Decimal = balances.values().filter(|b| **b > dec!(0)).copied().sum();
        assert!((planned - credit).abs() <= dec!(0.02));
    }

    #[test]
    fn exact_match_advances_both_cursors() {
        let balances = balances(&[
            (1, dec!(20)),
            (2, dec!(-20)),
            (3, dec!(5)),
            (4, dec!(-5)),
        ]);
        let plan = plan_transfers(&balances);
        assert_eq!(
            plan,
            vec![transfer(2, 1, dec!(20)), transfer(4, 3, dec!(5))]
        );
    }
}
