//! Split allocation: turning an expense total and a strategy into
//! per-participant owed amounts.

use rust_decimal::Decimal;

use crate::domain::{Error, MemberId, money};

/// How an expense total is divided among participants.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitStrategy {
    /// Divide the total evenly across the selected participants.
    Equal { participants: Vec<MemberId> },
    /// Caller supplies a decimal amount per participant.
    Exact { shares: Vec<(MemberId, Decimal)> },
    /// Caller supplies a percentage (0-100) per participant.
    Percentage { shares: Vec<(MemberId, Decimal)> },
}

/// One participant's computed share of an expense total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allocation {
    pub participant: MemberId,
    pub amount: Decimal,
}

/// Compute per-participant owed amounts for `total` under `strategy`.
///
/// Pure: persistence of the resulting splits is the caller's business.
/// Output preserves the caller's participant order, amounts are rounded to
/// 2 decimals, and zero shares are dropped.
///
/// Equal and percentage division can leave the allocations a few cents shy
/// of (or past) the total. That drift is not corrected here; the balance
/// calculator's epsilon absorbs it.
pub fn allocate(total: Decimal, strategy: &SplitStrategy) -> Result<Vec<Allocation>, Error> {
    if total <= Decimal::ZERO {
        return Err(Error::InvalidAmount(total));
    }

    match strategy {
        SplitStrategy::Equal { participants } => {
            if participants.is_empty() {
                return Err(Error::EmptySelection);
            }
            let share = money::round_currency(total / Decimal::from(participants.len()));
            Ok(participants
                .iter()
                .map(|&participant| Allocation {
                    participant,
                    amount: share,
                })
                .collect())
        }
        SplitStrategy::Exact { shares } => {
            let mut supplied = Decimal::ZERO;
            for &(_, amount) in shares {
                if amount < Decimal::ZERO {
                    return Err(Error::InvalidAmount(amount));
                }
                supplied += amount;
            }
            let delta = (supplied - total).abs();
            if delta > money::EXACT_SPLIT_TOLERANCE {
                return Err(Error::SplitMismatch {
                    expected: total,
                    actual: supplied,
                    delta,
                });
            }
            Ok(shares
                .iter()
                .filter(|&&(_, amount)| amount > Decimal::ZERO)
                .map(|&(participant, amount)| Allocation {
                    participant,
                    amount: money::round_currency(amount),
                })
                .collect())
        }
        SplitStrategy::Percentage { shares } => {
            let mut supplied = Decimal::ZERO;
            for &(_, pct) in shares {
                if pct < Decimal::ZERO || pct > money::HUNDRED {
                    return Err(Error::InvalidAmount(pct));
                }
                supplied += pct;
            }
            let delta = (supplied - money::HUNDRED).abs();
            if delta > money::PERCENT_TOLERANCE {
                return Err(Error::SplitMismatch {
                    expected: money::HUNDRED,
                    actual: supplied,
                    delta,
                });
            }
            Ok(shares
                .iter()
                .filter(|&&(_, pct)| pct > Decimal::ZERO)
                .map(|&(participant, pct)| Allocation {
                    participant,
                    amount: money::round_currency(total * pct / money::HUNDRED),
                })
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;

    fn members(ids: &[u32]) -> Vec<MemberId> {
        ids.iter().copied().map(MemberId).collect()
    }

    #[test]
    fn equal_split_of_100_among_3_reconciles() {
        let allocations =
            allocate(dec!(100), &SplitStrategy::Equal { participants: members(&[1, 2, 3]) })
                .unwrap();

        assert_eq!(allocations.len(), 3);
        for a in &allocations {
            assert_eq!(a.amount, dec!(33.33));
        }
        let sum: Decimal = allocations.iter().map(|a| a.amount).sum();
        assert!((sum - dec!(100)).abs() <= dec!(0.02));
    }

    #[test]
    fn equal_split_preserves_participant_order() {
        let allocations =
            allocate(dec!(30), &SplitStrategy::Equal { participants: members(&[3, 1, 2]) })
                .unwrap();
        let order: Vec<MemberId> = allocations.iter().map(|a| a.participant).collect();
        assert_eq!(order, members(&[3, 1, 2]));
    }

    #[test]
    fn exact_split_that_sums_short_is_rejected_with_delta() {
        let err = allocate(
            dec!(100),
            &SplitStrategy::Exact {
                shares: vec![(MemberId(1), dec!(40)), (MemberId(2), dec!(40))],
            },
        )
        .unwrap_err();

        assert_eq!(
            err,
            Error::SplitMismatch {
                expected: dec!(100),
                actual: dec!(80),
                delta: dec!(20),
            }
        );
    }

    #[test]
    fn exact_split_drops_zero_shares() {
        let allocations = allocate(
            dec!(50),
            &SplitStrategy::Exact {
                shares: vec![
                    (MemberId(1), dec!(50)),
                    (MemberId(2), dec!(0)),
                    (MemberId(3), dec!(0.02)),
                ],
            },
        )
        .unwrap();

        let who: Vec<MemberId> = allocations.iter().map(|a| a.participant).collect();
        assert_eq!(who, members(&[1, 3]));
    }

    #[rstest]
    #[case::within_tolerance(vec![(1, dec!(50.2)), (2, dec!(49.9))], true)]
    #[case::exactly_100(vec![(1, dec!(60)), (2, dec!(40))], true)]
    #[case::off_by_one_point(vec![(1, dec!(60)), (2, dec!(41))], false)]
    fn percentage_split_tolerance(#[case] shares: Vec<(u32, Decimal)>, #[case] ok: bool) {
        let shares = shares
            .into_iter()
            .map(|(id, pct)| (MemberId(id), pct))
            .collect();
        let result = allocate(dec!(80), &SplitStrategy::Percentage { shares });
        assert_eq!(result.is_ok(), ok, "{result:?}");
    }

    #[test]
    fn percentage_amounts_are_rounded_to_cents() {
        let allocations = allocate(
            dec!(99.99),
            &SplitStrategy::Percentage {
                shares: vec![(MemberId(1), dec!(33.33)), (MemberId(2), dec!(66.67))],
            },
        )
        .unwrap();

        assert_eq!(allocations[0].amount, dec!(33.33));
        assert_eq!(allocations[1].amount, dec!(66.66));
    }

    #[rstest]
    #[case::zero(dec!(0))]
    #[case::negative(dec!(-5))]
    fn non_positive_total_is_rejected(#[case] total: Decimal) {
        let err = allocate(total, &SplitStrategy::Equal { participants: members(&[1]) })
            .unwrap_err();
        assert_eq!(err, Error::InvalidAmount(total));
    }

    #[test]
    fn equal_split_with_nobody_selected_is_rejected() {
        let err = allocate(dec!(10), &SplitStrategy::Equal { participants: vec![] }).unwrap_err();
        assert_eq!(err, Error::EmptySelection);
    }

    #[test]
    fn negative_exact_share_is_rejected() {
        let err = allocate(
            dec!(10),
            &SplitStrategy::Exact {
                shares: vec![(MemberId(1), dec!(15)), (MemberId(2), dec!(-5))],
            },
        )
        .unwrap_err();
        assert_eq!(err, Error::InvalidAmount(dec!(-5)));
    }
}
