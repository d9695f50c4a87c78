//! Paid-In Capital
//!
//! `PIC = Σ capital calls - Σ adjustments`, floored at zero. Every
//! adjustment kind folds into the single subtraction; the per-kind split in
//! [`PicDecomposition`] exists only for audit output.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::fund::{Adjustment, AdjustmentType, CapitalCall, Money};

/// PIC from the two ledger totals. Negative results clamp to zero.
pub fn paid_in_capital(total_calls: Money, total_adjustments: Money) -> Money {
    (total_calls - total_adjustments).clamp_non_negative()
}

/// Audit split of a PIC figure by adjustment kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PicDecomposition {
    pub total_calls: Money,
    pub total_adjustments: Money,
    /// Adjustments typed `Recallable Distribution`
    pub recallable_distribution_adjustments: Money,
    /// Every other adjustment kind
    pub other_adjustments: Money,
    pub adjustments_by_type: BTreeMap<AdjustmentType, Money>,
    pub pic: Money,
}

impl PicDecomposition {
    pub fn from_records(capital_calls: &[CapitalCall], adjustments: &[Adjustment]) -> Self {
        let total_calls: Money = capital_calls.iter().map(|c| c.amount).sum();

        let mut adjustments_by_type: BTreeMap<AdjustmentType, Money> =
            AdjustmentType::ALL.iter().map(|&kind| (kind, Money::ZERO)).collect();
        for adj in adjustments {
            *adjustments_by_type.entry(adj.adjustment_type).or_default() += adj.amount;
        }

        let recallable_distribution_adjustments = adjustments_by_type
            .get(&AdjustmentType::RecallableDistribution)
            .copied()
            .unwrap_or_default();
        let other_adjustments: Money = adjustments_by_type
            .iter()
            .filter(|(kind, _)| !kind.is_recallable_distribution())
            .map(|(_, amount)| *amount)
            .sum();
        let total_adjustments = recallable_distribution_adjustments + other_adjustments;

        Self {
            total_calls,
            total_adjustments,
            recallable_distribution_adjustments,
            other_adjustments,
            adjustments_by_type,
            pic: paid_in_capital(total_calls, total_adjustments),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn cents(value: i64) -> Money {
        Money::new(Decimal::new(value, 2))
    }

    #[test]
    fn test_pic_subtracts_adjustments() {
        assert_eq!(
            paid_in_capital(Money::from_units(11_500_000), Money::from_units(-450_000)),
            Money::from_units(11_950_000)
        );
    }

    #[test]
    fn test_pic_clamps_to_zero() {
        assert_eq!(
            paid_in_capital(Money::from_units(500_000), Money::from_units(600_000)),
            Money::ZERO
        );
        assert_eq!(paid_in_capital(Money::ZERO, Money::ZERO), Money::ZERO);
    }

    #[test]
    fn test_decomposition_reconciles() {
        let calls = vec![
            CapitalCall::new(1, date("2023-01-15"), Money::from_units(5_000_000)),
            CapitalCall::new(1, date("2023-06-20"), Money::from_units(3_000_000)),
        ];
        let adjustments = vec![
            Adjustment::new(
                1,
                date("2024-01-15"),
                Money::from_units(-500_000),
                AdjustmentType::RecallableDistribution,
            ),
            Adjustment::new(
                1,
                date("2024-03-20"),
                Money::from_units(100_000),
                AdjustmentType::CapitalCallAdjustment,
            ),
            Adjustment::new(
                1,
                date("2024-07-10"),
                Money::from_units(-50_000),
                AdjustmentType::ContributionAdjustment,
            ),
        ];

        let split = PicDecomposition::from_records(&calls, &adjustments);
        assert_eq!(split.total_calls, Money::from_units(8_000_000));
        assert_eq!(split.recallable_distribution_adjustments, Money::from_units(-500_000));
        assert_eq!(split.other_adjustments, Money::from_units(50_000));
        assert_eq!(split.total_adjustments, Money::from_units(-450_000));
        assert_eq!(split.pic, Money::from_units(8_450_000));
        assert_eq!(
            split.adjustments_by_type[&AdjustmentType::OtherAdjustment],
            Money::ZERO
        );
    }

    proptest! {
        #[test]
        fn prop_pic_never_negative(
            calls in proptest::collection::vec(0i64..100_000_000_000, 0..20),
            adjustments in proptest::collection::vec(-100_000_000_000i64..100_000_000_000, 0..20),
        ) {
            let total_calls: Money = calls.iter().map(|&c| cents(c)).sum();
            let total_adjustments: Money = adjustments.iter().map(|&a| cents(a)).sum();
            prop_assert!(!paid_in_capital(total_calls, total_adjustments).is_negative());
        }

        #[test]
        fn prop_pic_is_exact_clamped_difference(
            calls in proptest::collection::vec(0i64..100_000_000_000, 0..20),
            adjustments in proptest::collection::vec(-100_000_000_000i64..100_000_000_000, 0..20),
        ) {
            let call_cents: i64 = calls.iter().sum();
            let adjustment_cents: i64 = adjustments.iter().sum();
            let expected = cents((call_cents - adjustment_cents).max(0));

            let total_calls: Money = calls.iter().map(|&c| cents(c)).sum();
            let total_adjustments: Money = adjustments.iter().map(|&a| cents(a)).sum();
            prop_assert_eq!(paid_in_capital(total_calls, total_adjustments), expected);
        }

        #[test]
        fn prop_decomposition_matches_totals(
            amounts in proptest::collection::vec((-1_000_000_000i64..1_000_000_000, 0usize..4), 0..20),
        ) {
            let adjustments: Vec<Adjustment> = amounts
                .iter()
                .map(|&(amount, kind)| {
                    Adjustment::new(1, date("2024-01-01"), cents(amount), AdjustmentType::ALL[kind])
                })
                .collect();
            let calls = vec![CapitalCall::new(1, date("2023-01-01"), Money::from_units(1_000_000))];

            let split = PicDecomposition::from_records(&calls, &adjustments);
            let direct: Money = adjustments.iter().map(|a| a.amount).sum();
            prop_assert_eq!(split.total_adjustments, direct);
            prop_assert_eq!(split.pic, paid_in_capital(split.total_calls, direct));
        }
    }
}
