//! Ingestion boundary checks
//!
//! Records are validated once, before they reach a repository. The metric
//! engines assume every record they read has passed these checks.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use super::{Adjustment, AdjustmentType, CapitalCall, Distribution, FundId, Money};

/// A record that must not enter the ledger
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{record} for fund {fund_id} on {date} has negative amount {amount}")]
    NegativeAmount {
        record: &'static str,
        fund_id: FundId,
        date: NaiveDate,
        amount: Money,
    },

    #[error("amount '{0}' has precision below cents")]
    SubCentPrecision(String),

    #[error("amount '{0}' is not a decimal number")]
    UnparseableAmount(String),

    #[error("unknown adjustment type '{0}'")]
    UnknownAdjustmentType(String),
}

/// A suspicious but admissible ledger pattern
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationWarning {
    pub fund_id: FundId,
    pub date: NaiveDate,
    pub amount: Money,
    pub message: String,
}

/// Parse an extracted amount cell such as `$5,000,000` or `-$500,000.00`.
pub fn parse_amount(raw: &str) -> Result<Money, ValidationError> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();

    cleaned.parse::<Money>().map_err(|e| match e {
        ValidationError::SubCentPrecision(_) => ValidationError::SubCentPrecision(raw.to_string()),
        _ => ValidationError::UnparseableAmount(raw.to_string()),
    })
}

/// Parse an adjustment type label, rejecting anything outside the known set
pub fn parse_adjustment_type(label: &str) -> Result<AdjustmentType, ValidationError> {
    AdjustmentType::parse(label).ok_or_else(|| ValidationError::UnknownAdjustmentType(label.to_string()))
}

pub fn validate_capital_call(call: &CapitalCall) -> Result<(), ValidationError> {
    if call.amount.is_negative() {
        return Err(ValidationError::NegativeAmount {
            record: "capital call",
            fund_id: call.fund_id,
            date: call.call_date,
            amount: call.amount,
        });
    }
    Ok(())
}

pub fn validate_distribution(distribution: &Distribution) -> Result<(), ValidationError> {
    if distribution.amount.is_negative() {
        return Err(ValidationError::NegativeAmount {
            record: "distribution",
            fund_id: distribution.fund_id,
            date: distribution.distribution_date,
            amount: distribution.amount,
        });
    }
    Ok(())
}

/// Flag recallable distributions that appear to be booked twice: once as a
/// distribution with `is_recallable` set and once as a
/// `Recallable Distribution` adjustment of the same size on the same date.
pub fn find_double_booked_recallables(
    distributions: &[Distribution],
    adjustments: &[Adjustment],
) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for adj in adjustments
        .iter()
        .filter(|a| a.adjustment_type.is_recallable_distribution())
    {
        let mirrored = distributions.iter().any(|d| {
            d.is_recallable
                && d.fund_id == adj.fund_id
                && d.distribution_date == adj.adjustment_date
                && d.amount == adj.amount.abs()
        });

        if mirrored {
            warnings.push(ValidationWarning {
                fund_id: adj.fund_id,
                date: adj.adjustment_date,
                amount: adj.amount,
                message: format!(
                    "recallable distribution of {} on {} is booked both as a distribution and as an adjustment",
                    adj.amount.abs(),
                    adj.adjustment_date
                ),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_amount_strips_formatting() {
        assert_eq!(parse_amount("$5,000,000").unwrap(), Money::from_units(5_000_000));
        assert_eq!(parse_amount("-$500,000").unwrap(), Money::from_units(-500_000));
        assert_eq!(parse_amount(" 1234.50 ").unwrap().to_string(), "1234.50");
    }

    #[test]
    fn test_parse_amount_rejects_bad_input() {
        assert!(matches!(parse_amount("12.345"), Err(ValidationError::SubCentPrecision(_))));
        assert!(matches!(parse_amount("n/a"), Err(ValidationError::UnparseableAmount(_))));
    }

    #[test]
    fn test_negative_capital_call_rejected() {
        let call = CapitalCall::new(1, date("2023-01-15"), Money::from_units(-10));
        assert!(matches!(
            validate_capital_call(&call),
            Err(ValidationError::NegativeAmount { record: "capital call", .. })
        ));

        let ok = CapitalCall::new(1, date("2023-01-15"), Money::ZERO);
        assert!(validate_capital_call(&ok).is_ok());
    }

    #[test]
    fn test_negative_distribution_rejected() {
        let dist = Distribution::new(1, date("2023-12-15"), Money::from_units(-1));
        assert!(validate_distribution(&dist).is_err());
    }

    #[test]
    fn test_unknown_adjustment_type_rejected() {
        assert_eq!(
            parse_adjustment_type("Fee Rebate"),
            Err(ValidationError::UnknownAdjustmentType("Fee Rebate".to_string()))
        );
        assert_eq!(
            parse_adjustment_type("Recallable Distribution"),
            Ok(AdjustmentType::RecallableDistribution)
        );
    }

    #[test]
    fn test_double_booked_recallable_is_flagged() {
        let distributions = vec![
            Distribution::new(1, date("2024-09-10"), Money::from_units(2_000_000)).recallable(),
            Distribution::new(1, date("2024-06-20"), Money::from_units(500_000)),
        ];
        let adjustments = vec![
            Adjustment::new(
                1,
                date("2024-09-10"),
                Money::from_units(-2_000_000),
                AdjustmentType::RecallableDistribution,
            ),
            Adjustment::new(
                1,
                date("2024-06-20"),
                Money::from_units(-500_000),
                AdjustmentType::RecallableDistribution,
            ),
        ];

        let warnings = find_double_booked_recallables(&distributions, &adjustments);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].date, date("2024-09-10"));
    }
}
