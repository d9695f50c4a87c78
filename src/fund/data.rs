//! Fund ledger records as persisted by the ingestion pipeline

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Money;

/// Fund identifier (foreign key on every ledger record)
pub type FundId = u32;

/// Classification of a PIC adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AdjustmentType {
    /// Distribution recalled by the GP and booked against paid-in capital
    #[serde(rename = "Recallable Distribution")]
    RecallableDistribution,
    /// Correction to a capital call (e.g. management fee true-up)
    #[serde(rename = "Capital Call Adjustment")]
    CapitalCallAdjustment,
    /// Contribution correction (e.g. expense reimbursement)
    #[serde(rename = "Contribution Adjustment")]
    ContributionAdjustment,
    #[serde(rename = "Other Adjustment")]
    OtherAdjustment,
}

impl AdjustmentType {
    pub const ALL: [AdjustmentType; 4] = [
        AdjustmentType::RecallableDistribution,
        AdjustmentType::CapitalCallAdjustment,
        AdjustmentType::ContributionAdjustment,
        AdjustmentType::OtherAdjustment,
    ];

    /// Label as it appears in fund reports
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentType::RecallableDistribution => "Recallable Distribution",
            AdjustmentType::CapitalCallAdjustment => "Capital Call Adjustment",
            AdjustmentType::ContributionAdjustment => "Contribution Adjustment",
            AdjustmentType::OtherAdjustment => "Other Adjustment",
        }
    }

    /// Parse a report label. Case-insensitive; `_` and `-` count as spaces.
    pub fn parse(label: &str) -> Option<Self> {
        let normalized = label
            .trim()
            .to_lowercase()
            .replace(['_', '-'], " ");
        let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");

        match normalized.as_str() {
            "recallable distribution" => Some(AdjustmentType::RecallableDistribution),
            "capital call adjustment" => Some(AdjustmentType::CapitalCallAdjustment),
            "contribution adjustment" => Some(AdjustmentType::ContributionAdjustment),
            "other adjustment" | "other" => Some(AdjustmentType::OtherAdjustment),
            _ => None,
        }
    }

    pub fn is_recallable_distribution(&self) -> bool {
        matches!(self, AdjustmentType::RecallableDistribution)
    }
}

/// Fund metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fund {
    pub id: FundId,
    pub name: String,
    /// General partner
    pub gp_name: Option<String>,
    pub fund_type: Option<String>,
    pub vintage_year: Option<u16>,
}

impl Fund {
    pub fn new(id: FundId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            gp_name: None,
            fund_type: None,
            vintage_year: None,
        }
    }
}

/// Capital drawn from investors. Always an outflow from the investor's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalCall {
    pub fund_id: FundId,
    pub call_date: NaiveDate,
    /// Non-negative amount called
    pub amount: Money,
    /// e.g. "Call 1"
    pub call_type: Option<String>,
    pub description: Option<String>,
}

impl CapitalCall {
    pub fn new(fund_id: FundId, call_date: NaiveDate, amount: Money) -> Self {
        Self {
            fund_id,
            call_date,
            amount,
            call_type: None,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Cash returned to investors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub fund_id: FundId,
    pub distribution_date: NaiveDate,
    /// Non-negative amount distributed
    pub amount: Money,
    /// GP may call this amount back
    pub is_recallable: bool,
    /// e.g. "Return of Capital", "Income"
    pub distribution_type: Option<String>,
    pub description: Option<String>,
}

impl Distribution {
    pub fn new(fund_id: FundId, distribution_date: NaiveDate, amount: Money) -> Self {
        Self {
            fund_id,
            distribution_date,
            amount,
            is_recallable: false,
            distribution_type: None,
            description: None,
        }
    }

    pub fn recallable(mut self) -> Self {
        self.is_recallable = true;
        self
    }
}

/// Signed correction to paid-in capital
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub fund_id: FundId,
    pub adjustment_date: NaiveDate,
    /// Signed amount, subtracted from capital calls when computing PIC
    pub amount: Money,
    pub adjustment_type: AdjustmentType,
    pub category: Option<String>,
    pub is_contribution_adjustment: bool,
    pub description: Option<String>,
}

impl Adjustment {
    pub fn new(
        fund_id: FundId,
        adjustment_date: NaiveDate,
        amount: Money,
        adjustment_type: AdjustmentType,
    ) -> Self {
        Self {
            fund_id,
            adjustment_date,
            amount,
            adjustment_type,
            category: None,
            is_contribution_adjustment: matches!(
                adjustment_type,
                AdjustmentType::ContributionAdjustment
            ),
            description: None,
        }
    }
}
