//! Audit breakdowns of headline metrics

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::cashflows::{CashFlow, CashFlowSummary};
use crate::error::Error;
use crate::fund::{Adjustment, AdjustmentType, CapitalCall, Distribution, Money, ValidationWarning};

/// Metrics that have a breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Pic,
    Dpi,
    Irr,
}

impl Metric {
    pub const SUPPORTED: [&'static str; 3] = ["pic", "dpi", "irr"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Pic => "pic",
            Metric::Dpi => "dpi",
            Metric::Irr => "irr",
        }
    }

    /// Case-insensitive lookup
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "pic" => Some(Metric::Pic),
            "dpi" => Some(Metric::Dpi),
            "irr" => Some(Metric::Irr),
            _ => None,
        }
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::parse(s).ok_or_else(|| Error::UnsupportedMetric { metric: s.to_string() })
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Breakdown returned for a metric request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Breakdown {
    Pic(PicBreakdown),
    Dpi(DpiBreakdown),
    Irr(IrrBreakdown),
    /// The requested metric has no breakdown
    Unsupported(UnsupportedMetric),
}

impl Breakdown {
    pub fn is_error(&self) -> bool {
        matches!(self, Breakdown::Unsupported(_))
    }
}

/// Structured error naming the metrics that do have breakdowns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnsupportedMetric {
    pub error: String,
    pub metric: String,
    pub supported: Vec<&'static str>,
}

impl UnsupportedMetric {
    pub fn new(metric: &str) -> Self {
        Self {
            error: format!("Unknown metric '{}'", metric),
            metric: metric.to_string(),
            supported: Metric::SUPPORTED.to_vec(),
        }
    }
}

/// Every ledger row of a fund, in repository order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LedgerTransactions {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub capital_calls: Vec<CapitalCall>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub distributions: Vec<Distribution>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub adjustments: Vec<Adjustment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PicBreakdown {
    pub metric: &'static str,
    pub formula: &'static str,
    pub total_calls: Money,
    pub total_adjustments: Money,
    pub recallable_distribution_adjustments: Money,
    pub other_adjustments: Money,
    pub adjustments_by_type: BTreeMap<AdjustmentType, Money>,
    pub result: Money,
    pub explanation: String,
    pub transactions: LedgerTransactions,
    pub warnings: Vec<ValidationWarning>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DpiBreakdown {
    pub metric: &'static str,
    pub formula: &'static str,
    pub pic: Money,
    pub total_distributions: Money,
    pub result: f64,
    pub explanation: String,
    pub transactions: LedgerTransactions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrrBreakdown {
    pub metric: &'static str,
    pub formula: &'static str,
    /// Full series fed to the solver, terminal value included
    pub cash_flows: Vec<CashFlow>,
    pub target_tvpi: Decimal,
    /// Synthesized NAV, absent when there were too few flows to solve
    pub terminal_value: Option<Money>,
    /// Percent, `None` when not computable
    pub result: Option<f64>,
    pub explanation: String,
    pub cash_flow_summary: CashFlowSummary,
}
