//! Query-layer reports for one fund
//!
//! Unlike the calculator, these reject unknown funds and metric names with
//! an [`Error`], since a caller asked for something that does not exist.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::fund::{FundId, Money};
use crate::metrics::{Breakdown, FundMetrics, Metric, MetricsCalculator};
use crate::repository::CashFlowRepository;

/// All headline metrics of a fund
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundReport {
    pub fund_id: FundId,
    pub fund_name: String,
    pub metrics: FundMetrics,
}

/// Headline number of a single metric
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Amount(Money),
    Ratio(f64),
    /// IRR percent, `null` when not computable
    Rate(Option<f64>),
}

/// One metric with its audit breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricReport {
    pub fund_id: FundId,
    pub fund_name: String,
    /// Upper-case metric name, e.g. `DPI`
    pub metric_name: String,
    pub value: MetricValue,
    pub breakdown: Breakdown,
}

/// Headline metrics for a known fund
pub fn fund_report<R: CashFlowRepository>(calc: &MetricsCalculator<R>, fund_id: FundId) -> Result<FundReport> {
    let fund_name = fund_name(calc, fund_id)?;
    Ok(FundReport {
        fund_id,
        fund_name,
        metrics: calc.compute_all_metrics(fund_id),
    })
}

/// Single metric plus breakdown for a known fund
pub fn metric_report<R: CashFlowRepository>(
    calc: &MetricsCalculator<R>,
    fund_id: FundId,
    metric: &str,
) -> Result<MetricReport> {
    let parsed: Metric = metric.parse()?;
    let fund_name = fund_name(calc, fund_id)?;

    let value = match parsed {
        Metric::Pic => MetricValue::Amount(calc.compute_pic(fund_id)),
        Metric::Dpi => MetricValue::Ratio(calc.compute_dpi(fund_id)),
        Metric::Irr => MetricValue::Rate(calc.compute_irr(fund_id)),
    };

    Ok(MetricReport {
        fund_id,
        fund_name,
        metric_name: parsed.as_str().to_uppercase(),
        value,
        breakdown: calc.get_breakdown(fund_id, parsed.as_str()),
    })
}

fn fund_name<R: CashFlowRepository>(calc: &MetricsCalculator<R>, fund_id: FundId) -> Result<String> {
    calc.repository()
        .fund(fund_id)?
        .map(|fund| fund.name)
        .ok_or(Error::FundNotFound(fund_id))
}
