//! Metrics orchestrator: PIC, DPI and IRR for one fund
//!
//! Every public computation is infallible from the caller's point of view.
//! Repository failures are logged and replaced by zero / empty data, and an
//! IRR that cannot be solved is `None`.

use serde::Serialize;
use std::fmt;

use super::breakdown::{
    Breakdown, DpiBreakdown, IrrBreakdown, LedgerTransactions, Metric, PicBreakdown, UnsupportedMetric,
};
use super::cashflows::CashFlowSeries;
use super::config::MetricsConfig;
use super::dpi::distributions_to_paid_in;
use super::irr::{solve_irr, to_rounded_percent};
use super::pic::{paid_in_capital, PicDecomposition};
use crate::error::Result;
use crate::fund::validation::find_double_booked_recallables;
use crate::fund::{FundId, Money};
use crate::repository::CashFlowRepository;

/// Headline metrics of one fund, flat as the query layer consumes them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundMetrics {
    pub pic: Money,
    pub total_distributions: Money,
    pub dpi: f64,
    /// Percent; `None` when there is too little data or no convergence
    pub irr: Option<f64>,
    /// Reserved, not yet computed
    pub tvpi: Option<f64>,
    /// Reserved, not yet computed
    pub rvpi: Option<f64>,
    /// Reserved, not yet computed
    pub nav: Option<f64>,
}

impl fmt::Display for FundMetrics {
    /// One `- KEY: value` line per available metric; absent ones are skipped
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- PIC: {}", self.pic)?;
        writeln!(f, "- TOTAL_DISTRIBUTIONS: {}", self.total_distributions)?;
        writeln!(f, "- DPI: {}", self.dpi)?;
        let optional = [("IRR", self.irr), ("TVPI", self.tvpi), ("RVPI", self.rvpi), ("NAV", self.nav)];
        for (key, value) in optional {
            if let Some(value) = value {
                writeln!(f, "- {}: {}", key, value)?;
            }
        }
        Ok(())
    }
}

/// IRR series together with the synthesized NAV and the solved rate
struct IrrComputation {
    series: CashFlowSeries,
    terminal_value: Option<Money>,
    rate_percent: Option<f64>,
}

/// Main metrics engine
pub struct MetricsCalculator<R> {
    repository: R,
    config: MetricsConfig,
}

impl<R: CashFlowRepository> MetricsCalculator<R> {
    /// Create a calculator over a repository with the given config
    pub fn new(repository: R, config: MetricsConfig) -> Self {
        Self { repository, config }
    }

    pub fn with_default_config(repository: R) -> Self {
        Self::new(repository, MetricsConfig::default())
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Paid-In Capital, never negative
    pub fn compute_pic(&self, fund_id: FundId) -> Money {
        let total_calls = self.absorb(fund_id, "capital call total", self.repository.total_capital_calls(fund_id));
        let total_adjustments =
            self.absorb(fund_id, "adjustment total", self.repository.total_adjustments(fund_id));
        paid_in_capital(total_calls, total_adjustments)
    }

    pub fn compute_total_distributions(&self, fund_id: FundId) -> Money {
        self.absorb(fund_id, "distribution total", self.repository.total_distributions(fund_id))
    }

    /// DPI rounded to 4 places, 0.0 when PIC is zero
    pub fn compute_dpi(&self, fund_id: FundId) -> f64 {
        let pic = self.compute_pic(fund_id);
        let total_distributions = self.compute_total_distributions(fund_id);
        distributions_to_paid_in(total_distributions, pic)
    }

    /// IRR in percent rounded to 2 places
    pub fn compute_irr(&self, fund_id: FundId) -> Option<f64> {
        self.irr_computation(fund_id).rate_percent
    }

    pub fn compute_all_metrics(&self, fund_id: FundId) -> FundMetrics {
        FundMetrics {
            pic: self.compute_pic(fund_id),
            total_distributions: self.compute_total_distributions(fund_id),
            dpi: self.compute_dpi(fund_id),
            irr: self.compute_irr(fund_id),
            tvpi: None,
            rvpi: None,
            nav: None,
        }
    }

    /// Audit trail for `pic`, `dpi` or `irr`. Any other name yields
    /// [`Breakdown::Unsupported`] naming the supported set.
    pub fn get_breakdown(&self, fund_id: FundId, metric: &str) -> Breakdown {
        match Metric::parse(metric) {
            Some(Metric::Pic) => Breakdown::Pic(self.pic_breakdown(fund_id)),
            Some(Metric::Dpi) => Breakdown::Dpi(self.dpi_breakdown(fund_id)),
            Some(Metric::Irr) => Breakdown::Irr(self.irr_breakdown(fund_id)),
            None => Breakdown::Unsupported(UnsupportedMetric::new(metric)),
        }
    }

    fn pic_breakdown(&self, fund_id: FundId) -> PicBreakdown {
        let capital_calls = self.absorb(fund_id, "capital calls", self.repository.capital_calls(fund_id));
        let adjustments = self.absorb(fund_id, "adjustments", self.repository.adjustments(fund_id));
        let distributions = self.absorb(fund_id, "distributions", self.repository.distributions(fund_id));

        let split = PicDecomposition::from_records(&capital_calls, &adjustments);
        let pic = self.compute_pic(fund_id);

        let unclamped = split.total_calls - split.total_adjustments;
        let explanation = if unclamped.is_negative() {
            format!(
                "PIC = {} - ({}) = {}, clamped to {}",
                split.total_calls, split.total_adjustments, unclamped, pic
            )
        } else {
            format!("PIC = {} - ({}) = {}", split.total_calls, split.total_adjustments, pic)
        };

        PicBreakdown {
            metric: "PIC",
            formula: "Total Capital Calls - Adjustments (floored at 0)",
            total_calls: split.total_calls,
            total_adjustments: split.total_adjustments,
            recallable_distribution_adjustments: split.recallable_distribution_adjustments,
            other_adjustments: split.other_adjustments,
            adjustments_by_type: split.adjustments_by_type,
            result: pic,
            explanation,
            warnings: find_double_booked_recallables(&distributions, &adjustments),
            transactions: LedgerTransactions {
                capital_calls,
                distributions: Vec::new(),
                adjustments,
            },
        }
    }

    fn dpi_breakdown(&self, fund_id: FundId) -> DpiBreakdown {
        let pic = self.compute_pic(fund_id);
        let total_distributions = self.compute_total_distributions(fund_id);
        let dpi = distributions_to_paid_in(total_distributions, pic);

        DpiBreakdown {
            metric: "DPI",
            formula: "Cumulative Distributions / Paid-In Capital",
            pic,
            total_distributions,
            result: dpi,
            explanation: format!("DPI = {} / {} = {:.4}", total_distributions, pic, dpi),
            transactions: LedgerTransactions {
                capital_calls: self.absorb(fund_id, "capital calls", self.repository.capital_calls(fund_id)),
                distributions: self.absorb(fund_id, "distributions", self.repository.distributions(fund_id)),
                adjustments: self.absorb(fund_id, "adjustments", self.repository.adjustments(fund_id)),
            },
        }
    }

    fn irr_breakdown(&self, fund_id: FundId) -> IrrBreakdown {
        let computation = self.irr_computation(fund_id);

        let result_text = computation
            .rate_percent
            .map(|r| format!("{}%", r))
            .unwrap_or_else(|| "not computable".to_string());
        let explanation = match computation.terminal_value {
            Some(nav) => format!(
                "IRR calculated from {} cash flows (including terminal NAV of {} at target TVPI {}) = {}",
                computation.series.len(),
                nav,
                self.config.target_tvpi,
                result_text
            ),
            None => format!(
                "IRR requires at least 2 cash flows, found {} = {}",
                computation.series.len(),
                result_text
            ),
        };

        IrrBreakdown {
            metric: "IRR",
            formula: "Internal Rate of Return (NPV = 0)",
            cash_flow_summary: computation.series.summary(),
            cash_flows: computation.series.flows,
            target_tvpi: self.config.target_tvpi,
            terminal_value: computation.terminal_value,
            result: computation.rate_percent,
            explanation,
        }
    }

    /// Build the IRR series, inject the terminal NAV and solve
    fn irr_computation(&self, fund_id: FundId) -> IrrComputation {
        let capital_calls = self.absorb(fund_id, "capital calls", self.repository.capital_calls(fund_id));
        let distributions = self.absorb(fund_id, "distributions", self.repository.distributions(fund_id));
        let mut series = CashFlowSeries::from_ledger(&capital_calls, &distributions);

        if series.len() < 2 {
            log::debug!("Fund {}: {} cash flow(s), IRR not computable", fund_id, series.len());
            return IrrComputation {
                series,
                terminal_value: None,
                rate_percent: None,
            };
        }

        // NAV = target TVPI * PIC - distributions
        let pic = self.compute_pic(fund_id);
        let total_distributions = self.compute_total_distributions(fund_id);
        let nav = pic.scaled_by(self.config.target_tvpi) - total_distributions;
        series.push_terminal_value(nav);

        let flows = series.year_fractions(self.config.days_per_year);
        let rate = solve_irr(
            &flows,
            &self.config.seed_rates,
            self.config.max_iterations,
            self.config.tolerance,
        );

        let rate_percent = rate.map(to_rounded_percent).filter(|r| r.is_finite());
        if rate_percent.is_none() {
            log::warn!(
                "Fund {}: IRR did not converge over {} cash flows from {} seeds",
                fund_id,
                flows.len(),
                self.config.seed_rates.len()
            );
        }

        IrrComputation {
            series,
            terminal_value: Some(nav),
            rate_percent,
        }
    }

    /// Log a repository failure and fall back to the type's empty value
    fn absorb<T: Default>(&self, fund_id: FundId, what: &str, result: Result<T>) -> T {
        result.unwrap_or_else(|e| {
            log::error!("Fund {}: failed to load {}: {}", fund_id, what, e);
            T::default()
        })
    }
}
