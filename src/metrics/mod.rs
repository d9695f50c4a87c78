//! Fund performance metrics: PIC, DPI, IRR and their breakdowns

mod breakdown;
mod calculator;
mod cashflows;
pub mod config;
pub mod dpi;
pub mod irr;
pub mod pic;

pub use breakdown::{
    Breakdown, DpiBreakdown, IrrBreakdown, LedgerTransactions, Metric, PicBreakdown, UnsupportedMetric,
};
pub use calculator::{FundMetrics, MetricsCalculator};
pub use cashflows::{CashFlow, CashFlowKind, CashFlowSeries, CashFlowSummary};
pub use config::MetricsConfig;
