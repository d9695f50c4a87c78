//! Fund Metrics - Performance metrics engine for private-equity funds
//!
//! This library provides:
//! - Typed, validated cash-flow ledgers (capital calls, distributions, adjustments)
//! - Exact decimal money arithmetic
//! - Paid-In Capital, DPI and IRR with audit breakdowns
//! - Batch computation across funds
//!
//! ```
//! use fund_metrics::{Money, paid_in_capital};
//!
//! let pic = paid_in_capital(Money::from_units(500_000), Money::from_units(600_000));
//! assert_eq!(pic, Money::ZERO);
//! ```

pub mod error;
pub mod fund;
pub mod metrics;
pub mod report;
pub mod repository;
pub mod runner;

// Re-export commonly used types
pub use error::{Error, Result};
pub use fund::{Adjustment, AdjustmentType, CapitalCall, Distribution, Fund, FundId, Money};
pub use metrics::pic::paid_in_capital;
pub use metrics::{Breakdown, FundMetrics, MetricsCalculator, MetricsConfig};
pub use report::{fund_report, metric_report, FundReport, MetricReport};
pub use repository::{CashFlowRepository, InMemoryRepository};
pub use runner::MetricsRunner;
