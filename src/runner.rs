//! Batch runner for computing metrics across many funds
//!
//! Wraps one shared calculator and fans fund ids out over the rayon pool.
//! Each fund is computed independently, so results match single-fund runs.

use rayon::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::fund::FundId;
use crate::metrics::{FundMetrics, MetricsCalculator, MetricsConfig};
use crate::repository::CashFlowRepository;

/// Metrics for one fund in a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundRun {
    pub fund_id: FundId,
    pub metrics: FundMetrics,
}

/// Pre-built runner for batch metric computation
///
/// # Example
/// ```ignore
/// let runner = MetricsRunner::new(repo, MetricsConfig::from_env()?);
/// for run in runner.run_all()? {
///     println!("{}: {:?}", run.fund_id, run.metrics.irr);
/// }
/// ```
pub struct MetricsRunner<R> {
    calculator: MetricsCalculator<R>,
}

impl<R: CashFlowRepository + Sync> MetricsRunner<R> {
    pub fn new(repository: R, config: MetricsConfig) -> Self {
        Self {
            calculator: MetricsCalculator::new(repository, config),
        }
    }

    pub fn calculator(&self) -> &MetricsCalculator<R> {
        &self.calculator
    }

    /// Compute every metric for a single fund
    pub fn run(&self, fund_id: FundId) -> FundRun {
        FundRun {
            fund_id,
            metrics: self.calculator.compute_all_metrics(fund_id),
        }
    }

    /// Compute metrics for the given funds in parallel, preserving input order
    pub fn run_batch(&self, fund_ids: &[FundId]) -> Vec<FundRun> {
        log::info!("Computing metrics for {} funds", fund_ids.len());
        fund_ids.par_iter().map(|&id| self.run(id)).collect()
    }

    /// Compute metrics for every fund the repository knows about
    pub fn run_all(&self) -> Result<Vec<FundRun>> {
        let fund_ids = self.calculator.repository().fund_ids()?;
        Ok(self.run_batch(&fund_ids))
    }
}
