//! Read access to persisted fund cash flows
//!
//! The metric engines only ever read through [`CashFlowRepository`]. Every
//! query is scoped to one fund; nothing here aggregates across funds.
//!
//! Ordered sequences are sorted by date, ties broken by insertion order.

mod memory;

pub use memory::InMemoryRepository;

use crate::error::Result;
use crate::fund::{Adjustment, CapitalCall, Distribution, Fund, FundId, Money};

/// Trait for cash-flow stores
///
/// Implementors backed by a database should override the `total_*`
/// methods with aggregate queries; the defaults sum the ordered sequences.
pub trait CashFlowRepository {
    /// Fund metadata, `None` if the fund is unknown
    fn fund(&self, fund_id: FundId) -> Result<Option<Fund>>;

    /// Every fund with metadata or ledger rows, ascending
    fn fund_ids(&self) -> Result<Vec<FundId>>;

    /// Capital calls ordered by call date
    fn capital_calls(&self, fund_id: FundId) -> Result<Vec<CapitalCall>>;

    /// Distributions ordered by distribution date
    fn distributions(&self, fund_id: FundId) -> Result<Vec<Distribution>>;

    /// Adjustments ordered by adjustment date
    fn adjustments(&self, fund_id: FundId) -> Result<Vec<Adjustment>>;

    /// Sum of capital-call amounts (zero when there are none)
    fn total_capital_calls(&self, fund_id: FundId) -> Result<Money> {
        Ok(self.capital_calls(fund_id)?.iter().map(|c| c.amount).sum())
    }

    /// Sum of distribution amounts (zero when there are none)
    fn total_distributions(&self, fund_id: FundId) -> Result<Money> {
        Ok(self.distributions(fund_id)?.iter().map(|d| d.amount).sum())
    }

    /// Sum of signed adjustment amounts (zero when there are none)
    fn total_adjustments(&self, fund_id: FundId) -> Result<Money> {
        Ok(self.adjustments(fund_id)?.iter().map(|a| a.amount).sum())
    }
}

impl<R: CashFlowRepository + ?Sized> CashFlowRepository for &R {
    fn fund(&self, fund_id: FundId) -> Result<Option<Fund>> {
        (**self).fund(fund_id)
    }

    fn fund_ids(&self) -> Result<Vec<FundId>> {
        (**self).fund_ids()
    }

    fn capital_calls(&self, fund_id: FundId) -> Result<Vec<CapitalCall>> {
        (**self).capital_calls(fund_id)
    }

    fn distributions(&self, fund_id: FundId) -> Result<Vec<Distribution>> {
        (**self).distributions(fund_id)
    }

    fn adjustments(&self, fund_id: FundId) -> Result<Vec<Adjustment>> {
        (**self).adjustments(fund_id)
    }

    fn total_capital_calls(&self, fund_id: FundId) -> Result<Money> {
        (**self).total_capital_calls(fund_id)
    }

    fn total_distributions(&self, fund_id: FundId) -> Result<Money> {
        (**self).total_distributions(fund_id)
    }

    fn total_adjustments(&self, fund_id: FundId) -> Result<Money> {
        (**self).total_adjustments(fund_id)
    }
}
