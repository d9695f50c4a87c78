//! Signed, dated cash-flow series used by the IRR solver

use chrono::NaiveDate;
use serde::Serialize;

use crate::fund::{CapitalCall, Distribution, Money};

/// Origin of a cash flow in the IRR series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowKind {
    CapitalCall,
    Distribution,
    /// Synthesized residual value, not a ledger row
    TerminalValue,
}

/// A single signed cash flow, investor perspective
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlow {
    pub date: NaiveDate,
    /// Negative = paid in, positive = received
    pub amount: Money,
    #[serde(rename = "type")]
    pub kind: CashFlowKind,
}

/// Date-ordered cash-flow series for one fund
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CashFlowSeries {
    pub flows: Vec<CashFlow>,
}

impl CashFlowSeries {
    /// Capital calls enter as negative flows, distributions as positive ones.
    /// Adjustments never enter the series.
    ///
    /// The sort is stable: on equal dates capital calls stay ahead of
    /// distributions and each keeps its repository order.
    pub fn from_ledger(capital_calls: &[CapitalCall], distributions: &[Distribution]) -> Self {
        let mut flows: Vec<CashFlow> = Vec::with_capacity(capital_calls.len() + distributions.len() + 1);

        flows.extend(capital_calls.iter().map(|call| CashFlow {
            date: call.call_date,
            amount: -call.amount,
            kind: CashFlowKind::CapitalCall,
        }));
        flows.extend(distributions.iter().map(|dist| CashFlow {
            date: dist.distribution_date,
            amount: dist.amount,
            kind: CashFlowKind::Distribution,
        }));

        flows.sort_by_key(|cf| cf.date);
        Self { flows }
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.flows.iter().map(|cf| cf.date).min()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.flows.iter().map(|cf| cf.date).max()
    }

    /// Append the synthesized NAV as a final inflow dated at the latest flow.
    /// No-op on an empty series.
    pub fn push_terminal_value(&mut self, nav: Money) {
        if let Some(date) = self.last_date() {
            self.flows.push(CashFlow {
                date,
                amount: nav,
                kind: CashFlowKind::TerminalValue,
            });
        }
    }

    /// `(years since first flow, amount)` pairs for the solver
    pub fn year_fractions(&self, days_per_year: f64) -> Vec<(f64, f64)> {
        let Some(start) = self.first_date() else {
            return Vec::new();
        };

        self.flows
            .iter()
            .map(|cf| {
                let days = (cf.date - start).num_days() as f64;
                (days / days_per_year, cf.amount.to_f64())
            })
            .collect()
    }

    /// Exact inflow / outflow / net totals
    pub fn summary(&self) -> CashFlowSummary {
        let total_outflows: Money = self
            .flows
            .iter()
            .filter(|cf| cf.amount.is_negative())
            .map(|cf| cf.amount)
            .sum();
        let total_inflows: Money = self
            .flows
            .iter()
            .filter(|cf| cf.amount.is_positive())
            .map(|cf| cf.amount)
            .sum();

        CashFlowSummary {
            total_outflows,
            total_inflows,
            net_cash_flow: total_inflows + total_outflows,
        }
    }
}

/// Aggregate sums over a cash-flow series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowSummary {
    /// Sum of negative flows (itself negative)
    pub total_outflows: Money,
    pub total_inflows: Money,
    pub net_cash_flow: Money,
}
