//! In-memory cash-flow store

use std::collections::{BTreeMap, BTreeSet};

use super::CashFlowRepository;
use crate::error::Result;
use crate::fund::validation::{find_double_booked_recallables, validate_capital_call, validate_distribution};
use crate::fund::{Adjustment, CapitalCall, Distribution, Fund, FundId, LedgerEntry};

/// Rows of one fund, each tagged with its insertion sequence number
#[derive(Debug, Clone, Default)]
struct FundLedger {
    capital_calls: Vec<(u64, CapitalCall)>,
    distributions: Vec<(u64, Distribution)>,
    adjustments: Vec<(u64, Adjustment)>,
}

/// Repository holding validated ledger rows in memory
///
/// Inserts are validated; reads return rows sorted by `(date, sequence)`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    funds: BTreeMap<FundId, Fund>,
    ledgers: BTreeMap<FundId, FundLedger>,
    next_seq: u64,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from loaded funds and ledger entries
    pub fn from_entries(funds: Vec<Fund>, entries: Vec<LedgerEntry>) -> Result<Self> {
        let mut repo = Self::new();
        for fund in funds {
            repo.add_fund(fund);
        }
        for entry in entries {
            repo.insert(entry)?;
        }

        for fund_id in repo.fund_ids()? {
            let warnings =
                find_double_booked_recallables(&repo.distributions(fund_id)?, &repo.adjustments(fund_id)?);
            for warning in warnings {
                log::warn!("Fund {}: {}", fund_id, warning.message);
            }
        }

        Ok(repo)
    }

    pub fn add_fund(&mut self, fund: Fund) {
        self.funds.insert(fund.id, fund);
    }

    pub fn insert(&mut self, entry: LedgerEntry) -> Result<()> {
        match entry {
            LedgerEntry::CapitalCall(call) => self.insert_capital_call(call),
            LedgerEntry::Distribution(dist) => self.insert_distribution(dist),
            LedgerEntry::Adjustment(adj) => {
                self.insert_adjustment(adj);
                Ok(())
            }
        }
    }

    pub fn insert_capital_call(&mut self, call: CapitalCall) -> Result<()> {
        validate_capital_call(&call)?;
        let seq = self.bump_seq();
        self.ledger_mut(call.fund_id).capital_calls.push((seq, call));
        Ok(())
    }

    pub fn insert_distribution(&mut self, distribution: Distribution) -> Result<()> {
        validate_distribution(&distribution)?;
        let seq = self.bump_seq();
        self.ledger_mut(distribution.fund_id).distributions.push((seq, distribution));
        Ok(())
    }

    /// Adjustments are signed and typed at construction, so they always insert
    pub fn insert_adjustment(&mut self, adjustment: Adjustment) {
        let seq = self.bump_seq();
        self.ledger_mut(adjustment.fund_id).adjustments.push((seq, adjustment));
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn ledger_mut(&mut self, fund_id: FundId) -> &mut FundLedger {
        self.ledgers.entry(fund_id).or_default()
    }

    fn sorted<T: Clone, K: Ord>(rows: &[(u64, T)], date_of: impl Fn(&T) -> K) -> Vec<T> {
        let mut keyed: Vec<&(u64, T)> = rows.iter().collect();
        keyed.sort_by(|(seq_a, a), (seq_b, b)| date_of(a).cmp(&date_of(b)).then(seq_a.cmp(seq_b)));
        keyed.into_iter().map(|(_, row)| row.clone()).collect()
    }
}

impl CashFlowRepository for InMemoryRepository {
    fn fund(&self, fund_id: FundId) -> Result<Option<Fund>> {
        Ok(self.funds.get(&fund_id).cloned())
    }

    fn fund_ids(&self) -> Result<Vec<FundId>> {
        let ids: BTreeSet<FundId> = self.funds.keys().chain(self.ledgers.keys()).copied().collect();
        Ok(ids.into_iter().collect())
    }

    fn capital_calls(&self, fund_id: FundId) -> Result<Vec<CapitalCall>> {
        Ok(self
            .ledgers
            .get(&fund_id)
            .map(|l| Self::sorted(&l.capital_calls, |c| c.call_date))
            .unwrap_or_default())
    }

    fn distributions(&self, fund_id: FundId) -> Result<Vec<Distribution>> {
        Ok(self
            .ledgers
            .get(&fund_id)
            .map(|l| Self::sorted(&l.distributions, |d| d.distribution_date))
            .unwrap_or_default())
    }

    fn adjustments(&self, fund_id: FundId) -> Result<Vec<Adjustment>> {
        Ok(self
            .ledgers
            .get(&fund_id)
            .map(|l| Self::sorted(&l.adjustments, |a| a.adjustment_date))
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::fund::{AdjustmentType, Money};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_empty_fund_sums_are_zero() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.total_capital_calls(7).unwrap(), Money::ZERO);
        assert_eq!(repo.total_distributions(7).unwrap(), Money::ZERO);
        assert_eq!(repo.total_adjustments(7).unwrap(), Money::ZERO);
        assert!(repo.capital_calls(7).unwrap().is_empty());
    }

    #[test]
    fn test_ordering_is_by_date_then_insertion() {
        let mut repo = InMemoryRepository::new();
        repo.insert_capital_call(
            CapitalCall::new(1, date("2024-03-10"), Money::from_units(3)).with_description("late"),
        )
        .unwrap();
        repo.insert_capital_call(
            CapitalCall::new(1, date("2023-01-15"), Money::from_units(1)).with_description("first"),
        )
        .unwrap();
        repo.insert_capital_call(
            CapitalCall::new(1, date("2023-01-15"), Money::from_units(2)).with_description("second"),
        )
        .unwrap();

        let calls = repo.capital_calls(1).unwrap();
        let order: Vec<_> = calls.iter().map(|c| c.description.clone().unwrap()).collect();
        assert_eq!(order, vec!["first", "second", "late"]);
    }

    #[test]
    fn test_funds_are_isolated() {
        let mut repo = InMemoryRepository::new();
        repo.insert_capital_call(CapitalCall::new(1, date("2023-01-15"), Money::from_units(100)))
            .unwrap();
        repo.insert_capital_call(CapitalCall::new(2, date("2023-01-15"), Money::from_units(900)))
            .unwrap();
        repo.insert_adjustment(Adjustment::new(
            2,
            date("2023-02-01"),
            Money::from_units(-5),
            AdjustmentType::OtherAdjustment,
        ));

        assert_eq!(repo.total_capital_calls(1).unwrap(), Money::from_units(100));
        assert_eq!(repo.total_capital_calls(2).unwrap(), Money::from_units(900));
        assert_eq!(repo.total_adjustments(1).unwrap(), Money::ZERO);
        assert_eq!(repo.fund_ids().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_invalid_insert_rejected() {
        let mut repo = InMemoryRepository::new();
        let result = repo.insert_distribution(Distribution::new(1, date("2023-01-15"), Money::from_units(-1)));
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(repo.distributions(1).unwrap().is_empty());
    }

    #[test]
    fn test_fund_lookup() {
        let mut repo = InMemoryRepository::new();
        repo.add_fund(Fund::new(3, "Growth Fund II"));
        assert_eq!(repo.fund(3).unwrap().map(|f| f.name), Some("Growth Fund II".to_string()));
        assert_eq!(repo.fund(4).unwrap(), None);
        assert_eq!(repo.fund_ids().unwrap(), vec![3]);
    }
}
