//! Load fund ledgers and fund metadata from CSV
//!
//! Ledger format (one row per extracted table row):
//!
//! ```text
//! fund_id,record_type,date,amount,is_recallable,adjustment_type,description
//! 1,capital_call,2023-01-15,"$5,000,000",,,Initial Capital Call
//! 1,distribution,2024-09-10,2000000,yes,,Partial Exit: DataCorp
//! 1,adjustment,2024-01-15,-500000,,Recallable Distribution,Recalled distribution
//! ```

use chrono::NaiveDate;
use csv::{Reader, ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;

use super::validation::{parse_adjustment_type, parse_amount, validate_capital_call, validate_distribution};
use super::{Adjustment, CapitalCall, Distribution, Fund, FundId};
use crate::error::{Error, Result};

/// Default location of the bundled sample ledger
pub const DEFAULT_LEDGER_PATH: &str = "data/sample_ledger.csv";

/// Default location of the bundled fund metadata
pub const DEFAULT_FUNDS_PATH: &str = "data/sample_funds.csv";

/// A single typed ledger record
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEntry {
    CapitalCall(CapitalCall),
    Distribution(Distribution),
    Adjustment(Adjustment),
}

impl LedgerEntry {
    pub fn fund_id(&self) -> FundId {
        match self {
            LedgerEntry::CapitalCall(c) => c.fund_id,
            LedgerEntry::Distribution(d) => d.fund_id,
            LedgerEntry::Adjustment(a) => a.fund_id,
        }
    }
}

/// Raw CSV row of the ledger file
#[derive(Debug, serde::Deserialize)]
struct LedgerRow {
    fund_id: FundId,
    record_type: String,
    date: String,
    amount: String,
    #[serde(default)]
    is_recallable: Option<String>,
    #[serde(default)]
    adjustment_type: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl LedgerRow {
    fn to_entry(self) -> std::result::Result<LedgerEntry, String> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|e| format!("invalid date '{}': {}", self.date, e))?;
        let amount = parse_amount(&self.amount).map_err(|e| e.to_string())?;
        let description = self.description.filter(|d| !d.trim().is_empty());

        match self.record_type.trim().to_lowercase().as_str() {
            "capital_call" | "capital call" => {
                let call = CapitalCall {
                    fund_id: self.fund_id,
                    call_date: date,
                    amount,
                    call_type: None,
                    description,
                };
                validate_capital_call(&call).map_err(|e| e.to_string())?;
                Ok(LedgerEntry::CapitalCall(call))
            }
            "distribution" => {
                let is_recallable = parse_flag(self.is_recallable.as_deref())?;
                let distribution = Distribution {
                    fund_id: self.fund_id,
                    distribution_date: date,
                    amount,
                    is_recallable,
                    distribution_type: None,
                    description,
                };
                validate_distribution(&distribution).map_err(|e| e.to_string())?;
                Ok(LedgerEntry::Distribution(distribution))
            }
            "adjustment" => {
                let label = self
                    .adjustment_type
                    .as_deref()
                    .ok_or_else(|| "adjustment row without adjustment_type".to_string())?;
                let adjustment_type = parse_adjustment_type(label).map_err(|e| e.to_string())?;
                let mut adjustment = Adjustment::new(self.fund_id, date, amount, adjustment_type);
                adjustment.description = description;
                Ok(LedgerEntry::Adjustment(adjustment))
            }
            other => Err(format!("unknown record_type '{}'", other)),
        }
    }
}

fn parse_flag(raw: Option<&str>) -> std::result::Result<bool, String> {
    match raw.map(|s| s.trim().to_lowercase()).as_deref() {
        None | Some("") | Some("no") | Some("n") | Some("false") | Some("0") => Ok(false),
        Some("yes") | Some("y") | Some("true") | Some("1") => Ok(true),
        Some(other) => Err(format!("invalid is_recallable flag '{}'", other)),
    }
}

/// Raw CSV row of the funds file
#[derive(Debug, serde::Deserialize)]
struct FundRow {
    id: FundId,
    name: String,
    #[serde(default)]
    gp_name: Option<String>,
    #[serde(default)]
    fund_type: Option<String>,
    #[serde(default)]
    vintage_year: Option<u16>,
}

/// Load all ledger entries from a CSV file
pub fn load_ledger<P: AsRef<Path>>(path: P) -> Result<Vec<LedgerEntry>> {
    let file = std::fs::File::open(path)?;
    load_ledger_from_reader(file)
}

/// Load ledger entries from any reader (e.g., string buffer, network stream)
///
/// Row numbers in errors count data rows from 1, excluding the header.
pub fn load_ledger_from_reader<R: Read>(reader: R) -> Result<Vec<LedgerEntry>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut entries = Vec::new();

    for (idx, result) in csv_reader.deserialize().enumerate() {
        let row: LedgerRow = result?;
        let entry = row
            .to_entry()
            .map_err(|message| Error::InvalidRecord { row: idx + 1, message })?;
        entries.push(entry);
    }

    log::debug!("Loaded {} ledger entries", entries.len());
    Ok(entries)
}

/// Load fund metadata from a CSV file
pub fn load_funds<P: AsRef<Path>>(path: P) -> Result<Vec<Fund>> {
    let file = std::fs::File::open(path)?;
    load_funds_from_reader(file)
}

pub fn load_funds_from_reader<R: Read>(reader: R) -> Result<Vec<Fund>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut funds = Vec::new();

    for result in csv_reader.deserialize() {
        let row: FundRow = result?;
        funds.push(Fund {
            id: row.id,
            name: row.name,
            gp_name: row.gp_name,
            fund_type: row.fund_type,
            vintage_year: row.vintage_year,
        });
    }

    Ok(funds)
}
