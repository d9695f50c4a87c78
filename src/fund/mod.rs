//! Fund ledger records, money type, and ingestion-side loading

mod data;
mod money;
pub mod loader;
pub mod validation;

pub use data::{Adjustment, AdjustmentType, CapitalCall, Distribution, Fund, FundId};
pub use money::Money;
pub use loader::{load_funds, load_ledger, load_ledger_from_reader, LedgerEntry};
pub use validation::{ValidationError, ValidationWarning};
