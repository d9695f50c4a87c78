//! Modeling parameters for the metric engines

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::env;

use crate::error::{Error, Result};

/// Assumed total-value-to-paid-in multiple used to back into terminal NAV
pub const DEFAULT_TARGET_TVPI: Decimal = dec!(1.45);

/// Newton seed rates, tried in order
pub const DEFAULT_SEED_RATES: [f64; 7] = [0.1, 0.0, -0.1, 0.2, -0.2, 0.5, -0.5];

pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Step-size tolerance for Newton convergence
pub const DEFAULT_TOLERANCE: f64 = 1.48e-8;

/// Day-count denominator for year fractions
pub const DEFAULT_DAYS_PER_YEAR: f64 = 365.0;

/// Configuration for metric calculations
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsConfig {
    /// TVPI multiple used to synthesize the terminal NAV cash flow for IRR.
    /// No per-fund source exists, so this is an explicit modeling assumption.
    pub target_tvpi: Decimal,

    /// Seeds for the IRR root finder
    pub seed_rates: Vec<f64>,

    /// Newton iteration cap per seed
    pub max_iterations: u32,

    pub tolerance: f64,

    pub days_per_year: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            target_tvpi: DEFAULT_TARGET_TVPI,
            seed_rates: DEFAULT_SEED_RATES.to_vec(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            days_per_year: DEFAULT_DAYS_PER_YEAR,
        }
    }
}

impl MetricsConfig {
    /// Defaults overridden by environment variables:
    ///   FUND_METRICS_TARGET_TVPI, FUND_METRICS_SEED_RATES (comma separated),
    ///   FUND_METRICS_MAX_ITERATIONS, FUND_METRICS_TOLERANCE
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let target_tvpi: Decimal = env::var("FUND_METRICS_TARGET_TVPI")
            .ok()
            .map(|s| parse_target_tvpi(&s))
            .transpose()?
            .unwrap_or(defaults.target_tvpi);

        let seed_rates: Vec<f64> = env::var("FUND_METRICS_SEED_RATES")
            .ok()
            .map(|s| parse_seed_rates(&s))
            .transpose()?
            .unwrap_or(defaults.seed_rates);

        let max_iterations: u32 = env::var("FUND_METRICS_MAX_ITERATIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_iterations);

        let tolerance: f64 = env::var("FUND_METRICS_TOLERANCE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.tolerance);

        let config = Self {
            target_tvpi,
            seed_rates,
            max_iterations,
            tolerance,
            days_per_year: defaults.days_per_year,
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the target TVPI assumption
    pub fn with_target_tvpi(mut self, target_tvpi: Decimal) -> Self {
        self.target_tvpi = target_tvpi;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_tvpi <= Decimal::ZERO {
            return Err(Error::InvalidConfig(format!(
                "target_tvpi must be positive, got {}",
                self.target_tvpi
            )));
        }
        if self.seed_rates.is_empty() {
            return Err(Error::InvalidConfig("seed_rates must not be empty".into()));
        }
        if self.seed_rates.iter().any(|r| !r.is_finite() || *r <= -1.0) {
            return Err(Error::InvalidConfig(format!(
                "seed rates must be finite and greater than -1, got {:?}",
                self.seed_rates
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig("max_iterations must be at least 1".into()));
        }
        if !(self.tolerance > 0.0) {
            return Err(Error::InvalidConfig(format!("tolerance must be positive, got {}", self.tolerance)));
        }
        if !(self.days_per_year > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "days_per_year must be positive, got {}",
                self.days_per_year
            )));
        }
        Ok(())
    }
}

/// Parse the target TVPI multiple. A malformed value is an error, never the default.
pub fn parse_target_tvpi(raw: &str) -> Result<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| Error::InvalidConfig(format!("invalid target TVPI '{}'", raw)))
}

/// Parse `"0.1, 0.0,-0.1"` into seed rates
pub fn parse_seed_rates(raw: &str) -> Result<Vec<f64>> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| Error::InvalidConfig(format!("invalid seed rate '{}'", s)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MetricsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.target_tvpi, dec!(1.45));
        assert_eq!(config.seed_rates, vec![0.1, 0.0, -0.1, 0.2, -0.2, 0.5, -0.5]);
        assert_eq!(config.max_iterations, 100);
    }

    #[test]
    fn test_rejects_non_positive_tvpi() {
        let config = MetricsConfig::default().with_target_tvpi(Decimal::ZERO);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_empty_seeds() {
        let config = MetricsConfig {
            seed_rates: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_seed_rates() {
        assert_eq!(parse_seed_rates("0.1, 0.0,-0.1").unwrap(), vec![0.1, 0.0, -0.1]);
        assert!(parse_seed_rates("0.1,abc").is_err());
    }

    #[test]
    fn test_parse_target_tvpi() {
        assert_eq!(parse_target_tvpi(" 1.8 ").unwrap(), dec!(1.8));
        assert!(matches!(parse_target_tvpi("1,45"), Err(Error::InvalidConfig(_))));
        assert!(parse_target_tvpi("").is_err());
    }

    // Both env cases share one test so they never race on the variable
    #[test]
    fn test_from_env_target_tvpi() {
        env::set_var("FUND_METRICS_TARGET_TVPI", "1.8");
        let config = MetricsConfig::from_env();
        env::set_var("FUND_METRICS_TARGET_TVPI", "1,45");
        let malformed = MetricsConfig::from_env();
        env::remove_var("FUND_METRICS_TARGET_TVPI");

        let config = config.unwrap();
        assert_eq!(config.target_tvpi, dec!(1.8));
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert!(matches!(malformed, Err(Error::InvalidConfig(_))));
    }
}
