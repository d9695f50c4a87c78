//! Distributions to Paid-In

use rust_decimal::prelude::ToPrimitive;

use crate::fund::Money;

/// Decimal places kept on the DPI ratio
pub const DPI_DECIMALS: u32 = 4;

/// `DPI = total distributions / PIC`, rounded to 4 places.
///
/// Returns 0.0 when PIC is zero so the metric is always defined.
pub fn distributions_to_paid_in(total_distributions: Money, pic: Money) -> f64 {
    if !pic.is_positive() {
        return 0.0;
    }

    match total_distributions.as_decimal().checked_div(pic.as_decimal()) {
        Some(ratio) => ratio.round_dp(DPI_DECIMALS).to_f64().unwrap_or(0.0),
        None => {
            log::warn!("DPI: {} / {} overflowed, reporting 0", total_distributions, pic);
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dpi_ratio() {
        let dpi = distributions_to_paid_in(Money::from_units(400_000), Money::from_units(1_000_000));
        assert_eq!(dpi, 0.4);
    }

    #[test]
    fn test_dpi_rounds_to_four_places() {
        let dpi = distributions_to_paid_in(Money::from_units(4_300_000), Money::from_units(11_950_000));
        assert_eq!(dpi, 0.3598);
    }

    #[test]
    fn test_dpi_zero_pic() {
        assert_eq!(distributions_to_paid_in(Money::from_units(900), Money::ZERO), 0.0);
        assert_eq!(distributions_to_paid_in(Money::ZERO, Money::ZERO), 0.0);
    }
}
