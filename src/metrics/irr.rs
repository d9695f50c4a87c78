//! Internal Rate of Return (IRR) solver for irregularly dated cash flows
//!
//! Pure functions: the caller supplies the `(years, amount)` series and the
//! seed rates. Nothing here keeps state between calls.

/// Calculate the annual IRR of a dated cash-flow series using Newton's method.
///
/// # Arguments
/// * `flows` - `(t, cf)` pairs, `t` in years since the first flow,
///   `cf` positive for inflows and negative for outflows
/// * `seeds` - initial guesses, tried in order
/// * `max_iterations` - Newton iteration cap per seed
/// * `tolerance` - convergence threshold on the Newton step
///
/// # Returns
/// * `Option<f64>` - first finite converged rate as a decimal (0.05 for 5%),
///   or None if every seed fails
pub fn solve_irr(flows: &[(f64, f64)], seeds: &[f64], max_iterations: u32, tolerance: f64) -> Option<f64> {
    if flows.len() < 2 {
        return None;
    }

    // At least one sign change is required for a root to exist
    let has_positive = flows.iter().any(|&(_, cf)| cf > 0.0);
    let has_negative = flows.iter().any(|&(_, cf)| cf < 0.0);
    if !has_positive || !has_negative {
        log::debug!("IRR: no sign change in {} cash flows", flows.len());
        return None;
    }

    for &seed in seeds {
        match newton(flows, seed, max_iterations, tolerance) {
            Some(rate) if rate.is_finite() => {
                log::debug!("IRR: converged to {:.6} from seed {}", rate, seed);
                return Some(rate);
            }
            _ => log::debug!("IRR: seed {} did not converge", seed),
        }
    }

    None
}

/// Newton iteration from a single seed
fn newton(flows: &[(f64, f64)], seed: f64, max_iterations: u32, tolerance: f64) -> Option<f64> {
    let mut rate = seed;

    for _ in 0..max_iterations {
        let npv = xnpv(rate, flows);
        let dnpv = xnpv_derivative(rate, flows);

        if !npv.is_finite() || !dnpv.is_finite() || dnpv == 0.0 {
            return None;
        }

        let new_rate = rate - npv / dnpv;
        if !new_rate.is_finite() {
            return None;
        }

        if (new_rate - rate).abs() < tolerance {
            return Some(new_rate);
        }

        rate = new_rate;
    }

    None
}

/// Net present value of a dated series at an annual rate.
///
/// For `rate <= -1` the discount base is not positive; the result is `+inf`
/// when the series nets positive and `-inf` otherwise. Any overflowing
/// term is mapped the same way.
pub fn xnpv(rate: f64, flows: &[(f64, f64)]) -> f64 {
    if rate <= -1.0 {
        return divergent_npv(flows);
    }

    let base = 1.0 + rate;
    let mut npv = 0.0;
    for &(t, cf) in flows {
        let term = cf / base.powf(t);
        if !term.is_finite() {
            return divergent_npv(flows);
        }
        npv += term;
    }

    npv
}

/// Derivative of [`xnpv`] with respect to the rate. NaN outside the domain.
fn xnpv_derivative(rate: f64, flows: &[(f64, f64)]) -> f64 {
    if rate <= -1.0 {
        return f64::NAN;
    }

    let base = 1.0 + rate;
    flows
        .iter()
        .filter(|&&(t, _)| t != 0.0)
        .map(|&(t, cf)| -t * cf / base.powf(t + 1.0))
        .sum()
}

fn divergent_npv(flows: &[(f64, f64)]) -> f64 {
    let net: f64 = flows.iter().map(|&(_, cf)| cf).sum();
    if net > 0.0 {
        f64::INFINITY
    } else {
        f64::NEG_INFINITY
    }
}

/// Express a decimal rate as a percentage rounded to 2 places (0.12345 -> 12.35)
pub fn to_rounded_percent(rate: f64) -> f64 {
    (rate * 100.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::config::DEFAULT_SEED_RATES;
    use approx::assert_relative_eq;

    const TOL: f64 = 1.48e-8;

    #[test]
    fn test_simple_irr() {
        // Invest 1000, receive 1100 exactly one year later
        let flows = vec![(0.0, -1000.0), (1.0, 1100.0)];

        let irr = solve_irr(&flows, &DEFAULT_SEED_RATES, 100, TOL).unwrap();
        assert_relative_eq!(irr, 0.10, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_irr() {
        let flows = vec![(0.0, -1000.0), (2.0, 810.0)];

        let irr = solve_irr(&flows, &DEFAULT_SEED_RATES, 100, TOL).unwrap();
        assert_relative_eq!(irr, -0.10, epsilon = 1e-9);
    }

    #[test]
    fn test_irregular_series_zeroes_npv() {
        let flows = vec![
            (0.0, -5_000_000.0),
            (156.0 / 365.0, -3_000_000.0),
            (334.0 / 365.0, 1_500_000.0),
            (522.0 / 365.0, 500_000.0),
            (705.0 / 365.0, 12_000_000.0),
        ];

        let irr = solve_irr(&flows, &DEFAULT_SEED_RATES, 100, TOL).unwrap();
        assert!(irr.is_finite());
        assert!(xnpv(irr, &flows).abs() < 1.0, "NPV at IRR should be ~0 on a 1e7 scale");
    }

    #[test]
    fn test_too_few_flows() {
        assert_eq!(solve_irr(&[], &DEFAULT_SEED_RATES, 100, TOL), None);
        assert_eq!(solve_irr(&[(0.0, -100.0)], &DEFAULT_SEED_RATES, 100, TOL), None);
    }

    #[test]
    fn test_no_sign_change() {
        let flows = vec![(0.0, -100.0), (1.0, -50.0)];
        assert_eq!(solve_irr(&flows, &DEFAULT_SEED_RATES, 100, TOL), None);
    }

    #[test]
    fn test_falls_back_to_later_seed() {
        let flows = vec![(0.0, -1000.0), (1.0, 1100.0)];

        // -1.0 sits outside the domain, NaN never converges
        let irr = solve_irr(&flows, &[-1.0, f64::NAN, 0.1], 100, TOL).unwrap();
        assert_relative_eq!(irr, 0.10, epsilon = 1e-9);
    }

    #[test]
    fn test_all_seeds_fail() {
        let flows = vec![(0.0, -1000.0), (1.0, 1100.0)];
        assert_eq!(solve_irr(&flows, &[-1.0, -2.5], 100, TOL), None);
        // One iteration is never enough to meet the step tolerance here
        assert_eq!(solve_irr(&flows, &[0.5], 1, TOL), None);
    }

    #[test]
    fn test_xnpv_outside_domain() {
        let net_positive = vec![(0.0, -100.0), (1.0, 150.0)];
        let net_negative = vec![(0.0, -100.0), (1.0, 50.0)];

        assert_eq!(xnpv(-1.0, &net_positive), f64::INFINITY);
        assert_eq!(xnpv(-3.0, &net_negative), f64::NEG_INFINITY);
    }

    #[test]
    fn test_xnpv_at_zero_rate_is_sum() {
        let flows = vec![(0.0, -100.0), (0.5, 30.0), (1.5, 90.0)];
        assert_relative_eq!(xnpv(0.0, &flows), 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_to_rounded_percent() {
        assert_eq!(to_rounded_percent(0.123456), 12.35);
        assert_eq!(to_rounded_percent(-0.05), -5.0);
    }
}
