//! General functions related to finance.
use crate::units::Dimensionless;

/// Calculates the capital recovery factor (CRF) for a given lifetime and discount rate.
///
/// The CRF is used to annualise capital costs over the lifetime of the plant.
pub fn capital_recovery_factor(lifetime: u32, discount_rate: Dimensionless) -> Dimensionless {
    if lifetime == 0 {
        return Dimensionless(0.0);
    }
    if discount_rate == Dimensionless(0.0) {
        return Dimensionless(1.0) / Dimensionless(lifetime as f64);
    }
    let exponent = i32::try_from(lifetime).unwrap_or(i32::MAX);
    let factor = (Dimensionless(1.0) + discount_rate).powi(exponent);
    (discount_rate * factor) / (factor - Dimensionless(1.0))
}

/// Levelised cost in USD per unit of output, from a cost in million USD.
///
/// Returns zero when there is no output.
pub fn levelised_cost(cost_musd: f64, output: f64) -> f64 {
    if output > 0.0 {
        cost_musd * 1e6 / output
    } else {
        0.0
    }
}
