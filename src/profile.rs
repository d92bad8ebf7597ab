//! The hourly renewable availability profile for a site.
use crate::units::Dimensionless;

/// Solar and wind capacity factors for a single hour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyAvailability {
    /// Solar capacity factor
    pub solar: Dimensionless,
    /// Wind capacity factor
    pub wind: Dimensionless,
}

/// Capacity factors for every hour of the modelled horizon, ordered by hour index.
///
/// Index 0 corresponds to the label `t1`.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyProfile(Vec<HourlyAvailability>);

impl HourlyProfile {
    /// Create a new [`HourlyProfile`] from hourly values already in hour order
    pub fn new(hours: Vec<HourlyAvailability>) -> Self {
        Self(hours)
    }

    /// The number of hours in the profile
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the profile has no hours
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over hourly availabilities in hour order
    pub fn iter(&self) -> impl Iterator<Item = &HourlyAvailability> {
        self.0.iter()
    }

    /// Get the availability for the given (zero-based) hour
    pub fn get(&self, hour: usize) -> Option<&HourlyAvailability> {
        self.0.get(hour)
    }

    /// Mean solar and wind capacity factors
    pub fn mean_capacity_factors(&self) -> (f64, f64) {
        if self.0.is_empty() {
            return (0.0, 0.0);
        }
        let n = self.0.len() as f64;
        let (solar, wind) = self
            .0
            .iter()
            .fold((0.0, 0.0), |(s, w), h| (s + h.solar.0, w + h.wind.0));
        (solar / n, wind / n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::profile_24h;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_mean_capacity_factors(profile_24h: HourlyProfile) {
        assert_eq!(profile_24h.len(), 24);
        let (solar, wind) = profile_24h.mean_capacity_factors();
        assert!(solar > 0.0 && solar < 1.0);
        assert_approx_eq!(f64, wind, 0.35, epsilon = 1e-12);
    }

    #[test]
    fn test_mean_capacity_factors_empty() {
        assert_eq!(HourlyProfile::new(Vec::new()).mean_capacity_factors(), (0.0, 0.0));
    }
}
