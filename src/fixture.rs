//! Fixtures for tests
use crate::model::{Model, ModelParameters};
use crate::profile::{HourlyAvailability, HourlyProfile};
use crate::scenario::{ScenarioKey, ScrapCase, YearCase};
use crate::simulation::parameters::ScenarioParameters;
use crate::technology::{Technology, TechnologyMap, TechnologyParameters};
use crate::units::Dimensionless;
use itertools::iproduct;
use rstest::fixture;
use std::f64::consts::PI;
use std::path::PathBuf;
use strum::IntoEnumIterator;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Unit cost and efficiency by year case, in the order of [`YearCase::iter`]
fn technology_table(technology: Technology) -> [(f64, f64); 4] {
    match technology {
        Technology::Solar => [(0.672, 0.0), (0.562, 0.0), (0.503, 0.0), (0.415, 0.0)],
        Technology::Wind => [(0.986, 0.0), (0.907, 0.0), (0.862, 0.0), (0.816, 0.0)],
        Technology::Battery => [(0.655, 0.0), (0.594, 0.0), (0.569, 0.0), (0.552, 0.0)],
        Technology::Electrolyser => [
            (0.600, 51.2),
            (0.385, 49.020),
            (0.340, 46.620),
            (0.295, 44.444),
        ],
        Technology::FuelCell => [
            (0.14, 0.052),
            (0.139, 0.050),
            (0.09, 0.048),
            (0.086, 0.047),
        ],
    }
}

#[fixture]
pub fn technologies() -> TechnologyMap {
    iproduct!(YearCase::iter().enumerate(), Technology::iter())
        .map(|((idx, year_case), technology)| {
            let (unit_cost, efficiency) = technology_table(technology)[idx];
            (
                (year_case, technology),
                TechnologyParameters {
                    unit_cost,
                    efficiency,
                },
            )
        })
        .collect()
}

/// A synthetic day: solar peaks at noon, wind is steady
#[fixture]
pub fn profile_24h() -> HourlyProfile {
    let hours = (0..24)
        .map(|hour| {
            let solar = 0.9 * (PI * (f64::from(hour) - 6.0) / 12.0).sin().max(0.0);
            HourlyAvailability {
                solar: Dimensionless(solar),
                wind: Dimensionless(0.35),
            }
        })
        .collect();
    HourlyProfile::new(hours)
}

/// A one-day model with default plant constants
#[fixture]
pub fn model_24h(profile_24h: HourlyProfile, technologies: TechnologyMap) -> Model {
    let parameters: ModelParameters = toml::from_str("hours = 24").unwrap();
    Model {
        model_path: PathBuf::from("model"),
        parameters,
        profile: profile_24h,
        technologies,
    }
}

/// Derive scenario parameters for a test model
pub fn scenario_params(
    model: &Model,
    year_case: YearCase,
    scrap_case: ScrapCase,
) -> ScenarioParameters<'_> {
    ScenarioParameters::new(model, ScenarioKey::new(year_case, scrap_case)).unwrap()
}
