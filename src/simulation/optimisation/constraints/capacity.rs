//! Links between hourly dispatch and installed capacity.
use super::super::variables::{HourlyVariable as Hourly, ScalarVariable as Scalar, VariableMap};
use super::super::Problem;
use crate::simulation::parameters::ScenarioParameters;

/// Add capacity constraints.
///
/// Renewable output is fixed at availability times installed capacity, so any unused generation
/// shows up as curtailment. Other assets are bounded above by their capacity.
pub fn add_capacity_constraints(
    problem: &mut Problem,
    variables: &VariableMap,
    params: &ScenarioParameters,
) {
    let solar_capacity = variables.scalar(Scalar::SolarCapacity);
    let wind_capacity = variables.scalar(Scalar::WindCapacity);

    let limits = [
        (Hourly::ElectrolyserPower, Scalar::ElectrolyserCapacity),
        (Hourly::FuelCellPower, Scalar::FuelCellCapacity),
        (Hourly::Cgh2Injection, Scalar::Cgh2InjectionCapacity),
        (Hourly::LiquidSteel, Scalar::LiquidSteelPeak),
    ];

    for (hour, availability) in params.profile.iter().enumerate().take(variables.hours()) {
        problem.add_row(
            0.0..=0.0,
            [
                (variables.hourly(Hourly::SolarPower, hour), 1.0),
                (solar_capacity, -availability.solar.0),
            ],
        );
        problem.add_row(
            0.0..=0.0,
            [
                (variables.hourly(Hourly::WindPower, hour), 1.0),
                (wind_capacity, -availability.wind.0),
            ],
        );

        for (dispatch, capacity) in limits {
            problem.add_row(
                ..=0.0,
                [
                    (variables.hourly(dispatch, hour), 1.0),
                    (variables.scalar(capacity), -1.0),
                ],
            );
        }
    }

    // The EAF is sized to the peak hourly tap. Its upper bound is set on the column itself.
    problem.add_row(
        ..=0.0,
        [
            (variables.scalar(Scalar::LiquidSteelPeak), 1.0),
            (variables.scalar(Scalar::EafCapacity), -1.0),
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{model_24h, scenario_params};
    use crate::model::Model;
    use crate::scenario::{ScrapCase, YearCase};
    use crate::simulation::optimisation::variables::add_variables;
    use rstest::rstest;

    #[rstest]
    fn test_capacity_rows(model_24h: Model) {
        let params = scenario_params(&model_24h, YearCase::Current, ScrapCase::S1);
        let mut problem = Problem::default();
        let variables = add_variables(&mut problem, &params);
        add_capacity_constraints(&mut problem, &variables, &params);
        assert_eq!(problem.num_rows(), 6 * 24 + 1);
    }
}
