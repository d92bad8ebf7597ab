//! Annual roll-ups of hourly flows.
use super::super::variables::{
    HourlyVariable as Hourly, ScalarVariable as Scalar, TOTALLED, VariableMap,
};
use super::super::Problem;
use crate::simulation::parameters::ScenarioParameters;

/// Add a row `total = Σ_h var[h]` for every totalled variable present in the problem, plus total
/// renewable generation.
pub fn add_totals_constraints(
    problem: &mut Problem,
    variables: &VariableMap,
    _params: &ScenarioParameters,
) {
    for var in TOTALLED {
        let Some(total) = variables.try_scalar(Scalar::Total(var)) else {
            continue;
        };

        let mut terms = vec![(total, 1.0)];
        terms.extend((0..variables.hours()).map(|hour| (variables.hourly(var, hour), -1.0)));
        problem.add_row(0.0..=0.0, terms);
    }

    problem.add_row(
        0.0..=0.0,
        [
            (variables.scalar(Scalar::RenewableGeneration), 1.0),
            (variables.scalar(Scalar::Total(Hourly::SolarPower)), -1.0),
            (variables.scalar(Scalar::Total(Hourly::WindPower)), -1.0),
        ],
    );
}
