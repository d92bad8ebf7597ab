//! Steel demand and the minimum renewable share.
use super::super::variables::{HourlyVariable as Hourly, ScalarVariable as Scalar, VariableMap};
use super::super::Problem;
use crate::simulation::parameters::ScenarioParameters;

/// Add demand constraints.
///
/// Liquid steel over the horizon must equal demand exactly. If a minimum renewable share is set,
/// renewable generation must cover that share of consumption plus grid imports.
pub fn add_demand_constraints(
    problem: &mut Problem,
    variables: &VariableMap,
    params: &ScenarioParameters,
) {
    let demand = params.steel_demand.value();
    problem.add_row(
        demand..=demand,
        [(variables.scalar(Scalar::Total(Hourly::LiquidSteel)), 1.0)],
    );

    let share = params.model.min_renewable_share.value();
    if share > 0.0 {
        problem.add_row(
            0.0..,
            [
                (variables.scalar(Scalar::RenewableGeneration), 1.0),
                (
                    variables.scalar(Scalar::Total(Hourly::TotalConsumption)),
                    -share,
                ),
                (variables.scalar(Scalar::Total(Hourly::GridImport)), -share),
            ],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{model_24h, scenario_params};
    use crate::model::Model;
    use crate::scenario::{ScrapCase, YearCase};
    use crate::simulation::optimisation::variables::add_variables;
    use crate::units::Dimensionless;
    use rstest::rstest;

    #[rstest]
    #[case(1.0, 2)]
    #[case(0.5, 2)]
    #[case(0.0, 1)]
    fn test_renewable_share_row(
        mut model_24h: Model,
        #[case] share: f64,
        #[case] expected: usize,
    ) {
        model_24h.parameters.min_renewable_share = Dimensionless(share);
        let params = scenario_params(&model_24h, YearCase::Current, ScrapCase::S1);
        let mut problem = Problem::default();
        let variables = add_variables(&mut problem, &params);
        add_demand_constraints(&mut problem, &variables, &params);
        assert_eq!(problem.num_rows(), expected);
    }
}
