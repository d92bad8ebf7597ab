//! CAPEX and OPEX lines.
//!
//! All costs are in MUSD. Annualised lines cover the modelled horizon, so they are scaled by the
//! capital recovery factor and the horizon's share of a year.
use super::super::variables::{Asset, OpexLine, ScalarVariable as Scalar, VariableMap};
use super::super::{Problem, Variable};
use crate::simulation::parameters::ScenarioParameters;

/// A CAPEX line: `capex = Σ coeff * var + constant`
struct CapexLine {
    asset: Asset,
    terms: Vec<(Scalar, f64)>,
    constant: f64,
}

fn capex_lines(params: &ScenarioParameters) -> Vec<CapexLine> {
    let economics = &params.model.economics;
    let tech = &params.technologies;
    let rep = economics.replacements;

    let line = |asset, terms, constant| CapexLine {
        asset,
        terms,
        constant,
    };

    vec![
        line(
            Asset::Solar,
            vec![(Scalar::SolarCapacity, tech.solar.unit_cost)],
            0.0,
        ),
        line(
            Asset::Wind,
            vec![(Scalar::WindCapacity, tech.wind.unit_cost)],
            0.0,
        ),
        // Battery cost is per MW of power; capacity is energy, so divide by the duration
        line(
            Asset::Battery,
            vec![(
                Scalar::BatterySwing,
                tech.battery.unit_cost * rep / economics.battery_duration,
            )],
            0.0,
        ),
        line(
            Asset::Electrolyser,
            vec![(Scalar::ElectrolyserCapacity, tech.electrolyser.unit_cost * rep)],
            0.0,
        ),
        line(
            Asset::FuelCell,
            vec![(Scalar::FuelCellCapacity, tech.fuel_cell.unit_cost * rep)],
            0.0,
        ),
        line(Asset::DrPlant, Vec::new(), params.drp_capex),
        line(
            Asset::ShaftCompressor,
            Vec::new(),
            params.shaft_compressor_capex,
        ),
        line(
            Asset::Cgh2Storage,
            vec![
                (
                    Scalar::Cgh2InjectionCapacity,
                    economics.cgh2_injection_capex,
                ),
                (Scalar::Cgh2Swing, economics.cgh2_storage_capex),
            ],
            0.0,
        ),
        line(
            Asset::Eaf,
            vec![(Scalar::EafCapacity, economics.eaf_capex_slope)],
            economics.eaf_capex_intercept,
        ),
        line(
            Asset::Caster,
            vec![(Scalar::LiquidSteelPeak, economics.caster_capex)],
            0.0,
        ),
    ]
}

/// The fixed cost of an OPEX line, or `None` for maintenance which depends on CAPEX
fn fixed_opex(params: &ScenarioParameters, line: OpexLine) -> Option<f64> {
    let opex = &params.opex;
    match line {
        OpexLine::Maintenance => None,
        OpexLine::Pellets => Some(opex.pellets),
        OpexLine::Lump => Some(opex.lump),
        OpexLine::Scrap => Some(opex.scrap),
        OpexLine::Lime => Some(opex.lime),
        OpexLine::Alloy => Some(opex.alloy),
        OpexLine::Electrode => Some(opex.electrode),
        OpexLine::Labour => Some(opex.labour),
        OpexLine::Transport => Some(opex.transport),
    }
}

/// Add a row `total = Σ parts`
fn add_total_row(problem: &mut Problem, total: Variable, parts: impl Iterator<Item = Variable>) {
    let mut terms = vec![(total, 1.0)];
    terms.extend(parts.map(|var| (var, -1.0)));
    problem.add_row(0.0..=0.0, terms);
}

/// Add economic constraints
pub fn add_economics_constraints(
    problem: &mut Problem,
    variables: &VariableMap,
    params: &ScenarioParameters,
) {
    let annualisation = params.annualisation_factor();

    for line in capex_lines(params) {
        let capex = variables.scalar(Scalar::Capex(line.asset));
        let mut terms = vec![(capex, 1.0)];
        terms.extend(
            line.terms
                .iter()
                .map(|(var, coeff)| (variables.scalar(*var), -coeff)),
        );
        problem.add_row(line.constant..=line.constant, terms);

        problem.add_row(
            0.0..=0.0,
            [
                (variables.scalar(Scalar::AnnualCapex(line.asset)), 1.0),
                (capex, -annualisation),
            ],
        );
    }

    add_total_row(
        problem,
        variables.scalar(Scalar::TotalAnnualCapex),
        Asset::ALL
            .iter()
            .map(|asset| variables.scalar(Scalar::AnnualCapex(*asset))),
    );

    // Maintenance is a share of total CAPEX
    let maintenance = params.model.economics.maintenance_fraction * params.time_factor;
    let mut terms = vec![(variables.scalar(Scalar::Opex(OpexLine::Maintenance)), 1.0)];
    terms.extend(
        Asset::ALL
            .iter()
            .map(|asset| (variables.scalar(Scalar::Capex(*asset)), -maintenance)),
    );
    problem.add_row(0.0..=0.0, terms);

    for line in OpexLine::ALL {
        if let Some(cost) = fixed_opex(params, line) {
            problem.add_row(cost..=cost, [(variables.scalar(Scalar::Opex(line)), 1.0)]);
        }
    }

    add_total_row(
        problem,
        variables.scalar(Scalar::TotalAnnualOpex),
        OpexLine::ALL
            .iter()
            .map(|line| variables.scalar(Scalar::Opex(*line))),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{model_24h, scenario_params};
    use crate::model::Model;
    use crate::scenario::{ScrapCase, YearCase};
    use crate::simulation::optimisation::variables::add_variables;
    use float_cmp::assert_approx_eq;
    use highs::{HighsModelStatus, Sense};
    use rstest::rstest;

    /// Solve the economic rows on their own with the sizing variables fixed
    fn solve_with_sizes(
        params: &ScenarioParameters,
        sizes: &[(Scalar, f64)],
    ) -> Vec<(Asset, f64)> {
        let mut problem = Problem::default();
        let variables = add_variables(&mut problem, params);
        add_economics_constraints(&mut problem, &variables, params);
        for (var, size) in sizes {
            problem.add_row(*size..=*size, [(variables.scalar(*var), 1.0)]);
        }

        let solved = problem.optimise(Sense::Minimise).solve();
        assert_eq!(solved.status(), HighsModelStatus::Optimal);
        let columns = solved.get_solution().columns().to_vec();
        Asset::ALL
            .iter()
            .map(|asset| {
                let idx = variables.scalar_index(Scalar::AnnualCapex(*asset)).unwrap();
                (*asset, columns[idx])
            })
            .collect()
    }

    #[rstest]
    fn test_capex_lines_cover_every_asset(model_24h: Model) {
        let params = scenario_params(&model_24h, YearCase::Current, ScrapCase::S1);
        let lines = capex_lines(&params);
        assert_eq!(lines.len(), Asset::ALL.len());
        for asset in Asset::ALL {
            assert!(lines.iter().any(|line| line.asset == asset));
        }
    }

    #[rstest]
    fn test_battery_capex_per_mwh(model_24h: Model) {
        let params = scenario_params(&model_24h, YearCase::Current, ScrapCase::S1);
        let battery = capex_lines(&params)
            .into_iter()
            .find(|line| line.asset == Asset::Battery)
            .unwrap();
        assert_eq!(battery.terms[0].0, Scalar::BatterySwing);
        assert_approx_eq!(f64, battery.terms[0].1, 0.655 * 2.0 / 4.0);
    }

    #[rstest]
    fn test_fixed_opex(model_24h: Model) {
        let params = scenario_params(&model_24h, YearCase::Current, ScrapCase::S3);
        assert_eq!(fixed_opex(&params, OpexLine::Maintenance), None);
        assert_eq!(fixed_opex(&params, OpexLine::Scrap), Some(params.opex.scrap));
        assert!(params.opex.scrap > 0.0);
    }

    #[rstest]
    fn test_economics_rows(model_24h: Model) {
        let params = scenario_params(&model_24h, YearCase::Current, ScrapCase::S1);
        let mut problem = Problem::default();
        let variables = add_variables(&mut problem, &params);
        add_economics_constraints(&mut problem, &variables, &params);

        // Two rows per asset, CAPEX total, maintenance, eight fixed lines, OPEX total
        assert_eq!(problem.num_rows(), 2 * 10 + 1 + 1 + 8 + 1);
    }

    #[rstest]
    fn test_annual_capex_closed_forms(model_24h: Model) {
        let params = scenario_params(&model_24h, YearCase::Y2030, ScrapCase::S2);
        let factor = params.annualisation_factor();
        let sizes = [
            (Scalar::SolarCapacity, 120.0),
            (Scalar::WindCapacity, 80.0),
            (Scalar::BatterySwing, 40.0),
            (Scalar::ElectrolyserCapacity, 60.0),
            (Scalar::FuelCellCapacity, 15.0),
            (Scalar::Cgh2InjectionCapacity, 2.0),
            (Scalar::Cgh2Swing, 30.0),
            (Scalar::EafCapacity, 110.0),
            (Scalar::LiquidSteelPeak, 100.0),
        ];
        let economics = &model_24h.parameters.economics;
        let annual_dri = 1e6 * (1.0 - 0.25) / 0.94;
        let expected = [
            (Asset::Solar, 0.562 * 120.0),
            (Asset::Wind, 0.907 * 80.0),
            (Asset::Battery, 0.594 * 2.0 * 40.0 / 4.0),
            (Asset::Electrolyser, 0.385 * 2.0 * 60.0),
            (Asset::FuelCell, 0.139 * 2.0 * 15.0),
            (Asset::DrPlant, 0.00031 * annual_dri),
            (Asset::ShaftCompressor, 8.4074 * annual_dri / 1e6 + 4.5351),
            (
                Asset::Cgh2Storage,
                2.064 * 2.0 + economics.cgh2_storage_capex * 30.0,
            ),
            (
                Asset::Eaf,
                economics.eaf_capex_slope * 110.0 + economics.eaf_capex_intercept,
            ),
            (Asset::Caster, economics.caster_capex * 100.0),
        ];

        let annual_capex = solve_with_sizes(&params, &sizes);
        for ((asset, actual), (expected_asset, capex)) in
            annual_capex.into_iter().zip(expected)
        {
            assert_eq!(asset, expected_asset);
            assert_approx_eq!(f64, actual, capex * factor, epsilon = 1e-6);
        }
    }
}
