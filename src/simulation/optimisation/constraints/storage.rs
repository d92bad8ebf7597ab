//! Storage dynamics for the battery, compressed hydrogen, cold DRI and HBI stores.
use super::super::variables::{HourlyVariable as Hourly, ScalarVariable as Scalar, VariableMap};
use super::super::{Problem, Variable};
use crate::simulation::parameters::ScenarioParameters;

/// A store whose level changes by a linear combination of hourly flows
struct Store {
    level: Hourly,
    initial: f64,
    /// Flows into (positive) and out of (negative) the store, with their coefficients
    net_flow: Vec<(Hourly, f64)>,
    /// Peak, valley and swing variables, for stores sized by their realised swing
    swing: Option<(Scalar, Scalar, Scalar)>,
    /// Whether flows in and out must balance over the horizon
    closes: bool,
}

fn stores(params: &ScenarioParameters) -> Vec<Store> {
    let initial = &params.model.initial_storage;
    let eff = params.model.process.battery_efficiency;

    let mut stores = vec![
        Store {
            level: Hourly::BatteryLevel,
            initial: initial.battery,
            net_flow: vec![
                (Hourly::BatteryCharge, eff),
                (Hourly::BatteryDischarge, -1.0 / eff),
            ],
            swing: Some((
                Scalar::BatteryPeak,
                Scalar::BatteryValley,
                Scalar::BatterySwing,
            )),
            closes: false,
        },
        Store {
            level: Hourly::Cgh2Level,
            initial: initial.cgh2,
            net_flow: vec![
                (Hourly::Cgh2Injection, 1.0),
                (Hourly::Cgh2ToShaft, -1.0),
                (Hourly::Cgh2ToFuelCell, -1.0),
                (Hourly::Cgh2ToHeating, -1.0),
            ],
            swing: Some((Scalar::Cgh2Peak, Scalar::Cgh2Valley, Scalar::Cgh2Swing)),
            closes: true,
        },
        Store {
            level: Hourly::CdriLevel,
            initial: initial.cdri,
            net_flow: vec![(Hourly::CdriToStore, 1.0), (Hourly::CdriToEaf, -1.0)],
            swing: None,
            closes: true,
        },
    ];
    if params.uses_hbi() {
        stores.push(Store {
            level: Hourly::HbiLevel,
            initial: initial.hbi,
            net_flow: vec![(Hourly::HbiToStore, 1.0), (Hourly::HbiToEaf, -1.0)],
            swing: None,
            closes: true,
        });
    }

    stores
}

/// Add storage constraints.
///
/// The level after each hour equals the previous level plus the net flow in that hour. Before the
/// first hour the level is the configured initial level.
pub fn add_storage_constraints(
    problem: &mut Problem,
    variables: &VariableMap,
    params: &ScenarioParameters,
) {
    for store in stores(params) {
        add_store_constraints(problem, variables, &store);
    }
}

/// Terms for the net flow into a store in one hour, multiplied by `sign`
fn net_flow_terms<'a>(
    variables: &'a VariableMap,
    store: &'a Store,
    hour: usize,
    sign: f64,
) -> impl Iterator<Item = (Variable, f64)> + 'a {
    store
        .net_flow
        .iter()
        .map(move |(flow, coeff)| (variables.hourly(*flow, hour), sign * coeff))
}

fn add_store_constraints(problem: &mut Problem, variables: &VariableMap, store: &Store) {
    let hours = variables.hours();

    for hour in 0..hours {
        let mut terms = vec![(variables.hourly(store.level, hour), 1.0)];
        terms.extend(net_flow_terms(variables, store, hour, -1.0));
        if hour == 0 {
            problem.add_row(store.initial..=store.initial, terms);
        } else {
            terms.push((variables.hourly(store.level, hour - 1), -1.0));
            problem.add_row(0.0..=0.0, terms);
        }
    }

    if let Some((peak, valley, swing)) = store.swing {
        let peak = variables.scalar(peak);
        let valley = variables.scalar(valley);
        for hour in 0..hours {
            let level = variables.hourly(store.level, hour);
            problem.add_row(..=0.0, [(level, 1.0), (peak, -1.0)]);
            problem.add_row(0.0.., [(level, 1.0), (valley, -1.0)]);
        }
        problem.add_row(
            0.0..=0.0,
            [(variables.scalar(swing), 1.0), (peak, -1.0), (valley, 1.0)],
        );
    }

    if store.closes {
        let terms = (0..hours)
            .flat_map(|hour| net_flow_terms(variables, store, hour, 1.0))
            .collect::<Vec<_>>();
        problem.add_row(0.0..=0.0, terms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{model_24h, scenario_params};
    use crate::model::{DriRouting, Model};
    use crate::scenario::{ScrapCase, YearCase};
    use crate::simulation::optimisation::variables::add_variables;
    use rstest::rstest;

    #[rstest]
    #[case(DriRouting::HotAndCold, 3)]
    #[case(DriRouting::WithBriquetting, 4)]
    fn test_stores(mut model_24h: Model, #[case] routing: DriRouting, #[case] expected: usize) {
        model_24h.parameters.dri_routing = routing;
        let params = scenario_params(&model_24h, YearCase::Current, ScrapCase::S1);
        assert_eq!(stores(&params).len(), expected);
    }

    #[rstest]
    fn test_storage_rows(model_24h: Model) {
        let params = scenario_params(&model_24h, YearCase::Current, ScrapCase::S1);
        let mut problem = Problem::default();
        let variables = add_variables(&mut problem, &params);
        add_storage_constraints(&mut problem, &variables, &params);

        // Battery: recursion, peak, valley, swing
        let battery = 24 * 3 + 1;
        // Hydrogen: as battery plus closure
        let cgh2 = 24 * 3 + 2;
        // Cold DRI: recursion plus closure
        let cdri = 24 + 1;
        assert_eq!(problem.num_rows(), battery + cgh2 + cdri);
    }
}
