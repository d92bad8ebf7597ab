//! Mass balances for the EAF charge, DRI routing and hydrogen routing.
use super::super::variables::{HourlyVariable as Hourly, VariableMap};
use super::super::Problem;
use crate::simulation::parameters::ScenarioParameters;

/// Add mass balance constraints.
///
/// The scrap ratio row is omitted for an all-scrap charge, where the ratio is undefined.
pub fn add_mass_constraints(
    problem: &mut Problem,
    variables: &VariableMap,
    params: &ScenarioParameters,
) {
    let process = &params.model.process;
    let charge_yield = process.charge_yield;
    let f_met = params.metallic_yield;

    for hour in 0..variables.hours() {
        let var = |v| variables.hourly(v, hour);

        // EAF inputs equal outputs
        problem.add_row(
            0.0..=0.0,
            [
                (var(Hourly::DriCharged), 1.0),
                (var(Hourly::Scrap), 1.0),
                (var(Hourly::Lime), 1.0),
                (var(Hourly::Alloy), 1.0),
                (var(Hourly::Electrode), 1.0),
                (var(Hourly::LiquidSteel), -1.0),
                (var(Hourly::Slag), -1.0),
            ],
        );

        // DRI charge needed for the metallic yield: DRI = ((LS - alloy) / f_met - scrap) / yield
        problem.add_row(
            0.0..=0.0,
            [
                (var(Hourly::DriCharged), 1.0),
                (var(Hourly::Scrap), 1.0 / charge_yield),
                (var(Hourly::LiquidSteel), -1.0 / (charge_yield * f_met)),
                (var(Hourly::Alloy), 1.0 / (charge_yield * f_met)),
            ],
        );

        if let Some(ratio) = params.scrap_to_dri_ratio {
            problem.add_row(
                0.0..=0.0,
                [(var(Hourly::Scrap), 1.0), (var(Hourly::DriCharged), -ratio)],
            );
        }

        for (additive, intensity) in [
            (Hourly::Lime, params.lime_intensity),
            (Hourly::Alloy, process.alloy_intensity),
            (Hourly::Electrode, process.electrode_intensity),
        ] {
            problem.add_row(
                0.0..=0.0,
                [(var(additive), 1.0), (var(Hourly::LiquidSteel), -intensity)],
            );
        }

        // DRI leaving the shaft goes to the EAF hot, to cold storage or to briquetting
        let mut produced = vec![
            (var(Hourly::DriProduced), 1.0),
            (var(Hourly::HotDri), -1.0),
            (var(Hourly::CdriToStore), -1.0),
        ];
        let mut charged = vec![
            (var(Hourly::DriCharged), 1.0),
            (var(Hourly::HotDri), -1.0),
            (var(Hourly::CdriToEaf), -1.0),
        ];
        if let (Some(to_store), Some(to_eaf)) = (
            variables.try_hourly(Hourly::HbiToStore, hour),
            variables.try_hourly(Hourly::HbiToEaf, hour),
        ) {
            produced.push((to_store, -1.0));
            charged.push((to_eaf, -1.0));
        }
        problem.add_row(0.0..=0.0, produced);
        problem.add_row(0.0..=0.0, charged);

        // Hydrogen routing
        problem.add_row(
            0.0..=0.0,
            [
                (var(Hourly::HydrogenProduced), 1.0),
                (var(Hourly::HydrogenDirect), -1.0),
                (var(Hourly::Cgh2Injection), -1.0),
            ],
        );
        problem.add_row(
            0.0..=0.0,
            [
                (var(Hourly::ShaftHydrogen), 1.0),
                (var(Hourly::HydrogenDirect), -1.0),
                (var(Hourly::Cgh2ToShaft), -1.0),
            ],
        );
    }

    // DRI is conserved over the horizon
    let terms = (0..variables.hours())
        .flat_map(|hour| {
            [
                (variables.hourly(Hourly::DriProduced, hour), 1.0),
                (variables.hourly(Hourly::DriCharged, hour), -1.0),
            ]
        })
        .collect::<Vec<_>>();
    problem.add_row(0.0..=0.0, terms);
}
