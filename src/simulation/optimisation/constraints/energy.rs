//! Energy consumption links: each process draws power or hydrogen in proportion to its throughput.
use super::super::variables::{HourlyVariable as Hourly, VariableMap};
use super::super::Problem;
use crate::simulation::parameters::ScenarioParameters;

/// MJ per MWh
const MJ_PER_MWH: f64 = 3600.0;

/// Add a row `consumer = coeff * driver` for every hour
fn add_hourly_link(
    problem: &mut Problem,
    variables: &VariableMap,
    consumer: Hourly,
    driver: Hourly,
    coeff: f64,
) {
    for hour in 0..variables.hours() {
        problem.add_row(
            0.0..=0.0,
            [
                (variables.hourly(consumer, hour), 1.0),
                (variables.hourly(driver, hour), -coeff),
            ],
        );
    }
}

/// Add energy consumption constraints.
///
/// Covers compressors, electrolyser, briquetting and reheating, the EAF and caster, fuel-cell
/// hydrogen use and the hydrogen and heat demand of the reduction shaft. Heat is balanced in MWh.
pub fn add_energy_constraints(
    problem: &mut Problem,
    variables: &VariableMap,
    params: &ScenarioParameters,
) {
    let process = &params.model.process;
    let technologies = &params.technologies;

    let mut links = vec![
        (
            Hourly::ShaftCompressorPower,
            Hourly::DriProduced,
            process.shaft_compression,
        ),
        (
            Hourly::ElectrolyserPower,
            Hourly::HydrogenProduced,
            technologies.electrolyser.efficiency,
        ),
        (
            Hourly::StorageCompressorPower,
            Hourly::Cgh2Injection,
            process.storage_compression,
        ),
        (
            Hourly::CdriHeatingPower,
            Hourly::CdriToEaf,
            process.cdri_heating,
        ),
        (Hourly::CasterPower, Hourly::LiquidSteel, process.casting),
        (Hourly::EafPower, Hourly::LiquidSteel, params.eaf_intensity),
        (
            Hourly::Cgh2ToFuelCell,
            Hourly::FuelCellPower,
            technologies.fuel_cell.efficiency / process.inverter_efficiency,
        ),
        (
            Hourly::ShaftHydrogen,
            Hourly::DriProduced,
            process.dri_hydrogen,
        ),
        (
            Hourly::HydrogenHeat,
            Hourly::DriProduced,
            process.hydrogen_heating / MJ_PER_MWH,
        ),
    ];
    if params.uses_hbi() {
        links.push((
            Hourly::BriquettingPower,
            Hourly::HbiToStore,
            process.briquetting,
        ));
        links.push((
            Hourly::HbiHeatingPower,
            Hourly::HbiToEaf,
            process.hbi_heating,
        ));
    }

    for (consumer, driver, coeff) in links {
        add_hourly_link(problem, variables, consumer, driver, coeff);
    }

    // Heat for the reduction gas comes from burning stored hydrogen or electric heating
    let hydrogen_heat = process.hydrogen_lhv / MJ_PER_MWH;
    for hour in 0..variables.hours() {
        problem.add_row(
            0.0..=0.0,
            [
                (variables.hourly(Hourly::HydrogenHeat, hour), 1.0),
                (variables.hourly(Hourly::Cgh2ToHeating, hour), -hydrogen_heat),
                (variables.hourly(Hourly::HydrogenHeatingPower, hour), -1.0),
            ],
        );
    }
}
