//! Power balances on the DC and AC buses.
//!
//! Renewable generation is split between the DC bus, the inverter, battery charging and
//! curtailment. Battery discharge feeds either bus. The electrolyser draws from the DC bus or from
//! the AC bus through a rectifier. All other process loads sit on the AC bus.
use super::super::variables::{HourlyVariable as Hourly, VariableMap};
use super::super::Problem;
use crate::simulation::parameters::ScenarioParameters;

/// Process loads connected to the AC bus, excluding the electrolyser rectifier
const AC_PROCESS_LOADS: [Hourly; 9] = [
    Hourly::StorageCompressorPower,
    Hourly::HydrogenHeatingPower,
    Hourly::ShaftCompressorPower,
    Hourly::BriquettingPower,
    Hourly::HbiHeatingPower,
    Hourly::CdriHeatingPower,
    Hourly::EafPower,
    Hourly::CasterPower,
    Hourly::ElectrolyserAc,
];

/// Add an hourly row `lhs = Σ rhs`
fn add_sum_row(
    problem: &mut Problem,
    variables: &VariableMap,
    hour: usize,
    lhs: Hourly,
    rhs: &[Hourly],
) {
    let mut terms = vec![(variables.hourly(lhs, hour), 1.0)];
    terms.extend(
        rhs.iter()
            .filter_map(|var| variables.try_hourly(*var, hour))
            .map(|var| (var, -1.0)),
    );
    problem.add_row(0.0..=0.0, terms);
}

/// Add bus balance and inverter constraints.
///
/// When `strict_hourly_balance` is set, an aggregate row equating all sources with all uses and
/// losses is also added for every hour. It is implied by the bus balances.
pub fn add_balance_constraints(
    problem: &mut Problem,
    variables: &VariableMap,
    params: &ScenarioParameters,
) {
    let eff = params.model.process.inverter_efficiency;

    for hour in 0..variables.hours() {
        let var = |v| variables.hourly(v, hour);

        // Renewable split
        problem.add_row(
            0.0..=0.0,
            [
                (var(Hourly::SolarPower), 1.0),
                (var(Hourly::WindPower), 1.0),
                (var(Hourly::RenewableToDc), -1.0),
                (var(Hourly::RenewableToInverter), -1.0),
                (var(Hourly::BatteryCharge), -1.0),
                (var(Hourly::Curtailment), -1.0),
            ],
        );

        add_sum_row(
            problem,
            variables,
            hour,
            Hourly::BatteryDischarge,
            &[Hourly::BatteryToDc, Hourly::BatteryToInverter],
        );
        add_sum_row(
            problem,
            variables,
            hour,
            Hourly::ElectrolyserPower,
            &[Hourly::ElectrolyserDc, Hourly::ElectrolyserRectified],
        );

        // AC bus
        add_sum_row(
            problem,
            variables,
            hour,
            Hourly::AcConsumption,
            &[
                Hourly::RenewableAc,
                Hourly::BatteryAc,
                Hourly::FuelCellPower,
                Hourly::GridImport,
            ],
        );
        add_sum_row(
            problem,
            variables,
            hour,
            Hourly::AcConsumption,
            &AC_PROCESS_LOADS,
        );

        // DC bus
        add_sum_row(
            problem,
            variables,
            hour,
            Hourly::DcConsumption,
            &[Hourly::RenewableToDc, Hourly::BatteryToDc],
        );
        add_sum_row(
            problem,
            variables,
            hour,
            Hourly::DcConsumption,
            &[Hourly::ElectrolyserDc],
        );

        add_sum_row(
            problem,
            variables,
            hour,
            Hourly::TotalConsumption,
            &[Hourly::AcConsumption, Hourly::DcConsumption],
        );

        // Inverter losses: AC output is the inverter efficiency times its input
        for (input, output) in [
            (Hourly::RenewableToInverter, Hourly::RenewableAc),
            (Hourly::BatteryToInverter, Hourly::BatteryAc),
            (Hourly::ElectrolyserAc, Hourly::ElectrolyserRectified),
        ] {
            problem.add_row(0.0..=0.0, [(var(output), 1.0), (var(input), -eff)]);
        }

        if params.model.strict_hourly_balance {
            problem.add_row(
                0.0..=0.0,
                [
                    (var(Hourly::SolarPower), 1.0),
                    (var(Hourly::WindPower), 1.0),
                    (var(Hourly::BatteryDischarge), 1.0),
                    (var(Hourly::FuelCellPower), 1.0),
                    (var(Hourly::GridImport), 1.0),
                    (var(Hourly::TotalConsumption), -1.0),
                    (var(Hourly::BatteryCharge), -1.0),
                    (var(Hourly::Curtailment), -1.0),
                    (var(Hourly::RenewableToInverter), -1.0),
                    (var(Hourly::RenewableAc), 1.0),
                    (var(Hourly::BatteryToInverter), -1.0),
                    (var(Hourly::BatteryAc), 1.0),
                ],
            );
        }
    }
}
