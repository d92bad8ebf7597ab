//! Result extraction: turns an optimal solution into a flat record of costs, capacities, flows and
//! footprint metrics, and checks the solution against the invariants the model should satisfy.
use super::optimisation::{
    Asset, HourlyVariable as Hourly, OpexLine, ScalarVariable as Scalar, Solution,
};
use super::parameters::ScenarioParameters;
use crate::finance::levelised_cost;
use crate::scenario::{ScrapCase, YearCase};
use log::{info, warn};
use serde::Serialize;

/// Relative tolerance for post-solve checks
const CHECK_TOLERANCE: f64 = 1e-6;

/// Divide, returning zero when the denominator is not positive
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Results for one solved scenario.
///
/// Costs are in MUSD over the modelled horizon, energy in MWh and mass in tonnes unless the column
/// name says otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioResult {
    /// Year case of the technology costs
    #[serde(rename = "Ycase")]
    pub year_case: YearCase,
    /// Scrap case
    #[serde(rename = "Scase")]
    pub scrap_case: ScrapCase,
    /// Fe grade of the run-of-mine ore
    #[serde(rename = "ROM_grade")]
    pub rom_grade: f64,
    /// Scrap fraction of the metallic charge
    #[serde(rename = "Scrap_fraction")]
    pub scrap_fraction: f64,
    /// Annualised CAPEX plus OPEX plus grid cost (MUSD)
    #[serde(rename = "TotalCost")]
    pub total_cost: f64,
    /// Total cost per tonne of liquid steel (USD/t)
    #[serde(rename = "Cost_per_tonne")]
    pub cost_per_tonne: f64,
    /// Hydrogen produced per tonne of steel (t/t)
    #[serde(rename = "Total_H2_t_per_t_steel")]
    pub hydrogen_per_tonne: f64,
    /// Levelised cost of renewable electricity (USD/MWh)
    #[serde(rename = "LCOE_USD_per_MWh")]
    pub lcoe: f64,

    /// Sum of the annualised CAPEX lines (MUSD)
    #[serde(rename = "Total_aCAPEX_mUSD_per_year")]
    pub total_annual_capex: f64,
    /// Annualised CAPEX of solar (MUSD)
    #[serde(rename = "aCAPEX_s")]
    pub annual_capex_solar: f64,
    /// Annualised CAPEX of wind (MUSD)
    #[serde(rename = "aCAPEX_w")]
    pub annual_capex_wind: f64,
    /// Annualised CAPEX of the battery (MUSD)
    #[serde(rename = "aCAPEX_bat")]
    pub annual_capex_battery: f64,
    /// Annualised CAPEX of the electrolyser (MUSD)
    #[serde(rename = "aCAPEX_ely")]
    pub annual_capex_electrolyser: f64,
    /// Annualised CAPEX of the fuel cell (MUSD)
    #[serde(rename = "aCAPEX_FC")]
    pub annual_capex_fuel_cell: f64,
    /// Annualised CAPEX of the DR plant (MUSD)
    #[serde(rename = "aCAPEX_DRP")]
    pub annual_capex_dr_plant: f64,
    /// Annualised CAPEX of the shaft hydrogen compressor (MUSD)
    #[serde(rename = "aCAPEX_cmp2b")]
    pub annual_capex_shaft_compressor: f64,
    /// Annualised CAPEX of compressed hydrogen injection and storage (MUSD)
    #[serde(rename = "aCAPEX_CGH2")]
    pub annual_capex_cgh2: f64,
    /// Annualised CAPEX of the EAF (MUSD)
    #[serde(rename = "aCAPEX_EAF")]
    pub annual_capex_eaf: f64,
    /// Annualised CAPEX of the caster (MUSD)
    #[serde(rename = "aCAPEX_cst")]
    pub annual_capex_caster: f64,

    /// Sum of the OPEX lines (MUSD)
    #[serde(rename = "Total_aOPEX_mUSD_per_year")]
    pub total_annual_opex: f64,
    /// Maintenance as a share of CAPEX (MUSD)
    #[serde(rename = "aOPEX_maint")]
    pub opex_maintenance: f64,
    /// Pellet purchase (MUSD)
    #[serde(rename = "aOPEX_pel")]
    pub opex_pellets: f64,
    /// Lump ore purchase (MUSD)
    #[serde(rename = "aOPEX_lmp")]
    pub opex_lump: f64,
    /// Scrap purchase (MUSD)
    #[serde(rename = "aOPEX_scr")]
    pub opex_scrap: f64,
    /// Lime purchase (MUSD)
    #[serde(rename = "aOPEX_lime")]
    pub opex_lime: f64,
    /// Alloy purchase (MUSD)
    #[serde(rename = "aOPEX_aly")]
    pub opex_alloy: f64,
    /// Electrode purchase (MUSD)
    #[serde(rename = "aOPEX_eld")]
    pub opex_electrode: f64,
    /// Labour for the DR plant and steel shop (MUSD)
    #[serde(rename = "aOPEX_labour")]
    pub opex_labour: f64,
    /// Cost of grid imports (MUSD)
    #[serde(rename = "GridCost_mUSD")]
    pub grid_cost: f64,

    /// Levelised cost of steel including ore (USD/t)
    #[serde(rename = "LCOS_inc_ore")]
    pub lcos_including_ore: f64,
    /// Levelised cost of steel excluding ore (USD/t)
    #[serde(rename = "LCOS_exc_ore")]
    pub lcos_excluding_ore: f64,
    /// Pellet and lump cost per tonne of steel (USD/t)
    #[serde(rename = "Ore_cost_addition")]
    pub ore_cost_per_tonne: f64,
    /// Transport cost (MUSD)
    #[serde(rename = "TotalTransportCost_mUSD")]
    pub transport_cost: f64,
    /// Transport cost per tonne of steel (USD/t)
    #[serde(rename = "TransportCost_per_tonne_steel")]
    pub transport_cost_per_tonne: f64,

    /// Installed solar capacity (MW)
    #[serde(rename = "Solar")]
    pub solar_capacity: f64,
    /// Installed wind capacity (MW)
    #[serde(rename = "Wind")]
    pub wind_capacity: f64,
    /// Installed electrolyser capacity (MW)
    #[serde(rename = "Electrolyzer")]
    pub electrolyser_capacity: f64,
    /// Installed fuel cell capacity (MW)
    #[serde(rename = "FuelCell")]
    pub fuel_cell_capacity: f64,
    /// EAF capacity (t/h)
    #[serde(rename = "EAF")]
    pub eaf_capacity: f64,
    /// Mean DRI production rate (t/h)
    #[serde(rename = "DRP_capacity_tph")]
    pub dr_plant_capacity: f64,
    /// Peak hourly DRI production (t/h)
    #[serde(rename = "DRI_peak_tph")]
    pub dri_peak: f64,
    /// Compressed hydrogen storage size from its level swing (t)
    #[serde(rename = "CGH2_storage_capacity_t")]
    pub cgh2_storage_capacity: f64,

    /// Solar capacity over mean solar output
    #[serde(rename = "Solar_oversizing_factor")]
    pub solar_oversizing: f64,
    /// Wind capacity over mean wind output
    #[serde(rename = "Wind_oversizing_factor")]
    pub wind_oversizing: f64,

    /// Hydrogen produced by the electrolyser (t)
    #[serde(rename = "H2_Production")]
    pub hydrogen_production: f64,
    /// Hydrogen injected into compressed storage (t)
    #[serde(rename = "CGH2_Storage")]
    pub cgh2_injected: f64,
    /// Stored hydrogen withdrawn for the shaft (t)
    #[serde(rename = "CGH2_DRI")]
    pub cgh2_to_shaft: f64,
    /// Stored hydrogen withdrawn for the fuel cell (t)
    #[serde(rename = "CGH2_FC")]
    pub cgh2_to_fuel_cell: f64,
    /// DRI required over the horizon (t)
    #[serde(rename = "DRI")]
    pub dri: f64,
    /// Scrap charged over the horizon (t)
    #[serde(rename = "Scrap")]
    pub scrap: f64,
    /// Hydrogen put through storage per tonne of steel (t/t)
    #[serde(rename = "CGH2_t_per_t_steel")]
    pub cgh2_per_tonne: f64,
    /// Share of hydrogen put through storage (%)
    #[serde(rename = "Pct_CGH2_of_total_H2")]
    pub cgh2_share_pct: f64,
    /// Hot DRI charged per tonne of steel (t/t)
    #[serde(rename = "HDRI_t_per_t_steel")]
    pub hdri_per_tonne: f64,
    /// Cold DRI charged per tonne of steel (t/t)
    #[serde(rename = "CDRI_t_per_t_steel")]
    pub cdri_per_tonne: f64,
    /// HBI charged per tonne of steel (t/t)
    #[serde(rename = "HBI_t_per_t_steel")]
    pub hbi_per_tonne: f64,
    /// Share of DRI charged cold (%)
    #[serde(rename = "Pct_CDRI_of_total_DRI")]
    pub cdri_share_pct: f64,
    /// Electrolyser capacity over mean electrolyser load
    #[serde(rename = "Ely_oversizing_factor")]
    pub electrolyser_oversizing: f64,
    /// EAF capacity over the mean steel rate
    #[serde(rename = "EAF_oversizing_factor")]
    pub eaf_oversizing: f64,
    /// EAF utilisation (%)
    #[serde(rename = "Plant_capacity_factor_pct")]
    pub plant_capacity_factor_pct: f64,

    /// Electricity imported from the grid (MWh)
    #[serde(rename = "GridImport")]
    pub grid_import: f64,
    /// Share of annualised CAPEX in total cost (%)
    #[serde(rename = "CAPEX_share_pct")]
    pub capex_share_pct: f64,
    /// Share of OPEX in total cost (%)
    #[serde(rename = "OPEX_share_pct")]
    pub opex_share_pct: f64,
    /// Share of solar in renewable generation (%)
    #[serde(rename = "share_solar_in_RE")]
    pub solar_share_pct: f64,
    /// Share of wind in renewable generation (%)
    #[serde(rename = "share_wind_in_RE")]
    pub wind_share_pct: f64,
    /// Share of grid import in total energy (%)
    #[serde(rename = "share_grid_in_total_energy")]
    pub grid_share_pct: f64,

    /// Renewable generation (MWh)
    #[serde(rename = "Total_VRE_Generation")]
    pub renewable_generation: f64,
    /// Solar generation (MWh)
    #[serde(rename = "Solar_VRE_Generation")]
    pub solar_generation: f64,
    /// Wind generation (MWh)
    #[serde(rename = "Wind_VRE_Generation")]
    pub wind_generation: f64,
    /// Energy for mining and ore preparation (MWh)
    #[serde(rename = "Ore_energy_MWh")]
    pub ore_energy: f64,

    /// Battery size from its level swing (MWh)
    #[serde(rename = "Battery_storage_capacity_MWh")]
    pub battery_capacity: f64,
    /// Fuel cell output (MWh)
    #[serde(rename = "FuelCell_Annual_Generation_MWh")]
    pub fuel_cell_generation: f64,

    /// Land under solar (km²)
    #[serde(rename = "Land_Solar_km2")]
    pub solar_land: f64,
    /// Land under wind (km²)
    #[serde(rename = "Land_Wind_km2")]
    pub wind_land: f64,
    /// Land under renewables (km²)
    #[serde(rename = "Total_Land_km2")]
    pub total_land: f64,

    /// Embodied CO₂ of solar generation (t)
    #[serde(rename = "CO2_Solar_tonnes")]
    pub solar_co2: f64,
    /// Embodied CO₂ of wind generation (t)
    #[serde(rename = "CO2_Wind_tonnes")]
    pub wind_co2: f64,
    /// Embodied CO₂ of renewable generation (t)
    #[serde(rename = "Total_VRE_CO2_tonnes")]
    pub total_co2: f64,
    /// Embodied CO₂ per tonne of steel (t/t)
    #[serde(rename = "CO2_per_tonne_steel")]
    pub co2_per_tonne: f64,

    /// Levelised cost of hydrogen (USD/kg)
    #[serde(rename = "LCOH_USD_per_kg")]
    pub lcoh: f64,
    /// Share of the electrolyser in total energy (%)
    #[serde(rename = "Ely_energy_share_pct")]
    pub electrolyser_energy_share_pct: f64,
    /// Total cost allocated to electrolyser electricity (MUSD)
    #[serde(rename = "Cost_Ely_Electricity_mUSD_per_year")]
    pub electrolyser_electricity_cost: f64,
    /// Electrolyser CAPEX plus its electricity cost (MUSD)
    #[serde(rename = "Total_H2_Cost_mUSD_per_year")]
    pub hydrogen_cost: f64,
}

impl ScenarioResult {
    /// Build the result record from an optimal solution
    pub fn new(solution: &Solution, params: &ScenarioParameters) -> Self {
        let model = params.model;
        let hours = params.hours as f64;
        let demand = params.steel_demand.value();
        let annual_capex = |asset| solution.scalar(Scalar::AnnualCapex(asset));
        let opex = |line| solution.scalar(Scalar::Opex(line));

        let total_annual_capex = solution.scalar(Scalar::TotalAnnualCapex);
        let total_annual_opex = solution.scalar(Scalar::TotalAnnualOpex);
        let grid_import = solution.total(Hourly::GridImport);
        let grid_cost = grid_import * model.grid_price / 1e6;
        let total_cost = total_annual_capex + total_annual_opex + grid_cost;
        let ore_cost = opex(OpexLine::Pellets) + opex(OpexLine::Lump);

        let solar_capacity = solution.scalar(Scalar::SolarCapacity);
        let wind_capacity = solution.scalar(Scalar::WindCapacity);
        let electrolyser_capacity = solution.scalar(Scalar::ElectrolyserCapacity);
        let eaf_capacity = solution.scalar(Scalar::EafCapacity);

        let solar_generation = solution.total(Hourly::SolarPower);
        let wind_generation = solution.total(Hourly::WindPower);
        let renewable_generation = solution.scalar(Scalar::RenewableGeneration);
        let electrolyser_energy = solution.total(Hourly::ElectrolyserPower);
        let ore_energy = params.ore.energy.total().value();
        let total_energy = renewable_generation
            + ore_energy
            + electrolyser_energy
            + solution.total(Hourly::HydrogenHeatingPower)
            + solution.total(Hourly::ShaftCompressorPower)
            + solution.total(Hourly::StorageCompressorPower)
            + solution.total(Hourly::CdriHeatingPower)
            + solution.total(Hourly::EafPower)
            + solution.total(Hourly::CasterPower);

        let hydrogen_production = solution.total(Hourly::HydrogenProduced);
        let cgh2_injected = solution.total(Hourly::Cgh2Injection);
        let hdri = solution.total(Hourly::HotDri);
        let cdri = solution.total(Hourly::CdriToEaf);
        let hbi = solution.total(Hourly::HbiToEaf);
        let steel = solution.total(Hourly::LiquidSteel);

        // LCOE covers the energy assets: their annualised CAPEX plus their share of maintenance
        let energy_capex: f64 = Asset::ENERGY
            .iter()
            .map(|asset| solution.scalar(Scalar::Capex(*asset)))
            .sum();
        let energy_annual_capex: f64 = Asset::ENERGY.iter().map(|a| annual_capex(*a)).sum();
        let energy_maintenance =
            model.economics.maintenance_fraction * params.time_factor * energy_capex;

        let electrolyser_electricity_cost = total_cost * ratio(electrolyser_energy, total_energy);
        let hydrogen_cost = annual_capex(Asset::Electrolyser) + electrolyser_electricity_cost;

        let footprint = &model.footprint;
        let solar_land = footprint.solar_land * solar_capacity;
        let wind_land = footprint.wind_land * wind_capacity;
        let solar_co2 = footprint.solar_co2 * solar_generation;
        let wind_co2 = footprint.wind_co2 * wind_generation;

        Self {
            year_case: params.key.year_case,
            scrap_case: params.key.scrap_case,
            rom_grade: model.rom_ore_grade.value(),
            scrap_fraction: params.scrap_fraction.value(),
            total_cost,
            cost_per_tonne: levelised_cost(total_cost, demand),
            hydrogen_per_tonne: ratio(hydrogen_production, demand),
            lcoe: levelised_cost(energy_annual_capex + energy_maintenance, renewable_generation),

            total_annual_capex,
            annual_capex_solar: annual_capex(Asset::Solar),
            annual_capex_wind: annual_capex(Asset::Wind),
            annual_capex_battery: annual_capex(Asset::Battery),
            annual_capex_electrolyser: annual_capex(Asset::Electrolyser),
            annual_capex_fuel_cell: annual_capex(Asset::FuelCell),
            annual_capex_dr_plant: annual_capex(Asset::DrPlant),
            annual_capex_shaft_compressor: annual_capex(Asset::ShaftCompressor),
            annual_capex_cgh2: annual_capex(Asset::Cgh2Storage),
            annual_capex_eaf: annual_capex(Asset::Eaf),
            annual_capex_caster: annual_capex(Asset::Caster),

            total_annual_opex,
            opex_maintenance: opex(OpexLine::Maintenance),
            opex_pellets: opex(OpexLine::Pellets),
            opex_lump: opex(OpexLine::Lump),
            opex_scrap: opex(OpexLine::Scrap),
            opex_lime: opex(OpexLine::Lime),
            opex_alloy: opex(OpexLine::Alloy),
            opex_electrode: opex(OpexLine::Electrode),
            opex_labour: opex(OpexLine::Labour),
            grid_cost,

            lcos_including_ore: levelised_cost(total_cost, demand),
            lcos_excluding_ore: levelised_cost(total_cost - ore_cost, demand),
            ore_cost_per_tonne: levelised_cost(ore_cost, demand),
            transport_cost: opex(OpexLine::Transport),
            transport_cost_per_tonne: levelised_cost(opex(OpexLine::Transport), demand),

            solar_capacity,
            wind_capacity,
            electrolyser_capacity,
            fuel_cell_capacity: solution.scalar(Scalar::FuelCellCapacity),
            eaf_capacity,
            dr_plant_capacity: params.dri.value() / hours,
            dri_peak: solution
                .series(Hourly::DriProduced)
                .fold(0.0, f64::max),
            cgh2_storage_capacity: solution.scalar(Scalar::Cgh2Swing),

            solar_oversizing: ratio(solar_capacity, solar_generation / hours),
            wind_oversizing: ratio(wind_capacity, wind_generation / hours),

            hydrogen_production,
            cgh2_injected,
            cgh2_to_shaft: solution.total(Hourly::Cgh2ToShaft),
            cgh2_to_fuel_cell: solution.total(Hourly::Cgh2ToFuelCell),
            dri: params.dri.value(),
            scrap: params.scrap.value(),
            cgh2_per_tonne: ratio(cgh2_injected, demand),
            cgh2_share_pct: 100.0 * ratio(cgh2_injected, hydrogen_production),
            hdri_per_tonne: ratio(hdri, demand),
            cdri_per_tonne: ratio(cdri, demand),
            hbi_per_tonne: ratio(hbi, demand),
            cdri_share_pct: 100.0 * ratio(cdri, hdri + cdri + hbi),
            electrolyser_oversizing: ratio(electrolyser_capacity, electrolyser_energy / hours),
            eaf_oversizing: ratio(eaf_capacity, demand / hours),
            plant_capacity_factor_pct: 100.0 * ratio(steel, eaf_capacity * hours),

            grid_import,
            capex_share_pct: 100.0 * ratio(total_annual_capex, total_cost),
            opex_share_pct: 100.0 * ratio(total_annual_opex, total_cost),
            solar_share_pct: 100.0 * ratio(solar_generation, renewable_generation),
            wind_share_pct: 100.0 * ratio(wind_generation, renewable_generation),
            grid_share_pct: 100.0 * ratio(grid_import, total_energy),

            renewable_generation,
            solar_generation,
            wind_generation,
            ore_energy,

            battery_capacity: solution.scalar(Scalar::BatterySwing),
            fuel_cell_generation: solution.total(Hourly::FuelCellPower),

            solar_land,
            wind_land,
            total_land: solar_land + wind_land,

            solar_co2,
            wind_co2,
            total_co2: solar_co2 + wind_co2,
            co2_per_tonne: ratio(solar_co2 + wind_co2, demand),

            lcoh: ratio(hydrogen_cost * 1e6, hydrogen_production * 1000.0),
            electrolyser_energy_share_pct: 100.0 * ratio(electrolyser_energy, total_energy),
            electrolyser_electricity_cost,
            hydrogen_cost,
        }
    }

    /// Log a short summary of this result
    pub fn log_summary(&self) {
        info!(
            "({}, {}): LCOS {:.2} USD/t (excluding ore {:.2} USD/t), LCOH {:.2} USD/kg, \
            LCOE {:.2} USD/MWh",
            self.year_case,
            self.scrap_case,
            self.lcos_including_ore,
            self.lcos_excluding_ore,
            self.lcoh,
            self.lcoe
        );
        info!(
            "Capacities: solar {:.1} MW, wind {:.1} MW, electrolyser {:.1} MW, fuel cell {:.1} MW, \
            EAF {:.1} t/h, battery {:.1} MWh, hydrogen storage {:.1} t",
            self.solar_capacity,
            self.wind_capacity,
            self.electrolyser_capacity,
            self.fuel_cell_capacity,
            self.eaf_capacity,
            self.battery_capacity,
            self.cgh2_storage_capacity
        );
    }
}

/// Whether `actual` is within the check tolerance of `expected`, relative to `scale`
fn close(actual: f64, expected: f64, scale: f64) -> bool {
    (actual - expected).abs() <= CHECK_TOLERANCE * scale.abs().max(1.0)
}

/// Check that a solution satisfies the model's invariants.
///
/// Violations are logged as warnings. Returns the descriptions of any violations.
pub fn check_solution(solution: &Solution, params: &ScenarioParameters) -> Vec<String> {
    let mut violations = Vec::new();
    let demand = params.steel_demand.value();

    let steel: f64 = solution.series(Hourly::LiquidSteel).sum();
    if !close(steel, demand, demand) {
        violations.push(format!(
            "Liquid steel output {steel} does not match demand {demand}"
        ));
    }

    let produced: f64 = solution.series(Hourly::DriProduced).sum();
    let charged: f64 = solution.series(Hourly::DriCharged).sum();
    if !close(produced, charged, produced) {
        violations.push(format!(
            "DRI produced ({produced}) does not match DRI charged ({charged})"
        ));
    }

    let share = params.model.min_renewable_share.value();
    if share > 0.0 {
        let generation = solution.scalar(Scalar::RenewableGeneration);
        let required = share
            * (solution.total(Hourly::TotalConsumption) + solution.total(Hourly::GridImport));
        if generation < required - CHECK_TOLERANCE * required.max(1.0) {
            violations.push(format!(
                "Renewable generation {generation} is below the required {required}"
            ));
        }
    }

    for level in [
        Hourly::BatteryLevel,
        Hourly::Cgh2Level,
        Hourly::CdriLevel,
        Hourly::HbiLevel,
    ] {
        if let Some((hour, value)) = solution
            .series(level)
            .enumerate()
            .find(|(_, value)| *value < -CHECK_TOLERANCE)
        {
            violations.push(format!("{level:?} is negative ({value}) in hour {}", hour + 1));
        }
    }

    let worst_residual = (0..solution.hours())
        .map(|hour| balance_residual(solution, hour).abs())
        .fold(0.0, f64::max);
    let scale = solution
        .series(Hourly::TotalConsumption)
        .fold(0.0, f64::max);
    if worst_residual > CHECK_TOLERANCE * scale.max(1.0) {
        violations.push(format!(
            "Hourly energy balance does not close (largest residual {worst_residual} MWh)"
        ));
    }

    for violation in &violations {
        warn!("Scenario {}: {violation}", params.key);
    }

    violations
}

/// Sources minus uses and inverter losses for one hour
fn balance_residual(solution: &Solution, hour: usize) -> f64 {
    let value = |var| solution.hourly(var, hour);
    let sources = value(Hourly::SolarPower)
        + value(Hourly::WindPower)
        + value(Hourly::BatteryDischarge)
        + value(Hourly::FuelCellPower)
        + value(Hourly::GridImport);
    let uses = value(Hourly::TotalConsumption)
        + value(Hourly::BatteryCharge)
        + value(Hourly::Curtailment);
    let losses = value(Hourly::RenewableToInverter) - value(Hourly::RenewableAc)
        + value(Hourly::BatteryToInverter)
        - value(Hourly::BatteryAc);
    sources - uses - losses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{model_24h, scenario_params};
    use crate::model::Model;
    use crate::simulation::optimisation::{SolveOutcome, solve_scenario};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn solve(model: &Model, year_case: YearCase, scrap_case: ScrapCase) -> ScenarioResult {
        let params = scenario_params(model, year_case, scrap_case);
        let SolveOutcome::Solved(solution) = solve_scenario(&params, false) else {
            panic!("Scenario not solved");
        };
        assert!(check_solution(&solution, &params).is_empty());
        ScenarioResult::new(&solution, &params)
    }

    #[rstest]
    #[case(1.0, 2.0, 0.5)]
    #[case(1.0, 0.0, 0.0)]
    #[case(1.0, -1.0, 0.0)]
    fn test_ratio(#[case] numerator: f64, #[case] denominator: f64, #[case] expected: f64) {
        assert_eq!(ratio(numerator, denominator), expected);
    }

    #[rstest]
    fn test_lcos_round_trip(model_24h: Model) {
        let result = solve(&model_24h, YearCase::Current, ScrapCase::S1);
        let demand = 1e6 * 24.0 / 8760.0;
        let total = result.total_annual_capex + result.total_annual_opex + result.grid_cost;
        assert_approx_eq!(f64, result.total_cost, total, epsilon = 1e-9);
        assert_approx_eq!(
            f64,
            result.lcos_including_ore,
            total * 1e6 / demand,
            epsilon = 1e-6
        );
        assert!(result.lcos_excluding_ore < result.lcos_including_ore);
    }

    #[rstest]
    fn test_annual_capex_matches_unit_costs(model_24h: Model) {
        let params = scenario_params(&model_24h, YearCase::Y2030, ScrapCase::S1);
        let factor = params.annualisation_factor();
        let result = solve(&model_24h, YearCase::Y2030, ScrapCase::S1);
        assert_approx_eq!(
            f64,
            result.annual_capex_solar,
            0.562 * result.solar_capacity * factor,
            epsilon = 1e-6
        );
        assert_approx_eq!(
            f64,
            result.annual_capex_electrolyser,
            0.385 * 2.0 * result.electrolyser_capacity * factor,
            epsilon = 1e-6
        );
        assert_approx_eq!(
            f64,
            result.annual_capex_wind,
            0.907 * result.wind_capacity * factor,
            epsilon = 1e-6
        );
        assert_approx_eq!(
            f64,
            result.annual_capex_battery,
            0.594 * 2.0 * result.battery_capacity / 4.0 * factor,
            epsilon = 1e-6
        );
        assert_approx_eq!(
            f64,
            result.annual_capex_fuel_cell,
            0.139 * 2.0 * result.fuel_cell_capacity * factor,
            epsilon = 1e-6
        );

        // DR plant CAPEX follows the annual DRI regression
        let annual_dri = 1e6 / 0.94;
        assert_approx_eq!(f64, result.dri, annual_dri * 24.0 / 8760.0, epsilon = 1e-6);
        assert_approx_eq!(
            f64,
            result.annual_capex_dr_plant,
            0.00031 * annual_dri * factor,
            epsilon = 1e-6
        );
        assert_approx_eq!(
            f64,
            result.annual_capex_eaf,
            (params.model.economics.eaf_capex_slope * result.eaf_capacity
                + params.model.economics.eaf_capex_intercept)
                * factor,
            epsilon = 1e-6
        );
    }

    #[rstest]
    fn test_all_dri_charge_has_no_scrap(model_24h: Model) {
        let result = solve(&model_24h, YearCase::Current, ScrapCase::S1);
        assert_eq!(result.scrap, 0.0);
        assert_eq!(result.opex_scrap, 0.0);
        assert!(result.hydrogen_production > 0.0);
    }

    #[rstest]
    fn test_more_scrap(model_24h: Model) {
        let s1 = solve(&model_24h, YearCase::Current, ScrapCase::S1);
        let s3 = solve(&model_24h, YearCase::Current, ScrapCase::S3);
        assert!(s3.electrolyser_capacity < s1.electrolyser_capacity);
        assert!(s3.dr_plant_capacity < s1.dr_plant_capacity);
        assert!(s3.opex_scrap > s1.opex_scrap);
    }

    #[rstest]
    fn test_footprint(model_24h: Model) {
        let result = solve(&model_24h, YearCase::Current, ScrapCase::S1);
        assert_approx_eq!(f64, result.solar_land, 0.02 * result.solar_capacity);
        assert_approx_eq!(f64, result.wind_land, 0.12 * result.wind_capacity);
        assert_approx_eq!(f64, result.total_co2, result.solar_co2 + result.wind_co2);
        assert!(result.total_land > 0.0);
    }

    #[rstest]
    fn test_write_result_row(model_24h: Model) {
        let result = solve(&model_24h, YearCase::Current, ScrapCase::S1);
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&result).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("Ycase,Scase,ROM_grade,Scrap_fraction,TotalCost"));
        assert!(header.contains("LCOS_inc_ore"));
        assert!(text.lines().nth(1).unwrap().starts_with("YCurrent,S1,"));
    }
}
