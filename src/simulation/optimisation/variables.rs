//! The variable registry for the plant LP.
use super::Problem;
use crate::simulation::parameters::ScenarioParameters;
use indexmap::IndexMap;
use std::ops::RangeBounds;

/// A decision variable in the optimisation
///
/// Note that this type does **not** include the value of the variable; it just refers to a
/// particular column of the problem.
pub type Variable = highs::Col;

/// A quantity with one variable per hour.
///
/// Power flows are in MW (equivalently MWh per hour), hydrogen and material flows in tonnes per
/// hour and storage levels in MWh or tonnes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HourlyVariable {
    /// Solar generation
    SolarPower,
    /// Wind generation
    WindPower,
    /// Renewable power used directly on the DC bus
    RenewableToDc,
    /// Renewable power entering the inverter
    RenewableToInverter,
    /// Renewable power leaving the inverter onto the AC bus
    RenewableAc,
    /// Renewable power charging the battery
    BatteryCharge,
    /// Renewable power not used
    Curtailment,
    /// Grid import onto the AC bus
    GridImport,
    /// Battery discharge (DC side)
    BatteryDischarge,
    /// Battery discharge used on the DC bus
    BatteryToDc,
    /// Battery discharge entering the inverter
    BatteryToInverter,
    /// Battery discharge leaving the inverter onto the AC bus
    BatteryAc,
    /// Battery state of charge (MWh)
    BatteryLevel,
    /// Electrolyser DC input
    ElectrolyserPower,
    /// Electrolyser input taken from the DC bus
    ElectrolyserDc,
    /// Electrolyser input delivered by the rectifier
    ElectrolyserRectified,
    /// AC power drawn by the electrolyser rectifier
    ElectrolyserAc,
    /// Fuel cell output onto the AC bus
    FuelCellPower,
    /// Compression of hydrogen into storage
    StorageCompressorPower,
    /// Compression of hydrogen for the DR shaft
    ShaftCompressorPower,
    /// Briquetting of hot DRI
    BriquettingPower,
    /// Reheating of HBI charged to the EAF
    HbiHeatingPower,
    /// Reheating of cold DRI charged to the EAF
    CdriHeatingPower,
    /// Electric heating of reduction hydrogen
    HydrogenHeatingPower,
    /// EAF electricity
    EafPower,
    /// Caster electricity
    CasterPower,
    /// Total AC consumption
    AcConsumption,
    /// Total DC consumption
    DcConsumption,
    /// Total consumption
    TotalConsumption,
    /// Electrolyser hydrogen output
    HydrogenProduced,
    /// Electrolyser hydrogen sent straight to the shaft
    HydrogenDirect,
    /// Hydrogen compressed into storage
    Cgh2Injection,
    /// Stored hydrogen sent to the shaft
    Cgh2ToShaft,
    /// Stored hydrogen sent to the fuel cell
    Cgh2ToFuelCell,
    /// Stored hydrogen burned to heat reduction gas
    Cgh2ToHeating,
    /// Compressed hydrogen storage level (t)
    Cgh2Level,
    /// Hydrogen consumed by the shaft
    ShaftHydrogen,
    /// Heat needed by reduction hydrogen (MWh)
    HydrogenHeat,
    /// DRI leaving the shaft
    DriProduced,
    /// DRI charged to the EAF
    DriCharged,
    /// Hot DRI charged directly
    HotDri,
    /// DRI cooled into storage
    CdriToStore,
    /// Cold DRI charged to the EAF
    CdriToEaf,
    /// Cold DRI storage level (t)
    CdriLevel,
    /// DRI briquetted into storage
    HbiToStore,
    /// HBI charged to the EAF
    HbiToEaf,
    /// HBI storage level (t)
    HbiLevel,
    /// Scrap charged to the EAF
    Scrap,
    /// Lime charged to the EAF
    Lime,
    /// Alloys charged to the EAF
    Alloy,
    /// Electrodes consumed
    Electrode,
    /// Slag tapped
    Slag,
    /// Liquid steel tapped
    LiquidSteel,
}

impl HourlyVariable {
    /// Every hourly variable, in the order columns are created
    pub const ALL: [HourlyVariable; 53] = [
        Self::SolarPower,
        Self::WindPower,
        Self::RenewableToDc,
        Self::RenewableToInverter,
        Self::RenewableAc,
        Self::BatteryCharge,
        Self::Curtailment,
        Self::GridImport,
        Self::BatteryDischarge,
        Self::BatteryToDc,
        Self::BatteryToInverter,
        Self::BatteryAc,
        Self::BatteryLevel,
        Self::ElectrolyserPower,
        Self::ElectrolyserDc,
        Self::ElectrolyserRectified,
        Self::ElectrolyserAc,
        Self::FuelCellPower,
        Self::StorageCompressorPower,
        Self::ShaftCompressorPower,
        Self::BriquettingPower,
        Self::HbiHeatingPower,
        Self::CdriHeatingPower,
        Self::HydrogenHeatingPower,
        Self::EafPower,
        Self::CasterPower,
        Self::AcConsumption,
        Self::DcConsumption,
        Self::TotalConsumption,
        Self::HydrogenProduced,
        Self::HydrogenDirect,
        Self::Cgh2Injection,
        Self::Cgh2ToShaft,
        Self::Cgh2ToFuelCell,
        Self::Cgh2ToHeating,
        Self::Cgh2Level,
        Self::ShaftHydrogen,
        Self::HydrogenHeat,
        Self::DriProduced,
        Self::DriCharged,
        Self::HotDri,
        Self::CdriToStore,
        Self::CdriToEaf,
        Self::CdriLevel,
        Self::HbiToStore,
        Self::HbiToEaf,
        Self::HbiLevel,
        Self::Scrap,
        Self::Lime,
        Self::Alloy,
        Self::Electrode,
        Self::Slag,
        Self::LiquidSteel,
    ];

    /// Whether this variable only exists on the hot-briquetted iron route
    pub fn requires_hbi(self) -> bool {
        matches!(
            self,
            Self::BriquettingPower
                | Self::HbiHeatingPower
                | Self::HbiToStore
                | Self::HbiToEaf
                | Self::HbiLevel
        )
    }
}

/// An asset with a CAPEX line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    /// Solar PV
    Solar,
    /// Wind
    Wind,
    /// Battery
    Battery,
    /// Electrolyser
    Electrolyser,
    /// Fuel cell
    FuelCell,
    /// DR plant
    DrPlant,
    /// Shaft hydrogen compressor
    ShaftCompressor,
    /// Compressed hydrogen storage
    Cgh2Storage,
    /// Electric arc furnace
    Eaf,
    /// Continuous caster
    Caster,
}

impl Asset {
    /// All assets
    pub const ALL: [Asset; 10] = [
        Self::Solar,
        Self::Wind,
        Self::Battery,
        Self::Electrolyser,
        Self::FuelCell,
        Self::DrPlant,
        Self::ShaftCompressor,
        Self::Cgh2Storage,
        Self::Eaf,
        Self::Caster,
    ];

    /// Assets which supply energy, used for levelised cost of electricity
    pub const ENERGY: [Asset; 5] = [
        Self::Solar,
        Self::Wind,
        Self::Battery,
        Self::Electrolyser,
        Self::FuelCell,
    ];
}

/// An annual operating cost line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpexLine {
    /// Maintenance as a share of CAPEX
    Maintenance,
    /// Pellet feed
    Pellets,
    /// Lump ore
    Lump,
    /// Scrap
    Scrap,
    /// Lime
    Lime,
    /// Alloys
    Alloy,
    /// Electrodes
    Electrode,
    /// Labour
    Labour,
    /// Ore transport
    Transport,
}

impl OpexLine {
    /// All operating cost lines
    pub const ALL: [OpexLine; 9] = [
        Self::Maintenance,
        Self::Pellets,
        Self::Lump,
        Self::Scrap,
        Self::Lime,
        Self::Alloy,
        Self::Electrode,
        Self::Labour,
        Self::Transport,
    ];
}

/// A quantity with a single variable for the whole horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarVariable {
    /// Installed solar (MW)
    SolarCapacity,
    /// Installed wind (MW)
    WindCapacity,
    /// Installed electrolyser (MW)
    ElectrolyserCapacity,
    /// Installed fuel cell (MW)
    FuelCellCapacity,
    /// Installed EAF (t/h)
    EafCapacity,
    /// Maximum hydrogen injection rate into storage (t/h)
    Cgh2InjectionCapacity,
    /// Peak hourly liquid steel (t/h)
    LiquidSteelPeak,
    /// Highest battery level (MWh)
    BatteryPeak,
    /// Lowest battery level (MWh)
    BatteryValley,
    /// Battery storage capacity, peak minus valley (MWh)
    BatterySwing,
    /// Highest hydrogen storage level (t)
    Cgh2Peak,
    /// Lowest hydrogen storage level (t)
    Cgh2Valley,
    /// Hydrogen storage capacity, peak minus valley (t)
    Cgh2Swing,
    /// CAPEX of an asset (MUSD)
    Capex(Asset),
    /// Annualised CAPEX of an asset over the horizon (MUSD)
    AnnualCapex(Asset),
    /// Total annualised CAPEX (MUSD)
    TotalAnnualCapex,
    /// An operating cost line over the horizon (MUSD)
    Opex(OpexLine),
    /// Total operating cost (MUSD)
    TotalAnnualOpex,
    /// Total renewable generation
    RenewableGeneration,
    /// Sum of an hourly variable over the horizon
    Total(HourlyVariable),
}

/// Hourly variables that have an annual total
pub const TOTALLED: [HourlyVariable; 23] = [
    HourlyVariable::SolarPower,
    HourlyVariable::WindPower,
    HourlyVariable::Curtailment,
    HourlyVariable::GridImport,
    HourlyVariable::TotalConsumption,
    HourlyVariable::ElectrolyserPower,
    HourlyVariable::FuelCellPower,
    HourlyVariable::HydrogenHeatingPower,
    HourlyVariable::ShaftCompressorPower,
    HourlyVariable::StorageCompressorPower,
    HourlyVariable::CdriHeatingPower,
    HourlyVariable::HbiHeatingPower,
    HourlyVariable::EafPower,
    HourlyVariable::CasterPower,
    HourlyVariable::HydrogenProduced,
    HourlyVariable::Cgh2Injection,
    HourlyVariable::Cgh2ToShaft,
    HourlyVariable::Cgh2ToFuelCell,
    HourlyVariable::HotDri,
    HourlyVariable::CdriToEaf,
    HourlyVariable::HbiToEaf,
    HourlyVariable::LiquidSteel,
    HourlyVariable::Scrap,
];

/// A key for a [`VariableMap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum VariableMapKey {
    Hourly(HourlyVariable, usize),
    Scalar(ScalarVariable),
}

/// A map for easy lookup of variables in the problem.
///
/// The entries are ordered (see [`IndexMap`]) and each entry's index is its column index, which is
/// how values are read back from the solution.
pub struct VariableMap {
    map: IndexMap<VariableMapKey, Variable>,
    hours: usize,
}

impl VariableMap {
    fn new(hours: usize) -> Self {
        Self {
            map: IndexMap::new(),
            hours,
        }
    }

    /// Add a column to the problem and record it
    fn add<B: RangeBounds<f64>>(
        &mut self,
        problem: &mut Problem,
        key: VariableMapKey,
        cost: f64,
        bounds: B,
    ) {
        let var = problem.add_column(cost, bounds);
        let existing = self.map.insert(key, var).is_some();
        assert!(!existing, "Variable {key:?} added twice");
    }

    /// The number of hours covered by hourly variables
    pub fn hours(&self) -> usize {
        self.hours
    }

    /// Get the [`Variable`] for an hourly quantity
    pub fn hourly(&self, var: HourlyVariable, hour: usize) -> Variable {
        self.try_hourly(var, hour)
            .expect("No variable found for given params")
    }

    /// Get the [`Variable`] for an hourly quantity, if it exists in this problem
    pub fn try_hourly(&self, var: HourlyVariable, hour: usize) -> Option<Variable> {
        self.map.get(&VariableMapKey::Hourly(var, hour)).copied()
    }

    /// Whether an hourly quantity exists in this problem
    pub fn has_hourly(&self, var: HourlyVariable) -> bool {
        self.try_hourly(var, 0).is_some()
    }

    /// Get the [`Variable`] for a scalar quantity
    pub fn scalar(&self, var: ScalarVariable) -> Variable {
        self.try_scalar(var)
            .expect("No variable found for given params")
    }

    /// Get the [`Variable`] for a scalar quantity, if it exists in this problem
    pub fn try_scalar(&self, var: ScalarVariable) -> Option<Variable> {
        self.map.get(&VariableMapKey::Scalar(var)).copied()
    }

    /// The number of variables
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether there are no variables
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Column index of an hourly variable
    pub(super) fn hourly_index(&self, var: HourlyVariable, hour: usize) -> Option<usize> {
        self.map.get_index_of(&VariableMapKey::Hourly(var, hour))
    }

    /// Column index of a scalar variable
    pub(super) fn scalar_index(&self, var: ScalarVariable) -> Option<usize> {
        self.map.get_index_of(&VariableMapKey::Scalar(var))
    }
}

/// Objective coefficient for costs in MUSD, giving a levelised cost in USD per tonne of steel
pub fn cost_objective_coefficient(params: &ScenarioParameters) -> f64 {
    1e6 / params.steel_demand.value()
}

/// Objective coefficient for grid imports in MWh
pub fn grid_objective_coefficient(params: &ScenarioParameters) -> f64 {
    params.model.grid_price / params.steel_demand.value()
}

/// Add variables to the optimisation problem.
///
/// All variables are non-negative. Variables for the hot-briquetted iron route are only created
/// when that route is enabled.
///
/// # Arguments
///
/// * `problem` - The optimisation problem
/// * `params` - Scenario parameters
///
/// # Returns
///
/// A [`VariableMap`] with the problem's variables as values.
pub fn add_variables(problem: &mut Problem, params: &ScenarioParameters) -> VariableMap {
    let mut variables = VariableMap::new(params.hours);
    let uses_hbi = params.uses_hbi();

    for var in HourlyVariable::ALL {
        if var.requires_hbi() && !uses_hbi {
            continue;
        }
        for hour in 0..params.hours {
            variables.add(problem, VariableMapKey::Hourly(var, hour), 0.0, 0.0..);
        }
    }

    let mut add_scalar = |var, cost, upper: f64| {
        variables.add(problem, VariableMapKey::Scalar(var), cost, 0.0..=upper);
    };

    for var in [
        ScalarVariable::SolarCapacity,
        ScalarVariable::WindCapacity,
        ScalarVariable::ElectrolyserCapacity,
        ScalarVariable::FuelCellCapacity,
        ScalarVariable::Cgh2InjectionCapacity,
        ScalarVariable::LiquidSteelPeak,
        ScalarVariable::BatteryPeak,
        ScalarVariable::BatteryValley,
        ScalarVariable::BatterySwing,
        ScalarVariable::Cgh2Peak,
        ScalarVariable::Cgh2Valley,
        ScalarVariable::Cgh2Swing,
    ] {
        add_scalar(var, 0.0, f64::INFINITY);
    }
    add_scalar(
        ScalarVariable::EafCapacity,
        0.0,
        params.model.max_eaf_capacity,
    );

    for asset in Asset::ALL {
        add_scalar(ScalarVariable::Capex(asset), 0.0, f64::INFINITY);
        add_scalar(ScalarVariable::AnnualCapex(asset), 0.0, f64::INFINITY);
    }
    for line in OpexLine::ALL {
        add_scalar(ScalarVariable::Opex(line), 0.0, f64::INFINITY);
    }

    let cost_coeff = cost_objective_coefficient(params);
    add_scalar(ScalarVariable::TotalAnnualCapex, cost_coeff, f64::INFINITY);
    add_scalar(ScalarVariable::TotalAnnualOpex, cost_coeff, f64::INFINITY);
    add_scalar(ScalarVariable::RenewableGeneration, 0.0, f64::INFINITY);

    let grid_coeff = grid_objective_coefficient(params);
    for var in TOTALLED {
        if var.requires_hbi() && !uses_hbi {
            continue;
        }
        let cost = if var == HourlyVariable::GridImport {
            grid_coeff
        } else {
            0.0
        };
        add_scalar(ScalarVariable::Total(var), cost, f64::INFINITY);
    }

    variables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{model_24h, scenario_params};
    use crate::model::Model;
    use crate::model::parameters::DriRouting;
    use crate::scenario::{ScenarioKey, ScrapCase, YearCase};
    use rstest::rstest;

    #[rstest]
    fn test_add_variables_without_hbi(model_24h: Model) {
        let params = scenario_params(&model_24h, YearCase::Current, ScrapCase::S1);
        let mut problem = Problem::default();
        let variables = add_variables(&mut problem, &params);

        assert_eq!(variables.len(), problem.num_cols());
        assert!(!variables.has_hourly(HourlyVariable::HbiLevel));
        assert!(variables.try_scalar(ScalarVariable::Total(HourlyVariable::HbiToEaf)).is_none());
        assert!(variables.has_hourly(HourlyVariable::CdriLevel));
        assert!(variables.try_hourly(HourlyVariable::LiquidSteel, 23).is_some());
        assert!(variables.try_hourly(HourlyVariable::LiquidSteel, 24).is_none());

        // Columns are indexed in insertion order
        assert_eq!(variables.hourly_index(HourlyVariable::SolarPower, 0), Some(0));
        assert_eq!(variables.hourly_index(HourlyVariable::SolarPower, 5), Some(5));
        assert_eq!(variables.hourly_index(HourlyVariable::WindPower, 0), Some(24));
    }

    #[rstest]
    fn test_add_variables_with_hbi(mut model_24h: Model) {
        model_24h.parameters.dri_routing = DriRouting::WithBriquetting;
        let key = ScenarioKey::new(YearCase::Current, ScrapCase::S2);
        let params = ScenarioParameters::new(&model_24h, key).unwrap();
        let mut problem = Problem::default();
        let variables = add_variables(&mut problem, &params);

        assert!(variables.has_hourly(HourlyVariable::HbiLevel));
        assert!(variables.try_scalar(ScalarVariable::Total(HourlyVariable::HbiToEaf)).is_some());
    }
}
