//! Derivation of the coefficients used to build the LP for a single scenario.
use super::ore::OreChain;
use crate::finance::capital_recovery_factor;
use crate::model::{Model, ModelParameters};
use crate::profile::HourlyProfile;
use crate::scenario::ScenarioKey;
use crate::technology::TechnologySet;
use crate::units::{Dimensionless, Money, MoneyPerTonne, Tonnes, USD_PER_MILLION};
use anyhow::{Context, Result};

/// GJ per MWh
const GJ_PER_MWH: f64 = 3.6;

/// Scrap fractions closer to one than this have no DRI in the charge
const SCRAP_FRACTION_TOLERANCE: f64 = 1e-6;

/// Fixed annual operating costs over the modelled horizon (MUSD)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OperatingCosts {
    /// Pellet feed
    pub pellets: f64,
    /// Lump ore
    pub lump: f64,
    /// Scrap
    pub scrap: f64,
    /// Lime
    pub lime: f64,
    /// Alloys
    pub alloy: f64,
    /// Electrodes
    pub electrode: f64,
    /// Labour at the DR plant and melt shop
    pub labour: f64,
    /// Ore transport
    pub transport: f64,
}

/// Everything the model builder needs for one scenario
pub struct ScenarioParameters<'a> {
    /// The scenario being built
    pub key: ScenarioKey,
    /// Model-wide parameters and plant constants
    pub model: &'a ModelParameters,
    /// Hourly renewable availability
    pub profile: &'a HourlyProfile,
    /// Number of hours in the horizon
    pub hours: usize,
    /// Horizon length as a fraction of a year
    pub time_factor: f64,
    /// Liquid steel demand over the horizon
    pub steel_demand: Tonnes,
    /// Scrap fraction of the metallic charge
    pub scrap_fraction: Dimensionless,
    /// Tonnes of scrap per tonne of DRI in the charge, absent for an all-scrap charge
    pub scrap_to_dri_ratio: Option<f64>,
    /// Lime per tonne of liquid steel
    pub lime_intensity: f64,
    /// Metallic yield of the EAF charge
    pub metallic_yield: f64,
    /// EAF electricity per tonne of liquid steel (MWh/t)
    pub eaf_intensity: f64,
    /// DRI requirement over the horizon
    pub dri: Tonnes,
    /// Scrap requirement over the horizon
    pub scrap: Tonnes,
    /// Lime requirement over the horizon
    pub lime: Tonnes,
    /// Alloy requirement over the horizon
    pub alloy: Tonnes,
    /// Electrode requirement over the horizon
    pub electrode: Tonnes,
    /// Ore preparation chain
    pub ore: OreChain,
    /// Technology costs and efficiencies for the year case
    pub technologies: TechnologySet,
    /// Capital recovery factor
    pub crf: Dimensionless,
    /// DR plant CAPEX from its throughput regression (MUSD)
    pub drp_capex: f64,
    /// Shaft compressor CAPEX from its throughput regression (MUSD)
    pub shaft_compressor_capex: f64,
    /// Fixed operating costs
    pub opex: OperatingCosts,
}

/// Cost in MUSD of buying `quantity` at `price` USD/t
fn cost_musd(quantity: Tonnes, price: f64) -> f64 {
    let cost: Money = quantity * MoneyPerTonne(price);
    cost.in_millions()
}

impl<'a> ScenarioParameters<'a> {
    /// Derive scenario parameters from the model and a scenario key
    pub fn new(model: &'a Model, key: ScenarioKey) -> Result<Self> {
        let params = &model.parameters;
        let process = &params.process;
        let economics = &params.economics;

        let time_factor = params.time_factor();
        let steel_demand = params.annual_steel_demand * Dimensionless(time_factor);
        let f = params.scrap_fractions.get(key.scrap_case);

        let scrap_to_dri_ratio =
            ((1.0 - f.0).abs() >= SCRAP_FRACTION_TOLERANCE).then(|| f.0 / (1.0 - f.0));
        let lime_intensity = process.lime_base - process.lime_scrap_slope * f.0;
        let metallic_yield = process.metallic_yield_slope * f.0 + process.metallic_yield_base;
        let eaf_intensity =
            (process.eaf_base_energy + process.eaf_dri_energy * (1.0 - f.0)) / GJ_PER_MWH;

        let dri = steel_demand * Dimensionless((1.0 - f.0) / params.ore.dri_to_steel_yield);
        let scrap = steel_demand * f;
        let lime = steel_demand * Dimensionless(lime_intensity);
        let alloy = steel_demand * Dimensionless(process.alloy_intensity);
        let electrode = steel_demand * Dimensionless(process.electrode_intensity);

        let ore = OreChain::calculate(dri, params.rom_ore_grade, &params.ore)
            .with_context(|| format!("Invalid ore chain for scenario {key}"))?;
        let technologies = TechnologySet::for_year_case(&model.technologies, key.year_case)?;
        let crf = capital_recovery_factor(params.lifetime, params.discount_rate);

        // Process plant regressions are sized on annual throughput
        let annual_dri = dri.value() / time_factor;
        let drp_capex = economics.drp_capex_slope * annual_dri;
        let shaft_compressor_capex = economics.shaft_compressor_capex_slope * annual_dri
            / USD_PER_MILLION
            + economics.shaft_compressor_capex_intercept;

        let labour = Money(economics.dri_labour * dri.value())
            + Money(economics.steel_labour * steel_demand.value());
        let opex = OperatingCosts {
            pellets: cost_musd(ore.pellets, economics.pellet_price),
            lump: cost_musd(ore.lump, economics.lump_price),
            scrap: cost_musd(scrap, economics.scrap_price),
            lime: cost_musd(lime, economics.lime_price),
            alloy: cost_musd(alloy, economics.alloy_price),
            electrode: cost_musd(electrode, economics.electrode_price),
            labour: labour.in_millions(),
            transport: cost_musd(ore.rom, economics.transport_cost),
        };

        Ok(Self {
            key,
            model: params,
            profile: &model.profile,
            hours: params.hours,
            time_factor,
            steel_demand,
            scrap_fraction: f,
            scrap_to_dri_ratio,
            lime_intensity,
            metallic_yield,
            eaf_intensity,
            dri,
            scrap,
            lime,
            alloy,
            electrode,
            ore,
            technologies,
            crf,
            drp_capex,
            shaft_compressor_capex,
            opex,
        })
    }

    /// Multiplier turning a CAPEX line into its annualised cost over the horizon
    pub fn annualisation_factor(&self) -> f64 {
        self.crf.0 * self.time_factor
    }

    /// Whether the hot-briquetted iron route is modelled
    pub fn uses_hbi(&self) -> bool {
        self.model.dri_routing.uses_hbi()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::model_24h;
    use crate::scenario::{ScrapCase, YearCase};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_all_dri_charge(model_24h: Model) {
        let key = ScenarioKey::new(YearCase::Current, ScrapCase::S1);
        let params = ScenarioParameters::new(&model_24h, key).unwrap();

        let demand = 1e6 * 24.0 / 8760.0;
        assert_approx_eq!(f64, params.time_factor, 24.0 / 8760.0);
        assert_approx_eq!(Tonnes, params.steel_demand, Tonnes(demand), epsilon = 1e-9);
        assert_eq!(params.scrap_to_dri_ratio, Some(0.0));
        assert_eq!(params.scrap, Tonnes(0.0));
        assert_approx_eq!(Tonnes, params.dri, Tonnes(demand / 0.94), epsilon = 1e-9);
        assert_approx_eq!(f64, params.lime_intensity, 0.05, epsilon = 1e-12);
        assert_approx_eq!(f64, params.metallic_yield, 0.8483, epsilon = 1e-12);
        assert_approx_eq!(f64, params.eaf_intensity, 2.706 / 3.6, epsilon = 1e-12);
        assert_eq!(params.opex.scrap, 0.0);
        assert_approx_eq!(f64, params.crf.0, 0.101_852_208_823_415_6, epsilon = 1e-12);
    }

    #[rstest]
    fn test_half_scrap_charge(model_24h: Model) {
        let key = ScenarioKey::new(YearCase::Y2050, ScrapCase::S3);
        let params = ScenarioParameters::new(&model_24h, key).unwrap();

        assert_eq!(params.scrap_to_dri_ratio, Some(1.0));
        assert_approx_eq!(f64, params.lime_intensity, 0.04, epsilon = 1e-12);
        assert_approx_eq!(f64, params.metallic_yield, 0.893, epsilon = 1e-12);
        assert_approx_eq!(
            Tonnes,
            params.scrap,
            params.steel_demand * Dimensionless(0.5),
            epsilon = 1e-9
        );
        assert_approx_eq!(
            f64,
            params.opex.scrap,
            params.scrap.value() * 265.0 / 1e6,
            epsilon = 1e-12
        );
        assert_eq!(params.technologies.electrolyser.efficiency, 44.444);
    }

    #[rstest]
    fn test_all_scrap_charge_has_no_ratio(mut model_24h: Model) {
        model_24h.parameters.scrap_fractions.s3 = Dimensionless(1.0);
        let key = ScenarioKey::new(YearCase::Current, ScrapCase::S3);
        let params = ScenarioParameters::new(&model_24h, key).unwrap();
        assert!(params.scrap_to_dri_ratio.is_none());
        assert_eq!(params.dri, Tonnes(0.0));
    }

    #[rstest]
    fn test_regression_capex_uses_annual_throughput(model_24h: Model) {
        let key = ScenarioKey::new(YearCase::Current, ScrapCase::S1);
        let params = ScenarioParameters::new(&model_24h, key).unwrap();
        let annual_dri = 1e6 / 0.94;
        assert_approx_eq!(f64, params.drp_capex, 0.00031 * annual_dri, epsilon = 1e-9);
        assert_approx_eq!(
            f64,
            params.shaft_compressor_capex,
            8.4074 * annual_dri / 1e6 + 4.5351,
            epsilon = 1e-9
        );
    }
}
