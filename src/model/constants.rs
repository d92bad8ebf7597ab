//! Fixed plant coefficients, read from the `[ore]`, `[process]`, `[economics]` and `[footprint]`
//! tables of `model.toml`.
//!
//! Every field has a default taken from the reference plant, so a model only needs to list the
//! values it wants to change.
use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// Check that a coefficient is finite and not negative
fn check_non_negative(name: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value >= 0.0,
        "{name} must be a finite number greater than or equal to zero"
    );
    Ok(())
}

/// Check that a coefficient is finite and strictly positive
fn check_positive(name: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value > 0.0,
        "{name} must be a finite number greater than zero"
    );
    Ok(())
}

/// Check that a loss rate lies in [0, 1)
fn check_loss(name: &str, value: f64) -> Result<()> {
    ensure!(
        (0.0..1.0).contains(&value),
        "{name} must be at least zero and less than one"
    );
    Ok(())
}

/// Check that an efficiency lies in (0, 1]
fn check_efficiency(name: &str, value: f64) -> Result<()> {
    ensure!(
        value > 0.0 && value <= 1.0,
        "{name} must be greater than zero and at most one"
    );
    Ok(())
}

/// Ore preparation chain: mass losses and energy use from mine to pellet plant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OreConstants {
    /// Minimum Fe grade accepted by the DR shaft
    pub dr_grade_floor: f64,
    /// ROM grade at or above which lump ore can bypass beneficiation
    pub lump_grade_threshold: f64,
    /// Share of DR-grade ore supplied as lump when the grade allows it
    pub lump_share: f64,
    /// Grade uplift assumed when the ROM ore needs no concentration
    pub min_grade_uplift: f64,
    /// Mass loss at crushing and screening
    pub crushing_loss: f64,
    /// Mass loss at pelletising
    pub pelletising_loss: f64,
    /// Concentration mass loss per percentage point of grade uplift
    pub concentration_loss_per_pct: f64,
    /// Drilling energy (MJ/t crushed ore)
    pub drilling_energy: f64,
    /// Loading and hauling energy (MJ/t crushed ore)
    pub loading_energy: f64,
    /// Crushing energy (MWh/t)
    pub crushing_energy: f64,
    /// Comminution energy (MWh/t beneficiation feed)
    pub comminution_energy: f64,
    /// Concentration energy (MWh/t beneficiation feed per percentage point of uplift)
    pub concentration_energy: f64,
    /// Pelletising energy (MWh/t fines)
    pub pelletising_energy: f64,
    /// Stacking and reclaiming energy (MWh/t)
    pub stacking_energy: f64,
    /// Liquid steel per tonne of DRI in the metallic charge
    pub dri_to_steel_yield: f64,
    /// Tonnes of DR-grade ore per tonne of DRI
    pub ore_per_dri: f64,
}

impl Default for OreConstants {
    fn default() -> Self {
        Self {
            dr_grade_floor: 0.67,
            lump_grade_threshold: 0.66,
            lump_share: 0.3,
            min_grade_uplift: 0.01,
            crushing_loss: 0.19,
            pelletising_loss: 0.03,
            concentration_loss_per_pct: 0.0268,
            drilling_energy: 0.00128,
            loading_energy: 0.2558,
            crushing_energy: 0.00642,
            comminution_energy: 0.02736,
            concentration_energy: 0.85,
            pelletising_energy: 0.20828,
            stacking_energy: 0.00128,
            dri_to_steel_yield: 0.94,
            ore_per_dri: 1.382,
        }
    }
}

impl OreConstants {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.dr_grade_floor > 0.0 && self.dr_grade_floor < 1.0,
            "dr_grade_floor must be between zero and one"
        );
        ensure!(
            (0.0..=1.0).contains(&self.lump_share),
            "lump_share must be between zero and one"
        );
        check_loss("crushing_loss", self.crushing_loss)?;
        check_loss("pelletising_loss", self.pelletising_loss)?;
        check_non_negative("concentration_loss_per_pct", self.concentration_loss_per_pct)?;
        check_non_negative("min_grade_uplift", self.min_grade_uplift)?;
        for (name, value) in [
            ("drilling_energy", self.drilling_energy),
            ("loading_energy", self.loading_energy),
            ("crushing_energy", self.crushing_energy),
            ("comminution_energy", self.comminution_energy),
            ("concentration_energy", self.concentration_energy),
            ("pelletising_energy", self.pelletising_energy),
            ("stacking_energy", self.stacking_energy),
        ] {
            check_non_negative(name, value)?;
        }
        check_positive("dri_to_steel_yield", self.dri_to_steel_yield)?;
        check_positive("ore_per_dri", self.ore_per_dri)
    }
}

/// Hydrogen, DRI and EAF process intensities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConstants {
    /// Hydrogen consumed per tonne of DRI (t/t)
    pub dri_hydrogen: f64,
    /// Heat needed to bring hydrogen to reduction temperature (MJ/t DRI)
    pub hydrogen_heating: f64,
    /// Lower heating value of hydrogen (MJ/t)
    pub hydrogen_lhv: f64,
    /// Electricity to compress hydrogen to 200 bar for storage (MWh/t H2)
    pub storage_compression: f64,
    /// Electricity to compress hydrogen to 2 bar for the DR shaft (MWh/t DRI)
    pub shaft_compression: f64,
    /// Electricity for briquetting hot DRI (MWh/t HBI)
    pub briquetting: f64,
    /// Electricity to reheat HBI charged to the EAF (MWh/t)
    pub hbi_heating: f64,
    /// Electricity to reheat cold DRI charged to the EAF (MWh/t)
    pub cdri_heating: f64,
    /// Electricity for continuous casting (MWh/t liquid steel)
    pub casting: f64,
    /// Base EAF energy for an all-scrap charge (GJ/t liquid steel)
    pub eaf_base_energy: f64,
    /// Additional EAF energy per unit DRI share of the charge (GJ/t liquid steel)
    pub eaf_dri_energy: f64,
    /// Alloy additions (t/t liquid steel)
    pub alloy_intensity: f64,
    /// Electrode consumption (t/t liquid steel)
    pub electrode_intensity: f64,
    /// Lime additions for an all-DRI charge (t/t liquid steel)
    pub lime_base: f64,
    /// Reduction in lime additions per unit scrap fraction (t/t liquid steel)
    pub lime_scrap_slope: f64,
    /// Metallic yield of an all-DRI charge
    pub metallic_yield_base: f64,
    /// Increase in metallic yield per unit scrap fraction
    pub metallic_yield_slope: f64,
    /// Yield of DRI and scrap into the metallic charge
    pub charge_yield: f64,
    /// Efficiency of each inverter or rectifier
    pub inverter_efficiency: f64,
    /// Efficiency of battery charging and of discharging (each way)
    pub battery_efficiency: f64,
}

impl Default for ProcessConstants {
    fn default() -> Self {
        Self {
            dri_hydrogen: 0.04759,
            hydrogen_heating: 0.4461,
            hydrogen_lhv: 120_000.0,
            storage_compression: 2.87,
            shaft_compression: 0.065,
            briquetting: 0.00632,
            hbi_heating: 152.78,
            cdri_heating: 152.78,
            casting: 0.0103,
            eaf_base_energy: 2.4,
            eaf_dri_energy: 0.306,
            alloy_intensity: 0.011,
            electrode_intensity: 0.002,
            lime_base: 0.05,
            lime_scrap_slope: 0.02,
            metallic_yield_base: 0.8483,
            metallic_yield_slope: 0.0894,
            charge_yield: 0.93,
            inverter_efficiency: 0.95,
            battery_efficiency: 0.92,
        }
    }
}

impl ProcessConstants {
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("dri_hydrogen", self.dri_hydrogen),
            ("hydrogen_heating", self.hydrogen_heating),
            ("storage_compression", self.storage_compression),
            ("shaft_compression", self.shaft_compression),
            ("briquetting", self.briquetting),
            ("hbi_heating", self.hbi_heating),
            ("cdri_heating", self.cdri_heating),
            ("casting", self.casting),
            ("eaf_base_energy", self.eaf_base_energy),
            ("eaf_dri_energy", self.eaf_dri_energy),
            ("alloy_intensity", self.alloy_intensity),
            ("electrode_intensity", self.electrode_intensity),
            ("lime_base", self.lime_base),
            ("lime_scrap_slope", self.lime_scrap_slope),
            ("metallic_yield_slope", self.metallic_yield_slope),
        ] {
            check_non_negative(name, value)?;
        }
        ensure!(
            self.lime_scrap_slope <= self.lime_base,
            "lime_scrap_slope cannot exceed lime_base"
        );
        check_positive("hydrogen_lhv", self.hydrogen_lhv)?;
        check_positive("metallic_yield_base", self.metallic_yield_base)?;
        check_positive("charge_yield", self.charge_yield)?;
        check_efficiency("inverter_efficiency", self.inverter_efficiency)?;
        check_efficiency("battery_efficiency", self.battery_efficiency)
    }
}

/// Prices, maintenance and capital cost regressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicConstants {
    /// Annual maintenance as a fraction of total CAPEX
    pub maintenance_fraction: f64,
    /// Number of purchases of battery, electrolyser and fuel cell stacks over the lifetime
    pub replacements: f64,
    /// Battery energy to power ratio (hours)
    pub battery_duration: f64,
    /// Pellet feed price (USD/t)
    pub pellet_price: f64,
    /// Lump ore price (USD/t)
    pub lump_price: f64,
    /// Scrap price (USD/t)
    pub scrap_price: f64,
    /// Lime price (USD/t)
    pub lime_price: f64,
    /// Alloy price (USD/t)
    pub alloy_price: f64,
    /// Electrode price (USD/t)
    pub electrode_price: f64,
    /// Ore transport cost (USD/t ROM ore)
    pub transport_cost: f64,
    /// Labour at the DR plant (USD/t DRI)
    pub dri_labour: f64,
    /// Labour at the melt shop (USD/t liquid steel)
    pub steel_labour: f64,
    /// DR plant CAPEX per tonne of annual DRI capacity (MUSD per t/yr)
    pub drp_capex_slope: f64,
    /// Shaft compressor CAPEX per Mt of annual DRI capacity (MUSD per Mt/yr)
    pub shaft_compressor_capex_slope: f64,
    /// Shaft compressor CAPEX intercept (MUSD)
    pub shaft_compressor_capex_intercept: f64,
    /// Hydrogen storage CAPEX per t/h of injection capacity (MUSD)
    pub cgh2_injection_capex: f64,
    /// Hydrogen storage CAPEX per tonne of storage swing (MUSD)
    pub cgh2_storage_capex: f64,
    /// EAF CAPEX per t/h of capacity (MUSD)
    pub eaf_capex_slope: f64,
    /// EAF CAPEX intercept (MUSD)
    pub eaf_capex_intercept: f64,
    /// Caster CAPEX per t/h of peak liquid steel (MUSD)
    pub caster_capex: f64,
}

impl Default for EconomicConstants {
    fn default() -> Self {
        Self {
            maintenance_fraction: 0.02,
            replacements: 2.0,
            battery_duration: 4.0,
            pellet_price: 160.0,
            lump_price: 120.0,
            scrap_price: 265.0,
            lime_price: 121.0,
            alloy_price: 2397.0,
            electrode_price: 5395.0,
            transport_cost: 3.93,
            dri_labour: 19.0,
            steel_labour: 53.19,
            drp_capex_slope: 0.00031,
            shaft_compressor_capex_slope: 8.4074,
            shaft_compressor_capex_intercept: 4.5351,
            cgh2_injection_capex: 2.064,
            cgh2_storage_capex: 0.7,
            eaf_capex_slope: 1.8728,
            eaf_capex_intercept: 68.75,
            caster_capex: 0.945,
        }
    }
}

impl EconomicConstants {
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("maintenance_fraction", self.maintenance_fraction),
            ("pellet_price", self.pellet_price),
            ("lump_price", self.lump_price),
            ("scrap_price", self.scrap_price),
            ("lime_price", self.lime_price),
            ("alloy_price", self.alloy_price),
            ("electrode_price", self.electrode_price),
            ("transport_cost", self.transport_cost),
            ("dri_labour", self.dri_labour),
            ("steel_labour", self.steel_labour),
            ("drp_capex_slope", self.drp_capex_slope),
            ("shaft_compressor_capex_slope", self.shaft_compressor_capex_slope),
            ("shaft_compressor_capex_intercept", self.shaft_compressor_capex_intercept),
            ("cgh2_injection_capex", self.cgh2_injection_capex),
            ("cgh2_storage_capex", self.cgh2_storage_capex),
            ("eaf_capex_slope", self.eaf_capex_slope),
            ("eaf_capex_intercept", self.eaf_capex_intercept),
            ("caster_capex", self.caster_capex),
        ] {
            check_non_negative(name, value)?;
        }
        check_positive("replacements", self.replacements)?;
        check_positive("battery_duration", self.battery_duration)
    }
}

/// Land use and embodied emissions of renewable generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootprintConstants {
    /// Land per MW of solar (km²)
    pub solar_land: f64,
    /// Land per MW of wind (km²)
    pub wind_land: f64,
    /// Embodied CO₂ per MWh of solar generation (t)
    pub solar_co2: f64,
    /// Embodied CO₂ per MWh of wind generation (t)
    pub wind_co2: f64,
}

impl Default for FootprintConstants {
    fn default() -> Self {
        Self {
            solar_land: 0.02,
            wind_land: 0.12,
            solar_co2: 48e-6,
            wind_co2: 12e-6,
        }
    }
}

impl FootprintConstants {
    fn validate(&self) -> Result<()> {
        check_non_negative("solar_land", self.solar_land)?;
        check_non_negative("wind_land", self.wind_land)?;
        check_non_negative("solar_co2", self.solar_co2)?;
        check_non_negative("wind_co2", self.wind_co2)
    }
}

/// Check all plant constants
pub fn validate_constants(
    ore: &OreConstants,
    process: &ProcessConstants,
    economics: &EconomicConstants,
    footprint: &FootprintConstants,
) -> Result<()> {
    ore.validate()?;
    process.validate()?;
    economics.validate()?;
    footprint.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults_are_valid() {
        validate_constants(
            &OreConstants::default(),
            &ProcessConstants::default(),
            &EconomicConstants::default(),
            &FootprintConstants::default(),
        )
        .unwrap();
    }

    #[test]
    fn test_partial_table() {
        let process: ProcessConstants = toml::from_str("inverter_efficiency = 0.9").unwrap();
        assert_eq!(process.inverter_efficiency, 0.9);
        assert_eq!(process.battery_efficiency, 0.92);
    }

    #[rstest]
    #[case(0.95, true)]
    #[case(1.0, true)]
    #[case(0.0, false)]
    #[case(1.2, false)]
    #[case(f64::NAN, false)]
    fn test_check_efficiency(#[case] value: f64, #[case] valid: bool) {
        assert_eq!(check_efficiency("eff", value).is_ok(), valid);
    }

    #[rstest]
    #[case(0.0, true)]
    #[case(0.19, true)]
    #[case(1.0, false)]
    #[case(-0.1, false)]
    fn test_check_loss(#[case] value: f64, #[case] valid: bool) {
        assert_eq!(check_loss("loss", value).is_ok(), valid);
    }
}
