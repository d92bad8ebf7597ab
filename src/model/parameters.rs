//! Defines the `ModelParameters` struct, which represents the contents of `model.toml`.
use super::constants::{
    EconomicConstants, FootprintConstants, OreConstants, ProcessConstants, validate_constants,
};
use crate::input::{deserialise_proportion, input_err_msg, read_toml};
use crate::scenario::{ScrapCase, YearCase};
use crate::units::{Dimensionless, Tonnes};
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use log::warn;
use serde::Deserialize;
use serde_string_enum::DeserializeLabeledStringEnum;
use std::path::Path;
use strum::IntoEnumIterator;

const MODEL_PARAMETERS_FILE_NAME: &str = "model.toml";

/// The number of hours in a full year
pub const HOURS_PER_YEAR: usize = 8760;

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::from($value)
        }
    };
}

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_unit_param_default!(default_annual_steel_demand, Tonnes, 1e6);
define_unit_param_default!(default_rom_ore_grade, Dimensionless, 0.62);
define_unit_param_default!(default_discount_rate, Dimensionless, 0.08);
define_unit_param_default!(default_min_renewable_share, Dimensionless, 1.0);
define_param_default!(default_hours, usize, HOURS_PER_YEAR);
define_param_default!(default_lifetime, u32, 20);
define_param_default!(default_grid_price, f64, 100.0);
define_param_default!(default_max_eaf_capacity, f64, 500.0);
define_param_default!(default_strict_hourly_balance, bool, true);
define_param_default!(default_year_cases, Vec<YearCase>, YearCase::iter().collect());

/// Represents the contents of the entire model file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ModelParameters {
    /// Number of hours in the modelled horizon.
    ///
    /// Annual demand and annualised costs are scaled by `hours / 8760`.
    #[serde(default = "default_hours")]
    pub hours: usize,
    /// Annual liquid steel demand (t/yr)
    #[serde(default = "default_annual_steel_demand")]
    pub annual_steel_demand: Tonnes,
    /// Fe grade of run-of-mine ore
    #[serde(default = "default_rom_ore_grade")]
    pub rom_ore_grade: Dimensionless,
    /// Discount rate used to annualise capital costs
    #[serde(default = "default_discount_rate")]
    pub discount_rate: Dimensionless,
    /// Project lifetime in years
    #[serde(default = "default_lifetime")]
    pub lifetime: u32,
    /// Price of electricity imported from the grid (USD/MWh)
    #[serde(default = "default_grid_price")]
    pub grid_price: f64,
    /// The year cases to run, in order
    #[serde(default = "default_year_cases")]
    pub year_cases: Vec<YearCase>,
    /// Scrap fraction of the metallic charge for each scrap case
    #[serde(default)]
    pub scrap_fractions: ScrapFractions,
    /// Which DRI routes between the shaft and the EAF are available
    #[serde(default)]
    pub dri_routing: DriRouting,
    /// Minimum ratio of renewable generation to consumption plus grid import.
    ///
    /// Zero removes the constraint.
    #[serde(default = "default_min_renewable_share")]
    #[serde(deserialize_with = "deserialise_proportion")]
    pub min_renewable_share: Dimensionless,
    /// Whether to add the aggregate hourly energy balance on top of the AC and DC bus balances
    #[serde(default = "default_strict_hourly_balance")]
    pub strict_hourly_balance: bool,
    /// Storage levels before the first hour
    #[serde(default)]
    pub initial_storage: InitialStorage,
    /// Upper limit on EAF capacity (t/h)
    #[serde(default = "default_max_eaf_capacity")]
    pub max_eaf_capacity: f64,
    /// Optional solver time limit in seconds
    #[serde(default)]
    pub solver_time_limit: Option<f64>,
    /// Ore preparation coefficients
    #[serde(default)]
    pub ore: OreConstants,
    /// Process intensities
    #[serde(default)]
    pub process: ProcessConstants,
    /// Prices and cost regressions
    #[serde(default)]
    pub economics: EconomicConstants,
    /// Land and embodied emissions coefficients
    #[serde(default)]
    pub footprint: FootprintConstants,
}

/// Scrap fraction of the metallic charge for each scrap case
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrapFractions {
    /// Fraction for S1
    #[serde(rename = "S1", deserialize_with = "deserialise_proportion")]
    pub s1: Dimensionless,
    /// Fraction for S2
    #[serde(rename = "S2", deserialize_with = "deserialise_proportion")]
    pub s2: Dimensionless,
    /// Fraction for S3
    #[serde(rename = "S3", deserialize_with = "deserialise_proportion")]
    pub s3: Dimensionless,
}

impl Default for ScrapFractions {
    fn default() -> Self {
        Self {
            s1: Dimensionless(0.0),
            s2: Dimensionless(0.25),
            s3: Dimensionless(0.5),
        }
    }
}

impl ScrapFractions {
    /// Get the scrap fraction for a scrap case
    pub fn get(&self, scrap_case: ScrapCase) -> Dimensionless {
        match scrap_case {
            ScrapCase::S1 => self.s1,
            ScrapCase::S2 => self.s2,
            ScrapCase::S3 => self.s3,
        }
    }
}

/// The DRI routes available between the DR shaft and the EAF
#[derive(DeserializeLabeledStringEnum, Debug, Clone, Copy, PartialEq, Default)]
pub enum DriRouting {
    /// Hot DRI charged directly, or cooled, stored and reheated
    #[default]
    #[string = "hdri_cdri"]
    HotAndCold,
    /// As above, plus hot-briquetted iron with its own storage
    #[string = "hdri_cdri_hbi"]
    WithBriquetting,
}

impl DriRouting {
    /// Whether the hot-briquetted iron route exists
    pub fn uses_hbi(self) -> bool {
        self == Self::WithBriquetting
    }
}

/// Storage levels at the start of the horizon
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct InitialStorage {
    /// Battery (MWh)
    pub battery: f64,
    /// Compressed hydrogen (t)
    pub cgh2: f64,
    /// Cold DRI (t)
    pub cdri: f64,
    /// Hot-briquetted iron (t)
    pub hbi: f64,
}

/// Check that the `hours` parameter is valid
fn check_hours(hours: usize) -> Result<()> {
    ensure!(hours > 0, "hours must be greater than zero");
    if hours != HOURS_PER_YEAR {
        warn!(
            "Modelling {hours} hours rather than a full year. Demand and annualised costs will be \
            scaled by {hours}/{HOURS_PER_YEAR}."
        );
    }
    Ok(())
}

/// Check that the ROM ore grade is a proper fraction
fn check_rom_ore_grade(grade: Dimensionless) -> Result<()> {
    ensure!(
        grade.0 > 0.0 && grade.0 < 1.0,
        "rom_ore_grade must be greater than zero and less than one"
    );
    Ok(())
}

/// Check that the `year_cases` parameter is valid
fn check_year_cases(year_cases: &[YearCase]) -> Result<()> {
    ensure!(!year_cases.is_empty(), "year_cases is empty");
    ensure!(
        year_cases.iter().all_unique(),
        "year_cases cannot contain duplicates"
    );
    Ok(())
}

/// Check that the initial storage levels are valid
fn check_initial_storage(initial: &InitialStorage) -> Result<()> {
    for (name, value) in [
        ("battery", initial.battery),
        ("cgh2", initial.cgh2),
        ("cdri", initial.cdri),
        ("hbi", initial.hbi),
    ] {
        ensure!(
            value.is_finite() && value >= 0.0,
            "initial_storage.{name} must be a finite number greater than or equal to zero"
        );
    }
    Ok(())
}

impl ModelParameters {
    /// Read a model file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model configuration files
    ///
    /// # Returns
    ///
    /// The model file contents as a [`ModelParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<ModelParameters> {
        let file_path = model_dir.as_ref().join(MODEL_PARAMETERS_FILE_NAME);
        let model_params: ModelParameters = read_toml(&file_path)?;

        model_params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(model_params)
    }

    /// The factor by which annual quantities are scaled to the modelled horizon
    pub fn time_factor(&self) -> f64 {
        self.hours as f64 / HOURS_PER_YEAR as f64
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        check_hours(self.hours)?;

        ensure!(
            self.annual_steel_demand.is_finite() && self.annual_steel_demand.0 > 0.0,
            "annual_steel_demand must be a finite number greater than zero"
        );

        check_rom_ore_grade(self.rom_ore_grade)?;

        ensure!(
            self.discount_rate.0.is_finite() && self.discount_rate.0 >= 0.0,
            "discount_rate must be a finite number greater than or equal to zero"
        );

        ensure!(self.lifetime > 0, "lifetime cannot be zero");

        ensure!(
            self.grid_price.is_finite() && self.grid_price >= 0.0,
            "grid_price must be a finite number greater than or equal to zero"
        );

        check_year_cases(&self.year_cases)?;

        // scrap_fractions and min_renewable_share already validated with deserialise_proportion

        check_initial_storage(&self.initial_storage)?;

        ensure!(
            self.max_eaf_capacity.is_finite() && self.max_eaf_capacity > 0.0,
            "max_eaf_capacity must be a finite number greater than zero"
        );
        let mean_steel_rate = self.annual_steel_demand.0 / HOURS_PER_YEAR as f64;
        ensure!(
            mean_steel_rate <= self.max_eaf_capacity,
            "Annual steel demand needs an average of {mean_steel_rate} t/h, which exceeds \
            max_eaf_capacity ({} t/h)",
            self.max_eaf_capacity
        );

        if let Some(limit) = self.solver_time_limit {
            ensure!(
                limit.is_finite() && limit > 0.0,
                "solver_time_limit must be a finite number greater than zero"
            );
        }

        validate_constants(&self.ore, &self.process, &self.economics, &self.footprint)
    }
}
