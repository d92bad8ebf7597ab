//! The model represents the static input data provided by the user.
use crate::profile::HourlyProfile;
use crate::scenario::{ScenarioKey, iter_scenarios};
use crate::technology::TechnologyMap;
use std::path::PathBuf;

pub mod constants;
pub mod parameters;
pub use parameters::{DriRouting, ModelParameters};

/// Model definition
pub struct Model {
    /// Path to model folder
    pub model_path: PathBuf,
    /// Parameters from the model TOML file
    pub parameters: ModelParameters,
    /// Hourly renewable availability, shared by every scenario
    pub profile: HourlyProfile,
    /// Technology costs and efficiencies for each year case
    pub technologies: TechnologyMap,
}

impl Model {
    /// Iterate over the scenarios to be run, year case outer and scrap case inner
    pub fn iter_scenarios(&self) -> impl Iterator<Item = ScenarioKey> + '_ {
        iter_scenarios(&self.parameters.year_cases)
    }
}
