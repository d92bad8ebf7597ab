//! Sizing and hourly dispatch optimisation for renewable-powered hydrogen-DRI-EAF steel plants.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod finance;
pub mod input;
pub mod log;
pub mod model;
pub mod output;
pub mod profile;
pub mod scenario;
pub mod settings;
pub mod simulation;
pub mod technology;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the config dir for the program
pub fn get_green_steel_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No config dir on this platform; fall back to the current directory
        return PathBuf::from(".");
    };
    config_dir.push("green_steel");
    config_dir
}
