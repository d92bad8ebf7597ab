//! Energy technologies whose cost and performance depend on the year case.
use crate::scenario::YearCase;
use anyhow::{Context, Result};
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};
use std::collections::HashMap;
use strum::EnumIter;

/// A technology with a vintage-dependent unit cost
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    SerializeLabeledStringEnum,
    DeserializeLabeledStringEnum,
)]
pub enum Technology {
    /// Solar PV
    #[string = "solar"]
    Solar,
    /// Onshore wind
    #[string = "wind"]
    Wind,
    /// Battery storage
    #[string = "battery"]
    Battery,
    /// PEM electrolyser
    #[string = "electrolyser"]
    Electrolyser,
    /// Hydrogen fuel cell
    #[string = "fuel_cell"]
    FuelCell,
}

impl Technology {
    /// The label used for this technology in input files
    pub fn label(self) -> &'static str {
        match self {
            Self::Solar => "solar",
            Self::Wind => "wind",
            Self::Battery => "battery",
            Self::Electrolyser => "electrolyser",
            Self::FuelCell => "fuel_cell",
        }
    }

    /// Whether this technology needs an efficiency value
    pub fn requires_efficiency(self) -> bool {
        matches!(self, Self::Electrolyser | Self::FuelCell)
    }
}

/// Cost and performance of one technology for one year case
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TechnologyParameters {
    /// Unit capital cost (MUSD per MW)
    pub unit_cost: f64,
    /// Conversion efficiency.
    ///
    /// MWh per tonne of hydrogen for electrolysers, tonnes of hydrogen per MWh for fuel cells and
    /// zero for technologies without a conversion step.
    pub efficiency: f64,
}

/// Technology parameters keyed by year case and technology
pub type TechnologyMap = HashMap<(YearCase, Technology), TechnologyParameters>;

/// Technology parameters for a single year case
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TechnologySet {
    /// Solar PV
    pub solar: TechnologyParameters,
    /// Onshore wind
    pub wind: TechnologyParameters,
    /// Battery storage
    pub battery: TechnologyParameters,
    /// Electrolyser
    pub electrolyser: TechnologyParameters,
    /// Fuel cell
    pub fuel_cell: TechnologyParameters,
}

impl TechnologySet {
    /// Look up all technologies for the given year case
    pub fn for_year_case(map: &TechnologyMap, year_case: YearCase) -> Result<Self> {
        let get = |technology: Technology| {
            map.get(&(year_case, technology))
                .copied()
                .with_context(|| {
                    format!(
                        "No parameters for technology {} in year case {year_case}",
                        technology.label()
                    )
                })
        };

        Ok(Self {
            solar: get(Technology::Solar)?,
            wind: get(Technology::Wind)?,
            battery: get(Technology::Battery)?,
            electrolyser: get(Technology::Electrolyser)?,
            fuel_cell: get(Technology::FuelCell)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::technologies;
    use rstest::rstest;

    #[rstest]
    fn test_for_year_case(technologies: TechnologyMap) {
        let set = TechnologySet::for_year_case(&technologies, YearCase::Y2030).unwrap();
        assert_eq!(set.solar.unit_cost, 0.562);
        assert_eq!(set.electrolyser.efficiency, 49.020);
        assert_eq!(set.fuel_cell.efficiency, 0.050);
    }

    #[rstest]
    fn test_for_year_case_missing(mut technologies: TechnologyMap) {
        technologies.remove(&(YearCase::Y2040, Technology::Wind));
        assert!(TechnologySet::for_year_case(&technologies, YearCase::Y2040).is_err());
    }
}
