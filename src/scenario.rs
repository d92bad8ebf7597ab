//! Scenario keys: the technology vintage and the scrap blend that together define one solve.
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// A technology vintage, selecting unit costs and efficiencies
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
pub enum YearCase {
    /// Present-day technology
    #[serde(rename = "YCurrent")]
    #[strum(serialize = "YCurrent")]
    Current,
    /// Projected for 2030
    #[serde(rename = "Y2030")]
    #[strum(serialize = "Y2030")]
    Y2030,
    /// Projected for 2040
    #[serde(rename = "Y2040")]
    #[strum(serialize = "Y2040")]
    Y2040,
    /// Projected for 2050
    #[serde(rename = "Y2050")]
    #[strum(serialize = "Y2050")]
    Y2050,
}

/// A scrap blend case for the EAF metallic charge
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
pub enum ScrapCase {
    /// Lowest scrap share (all DRI by default)
    S1,
    /// Intermediate scrap share
    S2,
    /// Highest scrap share
    S3,
}

/// Identifies a single scenario solve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("({year_case}, {scrap_case})")]
pub struct ScenarioKey {
    /// The technology vintage
    pub year_case: YearCase,
    /// The scrap blend
    pub scrap_case: ScrapCase,
}

impl ScenarioKey {
    /// Create a new [`ScenarioKey`]
    pub fn new(year_case: YearCase, scrap_case: ScrapCase) -> Self {
        Self {
            year_case,
            scrap_case,
        }
    }
}

/// Iterate over every scenario for the given year cases, year outer and scrap inner
pub fn iter_scenarios(year_cases: &[YearCase]) -> impl Iterator<Item = ScenarioKey> + '_ {
    year_cases.iter().flat_map(|&year_case| {
        ScrapCase::iter().map(move |scrap_case| ScenarioKey::new(year_case, scrap_case))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn test_iter_scenarios_order() {
        let keys = iter_scenarios(&[YearCase::Y2050, YearCase::Current]).collect_vec();
        assert_eq!(keys.len(), 6);
        assert_eq!(keys[0], ScenarioKey::new(YearCase::Y2050, ScrapCase::S1));
        assert_eq!(keys[2], ScenarioKey::new(YearCase::Y2050, ScrapCase::S3));
        assert_eq!(keys[3], ScenarioKey::new(YearCase::Current, ScrapCase::S1));
    }

    #[test]
    fn test_labels() {
        assert_eq!(YearCase::Current.to_string(), "YCurrent");
        assert_eq!(YearCase::Y2040.to_string(), "Y2040");
        assert_eq!(
            ScenarioKey::new(YearCase::Y2030, ScrapCase::S2).to_string(),
            "(Y2030, S2)"
        );
    }

    #[test]
    fn test_deserialise_year_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            year_cases: Vec<YearCase>,
        }
        let wrapper: Wrapper = toml::from_str(r#"year_cases = ["YCurrent", "Y2050"]"#).unwrap();
        assert_eq!(wrapper.year_cases, [YearCase::Current, YearCase::Y2050]);
    }
}
