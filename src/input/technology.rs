//! Code for reading the technology cost and efficiency table.
use super::{input_err_msg, read_csv};
use crate::scenario::YearCase;
use crate::technology::{Technology, TechnologyMap, TechnologyParameters};
use anyhow::{Context, Result, bail, ensure};
use itertools::{Itertools, iproduct};
use serde::Deserialize;
use std::collections::hash_map::Entry;
use std::path::Path;
use strum::IntoEnumIterator;

const TECHNOLOGIES_FILE_NAME: &str = "technologies.csv";

/// A row of the technologies CSV file
#[derive(Debug, Deserialize, PartialEq)]
struct TechnologyRaw {
    year_case: YearCase,
    technology: Technology,
    unit_cost: f64,
    efficiency: Option<f64>,
}

impl TechnologyRaw {
    fn validate(&self) -> Result<TechnologyParameters> {
        ensure!(
            self.unit_cost.is_finite() && self.unit_cost >= 0.0,
            "Unit cost for {} in {} must be a finite number greater than or equal to zero",
            self.technology.label(),
            self.year_case
        );

        let efficiency = if self.technology.requires_efficiency() {
            let efficiency = self.efficiency.with_context(|| {
                format!(
                    "Efficiency must be provided for {} in {}",
                    self.technology.label(),
                    self.year_case
                )
            })?;
            ensure!(
                efficiency.is_finite() && efficiency > 0.0,
                "Efficiency for {} in {} must be a finite number greater than zero",
                self.technology.label(),
                self.year_case
            );
            efficiency
        } else {
            0.0
        };

        Ok(TechnologyParameters {
            unit_cost: self.unit_cost,
            efficiency,
        })
    }
}

/// Read technology parameters from the specified model directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `year_cases` - Year cases which will be run. Every technology must be defined for each.
///
/// # Returns
///
/// A map of technology parameters keyed by year case and technology, or an error.
pub fn read_technologies(model_dir: &Path, year_cases: &[YearCase]) -> Result<TechnologyMap> {
    let file_path = model_dir.join(TECHNOLOGIES_FILE_NAME);
    let rows = read_csv(&file_path)?;
    read_technologies_from_iter(rows, year_cases).with_context(|| input_err_msg(&file_path))
}

fn read_technologies_from_iter<I>(iter: I, year_cases: &[YearCase]) -> Result<TechnologyMap>
where
    I: Iterator<Item = TechnologyRaw>,
{
    let mut map = TechnologyMap::new();
    for row in iter {
        let parameters = row.validate()?;
        match map.entry((row.year_case, row.technology)) {
            Entry::Occupied(_) => {
                bail!(
                    "Duplicate entry for {} in {}",
                    row.technology.label(),
                    row.year_case
                )
            }
            Entry::Vacant(entry) => {
                entry.insert(parameters);
            }
        }
    }

    let missing = iproduct!(year_cases.iter().copied(), Technology::iter())
        .filter(|key| !map.contains_key(key))
        .map(|(year_case, technology)| format!("{} in {year_case}", technology.label()))
        .collect_vec();
    ensure!(
        missing.is_empty(),
        "Missing technology parameters for: {}",
        missing.join(", ")
    );

    Ok(map)
}
