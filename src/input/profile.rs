//! Code for reading the hourly renewable availability profile.
use super::{input_err_msg, read_csv};
use crate::profile::{HourlyAvailability, HourlyProfile};
use crate::units::Dimensionless;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use serde::Deserialize;
use std::path::Path;

const PROFILE_FILE_NAME: &str = "profile.csv";

/// The maximum number of missing hour labels listed in an error message
const MAX_MISSING_LISTED: usize = 5;

/// A row of the profile CSV file
#[derive(Debug, Deserialize, PartialEq)]
struct ProfileRaw {
    /// Hour label, `t1` to `tN`
    t: String,
    /// Solar capacity factor
    s: f64,
    /// Wind capacity factor
    w: f64,
}

/// Parse an hour label of the form `t<n>` into a zero-based index, checking it is in range
fn parse_hour_label(label: &str, hours: usize) -> Result<usize> {
    let hour: usize = label
        .strip_prefix('t')
        .and_then(|n| n.parse().ok())
        .with_context(|| format!("Invalid hour label: {label}"))?;
    ensure!(
        (1..=hours).contains(&hour),
        "Hour label {label} is outside the modelled range t1 to t{hours}"
    );

    Ok(hour - 1)
}

/// Check that a capacity factor lies in [0, 1]
fn check_capacity_factor(label: &str, name: &str, value: f64) -> Result<()> {
    ensure!(
        (0.0..=1.0).contains(&value),
        "{name} capacity factor for hour {label} must be between 0 and 1"
    );
    Ok(())
}

/// Read the hourly profile from the specified model directory.
///
/// Rows may appear in any order; each hour from `t1` to `t{hours}` must appear exactly once.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `hours` - The number of hours in the modelled horizon
///
/// # Returns
///
/// The profile ordered by hour or an error.
pub fn read_profile(model_dir: &Path, hours: usize) -> Result<HourlyProfile> {
    let file_path = model_dir.join(PROFILE_FILE_NAME);
    let rows = read_csv(&file_path)?;
    read_profile_from_iter(rows, hours).with_context(|| input_err_msg(&file_path))
}

fn read_profile_from_iter<I>(iter: I, hours: usize) -> Result<HourlyProfile>
where
    I: Iterator<Item = ProfileRaw>,
{
    let mut slots: Vec<Option<HourlyAvailability>> = vec![None; hours];
    for row in iter {
        let hour = parse_hour_label(&row.t, hours)?;
        check_capacity_factor(&row.t, "Solar", row.s)?;
        check_capacity_factor(&row.t, "Wind", row.w)?;

        let slot = &mut slots[hour];
        ensure!(slot.is_none(), "Duplicate entry for hour {}", row.t);
        *slot = Some(HourlyAvailability {
            solar: Dimensionless(row.s),
            wind: Dimensionless(row.w),
        });
    }

    let missing = slots
        .iter()
        .positions(Option::is_none)
        .map(|hour| format!("t{}", hour + 1))
        .collect_vec();
    ensure!(
        missing.is_empty(),
        "Profile is missing {} hour(s), including: {}",
        missing.len(),
        missing.iter().take(MAX_MISSING_LISTED).join(", ")
    );

    Ok(HourlyProfile::new(slots.into_iter().flatten().collect()))
}
