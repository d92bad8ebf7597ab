//! The module responsible for writing output data to disk.
use crate::scenario::{ScenarioKey, ScrapCase, YearCase};
use crate::simulation::optimisation::{HourlyVariable as Hourly, ProblemSize, Solution};
use crate::simulation::results::ScenarioResult;
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which model-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "green_steel_results";

/// The output file name for scenario results
const RESULTS_FILE_NAME: &str = "scenario_results.csv";

/// The output file name for scenario statuses
const STATUS_FILE_NAME: &str = "scenario_status.csv";

/// The output file name for hourly dispatch
const HOURLY_DISPATCH_FILE_NAME: &str = "debug_hourly_dispatch.csv";

/// The output file name for problem sizes
const MODEL_SIZE_FILE_NAME: &str = "debug_model_size.csv";

/// Get the default output directory for the model at `model_dir`
pub fn get_output_dir(model_dir: &Path) -> Result<PathBuf> {
    // Get the model name from the dir path. This ends up being convoluted because we need to check
    // for all possible errors. Ugh.
    let model_dir = model_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    Ok(get_output_dir_for_model_name(model_name))
}

/// Get the default output directory for a model with the given name
pub fn get_output_dir_for_model_name(model_name: &str) -> PathBuf {
    [OUTPUT_DIRECTORY_ROOT, model_name].iter().collect()
}

/// Create a new output directory.
///
/// An existing empty directory is reused. A non-empty one is an error unless `allow_overwrite` is
/// set, in which case it is deleted and recreated.
///
/// # Returns
///
/// Whether an existing non-empty directory was overwritten
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let overwrite = if let Ok(mut contents) = fs::read_dir(output_dir) {
        if contents.next().is_none() {
            // Already exists and is empty
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please delete the folder or pass the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the scenario status CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ScenarioStatusRow {
    year_case: YearCase,
    scrap_case: ScrapCase,
    status: String,
    detail: String,
}

impl ScenarioStatusRow {
    /// Create a new [`ScenarioStatusRow`]
    pub fn new(key: ScenarioKey, status: &str, detail: String) -> Self {
        Self {
            year_case: key.year_case,
            scrap_case: key.scrap_case,
            status: status.to_string(),
            detail,
        }
    }
}

/// Represents a row in the hourly dispatch CSV file.
///
/// Hours are numbered from one.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct HourlyDispatchRow {
    year_case: YearCase,
    scrap_case: ScrapCase,
    hour: usize,
    solar: f64,
    wind: f64,
    curtailment: f64,
    grid_import: f64,
    battery_charge: f64,
    battery_discharge: f64,
    battery_level: f64,
    fuel_cell: f64,
    electrolyser: f64,
    total_consumption: f64,
    hydrogen_produced: f64,
    cgh2_injection: f64,
    cgh2_level: f64,
    dri_produced: f64,
    hot_dri: f64,
    cdri_level: f64,
    hbi_level: f64,
    scrap: f64,
    liquid_steel: f64,
}

impl HourlyDispatchRow {
    fn new(key: ScenarioKey, solution: &Solution, hour: usize) -> Self {
        let value = |var| solution.hourly(var, hour);
        Self {
            year_case: key.year_case,
            scrap_case: key.scrap_case,
            hour: hour + 1,
            solar: value(Hourly::SolarPower),
            wind: value(Hourly::WindPower),
            curtailment: value(Hourly::Curtailment),
            grid_import: value(Hourly::GridImport),
            battery_charge: value(Hourly::BatteryCharge),
            battery_discharge: value(Hourly::BatteryDischarge),
            battery_level: value(Hourly::BatteryLevel),
            fuel_cell: value(Hourly::FuelCellPower),
            electrolyser: value(Hourly::ElectrolyserPower),
            total_consumption: value(Hourly::TotalConsumption),
            hydrogen_produced: value(Hourly::HydrogenProduced),
            cgh2_injection: value(Hourly::Cgh2Injection),
            cgh2_level: value(Hourly::Cgh2Level),
            dri_produced: value(Hourly::DriProduced),
            hot_dri: value(Hourly::HotDri),
            cdri_level: value(Hourly::CdriLevel),
            hbi_level: value(Hourly::HbiLevel),
            scrap: value(Hourly::Scrap),
            liquid_steel: value(Hourly::LiquidSteel),
        }
    }
}

/// Represents a row in the model size CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ModelSizeRow {
    year_case: YearCase,
    scrap_case: ScrapCase,
    item: String,
    count: usize,
}

/// For writing extra debug information about the model
struct DebugDataWriter {
    hourly_dispatch_writer: csv::Writer<File>,
    model_size_writer: csv::Writer<File>,
}

impl DebugDataWriter {
    /// Open CSV files to write debug info to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    fn create(output_path: &Path) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        Ok(Self {
            hourly_dispatch_writer: new_writer(HOURLY_DISPATCH_FILE_NAME)?,
            model_size_writer: new_writer(MODEL_SIZE_FILE_NAME)?,
        })
    }

    /// Write the hourly dispatch of a solved scenario
    fn write_hourly_dispatch(&mut self, key: ScenarioKey, solution: &Solution) -> Result<()> {
        for hour in 0..solution.hours() {
            self.hourly_dispatch_writer
                .serialize(HourlyDispatchRow::new(key, solution, hour))?;
        }

        Ok(())
    }

    /// Write the number of columns and rows of a built problem
    fn write_model_size(&mut self, key: ScenarioKey, size: &ProblemSize) -> Result<()> {
        let counts = [
            ("columns".to_string(), size.columns),
            ("rows".to_string(), size.rows),
        ]
        .into_iter()
        .chain(
            size.constraint_counts
                .iter()
                .map(|(family, count)| (format!("rows_{family}"), *count)),
        );

        for (item, count) in counts {
            self.model_size_writer.serialize(ModelSizeRow {
                year_case: key.year_case,
                scrap_case: key.scrap_case,
                item,
                count,
            })?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    fn flush(&mut self) -> Result<()> {
        self.hourly_dispatch_writer.flush()?;
        self.model_size_writer.flush()?;

        Ok(())
    }
}

/// An object for writing scenario outputs to file
pub struct DataWriter {
    output_path: PathBuf,
    debug_writer: Option<DebugDataWriter>,
}

impl DataWriter {
    /// Prepare to write output data
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `save_debug_info` - Whether to include extra CSV files for debugging model
    pub fn create(output_path: &Path, save_debug_info: bool) -> Result<Self> {
        let debug_writer = if save_debug_info {
            // Create debug CSV files
            Some(DebugDataWriter::create(output_path)?)
        } else {
            None
        };

        Ok(Self {
            output_path: output_path.to_path_buf(),
            debug_writer,
        })
    }

    /// Write every result row to the results CSV file
    pub fn write_results(&self, results: &[ScenarioResult]) -> Result<()> {
        write_rows(&self.output_path.join(RESULTS_FILE_NAME), results)
    }

    /// Write every status row to the status CSV file
    pub fn write_statuses(&self, statuses: &[ScenarioStatusRow]) -> Result<()> {
        write_rows(&self.output_path.join(STATUS_FILE_NAME), statuses)
    }

    /// Write the hourly dispatch of a solved scenario, if debug info is enabled
    pub fn write_hourly_dispatch(&mut self, key: ScenarioKey, solution: &Solution) -> Result<()> {
        if let Some(ref mut wtr) = self.debug_writer {
            wtr.write_hourly_dispatch(key, solution)?;
        }

        Ok(())
    }

    /// Write the size of a built problem, if debug info is enabled
    pub fn write_model_size(&mut self, key: ScenarioKey, size: &ProblemSize) -> Result<()> {
        if let Some(ref mut wtr) = self.debug_writer {
            wtr.write_model_size(key, size)?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        if let Some(ref mut wtr) = self.debug_writer {
            wtr.flush()?;
        }

        Ok(())
    }
}

/// Write all rows to a new CSV file.
///
/// The file is created even if there are no rows.
fn write_rows<T: Serialize>(file_path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(file_path)
        .with_context(|| format!("Could not create {}", file_path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{model_24h, scenario_params};
    use crate::model::Model;
    use crate::simulation::optimisation::{SolveOutcome, build_problem};
    use itertools::{Itertools, assert_equal};
    use rstest::rstest;
    use std::iter;
    use tempfile::tempdir;

    #[test]
    fn test_create_output_directory_new() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("a").join("b");
        assert!(!create_output_directory(&output_dir, false).unwrap());
        assert!(output_dir.is_dir());
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn test_create_output_directory_empty(#[case] allow_overwrite: bool) {
        let dir = tempdir().unwrap();
        assert!(!create_output_directory(dir.path(), allow_overwrite).unwrap());
    }

    #[test]
    fn test_create_output_directory_not_empty() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("file.txt"), "contents").unwrap();

        assert!(create_output_directory(dir.path(), false).is_err());
        assert!(dir.path().join("file.txt").is_file());

        assert!(create_output_directory(dir.path(), true).unwrap());
        assert!(dir.path().is_dir());
        assert!(!dir.path().join("file.txt").exists());
    }

    #[test]
    fn test_write_statuses() {
        let key = ScenarioKey::new(YearCase::Y2040, ScrapCase::S2);
        let dir = tempdir().unwrap();
        let row = ScenarioStatusRow::new(key, "infeasible", String::new());

        {
            let writer = DataWriter::create(dir.path(), false).unwrap();
            writer
                .write_statuses(&[ScenarioStatusRow::new(key, "infeasible", String::new())])
                .unwrap();
        }

        let text = fs::read_to_string(dir.path().join(STATUS_FILE_NAME)).unwrap();
        assert!(text.starts_with("year_case,scrap_case,status,detail\nY2040,S2,infeasible,"));

        let records: Vec<ScenarioStatusRow> =
            csv::Reader::from_path(dir.path().join(STATUS_FILE_NAME))
                .unwrap()
                .into_deserialize()
                .try_collect()
                .unwrap();
        assert_equal(records, iter::once(row));
    }

    #[test]
    fn test_write_no_results() {
        let dir = tempdir().unwrap();
        DataWriter::create(dir.path(), false)
            .unwrap()
            .write_results(&[])
            .unwrap();
        assert!(dir.path().join(RESULTS_FILE_NAME).is_file());
        assert!(!dir.path().join(HOURLY_DISPATCH_FILE_NAME).exists());
    }

    #[rstest]
    fn test_write_debug_info(model_24h: Model) {
        let key = ScenarioKey::new(YearCase::Current, ScrapCase::S1);
        let params = scenario_params(&model_24h, key.year_case, key.scrap_case);
        let problem = build_problem(&params);
        let dir = tempdir().unwrap();

        {
            let mut writer = DataWriter::create(dir.path(), true).unwrap();
            writer.write_model_size(key, problem.size()).unwrap();
            let SolveOutcome::Solved(solution) = problem.solve(None, false) else {
                panic!("Scenario not solved");
            };
            writer.write_hourly_dispatch(key, &solution).unwrap();
            writer.flush().unwrap();
        }

        let dispatch: Vec<HourlyDispatchRow> =
            csv::Reader::from_path(dir.path().join(HOURLY_DISPATCH_FILE_NAME))
                .unwrap()
                .into_deserialize()
                .try_collect()
                .unwrap();
        assert_eq!(dispatch.len(), 24);
        assert_eq!(dispatch[0].hour, 1);
        assert_eq!(dispatch[23].hour, 24);

        let sizes: Vec<ModelSizeRow> =
            csv::Reader::from_path(dir.path().join(MODEL_SIZE_FILE_NAME))
                .unwrap()
                .into_deserialize()
                .try_collect()
                .unwrap();
        assert_eq!(sizes[0].item, "columns");
        assert_eq!(sizes[1].item, "rows");
        assert!(sizes.iter().any(|row| row.item == "rows_storage"));
    }
}
