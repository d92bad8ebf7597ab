//! Integration tests for the `run` command.
use green_steel::cli::{RunOpts, handle_run_command};
use green_steel::settings::Settings;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Get the path to the example model.
fn get_model_dir() -> PathBuf {
    PathBuf::from("demos/simple")
}

/// Read a CSV file as a header and a list of records
fn read_csv(file_path: &Path) -> (csv::StringRecord, Vec<csv::StringRecord>) {
    let mut reader = csv::Reader::from_path(file_path).unwrap();
    let header = reader.headers().unwrap().clone();
    let records = reader.records().map(Result::unwrap).collect();
    (header, records)
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("GREEN_STEEL_LOG_LEVEL", "off") };

    // Save results to non-existent directory to check that directory creation works
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        overwrite: false,
        debug_model: true,
    };
    handle_run_command(&get_model_dir(), &opts, Some(Settings::default())).unwrap();

    let (header, statuses) = read_csv(&output_dir.join("scenario_status.csv"));
    assert_eq!(
        header.iter().collect::<Vec<_>>(),
        ["year_case", "scrap_case", "status", "detail"]
    );
    assert_eq!(statuses.len(), 6);
    assert!(statuses.iter().all(|row| &row[2] == "solved"));

    let (header, results) = read_csv(&output_dir.join("scenario_results.csv"));
    assert_eq!(results.len(), 6);
    assert_eq!(&header[0], "Ycase");
    assert_eq!(&header[1], "Scase");
    let lcos = header.iter().position(|name| name == "LCOS_inc_ore").unwrap();
    for row in &results {
        let value: f64 = row[lcos].parse().unwrap();
        assert!(value.is_finite() && value > 0.0);
    }

    let (_, dispatch) = read_csv(&output_dir.join("debug_hourly_dispatch.csv"));
    assert_eq!(dispatch.len(), 6 * 24);
    assert!(output_dir.join("debug_model_size.csv").is_file());
    assert!(output_dir.join("metadata.toml").is_file());
    assert!(output_dir.join("green_steel_info.log").is_file());

    // Running again into the same folder needs permission to overwrite
    assert!(handle_run_command(&get_model_dir(), &opts, Some(Settings::default())).is_err());
    let opts = RunOpts {
        overwrite: true,
        ..opts
    };
    handle_run_command(&get_model_dir(), &opts, Some(Settings::default())).unwrap();
    assert!(fs::read_dir(&output_dir).unwrap().count() > 0);
}
