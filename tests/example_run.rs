//! Integration tests for running the bundled examples.
use green_steel::cli::RunOpts;
use green_steel::cli::example::handle_example_run_command;
use green_steel::settings::Settings;
use tempfile::tempdir;

#[test]
fn test_example_run_simple() {
    unsafe { std::env::set_var("GREEN_STEEL_LOG_LEVEL", "off") };

    let tempdir = tempdir().unwrap();
    let opts = RunOpts {
        output_dir: Some(tempdir.path().to_path_buf()),
        ..RunOpts::default()
    };
    handle_example_run_command("simple", &opts, Some(Settings::default())).unwrap();

    for file_name in ["scenario_results.csv", "scenario_status.csv", "metadata.toml"] {
        assert!(tempdir.path().join(file_name).is_file(), "{file_name} missing");
    }
    assert!(!tempdir.path().join("debug_hourly_dispatch.csv").exists());
}

#[test]
fn test_example_run_unknown() {
    let opts = RunOpts::default();
    assert!(handle_example_run_command("atlantis", &opts, Some(Settings::default())).is_err());
}
