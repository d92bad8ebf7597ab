//! Integration tests for the `validate` command.
use green_steel::cli::handle_validate_command;
use green_steel::input::load_model;
use green_steel::log::is_logger_initialised;
use green_steel::settings::Settings;
use std::path::PathBuf;

/// Get the path to a bundled example model.
fn get_model_dir(name: &str) -> PathBuf {
    ["demos", name].iter().collect()
}

/// An integration test for the `validate` command.
///
/// We also check that the logger is initialised after it is run.
#[test]
fn test_handle_validate_command() {
    unsafe { std::env::set_var("GREEN_STEEL_LOG_LEVEL", "off") };

    handle_validate_command(&get_model_dir("simple"), Some(Settings::default())).unwrap();
    assert!(is_logger_initialised());

    // Initialising the logger a second time is harmless
    handle_validate_command(&get_model_dir("simple"), Some(Settings::default())).unwrap();
}

#[test]
fn test_load_full_year_example() {
    let model = load_model(get_model_dir("zhangjiakou")).unwrap();
    assert_eq!(model.parameters.hours, 8760);
    assert_eq!(model.profile.len(), 8760);
    assert_eq!(model.iter_scenarios().count(), 12);
}

#[test]
fn test_validate_missing_model() {
    unsafe { std::env::set_var("GREEN_STEEL_LOG_LEVEL", "off") };

    let err = handle_validate_command(&get_model_dir("atlantis"), Some(Settings::default()))
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to validate model.");
}
