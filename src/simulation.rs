//! Functionality for running every scenario of a model.
use crate::model::Model;
use crate::output::{DataWriter, ScenarioStatusRow};
use anyhow::Result;
use log::{info, warn};
use std::path::Path;

pub mod ore;
pub mod parameters;
use parameters::ScenarioParameters;
pub mod optimisation;
use optimisation::{SolveOutcome, build_problem};
pub mod results;
use results::{ScenarioResult, check_solution};

/// Run the model.
///
/// Scenarios are solved one at a time, year case outer and scrap case inner. A scenario which does
/// not solve is recorded in the status table and the run carries on with the next one.
///
/// # Arguments:
///
/// * `model` - The model to run
/// * `output_path` - The folder to which output files will be written
/// * `debug_model` - Whether to write additional information (e.g. hourly dispatch) to file
/// * `solver_output` - Whether HiGHS should print its log to the console
pub fn run(
    model: &Model,
    output_path: &Path,
    debug_model: bool,
    solver_output: bool,
) -> Result<()> {
    let mut writer = DataWriter::create(output_path, debug_model)?;
    let mut results = Vec::new();
    let mut statuses = Vec::new();

    let (solar, wind) = model.profile.mean_capacity_factors();
    info!(
        "Modelling {} hours (mean capacity factors: solar {solar:.3}, wind {wind:.3})",
        model.parameters.hours
    );

    for key in model.iter_scenarios() {
        info!("Scenario {key}");
        let params = match ScenarioParameters::new(model, key) {
            Ok(params) => params,
            Err(err) => {
                let detail = format!("{err:#}");
                warn!("Scenario {key} could not be set up: {detail}");
                let label = SolveOutcome::SolverError(detail.clone()).label();
                statuses.push(ScenarioStatusRow::new(key, label, detail));
                continue;
            }
        };

        let problem = build_problem(&params);
        writer.write_model_size(key, problem.size())?;

        let outcome = problem.solve(model.parameters.solver_time_limit, solver_output);
        let detail = match &outcome {
            SolveOutcome::Solved(solution) => {
                let violations = check_solution(solution, &params);
                let result = ScenarioResult::new(solution, &params);
                result.log_summary();
                writer.write_hourly_dispatch(key, solution)?;
                let detail = if violations.is_empty() {
                    format!("LCOS {:.2} USD/t", result.lcos_including_ore)
                } else {
                    format!("{} check(s) failed", violations.len())
                };
                results.push(result);
                detail
            }
            SolveOutcome::Infeasible => {
                warn!("Scenario {key} is infeasible");
                String::new()
            }
            SolveOutcome::Timeout => {
                warn!("Scenario {key} reached the solver time limit");
                String::new()
            }
            SolveOutcome::SolverError(msg) => {
                warn!("Scenario {key} could not be solved: {msg}");
                msg.clone()
            }
        };
        statuses.push(ScenarioStatusRow::new(key, outcome.label(), detail));
    }

    writer.write_results(&results)?;
    writer.write_statuses(&statuses)?;
    writer.flush()?;

    info!("Solved {} of {} scenarios", results.len(), statuses.len());

    Ok(())
}
