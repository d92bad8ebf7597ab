//! Code for building and solving the plant sizing and dispatch problem.
//!
//! One linear program is built per scenario. It sizes renewables, storage, electrolysis and
//! steelmaking equipment and dispatches them hour by hour so as to minimise the levelised cost of
//! steel.
use crate::simulation::parameters::ScenarioParameters;
use highs::{HighsModelStatus, RowProblem as Problem, Sense};
use log::debug;

pub mod constraints;
pub mod variables;
use constraints::{ConstraintCounts, add_constraints};
pub use variables::{Asset, HourlyVariable, OpexLine, ScalarVariable, Variable, VariableMap};
use variables::{add_variables, cost_objective_coefficient, grid_objective_coefficient};

/// The size of a built problem
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemSize {
    /// Number of columns
    pub columns: usize,
    /// Number of rows
    pub rows: usize,
    /// Number of rows added by each constraint family
    pub constraint_counts: ConstraintCounts,
}

/// A problem ready to be solved
pub struct PlantProblem {
    problem: Problem,
    variables: VariableMap,
    size: ProblemSize,
    objective: (f64, f64),
}

/// The solution to the plant optimisation problem
pub struct Solution {
    columns: Vec<f64>,
    variables: VariableMap,
    objective_value: f64,
}

impl Solution {
    /// The optimal value of an hourly variable, or zero if the variable is not in the problem
    pub fn hourly(&self, var: HourlyVariable, hour: usize) -> f64 {
        self.variables
            .hourly_index(var, hour)
            .map_or(0.0, |idx| self.columns[idx])
    }

    /// The optimal values of an hourly variable for every hour
    pub fn series(&self, var: HourlyVariable) -> impl Iterator<Item = f64> + '_ {
        (0..self.variables.hours()).map(move |hour| self.hourly(var, hour))
    }

    /// The optimal value of a scalar variable, or zero if the variable is not in the problem
    pub fn scalar(&self, var: ScalarVariable) -> f64 {
        self.variables
            .scalar_index(var)
            .map_or(0.0, |idx| self.columns[idx])
    }

    /// The optimal value of the total of an hourly variable
    pub fn total(&self, var: HourlyVariable) -> f64 {
        self.scalar(ScalarVariable::Total(var))
    }

    /// Levelised cost of steel from the objective (USD/t)
    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    /// Number of hours
    pub fn hours(&self) -> usize {
        self.variables.hours()
    }
}

/// The result of attempting to solve a scenario
pub enum SolveOutcome {
    /// An optimal solution was found
    Solved(Solution),
    /// The problem is infeasible (or unbounded)
    Infeasible,
    /// The solver failed or stopped for another reason
    SolverError(String),
    /// The solver reached its time limit
    Timeout,
}

impl SolveOutcome {
    /// A short label for this outcome
    pub fn label(&self) -> &'static str {
        match self {
            Self::Solved(_) => "solved",
            Self::Infeasible => "infeasible",
            Self::SolverError(_) => "solver_error",
            Self::Timeout => "timeout",
        }
    }
}

/// Build the optimisation problem for a scenario.
///
/// # Arguments
///
/// * `params` - Scenario parameters
pub fn build_problem(params: &ScenarioParameters) -> PlantProblem {
    let mut problem = Problem::default();
    let variables = add_variables(&mut problem, params);
    let constraint_counts = add_constraints(&mut problem, &variables, params);

    let size = ProblemSize {
        columns: problem.num_cols(),
        rows: problem.num_rows(),
        constraint_counts,
    };
    debug!(
        "Built problem for scenario {} with {} columns and {} rows",
        params.key, size.columns, size.rows
    );

    PlantProblem {
        problem,
        variables,
        size,
        objective: (
            cost_objective_coefficient(params),
            grid_objective_coefficient(params),
        ),
    }
}

impl PlantProblem {
    /// The size of this problem
    pub fn size(&self) -> &ProblemSize {
        &self.size
    }

    /// Solve the problem.
    ///
    /// This is a single blocking call into HiGHS.
    ///
    /// # Arguments
    ///
    /// * `time_limit` - Optional solver time limit in seconds
    /// * `solver_output` - Whether HiGHS should print its log to the console
    pub fn solve(self, time_limit: Option<f64>, solver_output: bool) -> SolveOutcome {
        let mut highs_model = self.problem.optimise(Sense::Minimise);
        highs_model.set_option("output_flag", solver_output);
        highs_model.set_option("log_to_console", solver_output);
        if let Some(limit) = time_limit {
            highs_model.set_option("time_limit", limit);
        }

        let solved = match highs_model.try_solve() {
            Ok(solved) => solved,
            Err(status) => return SolveOutcome::SolverError(format!("HiGHS failed: {status:?}")),
        };

        match solved.status() {
            HighsModelStatus::Optimal => {
                let columns = solved.get_solution().columns().to_vec();
                let (cost_coeff, grid_coeff) = self.objective;
                let mut solution = Solution {
                    columns,
                    variables: self.variables,
                    objective_value: 0.0,
                };
                solution.objective_value = cost_coeff
                    * (solution.scalar(ScalarVariable::TotalAnnualCapex)
                        + solution.scalar(ScalarVariable::TotalAnnualOpex))
                    + grid_coeff * solution.total(HourlyVariable::GridImport);
                SolveOutcome::Solved(solution)
            }
            HighsModelStatus::Infeasible | HighsModelStatus::UnboundedOrInfeasible => {
                SolveOutcome::Infeasible
            }
            HighsModelStatus::ReachedTimeLimit => SolveOutcome::Timeout,
            status => SolveOutcome::SolverError(format!("Could not solve: {status:?}")),
        }
    }
}

/// Build and solve the problem for a scenario
pub fn solve_scenario(params: &ScenarioParameters, solver_output: bool) -> SolveOutcome {
    build_problem(params).solve(params.model.solver_time_limit, solver_output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{model_24h, scenario_params};
    use crate::model::{DriRouting, Model};
    use crate::scenario::{ScrapCase, YearCase};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn solve(model: &Model, year_case: YearCase, scrap_case: ScrapCase) -> Solution {
        let params = scenario_params(model, year_case, scrap_case);
        match solve_scenario(&params, false) {
            SolveOutcome::Solved(solution) => solution,
            outcome => panic!("Scenario not solved: {}", outcome.label()),
        }
    }

    #[rstest]
    fn test_demand_met(model_24h: Model) {
        let params = scenario_params(&model_24h, YearCase::Current, ScrapCase::S1);
        let solution = solve(&model_24h, YearCase::Current, ScrapCase::S1);
        let steel: f64 = solution.series(HourlyVariable::LiquidSteel).sum();
        assert_approx_eq!(
            f64,
            steel,
            params.steel_demand.value(),
            epsilon = 1e-6 * params.steel_demand.value()
        );
    }

    #[rstest]
    fn test_dri_conserved(model_24h: Model) {
        let solution = solve(&model_24h, YearCase::Y2030, ScrapCase::S2);
        let produced: f64 = solution.series(HourlyVariable::DriProduced).sum();
        let charged: f64 = solution.series(HourlyVariable::DriCharged).sum();
        assert_approx_eq!(f64, produced, charged, epsilon = 1e-4);
    }

    #[rstest]
    fn test_no_scrap_in_s1(model_24h: Model) {
        let solution = solve(&model_24h, YearCase::Current, ScrapCase::S1);
        assert!(solution.total(HourlyVariable::Scrap).abs() < 1e-6);
    }

    #[rstest]
    fn test_scrap_ratio_holds(model_24h: Model) {
        let solution = solve(&model_24h, YearCase::Current, ScrapCase::S3);
        for hour in 0..solution.hours() {
            let scrap = solution.hourly(HourlyVariable::Scrap, hour);
            let dri = solution.hourly(HourlyVariable::DriCharged, hour);
            assert!((scrap - dri).abs() < 1e-5, "hour {hour}: {scrap} != {dri}");
        }
    }

    #[rstest]
    fn test_storage_levels_non_negative(model_24h: Model) {
        let solution = solve(&model_24h, YearCase::Current, ScrapCase::S1);
        for var in [
            HourlyVariable::BatteryLevel,
            HourlyVariable::Cgh2Level,
            HourlyVariable::CdriLevel,
        ] {
            assert!(solution.series(var).all(|level| level >= -1e-6));
        }
    }

    #[rstest]
    fn test_renewable_share_satisfied(model_24h: Model) {
        let solution = solve(&model_24h, YearCase::Current, ScrapCase::S1);
        let generation = solution.scalar(ScalarVariable::RenewableGeneration);
        let consumption = solution.total(HourlyVariable::TotalConsumption);
        let grid = solution.total(HourlyVariable::GridImport);
        assert!(generation >= consumption + grid - 1e-4);
    }

    #[rstest]
    fn test_fuel_cell_sized_on_output(model_24h: Model) {
        let params = scenario_params(&model_24h, YearCase::Current, ScrapCase::S1);
        let solution = solve(&model_24h, YearCase::Current, ScrapCase::S1);
        let capacity = solution.scalar(ScalarVariable::FuelCellCapacity);
        let feed_per_mwh = params.technologies.fuel_cell.efficiency
            / params.model.process.inverter_efficiency;
        for hour in 0..solution.hours() {
            let output = solution.hourly(HourlyVariable::FuelCellPower, hour);
            let feed = solution.hourly(HourlyVariable::Cgh2ToFuelCell, hour);
            assert!(output <= capacity + 1e-6, "hour {hour}: {output} > {capacity}");
            assert_approx_eq!(f64, feed, output * feed_per_mwh, epsilon = 1e-6);
        }
    }

    #[rstest]
    fn test_objective_is_levelised_cost(model_24h: Model) {
        let params = scenario_params(&model_24h, YearCase::Current, ScrapCase::S1);
        let solution = solve(&model_24h, YearCase::Current, ScrapCase::S1);
        let cost = solution.scalar(ScalarVariable::TotalAnnualCapex)
            + solution.scalar(ScalarVariable::TotalAnnualOpex)
            + solution.total(HourlyVariable::GridImport) * params.model.grid_price / 1e6;
        assert_approx_eq!(
            f64,
            solution.objective_value(),
            cost * 1e6 / params.steel_demand.value(),
            epsilon = 1e-6
        );
        assert!(solution.objective_value() > 0.0);
    }

    #[rstest]
    fn test_more_scrap_needs_less_hydrogen(model_24h: Model) {
        let s1 = solve(&model_24h, YearCase::Current, ScrapCase::S1);
        let s3 = solve(&model_24h, YearCase::Current, ScrapCase::S3);
        assert!(
            s3.scalar(ScalarVariable::ElectrolyserCapacity)
                < s1.scalar(ScalarVariable::ElectrolyserCapacity)
        );
        assert!(
            s3.scalar(ScalarVariable::Capex(Asset::DrPlant))
                < s1.scalar(ScalarVariable::Capex(Asset::DrPlant))
        );
        assert!(
            s3.scalar(ScalarVariable::Opex(OpexLine::Scrap))
                > s1.scalar(ScalarVariable::Opex(OpexLine::Scrap))
        );
    }

    #[rstest]
    fn test_solves_with_hbi_route(mut model_24h: Model) {
        model_24h.parameters.dri_routing = DriRouting::WithBriquetting;
        let solution = solve(&model_24h, YearCase::Current, ScrapCase::S2);
        assert!(
            solution
                .series(HourlyVariable::HbiLevel)
                .all(|level| level >= -1e-6)
        );
        let stored: f64 = solution.series(HourlyVariable::HbiToStore).sum();
        let charged: f64 = solution.series(HourlyVariable::HbiToEaf).sum();
        assert_approx_eq!(f64, stored, charged, epsilon = 1e-4);
    }

    #[rstest]
    fn test_infeasible_when_eaf_too_small(mut model_24h: Model) {
        // A day's demand cannot be tapped at 1 t/h
        model_24h.parameters.max_eaf_capacity = 1.0;
        let params = scenario_params(&model_24h, YearCase::Current, ScrapCase::S1);
        assert!(matches!(
            solve_scenario(&params, false),
            SolveOutcome::Infeasible
        ));
    }

    #[rstest]
    fn test_problem_size(model_24h: Model) {
        let params = scenario_params(&model_24h, YearCase::Current, ScrapCase::S1);
        let problem = build_problem(&params);
        let size = problem.size();
        assert_eq!(
            size.rows,
            size.constraint_counts.iter().map(|(_, n)| n).sum::<usize>()
        );
        assert!(size.columns > 24 * 40);
    }
}
