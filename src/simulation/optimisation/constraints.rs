//! Code for adding constraints to the plant optimisation problem.
//!
//! Constraints are grouped into families, each added by its own module against the shared
//! [`VariableMap`]. The number of rows added by each family is recorded for debugging output.
use super::{Problem, VariableMap};
use crate::simulation::parameters::ScenarioParameters;
use strum::{Display, EnumIter};

pub mod balance;
pub mod capacity;
pub mod demand;
pub mod economics;
pub mod energy;
pub mod mass;
pub mod storage;
pub mod totals;

/// A family of constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ConstraintFamily {
    /// Process energy and hydrogen demand
    Energy,
    /// Power bus balances and inverter losses
    Balance,
    /// EAF and DRI mass balances
    Mass,
    /// Storage dynamics
    Storage,
    /// Dispatch limits from installed capacity
    Capacity,
    /// Annual totals of hourly flows
    Totals,
    /// CAPEX and OPEX lines
    Economics,
    /// Steel demand and renewable share
    Demand,
}

/// Number of rows added by each constraint family, in the order they were added
pub type ConstraintCounts = Vec<(ConstraintFamily, usize)>;

/// Add every constraint family to the problem.
///
/// # Arguments
///
/// * `problem` - The optimisation problem
/// * `variables` - The variables in the problem
/// * `params` - Scenario parameters
///
/// # Returns
///
/// The number of rows added by each family.
pub fn add_constraints(
    problem: &mut Problem,
    variables: &VariableMap,
    params: &ScenarioParameters,
) -> ConstraintCounts {
    type AddFn = fn(&mut Problem, &VariableMap, &ScenarioParameters);
    let families: [(ConstraintFamily, AddFn); 8] = [
        (ConstraintFamily::Energy, energy::add_energy_constraints),
        (ConstraintFamily::Balance, balance::add_balance_constraints),
        (ConstraintFamily::Mass, mass::add_mass_constraints),
        (ConstraintFamily::Storage, storage::add_storage_constraints),
        (ConstraintFamily::Capacity, capacity::add_capacity_constraints),
        (ConstraintFamily::Totals, totals::add_totals_constraints),
        (ConstraintFamily::Economics, economics::add_economics_constraints),
        (ConstraintFamily::Demand, demand::add_demand_constraints),
    ];

    families
        .into_iter()
        .map(|(family, add)| {
            let before = problem.num_rows();
            add(problem, variables, params);
            (family, problem.num_rows() - before)
        })
        .collect()
}
