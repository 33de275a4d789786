// HiGHS adapter
// Talks to the highs crate directly (RowProblem: columns first, then rows)

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus},
};
use highs::{HighsModelStatus, RowProblem, Sense};
use log::debug;
use std::time::Instant;

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;

        let start_time = Instant::now();
        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(problem.variables.len());

        for (var_def, &obj_coeff) in problem
            .variables
            .iter()
            .zip(&problem.objective.coefficients)
        {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);

            let col = if var_def.is_integer() {
                pb.add_integer_column(obj_coeff, lower..=upper)
            } else {
                pb.add_column(obj_coeff, lower..=upper)
            };
            cols.push(col);
        }

        for row in &problem.constraints {
            let terms: Vec<_> = row
                .coefficients
                .iter()
                .zip(&cols)
                .filter(|(coeff, _)| **coeff != 0.0)
                .map(|(&coeff, &col)| (col, coeff))
                .collect();

            match row.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=row.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(row.bound..=row.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(row.bound.., &terms);
                }
            }
        }

        let sense = match problem.objective.optimization_type {
            OptimizationType::Minimize => Sense::Minimise,
            OptimizationType::Maximize => Sense::Maximise,
        };

        let mut model = pb.optimise(sense);
        if !problem.solver_config.verbose {
            model.make_quiet();
        }
        if let Some(seconds) = problem.solver_config.time_limit {
            model.set_option("time_limit", seconds);
        }

        let solved = model.try_solve().map_err(|status| {
            SolverError::ExecutionFailed(format!("HiGHS returned {:?}", status))
        })?;
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;
        let statistics = SolverStatistics::for_problem(problem, solve_time);
        debug!("HiGHS finished '{}' with {:?}", problem.name, solved.status());

        let status = match solved.status() {
            HighsModelStatus::Optimal => {
                let variable_values = solved.get_solution().columns().to_vec();
                let objective_value: f64 = problem
                    .objective
                    .coefficients
                    .iter()
                    .zip(&variable_values)
                    .map(|(c, v)| c * v)
                    .sum();

                let mut solution = DomainSolution::optimal(objective_value, variable_values)
                    .with_statistics(statistics);
                solution.message = format!("Optimal solution found for '{}'", problem.name);
                return Ok(solution);
            }
            HighsModelStatus::Infeasible => SolutionStatus::Infeasible,
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                SolutionStatus::Unbounded
            }
            HighsModelStatus::ReachedTimeLimit => SolutionStatus::TimeLimit,
            HighsModelStatus::ReachedIterationLimit => SolutionStatus::IterationLimit,
            status => {
                return Err(SolverError::ExecutionFailed(format!(
                    "HiGHS solver returned status: {:?}",
                    status
                )))
            }
        };

        Ok(
            DomainSolution::new(status, format!("HiGHS stopped with status {}", status))
                .with_statistics(statistics),
        )
    }

    fn name(&self) -> &str {
        "HiGHS"
    }

    fn supports_mip(&self) -> bool {
        true
    }

    fn supports_time_limit(&self) -> bool {
        true
    }
}
