// Shared translation of the dense domain model into good_lp, used by every
// good_lp-backed adapter. Backend specifics are applied through `tune`.

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolverStatistics},
    solver_service::{Result, SolverError},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus, VariableType},
};
use good_lp::{
    constraint, solvers::Solver, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolutionTrait, SolutionStatus as GoodLpStatus, SolverModel,
    Variable as GoodLpVariable,
};
use log::debug;
use std::time::Instant;

pub(crate) fn solve_with<S, F>(
    problem: &OptimizationProblem,
    solver: S,
    tune: F,
    backend_name: &str,
) -> Result<DomainSolution>
where
    S: Solver,
    S::Model: SolverModel<Error = ResolutionError>,
    F: FnOnce(S::Model) -> S::Model,
{
    let start_time = Instant::now();

    let mut vars = variables!();
    let mut lp_variables: Vec<GoodLpVariable> = Vec::with_capacity(problem.variables.len());

    for var_def in &problem.variables {
        let mut definition = match var_def.variable_type {
            VariableType::Binary => variable().binary(),
            VariableType::Integer => variable().integer(),
            VariableType::Continuous => variable(),
        };
        if var_def.lower_bound.is_finite() {
            definition = definition.min(var_def.lower_bound);
        }
        if let Some(upper) = var_def.upper_bound {
            definition = definition.max(upper);
        }
        lp_variables.push(vars.add(definition));
    }

    let objective = linear_expression(&problem.objective.coefficients, &lp_variables);
    let unsolved = match problem.objective.optimization_type {
        OptimizationType::Minimize => vars.minimise(objective),
        OptimizationType::Maximize => vars.maximise(objective),
    };

    let mut lp_model = unsolved.using(solver);
    for row in &problem.constraints {
        let lhs = linear_expression(&row.coefficients, &lp_variables);
        lp_model = match row.constraint_type {
            ConstraintType::LessThanOrEqual => lp_model.with(constraint::leq(lhs, row.bound)),
            ConstraintType::Equal => lp_model.with(constraint::eq(lhs, row.bound)),
            ConstraintType::GreaterThanOrEqual => {
                lp_model.with(constraint::geq(lhs, row.bound))
            }
        };
    }

    let solution_result = tune(lp_model).solve();
    let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;
    let statistics = SolverStatistics::for_problem(problem, solve_time);
    debug!("{} finished '{}' in {:.1} ms", backend_name, problem.name, solve_time);

    match solution_result {
        Ok(sol) => {
            let variable_values: Vec<f64> = lp_variables.iter().map(|&v| sol.value(v)).collect();
            let objective_value: f64 = problem
                .objective
                .coefficients
                .iter()
                .zip(&variable_values)
                .map(|(c, v)| c * v)
                .sum();

            let (status, message) = match sol.status() {
                GoodLpStatus::Optimal => {
                    let mut solution = DomainSolution::optimal(objective_value, variable_values)
                        .with_statistics(statistics);
                    solution.message = format!("Optimal solution found for '{}'", problem.name);
                    return Ok(solution);
                }
                GoodLpStatus::TimeLimit => (
                    SolutionStatus::TimeLimit,
                    format!("{} hit its time limit with an unproven incumbent", backend_name),
                ),
                GoodLpStatus::GapLimit => (
                    SolutionStatus::Feasible,
                    format!("{} stopped within its gap limit", backend_name),
                ),
            };
            debug!(
                "{} incumbent for '{}': {} ({})",
                backend_name, problem.name, objective_value, status
            );

            // Incumbent values are kept for diagnostics only
            let mut solution = DomainSolution::new(status, message).with_statistics(statistics);
            solution.objective_value = Some(objective_value);
            solution.variable_values = variable_values;
            Ok(solution)
        }
        Err(ResolutionError::Infeasible) => Ok(DomainSolution::new(
            SolutionStatus::Infeasible,
            "Problem is infeasible: no solution satisfies all constraints",
        )
        .with_statistics(statistics)),
        Err(ResolutionError::Unbounded) => Ok(DomainSolution::new(
            SolutionStatus::Unbounded,
            "Problem is unbounded: objective can be improved infinitely",
        )
        .with_statistics(statistics)),
        Err(ResolutionError::Other(reason))
            if reason.eq_ignore_ascii_case("stopped") || reason.starts_with("Time limit") =>
        {
            Ok(DomainSolution::new(
                SolutionStatus::TimeLimit,
                format!("{} stopped before proving optimality", backend_name),
            )
            .with_statistics(statistics))
        }
        Err(e) => Err(SolverError::ExecutionFailed(format!(
            "{}: {:?}",
            backend_name, e
        ))),
    }
}

fn linear_expression(coefficients: &[f64], lp_variables: &[GoodLpVariable]) -> Expression {
    let mut expr: Expression = 0.into();
    for (&coeff, &var) in coefficients.iter().zip(lp_variables) {
        if coeff != 0.0 {
            expr += coeff * var;
        }
    }
    expr
}
