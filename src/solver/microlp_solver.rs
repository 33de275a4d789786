// microlp adapter: pure-Rust branch and bound, always buildable

use crate::domain::{
    models::{OptimizationProblem, Solution},
    solver_service::{Result, SolverService},
};
use good_lp::{solvers::microlp::microlp, WithTimeLimit};

use super::good_lp_model::solve_with;

pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MicroLpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for MicroLpSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution> {
        self.validate(problem)?;

        let time_limit = problem.solver_config.time_limit;
        solve_with(
            problem,
            microlp,
            |model| match time_limit {
                Some(seconds) => model.with_time_limit(seconds),
                None => model,
            },
            self.name(),
        )
    }

    fn name(&self) -> &str {
        "microlp"
    }

    fn supports_mip(&self) -> bool {
        true
    }

    fn supports_time_limit(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        models::{Constraint, ObjectiveFunction, Variable},
        distance::DistanceMatrix,
        models::SolverConfig,
        tsp::{ExactTspSolver, TspError},
        value_objects::{ConstraintType, OptimizationType, SolutionStatus},
    };
    use std::sync::Arc;

    // Knapsack: weights 7, 3, 4, 5, 2 under capacity 15, values 150, 90, 120, 100, 80
    fn knapsack() -> OptimizationProblem {
        let values = vec![150.0, 90.0, 120.0, 100.0, 80.0];
        let mut objective = ObjectiveFunction::minimize(values);
        objective.optimization_type = OptimizationType::Maximize;

        OptimizationProblem::new(objective)
            .with_name("knapsack")
            .with_variables((0..5).map(|i| Variable::binary(format!("take_{}", i))).collect())
            .add_constraint(Constraint::new(
                ConstraintType::LessThanOrEqual,
                vec![7.0, 3.0, 4.0, 5.0, 2.0],
                15.0,
            ))
    }

    #[test]
    fn solves_small_binary_program() {
        let solution = MicroLpSolver::new().solve(&knapsack()).unwrap();

        assert_eq!(solution.status, SolutionStatus::Optimal);
        let value = solution.objective_value.unwrap();
        assert!((value - 390.0).abs() < 1e-6, "value {}", value);
        assert_eq!(solution.statistics.num_binary_vars, 5);
    }

    #[test]
    fn reports_infeasible_status() {
        let problem = OptimizationProblem::new(ObjectiveFunction::minimize(vec![1.0]))
            .with_variables(vec![Variable::continuous("x")])
            .add_constraint(Constraint::new(ConstraintType::GreaterThanOrEqual, vec![1.0], 5.0))
            .add_constraint(Constraint::new(ConstraintType::LessThanOrEqual, vec![1.0], 2.0));

        let solution = MicroLpSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, SolutionStatus::Infeasible);
        assert!(solution.variable_values.is_empty());
    }

    #[test]
    fn rejects_malformed_problem_before_solving() {
        let problem = OptimizationProblem::new(ObjectiveFunction::minimize(vec![1.0, 1.0]))
            .with_variables(vec![Variable::binary("only_one")]);
        assert!(MicroLpSolver::new().solve(&problem).is_err());
    }

    #[test]
    fn exhausted_time_limit_fails_the_tour() {
        let n = 10;
        let data = (0..n * n)
            .map(|k| if k / n == k % n { 0.0 } else { ((k * 31) % 23 + 2) as f64 })
            .collect();
        let matrix = DistanceMatrix::from_data(n, data).unwrap();

        let solver = ExactTspSolver::new(Arc::new(MicroLpSolver::new())).with_time_limit(0.0);
        match solver.solve(&matrix) {
            Err(TspError::NotOptimal { status, .. }) => {
                assert_eq!(status, SolutionStatus::TimeLimit)
            }
            other => panic!("expected a time-limit failure, got {:?}", other),
        }
    }

    #[test]
    fn generous_time_limit_still_solves() {
        let problem = knapsack().with_config(SolverConfig {
            time_limit: Some(30.0),
            ..SolverConfig::default()
        });
        let solution = MicroLpSolver::new().solve(&problem).unwrap();

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!(MicroLpSolver::new().supports_time_limit());
    }
}
