// Port every MIP backend implements; the TSP formulation only talks to this trait

use super::models::{OptimizationProblem, Solution};

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for MIP solvers
///
/// Implementations must be stateless between calls: every `solve` builds its
/// own backend model, so one handle can serve concurrent requests.
pub trait SolverService: Send + Sync {
    /// Solve a MIP model, reporting the terminal status in the returned `Solution`
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &OptimizationProblem) -> Result<()> {
        let mut errors = Vec::new();

        if problem.objective.coefficients.is_empty() {
            errors.push("Objective must have at least one coefficient".to_string());
        }

        let num_vars = problem.num_variables();

        if problem.variables.len() != num_vars {
            errors.push(format!(
                "Number of variables ({}) doesn't match objective coefficients ({})",
                problem.variables.len(),
                num_vars
            ));
        }

        if problem.objective.coefficients.iter().any(|c| !c.is_finite()) {
            errors.push("Objective coefficients must be finite".to_string());
        }

        for (i, constraint) in problem.constraints.iter().enumerate() {
            if constraint.num_variables() != num_vars {
                errors.push(format!(
                    "Constraint {} '{}' has {} coefficients but problem has {} variables",
                    i,
                    constraint.name,
                    constraint.num_variables(),
                    num_vars
                ));
            }
        }

        for (i, var) in problem.variables.iter().enumerate() {
            if let Some(upper) = var.upper_bound {
                if var.lower_bound > upper {
                    errors.push(format!(
                        "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                        i, var.name, var.lower_bound, upper
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;

    /// Check if this solver supports mixed-integer programming
    fn supports_mip(&self) -> bool;

    /// Whether `SolverConfig::time_limit` is honoured
    fn supports_time_limit(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Constraint, ObjectiveFunction, Variable};
    use crate::domain::value_objects::ConstraintType;

    struct NeverSolves;

    impl SolverService for NeverSolves {
        fn solve(&self, _problem: &OptimizationProblem) -> Result<Solution> {
            Err(SolverError::ExecutionFailed("not a real backend".to_string()))
        }

        fn name(&self) -> &str {
            "never"
        }

        fn supports_mip(&self) -> bool {
            true
        }
    }

    #[test]
    fn validate_accepts_consistent_problem() {
        let problem = OptimizationProblem::new(ObjectiveFunction::minimize(vec![1.0, 2.0]))
            .with_variables(vec![Variable::binary("a"), Variable::free_integer("b")])
            .add_constraint(Constraint::new(
                ConstraintType::Equal,
                vec![1.0, 1.0],
                1.0,
            ));

        assert!(NeverSolves.validate(&problem).is_ok());
    }

    #[test]
    fn validate_reports_every_mismatch() {
        let problem = OptimizationProblem::new(ObjectiveFunction::minimize(vec![1.0, 2.0]))
            .with_variables(vec![Variable::binary("a")])
            .add_constraint(
                Constraint::new(ConstraintType::LessThanOrEqual, vec![1.0], 1.0)
                    .with_name("short_row"),
            );

        let err = NeverSolves.validate(&problem).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Number of variables (1)"));
        assert!(message.contains("short_row"));
    }
}
