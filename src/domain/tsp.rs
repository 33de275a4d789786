//! Exact TSP through a Miller–Tucker–Zemlin MIP.
//!
//! The distance matrix is turned into a generic [`OptimizationProblem`] with
//! `n²` binary edge variables `x[i][j]` followed by `n - 1` free integer
//! ordering variables `u[1..n]`. Node 0 is the fixed reference of the
//! subtour-elimination rows, so every feasible `x` is one Hamiltonian cycle
//! through node 0.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};

use super::distance::DistanceMatrix;
use super::models::{
    Constraint, ObjectiveFunction, OptimizationProblem, SolverConfig, SolverStatistics, Variable,
};
use super::solver_service::SolverService;
use super::tour::{reconstruct_tour, EdgeSelection, ReconstructionError, Tour};
use super::value_objects::{ConstraintType, SolutionStatus};

/// Smallest instance with a meaningful tour.
pub const MIN_EXACT_NODES: usize = 3;

/// Largest instance the MTZ model is allowed to attempt.
pub const MAX_EXACT_NODES: usize = 12;

/// Symmetry check tolerance used for the orientation rule.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

#[derive(Debug, thiserror::Error)]
pub enum TspError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No optimal tour found (solver status: {status}): {message}")]
    NotOptimal {
        status: SolutionStatus,
        message: String,
    },

    #[error("Solver output is not a single tour: {0}")]
    ReconstructionInconsistency(#[from] ReconstructionError),
}

/// Optimal closed tour and its cost.
#[derive(Debug, Clone)]
pub struct TspSolution {
    /// Starts and ends at node 0, length n + 1
    pub tour: Tour,
    /// Recomputed from the rounded edges, not taken from the solver objective
    pub total_distance: f64,
    pub status: SolutionStatus,
    pub statistics: SolverStatistics,
}

/// Builds and solves the MTZ model for one distance matrix at a time.
///
/// Holds no per-solve state; clones share the backend handle.
#[derive(Clone)]
pub struct ExactTspSolver {
    solver: Arc<dyn SolverService>,
    config: SolverConfig,
}

impl ExactTspSolver {
    pub fn new(solver: Arc<dyn SolverService>) -> Self {
        Self {
            solver,
            config: SolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Stop the backend after `seconds`; a stopped solve is reported as not optimal.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.config.time_limit = Some(seconds);
        self
    }

    pub fn backend_name(&self) -> &str {
        self.solver.name()
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Index of `x[i][j]` in the model's variable vector.
    pub fn edge_index(n: usize, i: usize, j: usize) -> usize {
        i * n + j
    }

    /// Index of `u[k]`, `k` in `1..n`.
    pub fn order_index(n: usize, k: usize) -> usize {
        n * n + k - 1
    }

    /// MTZ model for `distances` without solving it.
    pub fn formulate(&self, distances: &DistanceMatrix) -> OptimizationProblem {
        let n = distances.size();
        let num_vars = n * n + n.saturating_sub(1);

        let mut variables = Vec::with_capacity(num_vars);
        for i in 0..n {
            for j in 0..n {
                variables.push(Variable::binary(format!("x_{}_{}", i, j)));
            }
        }
        for k in 1..n {
            variables.push(Variable::free_integer(format!("u_{}", k)));
        }

        let mut coefficients = vec![0.0; num_vars];
        coefficients[..n * n].copy_from_slice(distances.as_slice());

        let mut problem = OptimizationProblem::new(ObjectiveFunction::minimize(coefficients))
            .with_name(format!("tsp_mtz_{}", n))
            .with_variables(variables)
            .with_config(self.config.clone());

        // Exactly one edge enters each node
        for j in 0..n {
            let mut row = vec![0.0; num_vars];
            for i in 0..n {
                row[Self::edge_index(n, i, j)] = 1.0;
            }
            problem = problem.add_constraint(
                Constraint::new(ConstraintType::Equal, row, 1.0).with_name(format!("enter_{}", j)),
            );
        }

        // Exactly one edge leaves each node
        for i in 0..n {
            let mut row = vec![0.0; num_vars];
            for j in 0..n {
                row[Self::edge_index(n, i, j)] = 1.0;
            }
            problem = problem.add_constraint(
                Constraint::new(ConstraintType::Equal, row, 1.0).with_name(format!("leave_{}", i)),
            );
        }

        for i in 0..n {
            let mut row = vec![0.0; num_vars];
            row[Self::edge_index(n, i, i)] = 1.0;
            problem = problem.add_constraint(
                Constraint::new(ConstraintType::Equal, row, 0.0)
                    .with_name(format!("no_loop_{}", i)),
            );
        }

        // u[i] - u[j] + n * x[i][j] <= n - 1
        let big_n = n as f64;
        for i in 1..n {
            for j in 1..n {
                if i == j {
                    continue;
                }
                let mut row = vec![0.0; num_vars];
                row[Self::order_index(n, i)] = 1.0;
                row[Self::order_index(n, j)] = -1.0;
                row[Self::edge_index(n, i, j)] = big_n;
                problem = problem.add_constraint(
                    Constraint::new(ConstraintType::LessThanOrEqual, row, big_n - 1.0)
                        .with_name(format!("mtz_{}_{}", i, j)),
                );
            }
        }

        problem
    }

    /// Finds a minimum-cost closed tour through every node of `distances`.
    pub fn solve(&self, distances: &DistanceMatrix) -> Result<TspSolution, TspError> {
        let n = distances.size();
        if !(MIN_EXACT_NODES..=MAX_EXACT_NODES).contains(&n) {
            return Err(TspError::InvalidInput(format!(
                "exact solver handles {} to {} nodes, got {}",
                MIN_EXACT_NODES, MAX_EXACT_NODES, n
            )));
        }

        let start = Instant::now();
        let problem = self.formulate(distances);
        debug!(
            "Formulated '{}': {} variables, {} constraints",
            problem.name,
            problem.num_variables(),
            problem.constraints.len()
        );

        let solution = self.solver.solve(&problem).map_err(|e| {
            warn!("{} failed on {}-node instance: {}", self.solver.name(), n, e);
            TspError::NotOptimal {
                status: SolutionStatus::Error,
                message: e.to_string(),
            }
        })?;

        if !solution.status.is_accepted_optimal() {
            warn!(
                "{} stopped with status {} on {}-node instance",
                self.solver.name(),
                solution.status,
                n
            );
            return Err(TspError::NotOptimal {
                status: solution.status,
                message: solution.message,
            });
        }

        if solution.variable_values.len() < n * n {
            return Err(ReconstructionError::WrongLength {
                len: solution.variable_values.len(),
                expected: n * n,
            }
            .into());
        }

        let edges = EdgeSelection::from_relaxed_values(n, &solution.variable_values[..n * n])?;
        edges.check_degrees()?;
        let total_distance = edges.total_distance(distances);

        let mut tour = reconstruct_tour(&edges)?;
        if distances.is_symmetric(SYMMETRY_TOLERANCE) {
            tour = tour.with_canonical_orientation();
        }

        if let Some(reported) = solution.objective_value {
            if (reported - total_distance).abs() > 1e-6 * total_distance.max(1.0) {
                debug!(
                    "Solver objective {} differs from recomputed distance {}",
                    reported, total_distance
                );
            }
        }

        let mut statistics = solution.statistics;
        statistics.solve_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        info!(
            "Solved {}-node tour with {}: distance {:.3} in {:.1} ms",
            n,
            self.solver.name(),
            total_distance,
            statistics.solve_time_ms
        );

        Ok(TspSolution {
            tour,
            total_distance,
            status: solution.status,
            statistics,
        })
    }
}

/// One-shot exact solve with a default configuration.
pub fn solve_exact_tsp(
    distances: &DistanceMatrix,
    solver: Arc<dyn SolverService>,
) -> Result<TspSolution, TspError> {
    ExactTspSolver::new(solver).solve(distances)
}
