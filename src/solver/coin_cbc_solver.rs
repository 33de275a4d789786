use crate::domain::{
    models::{OptimizationProblem, Solution},
    solver_service::{Result, SolverService},
};
use good_lp::{solvers::coin_cbc::coin_cbc, WithTimeLimit};

use super::good_lp_model::solve_with;

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution> {
        self.validate(problem)?;

        let config = &problem.solver_config;
        solve_with(
            problem,
            coin_cbc,
            |mut model| {
                if !config.verbose {
                    model.set_parameter("log", "0");
                }
                match config.time_limit {
                    Some(seconds) => model.with_time_limit(seconds),
                    None => model,
                }
            },
            self.name(),
        )
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }

    fn supports_mip(&self) -> bool {
        true
    }

    fn supports_time_limit(&self) -> bool {
        true
    }
}
