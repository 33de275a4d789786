// Route optimization use case: location names in, ordered closed route out

use std::sync::Arc;

use log::{debug, info};

use crate::domain::{
    distance_provider::{DistanceProvider, ProviderError},
    tsp::{ExactTspSolver, TspError, TspSolution},
};

/// Fewest locations accepted per request
pub const MIN_LOCATIONS: usize = 3;

/// Most locations accepted per request
pub const MAX_LOCATIONS: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error(
        "Please provide between {min} and {max} locations (got {count})",
        min = MIN_LOCATIONS,
        max = MAX_LOCATIONS
    )]
    InvalidLocationCount { count: usize },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Solve(#[from] TspError),

    #[error("Solver worker failed: {0}")]
    Worker(String),
}

/// Optimal visiting order for a set of named locations
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedRoute {
    /// Location names in visiting order; the first is repeated at the end
    pub optimized_route: Vec<String>,
    pub total_distance: f64,
    /// Indices into the request's location list, same order as `optimized_route`
    pub tour_indices: Vec<usize>,
}

impl OptimizedRoute {
    fn from_solution(locations: &[String], solution: TspSolution) -> Self {
        let tour_indices = solution.tour.into_vec();
        let optimized_route = tour_indices.iter().map(|&i| locations[i].clone()).collect();

        Self {
            optimized_route,
            total_distance: solution.total_distance,
            tour_indices,
        }
    }
}

/// Fetches a matrix from the injected provider and solves it exactly.
#[derive(Clone)]
pub struct RouteOptimizer {
    provider: Arc<dyn DistanceProvider>,
    solver: ExactTspSolver,
}

impl RouteOptimizer {
    pub fn new(provider: Arc<dyn DistanceProvider>, solver: ExactTspSolver) -> Self {
        Self { provider, solver }
    }

    pub fn solver(&self) -> &ExactTspSolver {
        &self.solver
    }

    pub async fn optimize_route(
        &self,
        locations: Vec<String>,
    ) -> Result<OptimizedRoute, RouteError> {
        let count = locations.len();
        if !(MIN_LOCATIONS..=MAX_LOCATIONS).contains(&count) {
            return Err(RouteError::InvalidLocationCount { count });
        }
        info!("Optimizing route over {} locations", count);

        let matrix = self.provider.distance_matrix(&locations).await?;
        if matrix.size() != count {
            return Err(ProviderError::LocationCountMismatch {
                requested: count,
                available: matrix.size(),
            }
            .into());
        }
        debug!("Distance matrix from {}:\n{}", self.provider.name(), matrix);

        let solver = self.solver.clone();
        let solution = tokio::task::spawn_blocking(move || solver.solve(&matrix))
            .await
            .map_err(|e| RouteError::Worker(e.to_string()))??;

        let route = OptimizedRoute::from_solution(&locations, solution);
        info!(
            "Optimal route {:?} ({:.3})",
            route.tour_indices, route.total_distance
        );
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        distance::DistanceMatrix,
        distance_provider::StaticDistanceProvider,
        models::{OptimizationProblem, Solution},
        solver_service::{Result as SolverResult, SolverService},
        value_objects::SolutionStatus,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers every model with the cycle 0 -> 2 -> 1 -> 3 -> 0.
    struct FixedCycleSolver {
        calls: AtomicUsize,
        status: SolutionStatus,
    }

    impl SolverService for FixedCycleSolver {
        fn solve(&self, problem: &OptimizationProblem) -> SolverResult<Solution> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.status.is_accepted_optimal() {
                return Ok(Solution::new(self.status, "scripted"));
            }
            let mut values = vec![0.0; problem.num_variables()];
            for (i, j) in [(0, 2), (2, 1), (1, 3), (3, 0)] {
                values[ExactTspSolver::edge_index(4, i, j)] = 1.0;
            }
            Ok(Solution::optimal(0.0, values))
        }

        fn name(&self) -> &str {
            "fixed"
        }

        fn supports_mip(&self) -> bool {
            true
        }
    }

    fn optimizer(status: SolutionStatus) -> (RouteOptimizer, Arc<FixedCycleSolver>) {
        let matrix = DistanceMatrix::from_rows(vec![
            vec![0.0, 2.0, 9.0, 10.0],
            vec![1.0, 0.0, 6.0, 4.0],
            vec![15.0, 7.0, 0.0, 8.0],
            vec![6.0, 3.0, 12.0, 0.0],
        ])
        .unwrap();
        let backend = Arc::new(FixedCycleSolver {
            calls: AtomicUsize::new(0),
            status,
        });
        let optimizer = RouteOptimizer::new(
            Arc::new(StaticDistanceProvider::new(matrix)),
            ExactTspSolver::new(backend.clone()),
        );
        (optimizer, backend)
    }

    fn locations(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn reorders_locations_along_the_tour() {
        let (optimizer, _) = optimizer(SolutionStatus::Optimal);
        let route = optimizer
            .optimize_route(locations(&["Depot", "Bakery", "Market", "Harbour"]))
            .await
            .unwrap();

        assert_eq!(route.tour_indices, vec![0, 2, 1, 3, 0]);
        assert_eq!(
            route.optimized_route,
            locations(&["Depot", "Market", "Bakery", "Harbour", "Depot"])
        );
        assert_eq!(route.total_distance, 9.0 + 7.0 + 4.0 + 6.0);
    }

    #[tokio::test]
    async fn rejects_too_few_or_too_many_locations() {
        let (optimizer, backend) = optimizer(SolutionStatus::Optimal);

        let err = optimizer
            .optimize_route(locations(&["a", "b"]))
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::InvalidLocationCount { count: 2 }));

        let many: Vec<String> = (0..11).map(|i| format!("stop {}", i)).collect();
        let err = optimizer.optimize_route(many).await.unwrap_err();
        assert!(matches!(err, RouteError::InvalidLocationCount { count: 11 }));
        assert!(err.to_string().contains("between 3 and 10"));

        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn provider_failures_surface_before_solving() {
        let (optimizer, backend) = optimizer(SolutionStatus::Optimal);
        let err = optimizer
            .optimize_route(locations(&["a", "b", "c"]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RouteError::Provider(ProviderError::LocationCountMismatch { .. })
        ));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn non_optimal_solves_return_no_route() {
        let (optimizer, backend) = optimizer(SolutionStatus::TimeLimit);
        let err = optimizer
            .optimize_route(locations(&["a", "b", "c", "d"]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RouteError::Solve(TspError::NotOptimal {
                status: SolutionStatus::TimeLimit,
                ..
            })
        ));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }
}
