// Domain layer: distance matrices, tours, the MTZ formulation and its ports
pub mod domain;

// Application layer: route optimization use case and gRPC service
pub mod application;

// Infrastructure layer: distance providers and server setup
pub mod infrastructure;

// Solver adapters: concrete implementations of SolverService
pub mod solver;

// Re-export commonly used types
pub use domain::{
    reconstruct_tour, solve_exact_tsp, DistanceMatrix, DistanceProvider, EdgeSelection,
    ExactTspSolver, MatrixError, ProviderError, ReconstructionError, SolutionStatus,
    SolverBackend, SolverConfig, SolverError, SolverService, StaticDistanceProvider, Tour,
    TspError, TspSolution,
};

pub use application::{OptimizedRoute, RouteError, RouteOptimizer};

#[cfg(feature = "server")]
pub use infrastructure::{start_server, ServerConfig};

#[cfg(feature = "google-maps")]
pub use infrastructure::GoogleMapsDistanceProvider;

pub use solver::SolverFactory;

#[cfg(feature = "coin_cbc")]
pub use solver::CoinCbcSolver;
#[cfg(feature = "highs")]
pub use solver::HighsSolver;
#[cfg(feature = "microlp")]
pub use solver::MicroLpSolver;
