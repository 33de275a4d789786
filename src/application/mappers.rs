// Mappers: Convert between gRPC protobuf types and domain models
// Keeps tonic/prost types out of the domain layer

use crate::domain::{
    distance::DistanceMatrix,
    distance_provider::ProviderError,
    tsp::{TspError, TspSolution},
    value_objects::{SolutionStatus, SolverBackend},
};
use tonic::Status;

use super::route_service::{OptimizedRoute, RouteError};

pub mod route_optimizer {
    tonic::include_proto!("route_optimizer");
}

use route_optimizer as proto;

/// Convert protobuf matrix rows to a validated domain matrix
pub fn proto_to_domain_matrix(rows: Vec<proto::MatrixRow>) -> Result<DistanceMatrix, Status> {
    DistanceMatrix::from_rows(rows.into_iter().map(|r| r.values).collect())
        .map_err(|e| Status::invalid_argument(e.to_string()))
}

/// Validate an optional per-request time limit
pub fn proto_to_time_limit(seconds: Option<f64>) -> Result<Option<f64>, Status> {
    match seconds {
        Some(s) if !s.is_finite() || s <= 0.0 => Err(Status::invalid_argument(format!(
            "time_limit_seconds must be positive, got {}",
            s
        ))),
        other => Ok(other),
    }
}

fn domain_to_proto_status(status: SolutionStatus) -> proto::SolutionStatus {
    match status {
        SolutionStatus::Optimal => proto::SolutionStatus::Optimal,
        SolutionStatus::OptimalInaccurate => proto::SolutionStatus::OptimalInaccurate,
        _ => proto::SolutionStatus::Unknown,
    }
}

fn indices_to_proto(indices: &[usize]) -> Vec<u32> {
    indices.iter().map(|&i| i as u32).collect()
}

/// Convert a solved route to the OptimizeRoute response
pub fn domain_to_proto_route(route: OptimizedRoute) -> proto::OptimizeRouteResponse {
    proto::OptimizeRouteResponse {
        tour_indices: indices_to_proto(&route.tour_indices),
        optimized_route: route.optimized_route,
        total_distance: route.total_distance,
    }
}

/// Convert an exact TSP solution to the SolveMatrix response
pub fn domain_to_proto_solution(
    solution: TspSolution,
    solver_name: &str,
) -> proto::SolveMatrixResponse {
    proto::SolveMatrixResponse {
        tour: indices_to_proto(solution.tour.nodes()),
        total_distance: solution.total_distance,
        status: domain_to_proto_status(solution.status) as i32,
        solver_backend: solver_name.to_string(),
        solve_time_ms: solution.statistics.solve_time_ms,
    }
}

pub fn domain_to_proto_solver_info(backend: SolverBackend, supports_time_limit: bool) -> proto::SolverInfo {
    proto::SolverInfo {
        name: backend.to_string(),
        backend: backend.key().to_string(),
        supports_mip: true,
        supports_time_limit,
    }
}

pub fn tsp_error_to_status(error: TspError) -> Status {
    match error {
        TspError::InvalidInput(_) => Status::invalid_argument(error.to_string()),
        TspError::NotOptimal { .. } => Status::failed_precondition(error.to_string()),
        TspError::ReconstructionInconsistency(_) => Status::internal(error.to_string()),
    }
}

pub fn route_error_to_status(error: RouteError) -> Status {
    match error {
        RouteError::InvalidLocationCount { .. } => Status::invalid_argument(error.to_string()),
        RouteError::Provider(ProviderError::InvalidMatrix(_)) => {
            Status::internal(error.to_string())
        }
        RouteError::Provider(_) => Status::unavailable(error.to_string()),
        RouteError::Solve(e) => tsp_error_to_status(e),
        RouteError::Worker(_) => Status::internal(error.to_string()),
    }
}
