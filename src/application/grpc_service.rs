use tonic::{Request, Response, Status};

use super::mappers::{self, route_optimizer};
use super::route_service::RouteOptimizer;
use crate::domain::value_objects::SolverBackend;
use crate::solver::SolverFactory;

/// gRPC service implementation
pub struct GrpcRouteService {
    optimizer: RouteOptimizer,
    backend: SolverBackend,
}

impl GrpcRouteService {
    pub fn new(optimizer: RouteOptimizer, backend: SolverBackend) -> Self {
        Self { optimizer, backend }
    }
}

#[tonic::async_trait]
impl route_optimizer::route_optimizer_server::RouteOptimizer for GrpcRouteService {
    async fn optimize_route(
        &self,
        request: Request<route_optimizer::OptimizeRouteRequest>,
    ) -> Result<Response<route_optimizer::OptimizeRouteResponse>, Status> {
        let locations = request.into_inner().locations;
        log::info!("OptimizeRoute: {:?}", locations);

        let route = self
            .optimizer
            .optimize_route(locations)
            .await
            .map_err(|e| {
                log::warn!("OptimizeRoute failed: {}", e);
                mappers::route_error_to_status(e)
            })?;

        Ok(Response::new(mappers::domain_to_proto_route(route)))
    }

    async fn solve_matrix(
        &self,
        request: Request<route_optimizer::SolveMatrixRequest>,
    ) -> Result<Response<route_optimizer::SolveMatrixResponse>, Status> {
        let request = request.into_inner();
        let matrix = mappers::proto_to_domain_matrix(request.rows)?;
        let time_limit = mappers::proto_to_time_limit(request.time_limit_seconds)?;
        log::info!("SolveMatrix: {} nodes", matrix.size());

        let mut solver = self.optimizer.solver().clone();
        if let Some(seconds) = time_limit {
            solver = solver.with_time_limit(seconds);
        }
        let solver_name = solver.backend_name().to_string();

        let solution = tokio::task::spawn_blocking(move || solver.solve(&matrix))
            .await
            .map_err(|e| Status::internal(format!("Solver worker failed: {}", e)))?
            .map_err(|e| {
                log::warn!("SolveMatrix failed: {}", e);
                mappers::tsp_error_to_status(e)
            })?;

        Ok(Response::new(mappers::domain_to_proto_solution(
            solution,
            &solver_name,
        )))
    }

    async fn get_available_solvers(
        &self,
        _request: Request<route_optimizer::Empty>,
    ) -> Result<Response<route_optimizer::AvailableSolvers>, Status> {
        let solvers = SolverFactory::available_backends()
            .into_iter()
            .filter_map(|backend| {
                SolverFactory::create_from_backend(backend)
                    .ok()
                    .map(|s| mappers::domain_to_proto_solver_info(backend, s.supports_time_limit()))
            })
            .collect();

        Ok(Response::new(route_optimizer::AvailableSolvers {
            solvers,
            default_backend: self.backend.key().to_string(),
        }))
    }
}
