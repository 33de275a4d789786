// Infrastructure: Server setup and configuration

use std::net::SocketAddr;
use std::sync::Arc;

use log::info;
use tonic::transport::Server;

use crate::application::mappers::route_optimizer::route_optimizer_server::RouteOptimizerServer;
use crate::application::{GrpcRouteService, RouteOptimizer};
use crate::domain::{
    distance_provider::DistanceProvider, models::SolverConfig, tsp::ExactTspSolver,
    value_objects::SolverBackend,
};
use crate::solver::SolverFactory;

pub struct ServerConfig {
    pub address: SocketAddr,
    pub solver_config: SolverConfig,
    pub provider: Arc<dyn DistanceProvider>,
}

impl ServerConfig {
    pub fn new(address: SocketAddr, provider: Arc<dyn DistanceProvider>) -> Self {
        Self {
            address,
            solver_config: SolverConfig::default(),
            provider,
        }
    }

    pub fn with_solver_config(mut self, solver_config: SolverConfig) -> Self {
        self.solver_config = solver_config;
        self
    }
}

pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let backend = match config.solver_config.backend {
        SolverBackend::Auto => SolverFactory::resolve_auto()?,
        backend => backend,
    };
    let solver = SolverFactory::create_from_backend(backend)?;
    if config.solver_config.time_limit.is_some() && !solver.supports_time_limit() {
        log::warn!("{} ignores the configured time limit", solver.name());
    }

    let exact = ExactTspSolver::new(solver).with_config(config.solver_config.clone());
    let service = GrpcRouteService::new(RouteOptimizer::new(config.provider.clone(), exact), backend);

    info!(
        "Route optimizer listening on {} (solver: {}, distances: {})",
        config.address,
        backend,
        config.provider.name()
    );

    Server::builder()
        .add_service(RouteOptimizerServer::new(service))
        .serve(config.address)
        .await?;

    Ok(())
}
