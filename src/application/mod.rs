// Application layer: use cases and the gRPC boundary

pub mod route_service;

#[cfg(feature = "server")]
pub mod grpc_service;
#[cfg(feature = "server")]
pub mod mappers;

pub use route_service::{OptimizedRoute, RouteError, RouteOptimizer, MAX_LOCATIONS, MIN_LOCATIONS};

#[cfg(feature = "server")]
pub use grpc_service::GrpcRouteService;
