// Domain module: TSP model, tours and the ports to solvers and distance sources

pub mod distance;
pub mod distance_provider;
pub mod models;
pub mod solver_service;
pub mod tour;
pub mod tsp;
pub mod value_objects;

pub use distance::*;
pub use distance_provider::*;
pub use models::*;
pub use solver_service::*;
pub use tour::*;
pub use tsp::*;
pub use value_objects::*;
