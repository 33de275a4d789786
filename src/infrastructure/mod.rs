// Infrastructure layer: external distance sources and the server lifecycle

pub mod google_maps;

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "google-maps")]
pub use google_maps::GoogleMapsDistanceProvider;
pub use google_maps::{join_places, parse_distance_matrix, DistanceMatrixResponse};

#[cfg(feature = "server")]
pub use server::{start_server, ServerConfig};
