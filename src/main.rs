use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tspopt::{
    start_server, GoogleMapsDistanceProvider, ServerConfig, SolverBackend, SolverConfig,
};

/// Exact TSP route optimization over gRPC
#[derive(Parser)]
#[command(name = "tspopt-server")]
#[command(about = "Solves 3-10 stop round trips exactly with a MIP solver")]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:50051")]
    address: SocketAddr,

    /// MIP backend: auto, microlp, coin-cbc or highs
    #[arg(long, default_value = "auto")]
    backend: SolverBackend,

    /// Give up on a solve after this many seconds
    #[arg(long)]
    time_limit: Option<f64>,

    /// Google Maps API key used for the Distance Matrix API
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    google_maps_api_key: String,

    /// Travel mode for distance lookups
    #[arg(long, default_value = "driving")]
    travel_mode: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    if let Some(seconds) = cli.time_limit {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(format!("--time-limit must be positive, got {}", seconds).into());
        }
    }

    let provider = GoogleMapsDistanceProvider::new(cli.google_maps_api_key)?
        .with_mode(cli.travel_mode);

    let solver_config = SolverConfig {
        backend: cli.backend,
        time_limit: cli.time_limit,
        verbose: cli.verbose,
    };

    let config = ServerConfig::new(cli.address, Arc::new(provider)).with_solver_config(solver_config);
    start_server(config).await?;

    Ok(())
}
