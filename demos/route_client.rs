// Example: solving a five-stop delivery round exactly
//
// SolveMatrix sends the distances directly; OptimizeRoute lets the server
// look them up by name (needs a server started with a Google Maps key).
//
// Distances in km between a depot and four shops:
//
//           Depot  Bakery  Market  Harbour  Station
// Depot       0      4       9       7        3
// Bakery      4      0       5       8        6
// Market      9      5       0       3        7
// Harbour     7      8       3       0        5
// Station     3      6       7       5        0

use tonic::Request;

pub mod route_optimizer {
    tonic::include_proto!("route_optimizer");
}

use route_optimizer::{
    route_optimizer_client::RouteOptimizerClient, Empty, MatrixRow, OptimizeRouteRequest,
    SolveMatrixRequest, SolutionStatus,
};

const STOPS: [&str; 5] = ["Depot", "Bakery", "Market", "Harbour", "Station"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = RouteOptimizerClient::connect("http://127.0.0.1:50051").await?;

    let solvers = client
        .get_available_solvers(Request::new(Empty {}))
        .await?
        .into_inner();
    println!("Server default backend: {}", solvers.default_backend);
    for solver in &solvers.solvers {
        println!(
            "  - {} (time limit: {})",
            solver.name,
            if solver.supports_time_limit { "yes" } else { "no" }
        );
    }

    let distances = [
        [0.0, 4.0, 9.0, 7.0, 3.0],
        [4.0, 0.0, 5.0, 8.0, 6.0],
        [9.0, 5.0, 0.0, 3.0, 7.0],
        [7.0, 8.0, 3.0, 0.0, 5.0],
        [3.0, 6.0, 7.0, 5.0, 0.0],
    ];
    let request = SolveMatrixRequest {
        rows: distances
            .iter()
            .map(|row| MatrixRow {
                values: row.to_vec(),
            })
            .collect(),
        time_limit_seconds: Some(10.0),
    };

    let response = client.solve_matrix(Request::new(request)).await?.into_inner();
    let status = SolutionStatus::try_from(response.status).unwrap_or(SolutionStatus::Unknown);
    let names: Vec<&str> = response.tour.iter().map(|&i| STOPS[i as usize]).collect();

    println!("\n=== SolveMatrix ===");
    println!("Status:   {:?} ({})", status, response.solver_backend);
    println!("Route:    {}", names.join(" -> "));
    println!("Distance: {:.1} km", response.total_distance);
    println!("Time:     {:.2} ms", response.solve_time_ms);

    let addresses = vec![
        "Brandenburger Tor, Berlin".to_string(),
        "Alexanderplatz, Berlin".to_string(),
        "Checkpoint Charlie, Berlin".to_string(),
        "Tempelhofer Feld, Berlin".to_string(),
    ];
    println!("\n=== OptimizeRoute ===");
    match client
        .optimize_route(Request::new(OptimizeRouteRequest {
            locations: addresses,
        }))
        .await
    {
        Ok(response) => {
            let route = response.into_inner();
            println!("Route:    {}", route.optimized_route.join(" -> "));
            println!("Indices:  {:?}", route.tour_indices);
            println!("Distance: {:.1} km", route.total_distance);
        }
        Err(status) => println!("Route lookup failed: {} ({:?})", status.message(), status.code()),
    }

    Ok(())
}
