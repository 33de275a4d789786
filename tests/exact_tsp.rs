#![cfg(feature = "microlp")]

use std::sync::Arc;

use proptest::prelude::*;
use tspopt::{
    solve_exact_tsp, DistanceMatrix, ExactTspSolver, MicroLpSolver, SolverService, TspSolution,
};

const EPS: f64 = 1e-6;

fn backend() -> Arc<dyn SolverService> {
    Arc::new(MicroLpSolver::new())
}

fn euclidean(points: &[(f64, f64)]) -> DistanceMatrix {
    let rows = points
        .iter()
        .map(|&(x1, y1)| {
            points
                .iter()
                .map(|&(x2, y2)| ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt())
                .collect()
        })
        .collect();
    DistanceMatrix::from_rows(rows).unwrap()
}

/// Cheapest closed tour by enumerating every ordering of nodes 1..n.
fn brute_force_cost(matrix: &DistanceMatrix) -> f64 {
    fn extend(
        matrix: &DistanceMatrix,
        current: usize,
        remaining: &mut Vec<usize>,
        cost: f64,
        best: &mut f64,
    ) {
        if remaining.is_empty() {
            *best = best.min(cost + matrix.get(current, 0));
            return;
        }
        for k in 0..remaining.len() {
            let next = remaining.remove(k);
            extend(matrix, next, remaining, cost + matrix.get(current, next), best);
            remaining.insert(k, next);
        }
    }

    let mut remaining: Vec<usize> = (1..matrix.size()).collect();
    let mut best = f64::INFINITY;
    extend(matrix, 0, &mut remaining, 0.0, &mut best);
    best
}

fn assert_hamiltonian(solution: &TspSolution, matrix: &DistanceMatrix) {
    let n = matrix.size();
    let nodes = solution.tour.nodes();

    assert_eq!(nodes.len(), n + 1);
    assert_eq!(nodes[0], 0);
    assert_eq!(nodes[n], 0);

    let mut interior = nodes[..n].to_vec();
    interior.sort_unstable();
    assert_eq!(interior, (0..n).collect::<Vec<_>>());

    let walked = solution.tour.distance_in(matrix);
    assert!(
        (walked - solution.total_distance).abs() < EPS,
        "tour walks {} but reported {}",
        walked,
        solution.total_distance
    );
}

#[test]
fn unit_square_takes_the_perimeter() {
    let matrix = euclidean(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    let solution = solve_exact_tsp(&matrix, backend()).unwrap();

    assert_hamiltonian(&solution, &matrix);
    assert!((solution.total_distance - 4.0).abs() < EPS);
    assert_eq!(solution.tour.nodes(), &[0, 1, 2, 3, 0]);
}

#[test]
fn triangle_has_its_only_cycle() {
    let matrix = DistanceMatrix::from_rows(vec![
        vec![0.0, 1.0, 2.0],
        vec![1.0, 0.0, 3.0],
        vec![2.0, 3.0, 0.0],
    ])
    .unwrap();
    let solution = solve_exact_tsp(&matrix, backend()).unwrap();

    assert_hamiltonian(&solution, &matrix);
    assert!((solution.total_distance - 6.0).abs() < EPS);
    assert_eq!(solution.tour.nodes(), &[0, 1, 2, 0]);
}

#[test]
fn asymmetric_instance_respects_direction() {
    // Going around 0 -> 1 -> 2 -> 3 -> 0 costs 4, the reverse costs 40
    let matrix = DistanceMatrix::from_rows(vec![
        vec![0.0, 1.0, 10.0, 10.0],
        vec![10.0, 0.0, 1.0, 10.0],
        vec![10.0, 10.0, 0.0, 1.0],
        vec![1.0, 10.0, 10.0, 0.0],
    ])
    .unwrap();
    let solution = solve_exact_tsp(&matrix, backend()).unwrap();

    assert_hamiltonian(&solution, &matrix);
    assert!((solution.total_distance - 4.0).abs() < EPS);
    assert_eq!(solution.tour.nodes(), &[0, 1, 2, 3, 0]);
}

#[test]
fn crossing_diagonals_are_avoided() {
    // Hexagon listed in an interleaved order
    let points = [
        (1.0, 0.0),
        (-0.5, -0.866),
        (0.5, 0.866),
        (-1.0, 0.0),
        (0.5, -0.866),
        (-0.5, 0.866),
    ];
    let matrix = euclidean(&points);
    let solution = solve_exact_tsp(&matrix, backend()).unwrap();

    assert_hamiltonian(&solution, &matrix);
    assert!((solution.total_distance - brute_force_cost(&matrix)).abs() < EPS);
    assert_eq!(solution.tour.nodes(), &[0, 2, 5, 3, 1, 4, 0]);
}

#[test]
fn symmetric_cost_is_direction_free() {
    let matrix = euclidean(&[(0.0, 0.0), (4.0, 1.0), (5.0, 5.0), (1.0, 6.0), (2.0, 3.0)]);
    let solution = solve_exact_tsp(&matrix, backend()).unwrap();

    let forward = solution.tour.distance_in(&matrix);
    let backward = solution.tour.reversed().distance_in(&matrix);
    assert!((forward - backward).abs() < EPS);
    assert!(solution.tour.nodes()[1] < solution.tour.nodes()[4]);
}

#[test]
fn solving_twice_gives_the_same_answer() {
    let matrix = euclidean(&[(0.0, 0.0), (3.0, 0.0), (3.0, 2.0), (1.0, 4.0), (-1.0, 2.0)]);
    let solver = ExactTspSolver::new(backend());

    let first = solver.solve(&matrix).unwrap();
    let second = solver.solve(&matrix).unwrap();
    assert!((first.total_distance - second.total_distance).abs() < EPS);
    assert_eq!(first.tour, second.tour);
}

#[test]
fn concurrent_solves_are_independent() {
    let solver = ExactTspSolver::new(backend());
    let square = euclidean(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    let wide = euclidean(&[(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 1.0)]);

    let handles: Vec<_> = [square, wide]
        .into_iter()
        .map(|matrix| {
            let solver = solver.clone();
            std::thread::spawn(move || solver.solve(&matrix).map(|s| s.total_distance))
        })
        .collect();
    let costs: Vec<f64> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();

    assert!((costs[0] - 4.0).abs() < EPS);
    assert!((costs[1] - 6.0).abs() < EPS);
}

fn small_matrix() -> impl Strategy<Value = DistanceMatrix> {
    (3usize..=6).prop_flat_map(|n| {
        prop::collection::vec(1u32..100, n * n).prop_map(move |values| {
            DistanceMatrix::from_data(n, values.into_iter().map(f64::from).collect()).unwrap()
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn matches_brute_force(matrix in small_matrix()) {
        let solution = solve_exact_tsp(&matrix, backend()).unwrap();
        let n = matrix.size();

        prop_assert_eq!(solution.tour.len(), n + 1);
        let mut seen = solution.tour.nodes()[..n].to_vec();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..n).collect::<Vec<_>>());

        prop_assert!((solution.tour.distance_in(&matrix) - solution.total_distance).abs() < EPS);
        prop_assert!((solution.total_distance - brute_force_cost(&matrix)).abs() < EPS);
    }
}
