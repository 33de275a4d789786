//! Rounded edge selections and the closed tours rebuilt from them.

use super::distance::DistanceMatrix;

/// Rounded solver output that does not describe a single Hamiltonian cycle.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReconstructionError {
    #[error("edge selection is empty")]
    Empty,

    #[error("edge selection has {len} values, expected {expected}")]
    WrongLength { len: usize, expected: usize },

    #[error("x[{from}][{to}] = {value} does not round to 0 or 1")]
    NonBinaryValue { from: usize, to: usize, value: f64 },

    #[error("node {node} selects itself")]
    SelfLoop { node: usize },

    #[error("node {node} has {outgoing} outgoing and {incoming} incoming edges, expected 1 and 1")]
    DegreeViolation {
        node: usize,
        outgoing: usize,
        incoming: usize,
    },

    #[error("no unvisited successor of node {node} after visiting {visited} of {size} nodes")]
    DeadEnd {
        node: usize,
        visited: usize,
        size: usize,
    },

    #[error("tour ends at node {last} which has no edge back to node 0")]
    NotClosed { last: usize },
}

/// An n×n 0/1 matrix where `is_selected(i, j)` means the tour goes directly from `i` to `j`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeSelection {
    data: Vec<u8>,
    size: usize,
}

impl EdgeSelection {
    /// Rounds real-valued solver output to the nearest integer.
    ///
    /// Only the rounded value is trusted afterwards; anything that does not
    /// round to 0 or 1 is rejected.
    pub fn from_relaxed_values(size: usize, values: &[f64]) -> Result<Self, ReconstructionError> {
        if size == 0 {
            return Err(ReconstructionError::Empty);
        }
        if values.len() != size * size {
            return Err(ReconstructionError::WrongLength {
                len: values.len(),
                expected: size * size,
            });
        }

        let mut data = Vec::with_capacity(size * size);
        for (pos, &value) in values.iter().enumerate() {
            let rounded = value.round();
            if rounded == 0.0 {
                data.push(0);
            } else if rounded == 1.0 {
                data.push(1);
            } else {
                return Err(ReconstructionError::NonBinaryValue {
                    from: pos / size,
                    to: pos % size,
                    value,
                });
            }
        }

        Ok(Self { data, size })
    }

    /// Selection containing exactly the listed `(from, to)` edges.
    ///
    /// # Panics
    ///
    /// Panics if an endpoint is out of bounds.
    pub fn from_edges(size: usize, edges: &[(usize, usize)]) -> Self {
        let mut data = vec![0; size * size];
        for &(from, to) in edges {
            data[from * size + to] = 1;
        }
        Self { data, size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_selected(&self, from: usize, to: usize) -> bool {
        self.data[from * self.size + to] == 1
    }

    pub fn out_degree(&self, node: usize) -> usize {
        (0..self.size).filter(|&j| self.is_selected(node, j)).count()
    }

    pub fn in_degree(&self, node: usize) -> usize {
        (0..self.size).filter(|&i| self.is_selected(i, node)).count()
    }

    /// Exactly one outgoing and one incoming edge per node, no self-loops.
    pub fn check_degrees(&self) -> Result<(), ReconstructionError> {
        for node in 0..self.size {
            if self.is_selected(node, node) {
                return Err(ReconstructionError::SelfLoop { node });
            }
            let outgoing = self.out_degree(node);
            let incoming = self.in_degree(node);
            if outgoing != 1 || incoming != 1 {
                return Err(ReconstructionError::DegreeViolation {
                    node,
                    outgoing,
                    incoming,
                });
            }
        }
        Ok(())
    }

    /// Sum of `distance[i][j]` over every selected edge.
    pub fn total_distance(&self, distances: &DistanceMatrix) -> f64 {
        let mut total = 0.0;
        for i in 0..self.size {
            for j in 0..self.size {
                if self.is_selected(i, j) {
                    total += distances.get(i, j);
                }
            }
        }
        total
    }
}

/// Closed tour: starts and ends at node 0 and visits every other node once in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour(Vec<usize>);

impl Tour {
    pub fn nodes(&self) -> &[usize] {
        &self.0
    }

    /// Number of entries, including the repeated start node.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct locations visited.
    pub fn num_locations(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Sum of the distances between consecutive entries.
    pub fn distance_in(&self, distances: &DistanceMatrix) -> f64 {
        self.0
            .windows(2)
            .map(|pair| distances.get(pair[0], pair[1]))
            .sum()
    }

    /// Same cycle, traversed in the opposite direction.
    pub fn reversed(&self) -> Tour {
        let mut nodes = self.0.clone();
        nodes.reverse();
        Tour(nodes)
    }

    /// Picks the direction in which the second node is smaller than the
    /// second-to-last one. Only meaningful when both directions cost the same.
    pub fn with_canonical_orientation(self) -> Tour {
        let n = self.0.len();
        if n > 3 && self.0[1] > self.0[n - 2] {
            self.reversed()
        } else {
            self
        }
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }
}

impl AsRef<[usize]> for Tour {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

/// Follows selected edges from node 0 until every node has been visited.
///
/// At each step the first column (in index order) with a selected edge to a
/// node not yet in the tour is taken. A selection that runs out of unvisited
/// successors early, or whose last node does not lead back to 0, is reported
/// as an error instead of yielding a shortened tour.
pub fn reconstruct_tour(edges: &EdgeSelection) -> Result<Tour, ReconstructionError> {
    let size = edges.size();
    if size == 0 {
        return Err(ReconstructionError::Empty);
    }

    let mut visited = vec![false; size];
    let mut nodes = Vec::with_capacity(size + 1);
    let mut current = 0;
    visited[current] = true;
    nodes.push(current);

    for _ in 1..size {
        let next = (0..size).find(|&j| edges.is_selected(current, j) && !visited[j]);
        match next {
            Some(j) => {
                visited[j] = true;
                nodes.push(j);
                current = j;
            }
            None => {
                return Err(ReconstructionError::DeadEnd {
                    node: current,
                    visited: nodes.len(),
                    size,
                })
            }
        }
    }

    if size > 1 && !edges.is_selected(current, 0) {
        return Err(ReconstructionError::NotClosed { last: current });
    }

    nodes.push(0);
    Ok(Tour(nodes))
}
