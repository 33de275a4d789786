// Port for whatever turns location names into travel costs

use super::distance::{DistanceMatrix, MatrixError};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Distance request failed: {0}")]
    Request(String),

    #[error("Distance service returned {status}: {message}")]
    Api { status: String, message: String },

    #[error("Provider has {available} locations but {requested} were requested")]
    LocationCountMismatch { requested: usize, available: usize },

    #[error("Provider returned an unusable matrix: {0}")]
    InvalidMatrix(#[from] MatrixError),
}

/// Source of distance matrices, consulted once per route request.
///
/// Implementations are constructed explicitly and shared behind an `Arc`.
#[tonic::async_trait]
pub trait DistanceProvider: Send + Sync {
    /// Square matrix whose row/column order matches `locations`
    async fn distance_matrix(
        &self,
        locations: &[String],
    ) -> std::result::Result<DistanceMatrix, ProviderError>;

    fn name(&self) -> &str;
}

/// Serves one pre-computed matrix regardless of the location names.
pub struct StaticDistanceProvider {
    matrix: DistanceMatrix,
}

impl StaticDistanceProvider {
    pub fn new(matrix: DistanceMatrix) -> Self {
        Self { matrix }
    }
}

#[tonic::async_trait]
impl DistanceProvider for StaticDistanceProvider {
    async fn distance_matrix(
        &self,
        locations: &[String],
    ) -> std::result::Result<DistanceMatrix, ProviderError> {
        if locations.len() != self.matrix.size() {
            return Err(ProviderError::LocationCountMismatch {
                requested: locations.len(),
                available: self.matrix.size(),
            });
        }
        Ok(self.matrix.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}
