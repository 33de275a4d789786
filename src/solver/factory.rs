use crate::domain::{
    solver_service::{Result, SolverError, SolverService},
    value_objects::SolverBackend,
};
use std::sync::Arc;

/// Factory for creating solver instances from a configured backend
pub struct SolverFactory;

impl SolverFactory {
    /// Create a solver for a specific backend
    ///
    /// `Auto` resolves to the first compiled backend in `SolverBackend::ALL`.
    pub fn create_from_backend(backend: SolverBackend) -> Result<Arc<dyn SolverService>> {
        match backend {
            SolverBackend::Auto => Self::create_from_backend(Self::resolve_auto()?),
            #[cfg(feature = "microlp")]
            SolverBackend::MicroLp => Ok(Arc::new(super::MicroLpSolver::new())),
            #[cfg(feature = "coin_cbc")]
            SolverBackend::CoinCbc => Ok(Arc::new(super::CoinCbcSolver::new())),
            #[cfg(feature = "highs")]
            SolverBackend::Highs => Ok(Arc::new(super::HighsSolver::new())),
            #[allow(unreachable_patterns)]
            other => Err(SolverError::SolverNotAvailable(format!(
                "{} was not compiled into this build (enable the '{}' feature)",
                other,
                other.key().replace('-', "_")
            ))),
        }
    }

    /// Backend `Auto` stands for in this build
    pub fn resolve_auto() -> Result<SolverBackend> {
        SolverBackend::ALL
            .iter()
            .copied()
            .find(|b| b.is_compiled())
            .ok_or_else(|| {
                SolverError::SolverNotAvailable(
                    "no MIP backend compiled in (enable microlp, coin_cbc or highs)".to_string(),
                )
            })
    }

    /// Get the default solver
    pub fn default_solver() -> Result<Arc<dyn SolverService>> {
        Self::create_from_backend(SolverBackend::Auto)
    }

    /// Backends usable in this build, strongest first
    pub fn available_backends() -> Vec<SolverBackend> {
        SolverBackend::ALL
            .iter()
            .copied()
            .filter(|b| b.is_compiled())
            .collect()
    }
}
