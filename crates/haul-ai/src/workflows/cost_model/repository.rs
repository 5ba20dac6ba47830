use super::settings::{CostModelSettings, DriverId};

/// Storage abstraction for per-driver cost models; the engine never persists on its own.
pub trait CostModelRepository: Send + Sync {
    fn fetch(&self, driver: &DriverId) -> Result<Option<CostModelSettings>, RepositoryError>;
    fn save(&self, driver: &DriverId, settings: CostModelSettings) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("cost model not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
