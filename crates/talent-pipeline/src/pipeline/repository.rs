use super::domain::{Application, ApplicationId};
use super::status::ApplicationStatus;

/// Storage abstraction so the service can be exercised in isolation.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    /// Replace the stored record only while its version still equals
    /// `expected_version`; otherwise fail with [`RepositoryError::Stale`].
    fn update(
        &self,
        application: Application,
        expected_version: u64,
    ) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    /// Applications in `status`, or all of them when `None`, oldest first.
    fn list(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("application already exists")]
    Conflict,
    #[error("application not found")]
    NotFound,
    #[error("application changed since it was read; reload and retry")]
    Stale,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
