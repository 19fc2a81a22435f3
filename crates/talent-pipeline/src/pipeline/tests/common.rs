use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::pipeline::domain::{
    Application, ApplicationId, ApplicationProjection, CandidateId, JobId, NewApplication,
};
use crate::pipeline::repository::{ApplicationRepository, RepositoryError};
use crate::pipeline::status::ApplicationStatus;
use crate::pipeline::{application_router, PipelineService};

pub(super) fn projection() -> ApplicationProjection {
    ApplicationProjection {
        candidate_name: "Maria Santos".to_string(),
        candidate_email: "maria.santos@example.com".to_string(),
        has_resume: true,
        ai_score: Some(82),
        skills: vec!["Customer Support".to_string(), "Zendesk".to_string()],
    }
}

pub(super) fn intake() -> NewApplication {
    NewApplication {
        candidate_id: CandidateId("cand-001".to_string()),
        job_id: JobId("job-csr-night".to_string()),
        agency_initiated: false,
        projection: projection(),
    }
}

pub(super) fn invited_intake() -> NewApplication {
    NewApplication {
        agency_initiated: true,
        ..intake()
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<BTreeMap<ApplicationId, Application>>>,
}

impl MemoryRepository {
    /// Overwrite the stored status directly, bypassing the service rules.
    pub(super) fn force_status(&self, id: &ApplicationId, status: ApplicationStatus) {
        let mut guard = self.records.lock().expect("lock");
        if let Some(application) = guard.get_mut(id) {
            application.status = status;
        }
    }
}

impl ApplicationRepository for MemoryRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update(
        &self,
        application: Application,
        expected_version: u64,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        match guard.get(&application.id) {
            None => Err(RepositoryError::NotFound),
            Some(stored) if stored.version != expected_version => Err(RepositoryError::Stale),
            Some(_) => {
                guard.insert(application.id.clone(), application);
                Ok(())
            }
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.get(id).cloned())
    }

    fn list(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard
            .values()
            .filter(|application| status.map_or(true, |wanted| application.status == wanted))
            .cloned()
            .collect())
    }
}

pub(super) struct ConflictRepository;

impl ApplicationRepository for ConflictRepository {
    fn insert(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(
        &self,
        _application: Application,
        _expected_version: u64,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(None)
    }

    fn list(
        &self,
        _status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(
        &self,
        _application: Application,
        _expected_version: u64,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(
        &self,
        _status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Holds every `fetch` at a barrier once armed, so two service calls read
/// the same snapshot before either writes.
pub(super) struct GatedRepository {
    pub(super) inner: MemoryRepository,
    armed: AtomicBool,
    barrier: Barrier,
}

impl GatedRepository {
    pub(super) fn new(inner: MemoryRepository, parties: usize) -> Self {
        Self {
            inner,
            armed: AtomicBool::new(false),
            barrier: Barrier::new(parties),
        }
    }

    pub(super) fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    pub(super) fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }
}

impl ApplicationRepository for GatedRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        self.inner.insert(application)
    }

    fn update(
        &self,
        application: Application,
        expected_version: u64,
    ) -> Result<(), RepositoryError> {
        self.inner.update(application, expected_version)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let found = self.inner.fetch(id);
        if self.armed.load(Ordering::SeqCst) {
            self.barrier.wait();
        }
        found
    }

    fn list(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, RepositoryError> {
        self.inner.list(status)
    }
}

pub(super) fn build_service() -> (PipelineService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = PipelineService::new(repository.clone());
    (service, repository)
}

pub(super) fn router_with_service(service: PipelineService<MemoryRepository>) -> axum::Router {
    application_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
