use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use talent_pipeline::pipeline::{
    Application, ApplicationId, ApplicationRepository, ApplicationStatus, RepositoryError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<BTreeMap<ApplicationId, Application>>>,
}

impl InMemoryApplicationRepository {
    fn records(
        &self,
    ) -> Result<MutexGuard<'_, BTreeMap<ApplicationId, Application>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records()?;
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
        let mut guard = self.records()?;
        match guard.get_mut(&application.id) {
            None => Err(RepositoryError::NotFound),
            Some(stored) if stored.version != expected_version => Err(RepositoryError::Stale),
            Some(stored) => {
                *stored = application;
                Ok(())
            }
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(self.records()?.get(id).cloned())
    }

    fn list(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records()?;
        let mut applications: Vec<Application> = guard
            .values()
            .filter(|application| status.map_or(true, |wanted| application.status == wanted))
            .cloned()
            .collect();
        applications.sort_by_key(|application| application.applied_at);
        Ok(applications)
    }
}
