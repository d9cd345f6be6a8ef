use event_planner::config::AppConfig;
use event_planner::envelope::UuidIdentityProvider;
use event_planner::error::AppError;
use event_planner::planning::PlanningService;
use event_planner::store::{ArtifactRecord, ArtifactRepository, RepositoryError};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type ApiPlanningService = PlanningService<InMemoryArtifactRepository, UuidIdentityProvider>;

/// Artifacts kept in insertion order for the lifetime of the process.
#[derive(Default, Clone)]
pub(crate) struct InMemoryArtifactRepository {
    records: Arc<Mutex<Vec<ArtifactRecord>>>,
}

impl InMemoryArtifactRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Vec<ArtifactRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl ArtifactRepository for InMemoryArtifactRepository {
    fn insert(&self, record: ArtifactRecord) -> Result<ArtifactRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard
            .iter()
            .any(|existing| existing.artifact_id == record.artifact_id)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, artifact_id: &str) -> Result<Option<ArtifactRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .iter()
            .find(|record| record.artifact_id == artifact_id)
            .cloned())
    }

    fn list_for_event(&self, event_id: &str) -> Result<Vec<ArtifactRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .iter()
            .filter(|record| record.event_id == event_id)
            .cloned()
            .collect())
    }
}

pub(crate) fn build_service(config: &AppConfig) -> Result<ApiPlanningService, AppError> {
    let service = PlanningService::new(
        Arc::new(InMemoryArtifactRepository::default()),
        Arc::new(UuidIdentityProvider),
        config.planning.planner_settings(),
    )?;
    Ok(service)
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let parsed = serde_json::from_str(&raw)?;
    Ok(parsed)
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use event_planner::envelope::ArtifactKind;
    use serde_json::json;

    fn record(artifact_id: &str, event_id: &str) -> ArtifactRecord {
        ArtifactRecord {
            artifact_id: artifact_id.to_string(),
            event_id: event_id.to_string(),
            kind: ArtifactKind::VendorEvaluation,
            generated_at: Utc::now(),
            payload: json!({}),
        }
    }

    #[test]
    fn rejects_duplicate_artifact_ids() {
        let repository = InMemoryArtifactRepository::default();
        repository.insert(record("a-1", "evt")).expect("first insert");

        let duplicate = repository.insert(record("a-1", "evt"));

        assert!(matches!(duplicate, Err(RepositoryError::Conflict)));
    }

    #[test]
    fn lists_in_insertion_order_per_event() {
        let repository = InMemoryArtifactRepository::default();
        for (id, event) in [("a-2", "evt"), ("a-1", "evt"), ("b-1", "other")] {
            repository.insert(record(id, event)).expect("insert");
        }

        let listed: Vec<_> = repository
            .list_for_event("evt")
            .expect("lists")
            .into_iter()
            .map(|record| record.artifact_id)
            .collect();

        assert_eq!(listed, vec!["a-2", "a-1"]);
    }
}
