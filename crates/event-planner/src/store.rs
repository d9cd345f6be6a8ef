use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::envelope::{ArtifactKind, PlanningArtifact};

/// Stored form of a planning artifact with its body kept as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub artifact_id: String,
    pub event_id: String,
    pub kind: ArtifactKind,
    pub generated_at: DateTime<Utc>,
    pub payload: serde_json::Value,
}

impl ArtifactRecord {
    pub fn from_artifact<T: Serialize>(
        artifact: &PlanningArtifact<T>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            artifact_id: artifact.artifact_id.clone(),
            event_id: artifact.event_id.clone(),
            kind: artifact.kind,
            generated_at: artifact.generated_at,
            payload: serde_json::to_value(&artifact.body)?,
        })
    }

    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            artifact_id: self.artifact_id.clone(),
            kind: self.kind.label(),
            generated_at: self.generated_at,
        }
    }
}

/// Storage abstraction so the planning service can be exercised in isolation.
pub trait ArtifactRepository: Send + Sync {
    fn insert(&self, record: ArtifactRecord) -> Result<ArtifactRecord, RepositoryError>;
    fn fetch(&self, artifact_id: &str) -> Result<Option<ArtifactRecord>, RepositoryError>;
    fn list_for_event(&self, event_id: &str) -> Result<Vec<ArtifactRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Listing entry for an event's artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactSummary {
    pub artifact_id: String,
    pub kind: &'static str,
    pub generated_at: DateTime<Utc>,
}
