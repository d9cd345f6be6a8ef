use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::goals::{Goal, GoalPrioritization, GoalPrioritizer};
use super::kpis::{Kpi, KpiDashboard, PerformanceMonitor};
use super::stakeholders::{Stakeholder, StakeholderPrioritization, StakeholderPrioritizer};
use super::vendors::{
    CriteriaWeights, ServiceRequirements, VendorCandidate, VendorEvaluation, VendorEvaluator,
};
use super::PlannerSettings;
use crate::engine::EngineError;
use crate::envelope::{ArtifactKind, IdentityProvider, PlanningArtifact};
use crate::store::{ArtifactRecord, ArtifactRepository, ArtifactSummary, RepositoryError};

/// Service composing the planners, the identity provider and the artifact
/// repository.
pub struct PlanningService<R, P> {
    repository: Arc<R>,
    identity: Arc<P>,
    goals: GoalPrioritizer,
    stakeholders: StakeholderPrioritizer,
    kpis: PerformanceMonitor,
    vendors: VendorEvaluator,
}

impl<R, P> PlanningService<R, P>
where
    R: ArtifactRepository + 'static,
    P: IdentityProvider + 'static,
{
    pub fn new(
        repository: Arc<R>,
        identity: Arc<P>,
        settings: PlannerSettings,
    ) -> Result<Self, PlanningServiceError> {
        Ok(Self {
            repository,
            identity,
            goals: GoalPrioritizer::new(settings.goals)?,
            stakeholders: StakeholderPrioritizer::new(settings.stakeholders)?,
            kpis: PerformanceMonitor::new(settings.thresholds)?,
            vendors: VendorEvaluator::new(settings.vendors)?,
        })
    }

    pub fn prioritize_goals(
        &self,
        event_id: &str,
        goals: &[Goal],
    ) -> Result<PlanningArtifact<GoalPrioritization>, PlanningServiceError> {
        let body = self.goals.prioritize(goals)?;
        self.publish(event_id, ArtifactKind::GoalPrioritization, body)
    }

    pub fn prioritize_stakeholders(
        &self,
        event_id: &str,
        stakeholders: &[Stakeholder],
    ) -> Result<PlanningArtifact<StakeholderPrioritization>, PlanningServiceError> {
        let body = self.stakeholders.prioritize(stakeholders)?;
        self.publish(event_id, ArtifactKind::StakeholderPrioritization, body)
    }

    pub fn monitor_kpis(
        &self,
        event_id: &str,
        kpis: &[Kpi],
    ) -> Result<PlanningArtifact<KpiDashboard>, PlanningServiceError> {
        let body = self.kpis.monitor(kpis)?;
        self.publish(event_id, ArtifactKind::PerformanceMonitoring, body)
    }

    pub fn evaluate_vendors(
        &self,
        event_id: &str,
        candidates: &[VendorCandidate],
        requirements: &ServiceRequirements,
        weights: Option<&CriteriaWeights>,
    ) -> Result<PlanningArtifact<VendorEvaluation>, PlanningServiceError> {
        let body = self.vendors.evaluate(candidates, requirements, weights)?;
        self.publish(event_id, ArtifactKind::VendorEvaluation, body)
    }

    /// Fetch a stored artifact for API responses.
    pub fn get(&self, artifact_id: &str) -> Result<ArtifactRecord, PlanningServiceError> {
        let record = self
            .repository
            .fetch(artifact_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn list(&self, event_id: &str) -> Result<Vec<ArtifactSummary>, PlanningServiceError> {
        let records = self.repository.list_for_event(event_id)?;
        Ok(records.iter().map(ArtifactRecord::summary).collect())
    }

    fn publish<T: Serialize>(
        &self,
        event_id: &str,
        kind: ArtifactKind,
        body: T,
    ) -> Result<PlanningArtifact<T>, PlanningServiceError> {
        let artifact = PlanningArtifact::seal(self.identity.as_ref(), event_id, kind, body);
        let record = ArtifactRecord::from_artifact(&artifact)?;
        debug!(artifact_id = %record.artifact_id, "persisting planning artifact");
        self.repository.insert(record)?;

        info!(
            event_id = %artifact.event_id,
            artifact_id = %artifact.artifact_id,
            kind = kind.label(),
            "planning artifact generated"
        );
        Ok(artifact)
    }
}

/// Error raised by the planning service.
#[derive(Debug, thiserror::Error)]
pub enum PlanningServiceError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("failed to serialize artifact: {0}")]
    Serialization(#[from] serde_json::Error),
}
