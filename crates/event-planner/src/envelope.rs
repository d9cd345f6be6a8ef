use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supplies artifact identifiers and generation timestamps so the planners
/// themselves stay deterministic.
pub trait IdentityProvider: Send + Sync {
    fn next_id(&self) -> String;
    fn now(&self) -> DateTime<Utc>;
}

/// Random v4 UUIDs stamped with the wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdentityProvider;

impl IdentityProvider for UuidIdentityProvider {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Counter-based ids (`{prefix}-000001`, ...) at a fixed instant.
#[derive(Debug)]
pub struct SequentialIdentityProvider {
    prefix: String,
    sequence: AtomicU64,
    instant: DateTime<Utc>,
}

impl SequentialIdentityProvider {
    pub fn new(prefix: impl Into<String>, instant: DateTime<Utc>) -> Self {
        Self {
            prefix: prefix.into(),
            sequence: AtomicU64::new(1),
            instant,
        }
    }
}

impl IdentityProvider for SequentialIdentityProvider {
    fn next_id(&self) -> String {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{}-{id:06}", self.prefix)
    }

    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    GoalPrioritization,
    StakeholderPrioritization,
    PerformanceMonitoring,
    VendorEvaluation,
}

impl ArtifactKind {
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::GoalPrioritization => "goal_prioritization",
            ArtifactKind::StakeholderPrioritization => "stakeholder_prioritization",
            ArtifactKind::PerformanceMonitoring => "performance_monitoring",
            ArtifactKind::VendorEvaluation => "vendor_evaluation",
        }
    }
}

/// Envelope around a planner's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningArtifact<T> {
    pub artifact_id: String,
    pub event_id: String,
    pub kind: ArtifactKind,
    pub generated_at: DateTime<Utc>,
    pub body: T,
}

impl<T> PlanningArtifact<T> {
    pub fn seal<P>(provider: &P, event_id: impl Into<String>, kind: ArtifactKind, body: T) -> Self
    where
        P: IdentityProvider + ?Sized,
    {
        Self {
            artifact_id: provider.next_id(),
            event_id: event_id.into(),
            kind,
            generated_at: provider.now(),
            body,
        }
    }
}
