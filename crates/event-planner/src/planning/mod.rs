//! Planning artifacts built on the scoring engine.
//!
//! Each planner is a configuration of the shared engine components; none of
//! them restate scoring, tiering or allocation logic.

pub mod goals;
pub mod kpis;
pub mod router;
pub mod service;
pub mod stakeholders;
pub mod vendors;

pub use goals::{
    Goal, GoalCategory, GoalPlanConfig, GoalPrioritization, GoalPrioritizer, GoalPriority, Level,
    RoadmapPhase,
};
pub use kpis::{
    AlertSeverity, DashboardSummary, HealthGrade, Kpi, KpiAlert, KpiDashboard, KpiStatus,
    PerformanceMonitor,
};
pub use router::{planning_router, GoalsRequest, KpisRequest, StakeholdersRequest, VendorsRequest};
pub use service::{PlanningService, PlanningServiceError};
pub use stakeholders::{
    AttentionLevel, Stakeholder, StakeholderPlanConfig, StakeholderPrioritization,
    StakeholderPrioritizer, StakeholderPriority,
};
pub use vendors::{
    CriteriaWeights, RequirementsAnalysis, RiskSeverity, ServiceRequirements, VendorCandidate,
    VendorEvaluation, VendorEvaluator, VendorPlanConfig, VendorRanking, VendorRisk,
    VendorRiskProfile, VendorSubScores,
};

use serde::{Deserialize, Serialize};

use crate::engine::{Ranked, ThresholdConfig, TierTable};

/// Per-planner configuration handed to [`PlanningService`].
#[derive(Debug, Clone, Default)]
pub struct PlannerSettings {
    pub goals: GoalPlanConfig,
    pub stakeholders: StakeholderPlanConfig,
    pub thresholds: ThresholdConfig,
    pub vendors: VendorPlanConfig,
}

/// Number of ranked items that landed in a tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCount {
    pub tier: String,
    pub count: usize,
}

pub(crate) fn tier_summary<T>(table: &TierTable, ranked: &[Ranked<T>]) -> Vec<TierCount> {
    table
        .tiers()
        .iter()
        .enumerate()
        .map(|(index, tier)| TierCount {
            tier: tier.label.clone(),
            count: ranked.iter().filter(|entry| entry.tier_index == index).count(),
        })
        .collect()
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
