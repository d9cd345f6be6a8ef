use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{round_to, tier_summary, TierCount};
use crate::engine::{
    EngineError, FactorSpec, OrdinalScale, RankAndTierClassifier, ResourceAllocator,
    ScorableItem, TierTable, WeightConfig, WeightedScorer,
};

pub const IMPACT: &str = "impact";
pub const EFFORT: &str = "effort";
pub const STAKEHOLDER_IMPORTANCE: &str = "stakeholder_importance";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub fn label(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalCategory {
    Revenue,
    Attendance,
    Engagement,
    Brand,
    Education,
    Networking,
}

/// Event goal submitted for prioritization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub category: GoalCategory,
    pub estimated_effort: Level,
    pub estimated_impact: Level,
    /// Stakeholder name to a 1–5 importance rating.
    #[serde(default)]
    pub stakeholder_importance: BTreeMap<String, f64>,
}

impl Goal {
    fn scorable(&self) -> ScorableItem {
        let mut item = ScorableItem::new(self.id.clone())
            .with_factor(IMPACT, self.estimated_impact.label())
            .with_factor(EFFORT, self.estimated_effort.label());

        if !self.stakeholder_importance.is_empty() {
            let ratings = self.stakeholder_importance.values();
            let mean = ratings.clone().sum::<f64>() / ratings.len() as f64;
            item = item.with_factor(STAKEHOLDER_IMPORTANCE, mean);
        }
        item
    }
}

#[derive(Debug, Clone)]
pub struct GoalPlanConfig {
    pub weights: WeightConfig,
    pub tiers: TierTable,
}

impl Default for GoalPlanConfig {
    /// Impact scores directly while effort is reversed so cheaper goals rank
    /// higher. Missing stakeholder ratings count as a neutral 3.
    fn default() -> Self {
        Self {
            weights: WeightConfig::new(10.0)
                .with_factor(IMPACT, FactorSpec::ordinal(0.4, OrdinalScale::ascending()))
                .with_factor(EFFORT, FactorSpec::ordinal(0.3, OrdinalScale::descending()))
                .with_factor(
                    STAKEHOLDER_IMPORTANCE,
                    FactorSpec::numeric(0.3).with_neutral(3.0),
                ),
            tiers: TierTable::quartiles(["must_have", "should_have", "could_have", "wont_have"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalPriority {
    pub goal_id: String,
    pub title: String,
    pub category: GoalCategory,
    pub priority_rank: usize,
    pub priority_tier: String,
    pub score: f64,
    pub impact: Level,
    pub effort: Level,
    pub resource_allocation_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapPhase {
    pub phase: u8,
    pub phase_name: &'static str,
    pub goals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalPrioritization {
    pub priority_matrix: Vec<GoalPriority>,
    pub execution_roadmap: Vec<RoadmapPhase>,
    pub tier_summary: Vec<TierCount>,
}

const PHASE_NAMES: [&str; 3] = ["Foundation", "Growth", "Enhancement"];

pub struct GoalPrioritizer {
    scorer: WeightedScorer,
    ranker: RankAndTierClassifier,
    allocator: ResourceAllocator,
}

impl GoalPrioritizer {
    pub fn new(config: GoalPlanConfig) -> Result<Self, EngineError> {
        Ok(Self {
            scorer: WeightedScorer::new(config.weights)?,
            ranker: RankAndTierClassifier::new(config.tiers),
            allocator: ResourceAllocator::new(),
        })
    }

    pub fn prioritize(&self, goals: &[Goal]) -> Result<GoalPrioritization, EngineError> {
        let scored = goals
            .iter()
            .map(|goal| self.scorer.score(&goal.scorable()).map(|score| (goal, score)))
            .collect::<Result<Vec<_>, _>>()?;

        let ranked = self.ranker.classify(scored)?;
        let shares = self.allocator.allocate(
            &ranked
                .iter()
                .map(|entry| (entry.item.id.as_str(), entry.score))
                .collect::<Vec<_>>(),
        )?;

        let priority_matrix: Vec<GoalPriority> = ranked
            .iter()
            .zip(&shares)
            .map(|(entry, share)| GoalPriority {
                goal_id: entry.item.id.clone(),
                title: entry.item.title.clone(),
                category: entry.item.category,
                priority_rank: entry.rank,
                priority_tier: entry.tier.clone(),
                score: round_to(entry.score, 1),
                impact: entry.item.estimated_impact,
                effort: entry.item.estimated_effort,
                resource_allocation_percent: share.percent,
            })
            .collect();

        Ok(GoalPrioritization {
            execution_roadmap: roadmap(&priority_matrix),
            tier_summary: tier_summary(self.ranker.table(), &ranked),
            priority_matrix,
        })
    }
}

/// Splits ranked goals into three phases: ranks up to `ceil(n/3)`, up to
/// `ceil(2n/3)`, then the rest. Empty phases are dropped.
fn roadmap(matrix: &[GoalPriority]) -> Vec<RoadmapPhase> {
    let total = matrix.len();
    let first_cut = total.div_ceil(3);
    let second_cut = (total * 2).div_ceil(3);

    let mut phases: Vec<RoadmapPhase> = PHASE_NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| RoadmapPhase {
            phase: index as u8 + 1,
            phase_name: name,
            goals: Vec::new(),
        })
        .collect();

    for (index, goal) in matrix.iter().enumerate() {
        let phase = if index < first_cut {
            0
        } else if index < second_cut {
            1
        } else {
            2
        };
        phases[phase].goals.push(goal.goal_id.clone());
    }

    phases.retain(|phase| !phase.goals.is_empty());
    phases
}
