use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{tier_summary, TierCount};
use crate::engine::{
    EngineError, FactorSpec, RankAndTierClassifier, ResourceAllocator, SalienceCategory,
    SalienceClassifier, SalienceProfile, ScorableItem, TierTable, WeightConfig, WeightedScorer,
};

pub const POWER: &str = "power";
pub const INTEREST: &str = "interest";
pub const LEGITIMACY: &str = "legitimacy";
pub const URGENCY: &str = "urgency";

/// Midpoint used for unrated legitimacy or urgency.
pub const UNRATED_ATTRIBUTE: f64 = 5.0;

/// Stakeholder attributes on the 1–10 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stakeholder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    pub power: f64,
    pub interest: f64,
    #[serde(default)]
    pub legitimacy: Option<f64>,
    #[serde(default)]
    pub urgency: Option<f64>,
}

impl Stakeholder {
    fn scorable(&self) -> ScorableItem {
        let mut item = ScorableItem::new(self.id.clone())
            .with_factor(POWER, self.power)
            .with_factor(INTEREST, self.interest);
        if let Some(legitimacy) = self.legitimacy {
            item = item.with_factor(LEGITIMACY, legitimacy);
        }
        if let Some(urgency) = self.urgency {
            item = item.with_factor(URGENCY, urgency);
        }
        item
    }

    fn salience_profile(&self) -> SalienceProfile {
        SalienceProfile::new(
            self.power,
            self.legitimacy.unwrap_or(UNRATED_ATTRIBUTE),
            self.urgency.unwrap_or(UNRATED_ATTRIBUTE),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttentionLevel {
    Intensive,
    Regular,
    Periodic,
    Minimal,
}

#[derive(Debug, Clone)]
pub struct StakeholderPlanConfig {
    pub weights: WeightConfig,
    /// Share of the population per tier, best tier first.
    pub tier_shares: Vec<(String, f64)>,
    /// Attention level per tier, in tier order.
    pub attention: Vec<AttentionLevel>,
    /// Relative budget weight per tier, in tier order.
    pub tier_budget_weights: Vec<f64>,
    pub salience_threshold: f64,
}

impl Default for StakeholderPlanConfig {
    fn default() -> Self {
        Self {
            weights: WeightConfig::new(10.0)
                .with_factor(POWER, FactorSpec::numeric(0.4))
                .with_factor(INTEREST, FactorSpec::numeric(0.3))
                .with_factor(
                    LEGITIMACY,
                    FactorSpec::numeric(0.15).with_neutral(UNRATED_ATTRIBUTE),
                )
                .with_factor(
                    URGENCY,
                    FactorSpec::numeric(0.15).with_neutral(UNRATED_ATTRIBUTE),
                ),
            tier_shares: vec![
                ("tier_1_critical".to_string(), 20.0),
                ("tier_2_important".to_string(), 30.0),
                ("tier_3_supportive".to_string(), 30.0),
                ("tier_4_monitor".to_string(), 20.0),
            ],
            attention: vec![
                AttentionLevel::Intensive,
                AttentionLevel::Regular,
                AttentionLevel::Periodic,
                AttentionLevel::Minimal,
            ],
            tier_budget_weights: vec![35.0, 25.0, 10.0, 5.0],
            salience_threshold: crate::engine::salience::DEFAULT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakeholderPriority {
    pub rank: usize,
    pub stakeholder_id: String,
    pub name: String,
    pub priority_score: f64,
    pub salience_type: SalienceCategory,
    pub tier: String,
    pub attention_level: AttentionLevel,
    pub budget_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakeholderPrioritization {
    pub prioritized_list: Vec<StakeholderPriority>,
    pub tier_summary: Vec<TierCount>,
    pub salience_summary: BTreeMap<SalienceCategory, usize>,
}

pub struct StakeholderPrioritizer {
    scorer: WeightedScorer,
    ranker: RankAndTierClassifier,
    salience: SalienceClassifier,
    allocator: ResourceAllocator,
    attention: Vec<AttentionLevel>,
    tier_budget_weights: Vec<f64>,
}

impl StakeholderPrioritizer {
    pub fn new(config: StakeholderPlanConfig) -> Result<Self, EngineError> {
        let tiers = TierTable::from_shares(config.tier_shares)?;
        let tier_count = tiers.len();
        if config.attention.len() != tier_count || config.tier_budget_weights.len() != tier_count {
            return Err(EngineError::InvalidConfiguration(format!(
                "expected {tier_count} attention levels and budget weights, one per tier"
            )));
        }

        Ok(Self {
            scorer: WeightedScorer::new(config.weights)?,
            ranker: RankAndTierClassifier::new(tiers),
            salience: SalienceClassifier::new(config.salience_threshold)?,
            allocator: ResourceAllocator::new(),
            attention: config.attention,
            tier_budget_weights: config.tier_budget_weights,
        })
    }

    pub fn prioritize(
        &self,
        stakeholders: &[Stakeholder],
    ) -> Result<StakeholderPrioritization, EngineError> {
        // Ranking uses the rounded priority score so displayed ties rank by
        // input order.
        let scored = stakeholders
            .iter()
            .map(|stakeholder| {
                self.scorer
                    .score(&stakeholder.scorable())
                    .map(|score| (stakeholder, score.round()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let ranked = self.ranker.classify(scored)?;
        let budget = self.allocator.allocate_by_tier(
            &ranked,
            &self.tier_budget_weights,
            |stakeholder| stakeholder.id.clone(),
        )?;

        let mut salience_summary = BTreeMap::new();
        let prioritized_list = ranked
            .iter()
            .zip(&budget)
            .map(|(entry, share)| {
                let salience_type = self.salience.classify(&entry.item.salience_profile());
                *salience_summary.entry(salience_type).or_insert(0) += 1;

                StakeholderPriority {
                    rank: entry.rank,
                    stakeholder_id: entry.item.id.clone(),
                    name: entry.item.name.clone(),
                    priority_score: entry.score,
                    salience_type,
                    tier: entry.tier.clone(),
                    attention_level: self.attention[entry.tier_index],
                    budget_percent: share.percent,
                }
            })
            .collect();

        Ok(StakeholderPrioritization {
            prioritized_list,
            tier_summary: tier_summary(self.ranker.table(), &ranked),
            salience_summary,
        })
    }
}
