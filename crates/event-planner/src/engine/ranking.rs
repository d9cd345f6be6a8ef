use serde::{Deserialize, Serialize};

use super::EngineError;

const PERCENTILE_TOLERANCE: f64 = 1e-9;
const MINIMUM_RANKED_ITEMS: usize = 2;

/// Upper cumulative percentile (in `(0, 1]`) closing a tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierBound {
    pub label: String,
    pub upper: f64,
}

/// Ordered partition of the percentile space into tiers, best tier first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTierTable")]
pub struct TierTable {
    tiers: Vec<TierBound>,
}

#[derive(Deserialize)]
struct RawTierTable {
    tiers: Vec<TierBound>,
}

impl TryFrom<RawTierTable> for TierTable {
    type Error = EngineError;

    fn try_from(raw: RawTierTable) -> Result<Self, Self::Error> {
        Self::new(raw.tiers.into_iter().map(|tier| (tier.label, tier.upper)))
    }
}

impl TierTable {
    /// Builds a table from cumulative upper bounds. Bounds must be strictly
    /// ascending and the last one must be `1.0`.
    pub fn new<L: Into<String>>(
        bounds: impl IntoIterator<Item = (L, f64)>,
    ) -> Result<Self, EngineError> {
        let tiers: Vec<TierBound> = bounds
            .into_iter()
            .map(|(label, upper)| TierBound {
                label: label.into(),
                upper,
            })
            .collect();

        if tiers.is_empty() {
            return Err(EngineError::config("tier table is empty"));
        }

        let mut previous = 0.0;
        for tier in &tiers {
            if !tier.upper.is_finite() || tier.upper <= previous || tier.upper > 1.0 + PERCENTILE_TOLERANCE {
                return Err(EngineError::config(format!(
                    "tier '{}' bound {} must be ascending within (0, 1]",
                    tier.label, tier.upper
                )));
            }
            previous = tier.upper;
        }

        if (previous - 1.0).abs() > PERCENTILE_TOLERANCE {
            return Err(EngineError::config(format!(
                "tier bounds must end at 1.0, last bound is {previous}"
            )));
        }

        Ok(Self { tiers })
    }

    /// Builds a table from per-tier population shares, e.g. 20/30/30/20.
    /// Shares are normalized by their sum.
    pub fn from_shares<L: Into<String>>(
        shares: impl IntoIterator<Item = (L, f64)>,
    ) -> Result<Self, EngineError> {
        let shares: Vec<(String, f64)> = shares
            .into_iter()
            .map(|(label, share)| (label.into(), share))
            .collect();

        if shares
            .iter()
            .any(|(_, share)| !share.is_finite() || *share <= 0.0)
        {
            return Err(EngineError::config("tier shares must be positive and finite"));
        }

        let total: f64 = shares.iter().map(|(_, share)| share).sum();
        let count = shares.len();
        let mut cumulative = 0.0;
        let bounds = shares.into_iter().enumerate().map(|(index, (label, share))| {
            cumulative += share / total;
            let upper = if index + 1 == count { 1.0 } else { cumulative };
            (label, upper)
        });

        Self::new(bounds.collect::<Vec<_>>())
    }

    /// Four equal tiers closing at 25/50/75/100 percent.
    pub fn quartiles<L: Into<String>>(labels: [L; 4]) -> Self {
        let [first, second, third, fourth] = labels;
        Self {
            tiers: vec![
                TierBound { label: first.into(), upper: 0.25 },
                TierBound { label: second.into(), upper: 0.5 },
                TierBound { label: third.into(), upper: 0.75 },
                TierBound { label: fourth.into(), upper: 1.0 },
            ],
        }
    }

    pub fn tiers(&self) -> &[TierBound] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Index of the tier containing `percentile`. A boundary percentile
    /// belongs to the earlier tier.
    pub fn tier_for(&self, percentile: f64) -> usize {
        self.tiers
            .iter()
            .position(|tier| percentile <= tier.upper + PERCENTILE_TOLERANCE)
            .unwrap_or(self.tiers.len() - 1)
    }
}

/// Item annotated with its score, rank and tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<T> {
    pub item: T,
    pub score: f64,
    pub rank: usize,
    pub tier: String,
    pub tier_index: usize,
}

/// Sorts scored items and assigns contiguous ranks and percentile tiers.
#[derive(Debug, Clone)]
pub struct RankAndTierClassifier {
    table: TierTable,
}

impl RankAndTierClassifier {
    pub fn new(table: TierTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &TierTable {
        &self.table
    }

    /// Ranks descending by score; equal scores keep input order.
    pub fn classify<T>(&self, scored: Vec<(T, f64)>) -> Result<Vec<Ranked<T>>, EngineError> {
        if scored.len() < MINIMUM_RANKED_ITEMS {
            return Err(EngineError::InsufficientData {
                required: MINIMUM_RANKED_ITEMS,
                actual: scored.len(),
            });
        }
        if let Some(position) = scored.iter().position(|(_, score)| !score.is_finite()) {
            return Err(EngineError::config(format!(
                "score at position {position} is not finite"
            )));
        }

        let mut scored = scored;
        // `sort_by` is stable, so ties stay in input order.
        scored.sort_by(|left, right| right.1.total_cmp(&left.1));

        let total = scored.len() as f64;
        let ranked = scored
            .into_iter()
            .enumerate()
            .map(|(index, (item, score))| {
                let rank = index + 1;
                let tier_index = self.table.tier_for(rank as f64 / total);
                Ranked {
                    item,
                    score,
                    rank,
                    tier: self.table.tiers[tier_index].label.clone(),
                    tier_index,
                }
            })
            .collect();

        Ok(ranked)
    }
}
