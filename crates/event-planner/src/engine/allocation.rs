use serde::{Deserialize, Serialize};

use super::ranking::Ranked;
use super::EngineError;

/// Every batch of shares sums to exactly this many percentage points.
pub const TOTAL_SHARE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationShare {
    pub id: String,
    pub percent: u32,
}

/// Converts non-negative scores into integer percentage shares.
///
/// Shares are reconciled with largest-remainder rounding: each item gets the
/// floor of its exact share and the leftover points go to the largest
/// fractional remainders (earlier items win ties). The batch always sums to
/// [`TOTAL_SHARE`] and each share is within one point of its exact value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceAllocator;

impl ResourceAllocator {
    pub fn new() -> Self {
        Self
    }

    pub fn allocate<S: AsRef<str>>(
        &self,
        scores: &[(S, f64)],
    ) -> Result<Vec<AllocationShare>, EngineError> {
        if scores.is_empty() {
            return Err(EngineError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        if let Some((id, score)) = scores
            .iter()
            .find(|(_, score)| !score.is_finite() || *score < 0.0)
        {
            return Err(EngineError::config(format!(
                "allocation score {score} for '{}' must be non-negative and finite",
                id.as_ref()
            )));
        }

        // Scaling by the maximum keeps the sum finite for scores near f64::MAX.
        let largest = scores
            .iter()
            .map(|(_, score)| *score)
            .fold(0.0, f64::max);
        let scaled: Vec<f64> = scores
            .iter()
            .map(|(_, score)| if largest > 0.0 { score / largest } else { 0.0 })
            .collect();
        let total: f64 = scaled.iter().sum();
        let count = scores.len() as f64;
        let exact: Vec<f64> = scaled
            .iter()
            .map(|score| {
                if total > 0.0 {
                    score / total * f64::from(TOTAL_SHARE)
                } else {
                    f64::from(TOTAL_SHARE) / count
                }
            })
            .collect();

        let mut percents: Vec<u32> = exact.iter().map(|share| share.floor() as u32).collect();
        let assigned: u32 = percents.iter().sum();
        let leftover = TOTAL_SHARE.saturating_sub(assigned) as usize;

        let mut by_remainder: Vec<usize> = (0..exact.len()).collect();
        // Stable sort keeps earlier items ahead on equal remainders.
        by_remainder.sort_by(|left, right| {
            let left_rem = exact[*left] - exact[*left].floor();
            let right_rem = exact[*right] - exact[*right].floor();
            right_rem.total_cmp(&left_rem)
        });
        for index in by_remainder.into_iter().take(leftover) {
            percents[index] += 1;
        }

        Ok(scores
            .iter()
            .zip(percents)
            .map(|((id, _), percent)| AllocationShare {
                id: id.as_ref().to_string(),
                percent,
            })
            .collect())
    }

    /// Allocates by tier membership: each ranked item is weighted by the
    /// entry of `tier_weights` matching its tier index.
    pub fn allocate_by_tier<T, F>(
        &self,
        ranked: &[Ranked<T>],
        tier_weights: &[f64],
        id_of: F,
    ) -> Result<Vec<AllocationShare>, EngineError>
    where
        F: Fn(&T) -> String,
    {
        let scores = ranked
            .iter()
            .map(|entry| {
                tier_weights
                    .get(entry.tier_index)
                    .map(|weight| (id_of(&entry.item), *weight))
                    .ok_or_else(|| {
                        EngineError::config(format!(
                            "no allocation weight configured for tier '{}'",
                            entry.tier
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.allocate(&scores)
    }
}
