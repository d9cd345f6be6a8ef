//! Multi-criteria scoring and classification engine.
//!
//! Every component here is a pure function of its input and configuration:
//! no I/O, no clocks, no shared state. Planning modules compose these pieces
//! through explicit configuration objects instead of restating the math.

pub mod allocation;
pub mod bands;
pub mod ranking;
pub mod salience;
pub mod scoring;
pub mod threshold;

pub use allocation::{AllocationShare, ResourceAllocator, TOTAL_SHARE};
pub use bands::ScoreBands;
pub use ranking::{RankAndTierClassifier, Ranked, TierBound, TierTable};
pub use salience::{SalienceCategory, SalienceClassifier, SalienceProfile};
pub use scoring::{FactorSpec, FactorValue, OrdinalScale, ScorableItem, WeightConfig, WeightedScorer};
pub use threshold::{
    HealthStatus, StatusAssessment, ThresholdConfig, ThresholdStatusClassifier, Trend,
};

/// Typed failures raised by the engine. Retrying with the same input always
/// fails the same way.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("insufficient data: at least {required} item(s) required, got {actual}")]
    InsufficientData { required: usize, actual: usize },
    #[error("invalid target {0}: target must be a positive, finite value")]
    InvalidTarget(f64),
}

impl EngineError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}
