//! Mitchell–Agle–Wood stakeholder salience typology.

use serde::{Deserialize, Serialize};

use super::EngineError;

pub const SCALE_MIN: f64 = 1.0;
pub const SCALE_MAX: f64 = 10.0;
pub const DEFAULT_THRESHOLD: f64 = 6.0;

/// Power, legitimacy and urgency on the 1–10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalienceProfile {
    pub power: f64,
    pub legitimacy: f64,
    pub urgency: f64,
}

impl SalienceProfile {
    pub fn new(power: f64, legitimacy: f64, urgency: f64) -> Self {
        Self {
            power,
            legitimacy,
            urgency,
        }
    }
}

/// One of the eight mutually exclusive salience classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalienceCategory {
    Definitive,
    Dominant,
    Dangerous,
    Dependent,
    Dormant,
    Discretionary,
    Demanding,
    NonSalient,
}

impl SalienceCategory {
    pub const ALL: [SalienceCategory; 8] = [
        SalienceCategory::Definitive,
        SalienceCategory::Dominant,
        SalienceCategory::Dangerous,
        SalienceCategory::Dependent,
        SalienceCategory::Dormant,
        SalienceCategory::Discretionary,
        SalienceCategory::Demanding,
        SalienceCategory::NonSalient,
    ];

    /// Maps the three attribute predicates onto the typology.
    pub fn from_attributes(power: bool, legitimacy: bool, urgency: bool) -> Self {
        match (power, legitimacy, urgency) {
            (true, true, true) => Self::Definitive,
            (true, true, false) => Self::Dominant,
            (true, false, true) => Self::Dangerous,
            (false, true, true) => Self::Dependent,
            (true, false, false) => Self::Dormant,
            (false, true, false) => Self::Discretionary,
            (false, false, true) => Self::Demanding,
            (false, false, false) => Self::NonSalient,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Definitive => "definitive",
            Self::Dominant => "dominant",
            Self::Dangerous => "dangerous",
            Self::Dependent => "dependent",
            Self::Dormant => "dormant",
            Self::Discretionary => "discretionary",
            Self::Demanding => "demanding",
            Self::NonSalient => "non_salient",
        }
    }

    /// Number of attributes (0–3) the category holds.
    pub fn attribute_count(&self) -> u8 {
        match self {
            Self::Definitive => 3,
            Self::Dominant | Self::Dangerous | Self::Dependent => 2,
            Self::Dormant | Self::Discretionary | Self::Demanding => 1,
            Self::NonSalient => 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SalienceClassifier {
    threshold: f64,
}

impl Default for SalienceClassifier {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl SalienceClassifier {
    /// An attribute is active when its value is `>= threshold`.
    pub fn new(threshold: f64) -> Result<Self, EngineError> {
        if !threshold.is_finite() || !(SCALE_MIN..=SCALE_MAX).contains(&threshold) {
            return Err(EngineError::config(format!(
                "salience threshold {threshold} must lie within {SCALE_MIN}..={SCALE_MAX}"
            )));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn classify(&self, profile: &SalienceProfile) -> SalienceCategory {
        SalienceCategory::from_attributes(
            profile.power >= self.threshold,
            profile.legitimacy >= self.threshold,
            profile.urgency >= self.threshold,
        )
    }
}
