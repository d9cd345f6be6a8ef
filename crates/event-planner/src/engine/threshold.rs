use serde::{Deserialize, Serialize};

use super::EngineError;

/// Ratios of target that separate the health statuses, plus the width of the
/// "stable" variance band.
///
/// With the defaults a value at 80% of target or more is on track, 60% or
/// more is at risk, and anything lower is off track. Variance of zero or more
/// is improving, strictly between -10% and 0% is stable, and -10% or lower is
/// declining.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub alert_ratio: f64,
    pub critical_ratio: f64,
    pub stable_band_pct: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            alert_ratio: 0.80,
            critical_ratio: 0.60,
            stable_band_pct: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    OnTrack,
    AtRisk,
    OffTrack,
    Undetermined,
}

impl HealthStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::OnTrack => "on_track",
            Self::AtRisk => "at_risk",
            Self::OffTrack => "off_track",
            Self::Undetermined => "undetermined",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

/// Status of one measurement against its target. Variance and trend are
/// absent only for the `Undetermined` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusAssessment {
    pub status: HealthStatus,
    pub variance_pct: Option<f64>,
    pub trend: Option<Trend>,
}

impl StatusAssessment {
    pub fn undetermined() -> Self {
        Self {
            status: HealthStatus::Undetermined,
            variance_pct: None,
            trend: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ThresholdStatusClassifier {
    config: ThresholdConfig,
}

impl Default for ThresholdStatusClassifier {
    fn default() -> Self {
        Self {
            config: ThresholdConfig::default(),
        }
    }
}

impl ThresholdStatusClassifier {
    pub fn new(config: ThresholdConfig) -> Result<Self, EngineError> {
        let ThresholdConfig {
            alert_ratio,
            critical_ratio,
            stable_band_pct,
        } = config;

        if !alert_ratio.is_finite() || !critical_ratio.is_finite() {
            return Err(EngineError::config("threshold ratios must be finite"));
        }
        if critical_ratio < 0.0 || critical_ratio > alert_ratio {
            return Err(EngineError::config(format!(
                "critical ratio {critical_ratio} must lie in [0, alert ratio {alert_ratio}]"
            )));
        }
        if !stable_band_pct.is_finite() || stable_band_pct <= 0.0 {
            return Err(EngineError::config(format!(
                "stable band {stable_band_pct} must be positive and finite"
            )));
        }

        Ok(Self { config })
    }

    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    pub fn assess(&self, current: f64, target: f64) -> Result<StatusAssessment, EngineError> {
        if !target.is_finite() || target <= 0.0 {
            return Err(EngineError::InvalidTarget(target));
        }
        if !current.is_finite() {
            return Err(EngineError::config(format!(
                "current value {current} is not finite"
            )));
        }

        let status = if current >= target * self.config.alert_ratio {
            HealthStatus::OnTrack
        } else if current >= target * self.config.critical_ratio {
            HealthStatus::AtRisk
        } else {
            HealthStatus::OffTrack
        };

        let variance_pct = (current - target) * 100.0 / target;

        Ok(StatusAssessment {
            status,
            variance_pct: Some(variance_pct),
            trend: Some(self.trend(variance_pct)),
        })
    }

    /// Like [`assess`](Self::assess) but substitutes the `Undetermined`
    /// sentinel for a missing current value or an unusable target.
    pub fn assess_or_undetermined(&self, current: Option<f64>, target: f64) -> StatusAssessment {
        current
            .and_then(|current| self.assess(current, target).ok())
            .unwrap_or_else(StatusAssessment::undetermined)
    }

    pub fn trend(&self, variance_pct: f64) -> Trend {
        if variance_pct >= 0.0 {
            Trend::Improving
        } else if variance_pct > -self.config.stable_band_pct {
            Trend::Stable
        } else {
            Trend::Declining
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_equal_to_target_is_on_track_and_improving() {
        let assessment = ThresholdStatusClassifier::default()
            .assess(100.0, 100.0)
            .expect("assesses");

        assert_eq!(assessment.status, HealthStatus::OnTrack);
        assert_eq!(assessment.variance_pct, Some(0.0));
        assert_eq!(assessment.trend, Some(Trend::Improving));
    }

    #[test]
    fn far_below_target_is_off_track_and_declining() {
        let assessment = ThresholdStatusClassifier::default()
            .assess(45.0, 100.0)
            .expect("assesses");

        assert_eq!(assessment.status, HealthStatus::OffTrack);
        assert_eq!(assessment.variance_pct, Some(-55.0));
        assert_eq!(assessment.trend, Some(Trend::Declining));
    }

    #[test]
    fn status_boundaries_are_inclusive() {
        let classifier = ThresholdStatusClassifier::default();

        assert_eq!(
            classifier.assess(80.0, 100.0).expect("assesses").status,
            HealthStatus::OnTrack
        );
        assert_eq!(
            classifier.assess(60.0, 100.0).expect("assesses").status,
            HealthStatus::AtRisk
        );
        assert_eq!(
            classifier.assess(59.9, 100.0).expect("assesses").status,
            HealthStatus::OffTrack
        );
    }

    #[test]
    fn trend_band_edges() {
        let classifier = ThresholdStatusClassifier::default();

        assert_eq!(classifier.trend(0.0), Trend::Improving);
        assert_eq!(classifier.trend(-0.5), Trend::Stable);
        assert_eq!(classifier.trend(-9.99), Trend::Stable);
        assert_eq!(classifier.trend(-10.0), Trend::Declining);
    }

    #[test]
    fn zero_target_is_rejected_or_undetermined() {
        let classifier = ThresholdStatusClassifier::default();

        assert_eq!(classifier.assess(10.0, 0.0), Err(EngineError::InvalidTarget(0.0)));
        assert_eq!(
            classifier.assess(10.0, -5.0),
            Err(EngineError::InvalidTarget(-5.0))
        );
        assert_eq!(
            classifier.assess_or_undetermined(Some(10.0), 0.0),
            StatusAssessment::undetermined()
        );
        assert_eq!(
            classifier.assess_or_undetermined(None, 100.0).status,
            HealthStatus::Undetermined
        );
    }

    #[test]
    fn rejects_inverted_ratios() {
        let config = ThresholdConfig {
            alert_ratio: 0.5,
            critical_ratio: 0.7,
            ..ThresholdConfig::default()
        };

        assert!(matches!(
            ThresholdStatusClassifier::new(config),
            Err(EngineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn custom_ratios_shift_status() {
        let classifier = ThresholdStatusClassifier::new(ThresholdConfig {
            alert_ratio: 0.95,
            critical_ratio: 0.9,
            stable_band_pct: 5.0,
        })
        .expect("valid config");

        let assessment = classifier.assess(92.0, 100.0).expect("assesses");

        assert_eq!(assessment.status, HealthStatus::AtRisk);
        assert_eq!(assessment.trend, Some(Trend::Declining));
    }
}
