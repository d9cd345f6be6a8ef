use serde::{Deserialize, Serialize};

use crate::engine::{
    EngineError, HealthStatus, ThresholdConfig, ThresholdStatusClassifier, Trend,
};

/// Key performance indicator with its target and latest reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub kpi_id: String,
    pub kpi_name: String,
    pub target: f64,
    #[serde(default)]
    pub current: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthGrade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthGrade {
    /// Grades `(3 × on_track + at_risk) / (3 × assessed)`.
    pub fn from_counts(on_track: usize, at_risk: usize, assessed: usize) -> Self {
        if assessed == 0 {
            return HealthGrade::Poor;
        }
        let ratio = (on_track * 3 + at_risk) as f64 / (assessed * 3) as f64;
        if ratio >= 0.9 {
            HealthGrade::Excellent
        } else if ratio >= 0.7 {
            HealthGrade::Good
        } else if ratio >= 0.5 {
            HealthGrade::Fair
        } else {
            HealthGrade::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiStatus {
    pub kpi_id: String,
    pub kpi_name: String,
    pub target: f64,
    pub current: Option<f64>,
    pub status: HealthStatus,
    pub variance_pct: Option<f64>,
    pub trend: Option<Trend>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiAlert {
    pub alert_id: String,
    pub kpi_id: String,
    pub severity: AlertSeverity,
    pub escalation_required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_kpis: usize,
    pub on_track: usize,
    pub at_risk: usize,
    pub off_track: usize,
    pub undetermined: usize,
    pub overall_health: HealthGrade,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiDashboard {
    pub summary: DashboardSummary,
    pub kpi_status: Vec<KpiStatus>,
    pub alerts: Vec<KpiAlert>,
}

/// Assesses KPIs against their targets and rolls them up into a dashboard.
pub struct PerformanceMonitor {
    classifier: ThresholdStatusClassifier,
}

impl PerformanceMonitor {
    pub fn new(thresholds: ThresholdConfig) -> Result<Self, EngineError> {
        Ok(Self {
            classifier: ThresholdStatusClassifier::new(thresholds)?,
        })
    }

    /// A KPI without a current reading or with a non-positive target is
    /// reported as `undetermined` rather than failing the dashboard.
    pub fn monitor(&self, kpis: &[Kpi]) -> Result<KpiDashboard, EngineError> {
        if kpis.is_empty() {
            return Err(EngineError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }

        let kpi_status: Vec<KpiStatus> = kpis
            .iter()
            .map(|kpi| {
                let assessment = self.classifier.assess_or_undetermined(kpi.current, kpi.target);
                KpiStatus {
                    kpi_id: kpi.kpi_id.clone(),
                    kpi_name: kpi.kpi_name.clone(),
                    target: kpi.target,
                    current: kpi.current,
                    status: assessment.status,
                    variance_pct: assessment.variance_pct,
                    trend: assessment.trend,
                }
            })
            .collect();

        let count = |status: HealthStatus| {
            kpi_status
                .iter()
                .filter(|entry| entry.status == status)
                .count()
        };
        let on_track = count(HealthStatus::OnTrack);
        let at_risk = count(HealthStatus::AtRisk);
        let off_track = count(HealthStatus::OffTrack);
        let undetermined = count(HealthStatus::Undetermined);

        let alerts = kpi_status
            .iter()
            .filter_map(|entry| match entry.status {
                HealthStatus::AtRisk => Some((entry, AlertSeverity::Warning)),
                HealthStatus::OffTrack => Some((entry, AlertSeverity::Critical)),
                HealthStatus::OnTrack | HealthStatus::Undetermined => None,
            })
            .enumerate()
            .map(|(index, (entry, severity))| KpiAlert {
                alert_id: format!("ALT-{:03}", index + 1),
                kpi_id: entry.kpi_id.clone(),
                severity,
                escalation_required: severity == AlertSeverity::Critical,
            })
            .collect();

        Ok(KpiDashboard {
            summary: DashboardSummary {
                total_kpis: kpi_status.len(),
                on_track,
                at_risk,
                off_track,
                undetermined,
                overall_health: HealthGrade::from_counts(
                    on_track,
                    at_risk,
                    on_track + at_risk + off_track,
                ),
            },
            kpi_status,
            alerts,
        })
    }
}
