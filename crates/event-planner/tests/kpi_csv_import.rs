use event_planner::engine::{HealthStatus, ThresholdConfig};
use event_planner::import::{ImportError, KpiCsvImporter};
use event_planner::planning::{HealthGrade, PerformanceMonitor};

#[test]
fn importer_reads_decorated_export() {
    let data = include_bytes!("fixtures/event_kpis.csv");

    let kpis = KpiCsvImporter::from_reader(&data[..]).expect("export imports");

    assert_eq!(kpis.len(), 6);
    assert_eq!(kpis[0].target, 1200.0);
    assert_eq!(kpis[1].target, 250_000.0);
    assert_eq!(kpis[1].current, Some(170_000.0));
    assert_eq!(kpis[3].current, None);
    assert_eq!(kpis[4].current, Some(91.0));
    assert_eq!(kpis[5].current, None);
}

#[test]
fn imported_kpis_feed_the_dashboard() {
    let data = include_bytes!("fixtures/event_kpis.csv");
    let kpis = KpiCsvImporter::from_reader(&data[..]).expect("export imports");

    let dashboard = PerformanceMonitor::new(ThresholdConfig::default())
        .expect("default thresholds")
        .monitor(&kpis)
        .expect("dashboard builds");

    let statuses: Vec<_> = dashboard.kpi_status.iter().map(|entry| entry.status).collect();
    assert_eq!(
        statuses,
        vec![
            HealthStatus::OnTrack,
            HealthStatus::AtRisk,
            HealthStatus::OffTrack,
            HealthStatus::Undetermined,
            HealthStatus::OnTrack,
            HealthStatus::Undetermined,
        ]
    );
    // (3×2 + 1) / (3×4) = 0.58
    assert_eq!(dashboard.summary.overall_health, HealthGrade::Fair);
    assert_eq!(dashboard.alerts.len(), 2);
}

#[test]
fn missing_file_surfaces_io_error() {
    let result = KpiCsvImporter::from_path("fixtures/does_not_exist.csv");

    assert!(matches!(result, Err(ImportError::Io(_))));
}
