use crate::cli::ServeArgs;
use crate::infra::{build_service, AppState};
use crate::routes::with_planning_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use event_planner::config::AppConfig;
use event_planner::error::AppError;
use event_planner::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let planning_service = Arc::new(build_service(&config)?);

    let app = with_planning_routes(planning_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        alert_ratio = config.planning.thresholds.alert_ratio,
        salience_threshold = config.planning.salience_threshold,
        "event planning service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
