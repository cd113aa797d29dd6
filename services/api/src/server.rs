use crate::cli::ServeArgs;
use crate::infra::{spawn_rule_loader, AppState};
use crate::routes::with_requirement_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use exalt_check::config::AppConfig;
use exalt_check::error::AppError;
use exalt_check::requirements::{ExaltedRequirementService, FsRuleSource};
use exalt_check::telemetry;
use std::sync::atomic::AtomicBool;
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
    if let Some(dir) = args.rules_dir.take() {
        config.rules.data_dir = dir;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let source = FsRuleSource::new(config.rules.data_dir.clone());
    let requirement_service = Arc::new(ExaltedRequirementService::new(source));

    let app = with_requirement_routes(Arc::clone(&requirement_service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    spawn_rule_loader(requirement_service, readiness_flag);

    info!(
        ?config.environment,
        %addr,
        rules_dir = %config.rules.data_dir.display(),
        "exalted gear check service listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
