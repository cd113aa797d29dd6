use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use exalt_check::requirements::{ExaltedRequirementService, RuleSource};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{info, warn};

const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(1);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads the rulebook off the request path, retrying until it succeeds.
pub(crate) fn spawn_rule_loader<S: RuleSource>(
    service: Arc<ExaltedRequirementService<S>>,
    readiness: Arc<AtomicBool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut delay = INITIAL_RETRY_DELAY;
        loop {
            match service.ensure_loaded().await {
                Ok(table) => {
                    readiness.store(true, Ordering::Release);
                    info!(summary = ?table.summary(), "exalted rules available");
                    return;
                }
                Err(err) => {
                    warn!(error = %err, retry_in = ?delay, "exalted rules unavailable");
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY);
                }
            }
        }
    })
}
