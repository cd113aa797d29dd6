use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::exalted_thresholds;
use super::loader::RuleSource;
use super::service::{
    ExaltedRequirementService, GearCheckRequest, RequirementServiceError, RosterRequest,
};

/// Router builder exposing the gear check endpoints.
pub fn requirement_router<S: RuleSource>(service: Arc<ExaltedRequirementService<S>>) -> Router {
    Router::new()
        .route("/api/v1/exalted/check", post(check_handler::<S>))
        .route("/api/v1/exalted/roster", post(roster_handler::<S>))
        .route("/api/v1/exalted/classes", get(classes_handler))
        .route("/api/v1/exalted/rules", get(rules_status_handler::<S>))
        .with_state(service)
}

pub(crate) async fn check_handler<S: RuleSource>(
    State(service): State<Arc<ExaltedRequirementService<S>>>,
    Json(request): Json<GearCheckRequest>,
) -> Response {
    match service.check(&request) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(RequirementServiceError::RulesNotLoaded) => {
            let payload = json!({
                "error": RequirementServiceError::RulesNotLoaded.to_string(),
                "rules": service.status(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn roster_handler<S: RuleSource>(
    State(service): State<Arc<ExaltedRequirementService<S>>>,
    Json(request): Json<RosterRequest>,
) -> Response {
    let report = service.evaluate_roster(&request);
    (StatusCode::OK, Json(report)).into_response()
}

pub(crate) async fn classes_handler() -> Response {
    let classes: Vec<_> = exalted_thresholds()
        .into_iter()
        .map(|(class, required)| json!({ "class": class, "required": required }))
        .collect();
    (StatusCode::OK, Json(classes)).into_response()
}

pub(crate) async fn rules_status_handler<S: RuleSource>(
    State(service): State<Arc<ExaltedRequirementService<S>>>,
) -> Response {
    (StatusCode::OK, Json(service.status())).into_response()
}
