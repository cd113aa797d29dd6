use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::requirements::router::{requirement_router, rules_status_handler};
use crate::requirements::service::ExaltedRequirementService;

fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn check_route_is_unavailable_until_rules_load() {
    let service = Arc::new(ExaltedRequirementService::new(MemorySource::fixture()));
    let router = requirement_router(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/exalted/check",
            json!({ "class": "priest", "ability": "tome-of-holy-guidance" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "exalted rules are not loaded yet");
    assert_eq!(body["rules"]["state"], "not_started");
}

#[tokio::test]
async fn check_route_returns_verdict_after_load() {
    let router = requirement_router(loaded_service().await);

    let response = router
        .oneshot(post_json(
            "/api/v1/exalted/check",
            json!({ "class": "priest", "ability": "tome-of-holy-guidance" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["verdict"]["status"], "ok");
    assert_eq!(body["verdict"]["points"], 5);
    assert_eq!(body["verdict"]["required"], 5);
    assert_eq!(body["class"], "priest");
}

#[tokio::test]
async fn check_route_reports_banned_slot() {
    let router = requirement_router(loaded_service().await);

    let response = router
        .oneshot(post_json(
            "/api/v1/exalted/check",
            json!({ "class": "archer", "weapon": "cursed-doom-bow" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["verdict"]["status"], "banned");
    assert_eq!(body["verdict"]["slot"], "weapon");
    assert_eq!(body["verdict"]["item"], "doom-bow");
}

#[tokio::test]
async fn check_route_normalizes_padded_links_and_blank_slots() {
    let service = loaded_service().await;

    for weapon in [" doom-bow ", "/wiki/doom-bow", "https://www.realmeye.com/wiki/Doom-Bow"] {
        let response = requirement_router(Arc::clone(&service))
            .oneshot(post_json(
                "/api/v1/exalted/check",
                json!({ "class": "wizard", "weapon": weapon, "ability": "", "ring": "   " }),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["verdict"]["status"], "banned", "weapon {weapon:?}");
        assert_eq!(body["verdict"]["item"], "doom-bow");
        assert_eq!(body["loadout"]["ability"], Value::Null);
        assert_eq!(body["loadout"]["ring"], Value::Null);
    }
}

#[tokio::test]
async fn check_route_treats_blank_slots_as_unequipped() {
    let router = requirement_router(loaded_service().await);

    let response = router
        .oneshot(post_json(
            "/api/v1/exalted/check",
            json!({ "class": "warrior", "weapon": "", "ability": "", "armor": "", "ring": "" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["verdict"]["status"], "ok");
    assert_eq!(body["verdict"]["points"], 0);
    assert_eq!(body["loadout"]["weapon"], Value::Null);
}

#[tokio::test]
async fn roster_route_rejects_invalid_player_name() {
    let router = requirement_router(loaded_service().await);

    let response = router
        .oneshot(post_json(
            "/api/v1/exalted/roster",
            json!({ "player": "not a name!", "characters": [] }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn roster_route_evaluates_characters() {
    let router = requirement_router(loaded_service().await);
    let payload = serde_json::to_value(roster_request()).expect("serializes");

    let response = router
        .oneshot(post_json("/api/v1/exalted/roster", payload))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["player"], "Oryx");
    let characters = body["characters"].as_array().expect("character list");
    assert_eq!(characters.len(), 2);
    assert_eq!(characters[0]["stats_maxed"], true);
    assert_eq!(characters[1]["verdict"]["status"], "banned");
}

#[tokio::test]
async fn classes_route_lists_every_threshold() {
    let service = Arc::new(ExaltedRequirementService::new(MemorySource::fixture()));
    let router = requirement_router(service);

    let response = router
        .oneshot(get("/api/v1/exalted/classes"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let classes = body.as_array().expect("class list");
    assert_eq!(classes.len(), 18);
    assert!(classes
        .iter()
        .any(|entry| entry["class"] == "priest" && entry["required"] == 5));
    assert!(classes
        .iter()
        .any(|entry| entry["class"] == "warrior" && entry["required"] == 0));
}

#[tokio::test]
async fn rules_status_handler_reports_ready_summary() {
    let service = loaded_service().await;

    let response = rules_status_handler::<MemorySource>(State(service)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["state"], "ready");
    assert_eq!(body["summary"]["catalog_items"], 17);
}
