// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Integration tests for the HTTP surface
//!
//! Requests go through the full filter chain with `warp::test`, so
//! authorization, body parsing and error mapping are all exercised.

use flexfit_genai_worker::config::{BackendFailurePolicy, HttpConfig};
use flexfit_genai_worker::knowledge::InMemoryKnowledgeBase;
use flexfit_genai_worker::planner::{GeneratorSettings, WorkoutPlanGenerator};
use flexfit_genai_worker::routes::{routes, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use warp::http::StatusCode;

const AUTH: &str = "Bearer test-token";

fn state_with(generator: WorkoutPlanGenerator) -> AppState {
    AppState::new(generator, HttpConfig::default())
}

fn mock_state() -> AppState {
    state_with(
        WorkoutPlanGenerator::new(GeneratorSettings::default())
            .with_knowledge(Some(Arc::new(InMemoryKnowledgeBase::seeded()))),
    )
}

fn daily_body() -> Value {
    json!({
        "user_profile": {"age": 28, "gender": "MALE"},
        "user_preferences": {"experienceLevel": "BEGINNER"},
        "daily_focus": {
            "day_date": "2025-06-30",
            "focus_sport_type_for_the_day": "STRENGTH",
            "target_total_duration_minutes": 45
        },
        "last_7_days_exercises": [],
        "text_prompt": ""
    })
}

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn test_health_needs_no_authorization() {
    let api = routes(mock_state());

    let response = warp::test::request()
        .method("GET")
        .path("/health")
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.body());
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "genai-workout-worker");
    assert_eq!(body["mode"], "mock");
    assert_eq!(body["knowledge_base"], true);
}

#[tokio::test]
async fn test_readiness_reports_unhealthy_without_backend() {
    let settings = GeneratorSettings {
        mock_mode: false,
        on_backend_failure: BackendFailurePolicy::Fail,
        ..GeneratorSettings::default()
    };
    let api = routes(state_with(WorkoutPlanGenerator::new(settings)));

    let response = warp::test::request()
        .method("GET")
        .path("/ready")
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response.body())["status"], "unhealthy");
}

#[tokio::test]
async fn test_generate_requires_authorization() {
    let api = routes(mock_state());

    let response = warp::test::request()
        .method("POST")
        .path("/generate")
        .json(&daily_body())
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response.body())["error"], "unauthorized");

    let response = warp::test::request()
        .method("POST")
        .path("/generate")
        .header("authorization", "   ")
        .json(&daily_body())
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_authorization_can_be_disabled() {
    let http = HttpConfig {
        require_authorization: false,
        ..HttpConfig::default()
    };
    let api = routes(AppState::new(
        WorkoutPlanGenerator::new(GeneratorSettings::default()),
        http,
    ));

    let response = warp::test::request()
        .method("POST")
        .path("/generate")
        .json(&daily_body())
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_generate_daily_plan() {
    let api = routes(mock_state());

    let response = warp::test::request()
        .method("POST")
        .path("/generate")
        .header("authorization", AUTH)
        .json(&daily_body())
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.body());
    let workout = &body["daily_workout"];
    assert_eq!(workout["day_date"], "2025-06-30");
    assert_eq!(workout["focus_sport_type_for_the_day"], "STRENGTH");
    assert_eq!(workout["target_total_duration_minutes"], 45);
    assert_eq!(workout["scheduled_exercises"][0]["exercise_name"], "Push-ups");
    assert_eq!(workout["scheduled_exercises"][0]["sequence_order"], 1);
    assert_eq!(workout["scheduled_exercises"][0]["difficulty"], "BEGINNER");
    assert!(workout["markdown_content"].as_str().unwrap().starts_with('#'));
}

#[tokio::test]
async fn test_generate_rejects_invalid_requests() {
    let api = routes(mock_state());

    let mut missing_focus = daily_body();
    missing_focus.as_object_mut().unwrap().remove("daily_focus");
    let response = warp::test::request()
        .method("POST")
        .path("/generate")
        .header("authorization", AUTH)
        .json(&missing_focus)
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response.body());
    assert_eq!(body["error"], "missing_field");
    assert!(body["message"].as_str().unwrap().contains("daily_focus"));

    let mut negative_age = daily_body();
    negative_age["user_profile"]["age"] = json!(-1);
    let response = warp::test::request()
        .method("POST")
        .path("/generate")
        .header("authorization", AUTH)
        .json(&negative_age)
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response.body())["error"], "invalid_value");

    let response = warp::test::request()
        .method("POST")
        .path("/generate")
        .header("authorization", AUTH)
        .header("content-type", "application/json")
        .body("{not json")
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response.body())["error"], "invalid_body");
}

#[tokio::test]
async fn test_generate_weekly_plan() {
    let api = routes(mock_state());

    let response = warp::test::request()
        .method("POST")
        .path("/generate-weekly")
        .header("authorization", AUTH)
        .json(&json!({
            "user_profile": {"date_of_birth": "1990-04-12"},
            "user_preferences": {"experienceLevel": "ADVANCED"},
            "text_prompt": "",
            "last_7_days_exercises": []
        }))
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.body());
    let workouts = body["workouts"].as_array().unwrap();
    assert_eq!(workouts.len(), 7);
    assert!(workouts
        .iter()
        .any(|w| w["focus_sport_type_for_the_day"] == "REST"
            && w["scheduled_exercises"].as_array().unwrap().is_empty()));
}

#[tokio::test]
async fn test_backend_outage_maps_to_service_unavailable() {
    let settings = GeneratorSettings {
        mock_mode: false,
        ..GeneratorSettings::default()
    };
    let api = routes(state_with(WorkoutPlanGenerator::new(settings)));

    let response = warp::test::request()
        .method("POST")
        .path("/generate")
        .header("authorization", AUTH)
        .json(&daily_body())
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response.body());
    assert_eq!(body["error"], "backend_unavailable");
    assert!(!body["message"].as_str().unwrap().contains("configured"));
}

#[tokio::test]
async fn test_knowledge_search() {
    let api = routes(mock_state());

    let response = warp::test::request()
        .method("GET")
        .path("/knowledge/search?query=hiit%20recovery%20sessions&sport_type=HIIT&limit=2")
        .header("authorization", AUTH)
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.body());
    assert_eq!(body["query"], "hiit recovery sessions");
    assert_eq!(body["sport_type"], "HIIT");
    assert_eq!(body["service"], "flexfit-knowledge-base");
    let results = body["results"].as_array().unwrap();
    assert!(!results.is_empty());
    assert!(results.len() <= 2);
    for hit in results {
        let sport = hit["metadata"]["sport_type"].as_str().unwrap();
        assert!(sport == "HIIT" || sport == "ALL");
    }
}

#[tokio::test]
async fn test_knowledge_search_errors() {
    let api = routes(mock_state());
    let response = warp::test::request()
        .method("GET")
        .path("/knowledge/search?sport_type=HIIT")
        .header("authorization", AUTH)
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let api = routes(state_with(WorkoutPlanGenerator::new(
        GeneratorSettings::default(),
    )));
    let response = warp::test::request()
        .method("GET")
        .path("/knowledge/search?query=squat")
        .header("authorization", AUTH)
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body_json(response.body())["error"],
        "knowledge_base_unavailable"
    );
}

#[tokio::test]
async fn test_unknown_route() {
    let api = routes(mock_state());

    let response = warp::test::request()
        .method("GET")
        .path("/does-not-exist")
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response.body())["error"], "not_found");
}

#[tokio::test]
async fn test_knowledge_search_uses_configured_default_limit() {
    let settings = GeneratorSettings {
        knowledge_limit: 1,
        ..GeneratorSettings::default()
    };
    let api = routes(state_with(
        WorkoutPlanGenerator::new(settings)
            .with_knowledge(Some(Arc::new(InMemoryKnowledgeBase::seeded()))),
    ));

    let response = warp::test::request()
        .method("GET")
        .path("/knowledge/search?query=hiit%20recovery%20sessions")
        .header("authorization", AUTH)
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response.body())["results"].as_array().unwrap().len(), 1);

    let response = warp::test::request()
        .method("GET")
        .path("/knowledge/search?query=hiit%20recovery%20sessions&limit=3")
        .header("authorization", AUTH)
        .reply(&api)
        .await;
    assert!(body_json(response.body())["results"].as_array().unwrap().len() > 1);
}
