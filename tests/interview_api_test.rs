use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use interview_backend::{
    build_router, database::MemoryStore, services::llm_service::LlmService, AppState,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

const BOUNDARY: &str = "interview-test-boundary";

fn app_with(question_count: usize, rps: u32) -> Router {
    let state = AppState::new(Arc::new(MemoryStore::new()), LlmService::disabled(), question_count)
        .expect("app state");
    build_router(state, rps)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let res = app.clone().oneshot(req).await.expect("response");
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null);
    (status, body)
}

fn json_request(method: &str, uri: &str, body: JsonValue) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

fn multipart_request(fields: &[(&str, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    Request::builder()
        .method("POST")
        .uri("/resume/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

async fn create_candidate(app: &Router) -> Uuid {
    let (status, body) = send(
        app,
        multipart_request(&[
            ("linkedin_url", "https://www.linkedin.com/in/jane-doe"),
            ("name", "Jane Doe"),
            ("email", "jane@example.com"),
        ]),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "upload failed: {}", body);
    assert_eq!(body["skills"], json!([]));
    body["candidate_id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .expect("candidate id")
}

#[tokio::test]
async fn interview_flow_end_to_end() {
    let app = app_with(3, 1000);
    let candidate_id = create_candidate(&app).await;

    let (status, candidate) = send(&app, get(&format!("/candidates/{}", candidate_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(candidate["name"], "Jane Doe");

    let (status, started) = send(
        &app,
        json_request("POST", "/interview/start", json!({ "candidate_id": candidate_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "start failed: {}", started);
    assert_eq!(started["status"], "started");
    assert_eq!(started["total_questions"], 3);
    assert!(started["question"].is_string());
    let interview_id = started["interview_id"].as_str().expect("interview id").to_string();

    let mut scores = Vec::new();
    for step in 0..3 {
        let (status, next) = send(
            &app,
            json_request(
                "POST",
                "/interview/next",
                json!({
                    "interview_id": interview_id,
                    "answer": "I implemented a caching layer for our project, because latency mattered."
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "advance failed: {}", next);
        let score = next["score"]["score"].as_f64().expect("score");
        assert!((0.0..=10.0).contains(&score));
        assert!(next["score"]["technical_depth"].is_number());
        scores.push(score);

        if step < 2 {
            assert!(next["question"].is_string());
            assert!(next.get("message").is_none());
        } else {
            assert_eq!(next["message"], "Interview complete");
            assert!(next.get("question").is_none());
        }
    }

    let (status, overrun) = send(
        &app,
        json_request(
            "POST",
            "/interview/next",
            json!({ "interview_id": interview_id, "answer": "one more" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overrun, json!({ "message": "Interview already complete" }));

    let (status, progress) = send(&app, get(&format!("/interview/{}", interview_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["state"], "completed");
    assert_eq!(progress["answered"], 3);
    assert!(progress["current_question"].is_null());
    assert!(progress["pacing"]["difficulty"].is_string());

    let (status, report) = send(&app, get(&format!("/report/{}/data", interview_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["candidate_name"], "Jane Doe");
    assert_eq!(report["role"], "Software Engineer");
    assert_eq!(report["answers"].as_array().map(|a| a.len()), Some(3));
    let expected_avg = (scores.iter().sum::<f64>() / scores.len() as f64 * 10.0).round() / 10.0;
    assert_eq!(report["average_score"].as_f64(), Some(expected_avg));
    assert!(report["hiring_recommendation"].is_string());
    assert!(report["category_analysis"]["communication"].is_string());

    let res = app
        .clone()
        .oneshot(get(&format!("/report/{}", interview_id)))
        .await
        .expect("response");
    assert_eq!(res.status(), StatusCode::OK);
    let disposition = res
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains(&format!("interview_report_{}.xlsx", interview_id)));
    let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
    assert_eq!(&bytes[..2], b"PK");
}

#[tokio::test]
async fn report_before_any_answer_is_incomplete() {
    let app = app_with(2, 1000);
    let candidate_id = create_candidate(&app).await;
    let (_, started) = send(
        &app,
        json_request(
            "POST",
            "/interview/start",
            json!({ "candidate_id": candidate_id, "role": "Data Scientist" }),
        ),
    )
    .await;
    let interview_id = started["interview_id"].as_str().expect("interview id").to_string();

    let (status, report) = send(&app, get(&format!("/report/{}/data", interview_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["hiring_recommendation"], "incomplete");
    assert_eq!(report["potential"], "unknown");
    assert_eq!(report["average_score"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn invalid_payloads_are_rejected() {
    let app = app_with(2, 1000);
    let candidate_id = create_candidate(&app).await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/interview/start",
            json!({ "candidate_id": candidate_id, "role": "x".repeat(201) }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, started) = send(
        &app,
        json_request("POST", "/interview/start", json!({ "candidate_id": candidate_id })),
    )
    .await;
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/interview/next",
            json!({ "interview_id": started["interview_id"], "answer": "" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, multipart_request(&[("name", "Nobody")])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = app_with(2, 1000);
    let missing = Uuid::new_v4();

    let (status, _) = send(&app, get(&format!("/candidates/{}", missing))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request("POST", "/interview/start", json!({ "candidate_id": missing })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/interview/next",
            json!({ "interview_id": missing, "answer": "hello" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get(&format!("/interview/{}", missing))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get(&format!("/report/{}/data", missing))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Interview not found");
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = app_with(2, 1000);

    let (status, health) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["llm_enabled"], false);

    let (status, doc) = send(&app, get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/interview/start"].is_object());
    assert!(doc["paths"]["/report/{id}/data"].is_object());
}

#[tokio::test]
async fn public_routes_are_rate_limited() {
    let app = app_with(2, 1);
    let missing = Uuid::new_v4();

    let (status, _) = send(&app, get(&format!("/candidates/{}", missing))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get(&format!("/candidates/{}", missing))).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "rate_limit_exceeded");

    let (status, _) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}
