use super::*;
use assistant::{CompletionBackend, CompletionError, CompletionRequest};
use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::Request,
};
use shared::domain::{Language, UserRole};
use std::time::Duration;
use tower::ServiceExt;

struct FailingBackend;

#[async_trait]
impl CompletionBackend for FailingBackend {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, CompletionError> {
        Err(CompletionError::Malformed("offline".into()))
    }
}

fn test_state() -> Arc<AppState> {
    let api = ApiContext::new(
        Arc::new(DemoDirectory),
        Assistant::new(Arc::new(FailingBackend)),
        Schedule::demo(),
        OccupancySim::new(Some(11)).snapshot(),
    );
    AppState::new(api)
}

fn test_app() -> Router {
    build_router(test_state())
}

async fn json_body<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

async fn login_as(app: &Router, username: &str, password: &str) -> axum::response::Response {
    let request = Request::post("/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "username": username, "password": password }).to_string(),
        ))
        .expect("request");
    app.clone().oneshot(request).await.expect("response")
}

async fn session_for(app: &Router, username: &str) -> SessionId {
    let response = login_as(app, username, username).await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body::<LoginResponse>(response).await.session_id
}

async fn get_uri(app: &Router, uri: String) -> axum::response::Response {
    let request = Request::get(uri).body(Body::empty()).expect("request");
    app.clone().oneshot(request).await.expect("response")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let response = get_uri(&test_app(), "/healthz".into()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn login_returns_session_and_user() {
    let app = test_app();
    let response = login_as(&app, "personnel", "personnel").await;
    assert_eq!(response.status(), StatusCode::OK);
    let dto: LoginResponse = json_body(response).await;
    assert_eq!(dto.user.role, UserRole::Personnel);
    assert_eq!(dto.user.name, "Sarah Staff");
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let response = login_as(&test_app(), "sophie", "wrong").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let err: ApiError = json_body(response).await;
    assert_eq!(err.code, ErrorCode::Unauthorized);
    assert_eq!(err.message, "Invalid credentials. Please try again.");
}

#[tokio::test]
async fn home_view_depends_on_role() {
    let app = test_app();

    let patient = session_for(&app, "sophie").await;
    let response = get_uri(&app, format!("/home?session_id={patient}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    match json_body::<HomeView>(response).await {
        HomeView::Patient(home) => {
            assert_eq!(home.greeting_name, "Sophie");
            assert_eq!(home.status.delay_minutes, 25);
        }
        other => panic!("unexpected home view: {other:?}"),
    }

    let doctor = session_for(&app, "doctor").await;
    let response = get_uri(&app, format!("/home?session_id={doctor}")).await;
    match json_body::<HomeView>(response).await {
        HomeView::Clinician(home) => assert_eq!(home.queue.stats.critical_cases, 1),
        other => panic!("unexpected home view: {other:?}"),
    }
}

#[tokio::test]
async fn unknown_session_is_unauthorized() {
    let response = get_uri(
        &test_app(),
        format!("/home?session_id={}", SessionId::random()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn queue_and_occupancy_are_clinician_only() {
    let app = test_app();
    let patient = session_for(&app, "sophie").await;
    assert_eq!(
        get_uri(&app, format!("/queue?session_id={patient}")).await.status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        get_uri(&app, format!("/occupancy?session_id={patient}"))
            .await
            .status(),
        StatusCode::FORBIDDEN
    );

    let staff = session_for(&app, "personnel").await;
    let response = get_uri(&app, format!("/queue?session_id={staff}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let queue: QueueResponse = json_body(response).await;
    assert_eq!(queue.entries.len(), 6);

    let response = get_uri(&app, format!("/occupancy?session_id={staff}")).await;
    let snapshot: OccupancySnapshot = json_body(response).await;
    assert_eq!(snapshot.zones.len(), 5);
}

#[tokio::test]
async fn check_in_then_logout() {
    let app = test_app();
    let patient = session_for(&app, "sophie").await;

    let request = Request::post(format!("/check_in?session_id={patient}"))
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let home: PatientHome = json_body(response).await;
    assert!(home.checked_in);

    let request = Request::post(format!("/logout?session_id={patient}"))
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(
        get_uri(&app, format!("/home?session_id={patient}")).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn assistant_failure_still_answers() {
    let app = test_app();
    let patient = session_for(&app, "sophie").await;
    let request = Request::post(format!("/assistant/messages?session_id={patient}"))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "message": "Is my mutuelle accepted?", "language": "fr" })
                .to_string(),
        ))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let reply: AssistantReply = json_body(response).await;
    assert_eq!(
        reply.reply,
        assistant::prompts::apology(Language::Fr)
    );
}

#[tokio::test]
async fn blank_assistant_message_is_rejected() {
    let app = test_app();
    let patient = session_for(&app, "sophie").await;
    let request = Request::post(format!("/assistant/messages?session_id={patient}"))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "message": "  " }).to_string(),
        ))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ticker_publishes_and_stores_snapshots() {
    let state = test_state();
    let mut events = state.events.subscribe();
    let ticker = spawn_occupancy_ticker(
        state.clone(),
        OccupancySim::new(Some(5)),
        Duration::from_millis(10),
    );

    let event = tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("tick in time")
        .expect("event");
    let ServerEvent::OccupancyUpdated(snapshot) = event;
    assert_eq!(snapshot.tick, 1);
    assert!(state.api.occupancy.read().await.tick >= 1);

    ticker.abort();
}

#[test]
fn every_error_code_has_a_status() {
    let cases = [
        (ErrorCode::Unauthorized, StatusCode::UNAUTHORIZED),
        (ErrorCode::Forbidden, StatusCode::FORBIDDEN),
        (ErrorCode::Validation, StatusCode::BAD_REQUEST),
        (ErrorCode::Internal, StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, status) in cases {
        let (got, Json(body)) = http_error(ApiError::new(code, "x"));
        assert_eq!(got, status);
        assert_eq!(body.code, code);
    }
}
