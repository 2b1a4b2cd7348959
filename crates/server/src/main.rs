use std::{net::SocketAddr, sync::Arc};

use assistant::{Assistant, GeminiBackend};
use axum::{
    extract::{ws::WebSocket, Query, State, WebSocketUpgrade},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use portal::{DemoDirectory, OccupancySim, Schedule};
use serde::Deserialize;
use shared::{
    domain::{SessionId, User},
    error::{ApiError, ErrorCode},
    protocol::{
        AssistantReply, AssistantRequest, HomeView, LoginRequest, LoginResponse,
        OccupancySnapshot, PatientHome, QueueResponse, ServerEvent,
    },
};
use tokio::sync::broadcast;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{debug, info, warn};

mod api;
mod app_state;
mod config;

use api::ApiContext;
use app_state::{spawn_occupancy_ticker, AppState};
use config::load_settings;

const MAX_ASSISTANT_BODY_BYTES: usize = 256 * 1024;

type HttpError = (StatusCode, Json<ApiError>);

#[derive(Debug, Deserialize)]
struct SessionQuery {
    session_id: SessionId,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let assistant = match settings.gemini_config()? {
        Some(gemini) => {
            info!(model = %gemini.model, "assistant backend configured");
            Assistant::new(Arc::new(GeminiBackend::new(gemini)?))
        }
        None => {
            warn!("no Gemini API key configured; assistant will answer with fallback text");
            Assistant::unconfigured()
        }
    };

    let occupancy = settings.occupancy_config();
    let sim = OccupancySim::new(occupancy.seed);
    let api = ApiContext::new(
        Arc::new(DemoDirectory),
        assistant,
        Schedule::demo(),
        sim.snapshot(),
    )
    .with_session_idle(settings.session_idle());
    let state = AppState::new(api);
    let _ticker = spawn_occupancy_ticker(state.clone(), sim, occupancy.tick);
    let app = build_router(state);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, tick_ms = occupancy.tick.as_millis() as u64, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/login", post(http_login))
        .route("/logout", post(http_logout))
        .route("/home", get(http_home))
        .route("/check_in", post(http_check_in))
        .route("/queue", get(http_queue))
        .route("/occupancy", get(http_occupancy))
        .route(
            "/assistant/messages",
            post(http_assistant_message).layer(RequestBodyLimitLayer::new(MAX_ASSISTANT_BODY_BYTES)),
        )
        .route("/ws", get(ws_handler))
        .with_state(state)
}

fn http_error(err: ApiError) -> HttpError {
    let status = match err.code {
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    api::login(&state.api, req).await.map(Json).map_err(http_error)
}

async fn http_logout(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SessionQuery>,
) -> Result<StatusCode, HttpError> {
    api::logout(&state.api, q.session_id)
        .await
        .map_err(http_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn http_home(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SessionQuery>,
) -> Result<Json<HomeView>, HttpError> {
    api::home(&state.api, q.session_id)
        .await
        .map(Json)
        .map_err(http_error)
}

async fn http_check_in(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SessionQuery>,
) -> Result<Json<PatientHome>, HttpError> {
    api::check_in(&state.api, q.session_id)
        .await
        .map(Json)
        .map_err(http_error)
}

async fn http_queue(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SessionQuery>,
) -> Result<Json<QueueResponse>, HttpError> {
    api::queue(&state.api, q.session_id)
        .await
        .map(Json)
        .map_err(http_error)
}

async fn http_occupancy(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SessionQuery>,
) -> Result<Json<OccupancySnapshot>, HttpError> {
    api::occupancy(&state.api, q.session_id)
        .await
        .map(Json)
        .map_err(http_error)
}

async fn http_assistant_message(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SessionQuery>,
    Json(req): Json<AssistantRequest>,
) -> Result<Json<AssistantReply>, HttpError> {
    api::assistant_reply(&state.api, q.session_id, req)
        .await
        .map(Json)
        .map_err(http_error)
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(q): Query<SessionQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let user = api::authenticate_clinician(&state.api, q.session_id)
        .await
        .map_err(http_error)?;
    Ok(ws.on_upgrade(move |socket| ws_connection(state, socket, user)))
}

async fn ws_connection(state: Arc<AppState>, socket: WebSocket, user: User) {
    use axum::extract::ws::Message;
    use futures::{SinkExt, StreamExt};

    let (mut sender, mut receiver) = socket.split();
    let mut events_rx = state.events.subscribe();
    let initial = ServerEvent::OccupancyUpdated(state.api.occupancy.read().await.clone());
    info!(user_id = %user.id, "event stream opened");

    let send_task = tokio::spawn(async move {
        let mut next = Some(initial);
        loop {
            let event = match next.take() {
                Some(event) => event,
                None => match events_rx.recv().await {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "event stream lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            };
            let text = match serde_json::to_string(&event) {
                Ok(v) => v,
                Err(_) => continue,
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(_msg)) = receiver.next().await {}

    send_task.abort();
    info!(user_id = %user.id, "event stream closed");
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
