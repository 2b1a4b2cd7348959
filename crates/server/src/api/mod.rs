//! Request handling independent of the HTTP framework: session lookup,
//! role checks and the portal/assistant calls behind each route.

use std::{collections::HashMap, sync::Arc, time::Duration};

use assistant::Assistant;
use portal::{CredentialVerifier, Schedule};
use shared::{
    domain::{SessionId, User},
    error::{ApiError, ErrorCode},
    protocol::{
        AssistantReply, AssistantRequest, HomeView, LoginRequest, LoginResponse,
        OccupancySnapshot, PatientHome, QueueResponse,
    },
};
use tokio::{sync::RwLock, time::Instant};
use tracing::{info, warn};

/// Upper bound on a single assistant message.
pub const MAX_MESSAGE_CHARS: usize = 2_000;
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(12 * 60 * 60);

#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub user: User,
    last_seen: Instant,
}

impl SessionEntry {
    fn is_expired(&self, idle: Duration, now: Instant) -> bool {
        now.duration_since(self.last_seen) >= idle
    }
}

#[derive(Clone)]
pub struct ApiContext {
    pub verifier: Arc<dyn CredentialVerifier>,
    pub assistant: Assistant,
    pub sessions: Arc<RwLock<HashMap<SessionId, SessionEntry>>>,
    /// Sessions unused for this long are dropped.
    pub session_idle: Duration,
    pub schedule: Arc<RwLock<Schedule>>,
    pub occupancy: Arc<RwLock<OccupancySnapshot>>,
}

impl ApiContext {
    pub fn new(
        verifier: Arc<dyn CredentialVerifier>,
        assistant: Assistant,
        schedule: Schedule,
        occupancy: OccupancySnapshot,
    ) -> Self {
        Self {
            verifier,
            assistant,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            session_idle: DEFAULT_SESSION_IDLE,
            schedule: Arc::new(RwLock::new(schedule)),
            occupancy: Arc::new(RwLock::new(occupancy)),
        }
    }

    pub fn with_session_idle(mut self, idle: Duration) -> Self {
        self.session_idle = idle;
        self
    }
}

pub async fn login(ctx: &ApiContext, req: LoginRequest) -> Result<LoginResponse, ApiError> {
    let user = ctx
        .verifier
        .verify(req.username.trim(), &req.password)
        .await
        .map_err(|error| {
            warn!(username = %req.username, %error, "login rejected");
            ApiError::unauthorized(error.user_message(req.language))
        })?;

    let session_id = SessionId::random();
    let now = Instant::now();
    let mut sessions = ctx.sessions.write().await;
    let before = sessions.len();
    sessions.retain(|_, entry| !entry.is_expired(ctx.session_idle, now));
    if sessions.len() < before {
        info!(dropped = before - sessions.len(), "expired sessions pruned");
    }
    sessions.insert(
        session_id,
        SessionEntry {
            user: user.clone(),
            last_seen: now,
        },
    );
    drop(sessions);
    info!(%session_id, user_id = %user.id, role = ?user.role, "session opened");
    Ok(LoginResponse { session_id, user })
}

pub async fn logout(ctx: &ApiContext, session_id: SessionId) -> Result<(), ApiError> {
    match ctx.sessions.write().await.remove(&session_id) {
        Some(entry) => {
            info!(%session_id, user_id = %entry.user.id, "session closed");
            Ok(())
        }
        None => Err(unknown_session()),
    }
}

/// Resolves a live session and marks it as used.
pub async fn authenticate(ctx: &ApiContext, session_id: SessionId) -> Result<User, ApiError> {
    let now = Instant::now();
    let mut sessions = ctx.sessions.write().await;
    let entry = sessions.get_mut(&session_id).ok_or_else(unknown_session)?;
    if entry.is_expired(ctx.session_idle, now) {
        sessions.remove(&session_id);
        info!(%session_id, "session expired");
        return Err(unknown_session());
    }
    entry.last_seen = now;
    Ok(entry.user.clone())
}

pub async fn authenticate_clinician(
    ctx: &ApiContext,
    session_id: SessionId,
) -> Result<User, ApiError> {
    let user = authenticate(ctx, session_id).await?;
    if !user.role.is_clinician() {
        return Err(ApiError::forbidden("clinician access required"));
    }
    Ok(user)
}

pub async fn home(ctx: &ApiContext, session_id: SessionId) -> Result<HomeView, ApiError> {
    let user = authenticate(ctx, session_id).await?;
    Ok(ctx.schedule.read().await.home_view(&user))
}

/// Repeated check-ins succeed without changing anything.
pub async fn check_in(ctx: &ApiContext, session_id: SessionId) -> Result<PatientHome, ApiError> {
    let user = authenticate(ctx, session_id).await?;
    if user.role.is_clinician() {
        return Err(ApiError::forbidden("only patients can check in"));
    }
    let mut schedule = ctx.schedule.write().await;
    schedule.check_in();
    match schedule.home_view(&user) {
        HomeView::Patient(home) => Ok(home),
        HomeView::Clinician(_) => Err(internal("patient resolved to clinician view")),
    }
}

pub async fn queue(ctx: &ApiContext, session_id: SessionId) -> Result<QueueResponse, ApiError> {
    authenticate_clinician(ctx, session_id).await?;
    Ok(ctx.schedule.read().await.queue_response())
}

pub async fn occupancy(
    ctx: &ApiContext,
    session_id: SessionId,
) -> Result<OccupancySnapshot, ApiError> {
    authenticate_clinician(ctx, session_id).await?;
    Ok(ctx.occupancy.read().await.clone())
}

pub async fn assistant_reply(
    ctx: &ApiContext,
    session_id: SessionId,
    req: AssistantRequest,
) -> Result<AssistantReply, ApiError> {
    authenticate(ctx, session_id).await?;
    let message = req.message.trim();
    if message.is_empty() {
        return Err(ApiError::validation("message cannot be empty"));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ApiError::validation(format!(
            "message exceeds {MAX_MESSAGE_CHARS} characters"
        )));
    }
    let reply = ctx
        .assistant
        .reply(&req.history, message, req.language)
        .await;
    Ok(AssistantReply { reply })
}

fn unknown_session() -> ApiError {
    ApiError::unauthorized("unknown or expired session")
}

fn internal(message: &str) -> ApiError {
    ApiError::new(ErrorCode::Internal, message)
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
