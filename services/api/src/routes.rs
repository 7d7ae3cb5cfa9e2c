//! JSON endpoints mapping the five interview actions onto HTTP.
//!
//! Each session sits behind its own mutex, so actions on one session run one
//! at a time while other sessions proceed independently.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use interview_core::{
    Feedback, InterviewConfig, InterviewError, InterviewSession, Interviewer, QaRecord,
    SessionStatus,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tokio::time::Instant;
use uuid::Uuid;

/// A session and the last time a request touched it.
pub struct SessionSlot {
    session: InterviewSession,
    last_used: Instant,
}

/// Sessions live until they are deleted or [`AppState::evict_idle`] drops
/// them, so the server must run the sweep to bound memory.
pub struct AppState {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<SessionSlot>>>>,
    interviewer: Arc<dyn Interviewer>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(interviewer: Arc<dyn Interviewer>) -> SharedState {
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
            interviewer,
        })
    }

    async fn session(&self, id: Uuid) -> Result<OwnedMutexGuard<SessionSlot>, ApiError> {
        let slot = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ApiError::NotFound(id))?;
        let mut slot = slot.lock_owned().await;
        slot.last_used = Instant::now();
        Ok(slot)
    }

    /// Drops sessions untouched for at least `max_idle`. Sessions with a
    /// request in flight are kept. Returns how many were dropped.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, slot| match slot.try_lock() {
            Ok(slot) => slot.last_used.elapsed() < max_idle,
            Err(_) => true,
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(
                "Evicted {} idle interview sessions, {} remain",
                evicted,
                sessions.len()
            );
        }
        evicted
    }
}

/// Everything a frontend needs to render a session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub config: InterviewConfig,
    pub status: SessionStatus,
    pub question_number: u32,
    pub current_question: Option<String>,
    pub history: Vec<QaRecord>,
    pub skipped: u32,
    pub feedback: Option<Feedback>,
}

impl SessionView {
    fn of(id: Uuid, session: &InterviewSession) -> Self {
        Self {
            id,
            config: session.config().clone(),
            status: session.status(),
            question_number: session.question_number(),
            current_question: session.current_question().map(str::to_string),
            history: session.history().to_vec(),
            skipped: session.skipped(),
            feedback: session.feedback().cloned(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub answer: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("no interview session with id {0}")]
    NotFound(Uuid),
    #[error(transparent)]
    Interview(#[from] InterviewError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Interview(InterviewError::EmptyAnswer)
            | ApiError::Interview(InterviewError::InvalidConfig(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Interview(InterviewError::IllegalTransition { .. }) => StatusCode::CONFLICT,
            ApiError::Interview(InterviewError::ModelCall(_))
            | ApiError::Interview(InterviewError::ModelUnavailable) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

pub async fn create_session(
    State(state): State<SharedState>,
    Json(config): Json<InterviewConfig>,
) -> ApiResult<(StatusCode, Json<SessionView>)> {
    config.validate()?;
    let id = Uuid::new_v4();
    let session = InterviewSession::new(config);
    let view = SessionView::of(id, &session);
    let slot = SessionSlot {
        session,
        last_used: Instant::now(),
    };
    state
        .sessions
        .write()
        .await
        .insert(id, Arc::new(Mutex::new(slot)));
    tracing::info!("Created interview session {}", id);
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionView>> {
    let slot = state.session(id).await?;
    Ok(Json(SessionView::of(id, &slot.session)))
}

pub async fn delete_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .sessions
        .write()
        .await
        .remove(&id)
        .ok_or(ApiError::NotFound(id))?;
    tracing::info!("Deleted interview session {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn start(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionView>> {
    let mut slot = state.session(id).await?;
    slot.session.start(&*state.interviewer).await?;
    Ok(Json(SessionView::of(id, &slot.session)))
}

pub async fn submit(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitRequest>,
) -> ApiResult<Json<SessionView>> {
    let mut slot = state.session(id).await?;
    slot.session
        .submit(&*state.interviewer, &request.answer)
        .await?;
    Ok(Json(SessionView::of(id, &slot.session)))
}

pub async fn skip(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionView>> {
    let mut slot = state.session(id).await?;
    slot.session.skip(&*state.interviewer).await?;
    Ok(Json(SessionView::of(id, &slot.session)))
}

pub async fn feedback(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionView>> {
    let mut slot = state.session(id).await?;
    slot.session
        .generate_feedback(&*state.interviewer)
        .await?;
    Ok(Json(SessionView::of(id, &slot.session)))
}

pub async fn restart(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionView>> {
    let mut slot = state.session(id).await?;
    slot.session.restart();
    Ok(Json(SessionView::of(id, &slot.session)))
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(delete_session))
        .route("/sessions/{id}/start", post(start))
        .route("/sessions/{id}/submit", post(submit))
        .route("/sessions/{id}/skip", post(skip))
        .route("/sessions/{id}/feedback", post(feedback))
        .route("/sessions/{id}/restart", post(restart))
        .with_state(state)
}
