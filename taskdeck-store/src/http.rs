//! HTTP surface of the task store.
//!
//! Four JSON routes over an axum router:
//!
//! - `GET  /tasks/{userId}` — tasks assigned to a user
//! - `POST /tasks` — create a task
//! - `PUT  /tasks/{taskId}` — update lifecycle status
//! - `PUT  /tasks/{taskId}/timer` — apply a timer transition
//!
//! Validation failures and timer state conflicts map to 400 with a typed
//! [`ErrorBody`]; unknown tasks map to 404. The clock is read once per
//! request here and injected into the store, which keeps everything below
//! this layer deterministic.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use taskdeck_proto::api::{
    CreateTaskRequest, ErrorBody, ErrorCode, TimerRequest, UpdateStatusRequest,
};
use taskdeck_proto::task::{Task, TaskId, UserId};
use taskdeck_proto::timer::{TimerError, TimerUpdate};

use crate::store::{StoreError, TaskStore};

/// Shared server state.
pub struct AppState {
    /// The task map all handlers operate on.
    pub store: TaskStore,
}

/// An HTTP-mapped request failure.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed request: bad ids, missing fields, unknown action.
    #[error("{0}")]
    Invalid(String),
    /// Task does not exist.
    #[error("task not found")]
    NotFound,
    /// Timer state conflict.
    #[error(transparent)]
    Timer(#[from] TimerError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound,
            StoreError::Invalid(msg) => Self::Invalid(msg),
            StoreError::Timer(e) => Self::Timer(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::Invalid(_) => (StatusCode::BAD_REQUEST, ErrorCode::InvalidRequest),
            Self::NotFound => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            Self::Timer(TimerError::AlreadyRunning) => {
                (StatusCode::BAD_REQUEST, ErrorCode::AlreadyRunning)
            }
            Self::Timer(TimerError::NotRunning) => (StatusCode::BAD_REQUEST, ErrorCode::NotRunning),
        };
        let body = ErrorBody::new(code, self.to_string());
        (status, Json(body)).into_response()
    }
}

/// Milliseconds since the Unix epoch.
fn now_ms() -> u64 {
    u64::try_from(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis(),
    )
    .unwrap_or(u64::MAX)
}

/// `GET /tasks/{userId}`
async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let user: UserId = user_id
        .parse()
        .map_err(|_| ApiError::Invalid("invalid user id".to_string()))?;
    let tasks = state.store.tasks_for_user(user).await;
    tracing::debug!(user = %user, count = tasks.len(), "listed tasks");
    Ok(Json(tasks))
}

/// `POST /tasks`
async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state.store.create(&req, now_ms()).await?;
    tracing::info!(task_id = %task.id, assigned_to = %task.assigned_to, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// `PUT /tasks/{taskId}`
async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Task>, ApiError> {
    let task_id: TaskId = task_id
        .parse()
        .map_err(|_| ApiError::Invalid("invalid task id".to_string()))?;
    let task = state.store.update_status(task_id, req.status).await?;
    tracing::info!(task_id = %task_id, status = %req.status, "status updated");
    Ok(Json(task))
}

/// `PUT /tasks/{taskId}/timer`
///
/// Validates the request before invoking the timer engine; only a request
/// with well-formed ids, a known action, and a body `taskId` matching the
/// path ever reaches the store.
async fn update_timer(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
    Json(req): Json<TimerRequest>,
) -> Result<Json<TimerUpdate>, ApiError> {
    let path_id: TaskId = task_id
        .parse()
        .map_err(|_| ApiError::Invalid("invalid task id".to_string()))?;
    let (body_id, action, actor) = req.validate().map_err(ApiError::Invalid)?;
    if body_id != path_id {
        return Err(ApiError::Invalid(
            "body taskId does not match path".to_string(),
        ));
    }

    let update = state.store.apply_timer(path_id, action, actor, now_ms()).await;
    match &update {
        Ok(u) => tracing::info!(
            task_id = %path_id,
            action = %action,
            actor = %actor,
            time_spent = u.time_spent_secs,
            "timer transition applied"
        ),
        Err(e) => tracing::debug!(task_id = %path_id, action = %action, error = %e, "timer transition rejected"),
    }
    Ok(Json(update?))
}

/// Builds the task store router over the given state.
#[must_use]
pub fn router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route(
            "/tasks/{id}",
            axum::routing::get(list_tasks).put(update_status),
        )
        .route("/tasks", axum::routing::post(create_task))
        .route("/tasks/{id}/timer", axum::routing::put(update_timer))
        .with_state(state)
}

/// Starts the store server with a fresh empty state.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let state = Arc::new(AppState {
        store: TaskStore::new(),
    });
    start_server_with_state(addr, state).await
}

/// Starts the store server with a pre-configured [`AppState`].
///
/// Returns the bound address (useful with port 0 in tests) and the serve
/// task's [`tokio::task::JoinHandle`].
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<AppState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "task store server error");
        }
    });

    Ok((bound_addr, handle))
}
