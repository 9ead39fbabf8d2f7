//! REST API handlers for the planner server
//!
//! All routes live under `/planer`. Successful responses carry the DTO
//! itself; failures carry an [`ErrorResponse`].

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::error::{Error, ErrorCategory};
use crate::export::CSV_CONTENT_TYPE;
use crate::planner::{PlannerError, SchedulePlanner};

use super::dto::{
    PairRoundDto, PairRoundsRequest, PairingDto, PlanDto, PlayerUsageDto, ScheduleConfigDto,
    ScheduleStatsDto,
};
use super::server::AppState;

// ============================================================================
// API Response Types
// ============================================================================

/// Error body returned by every failing route
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Handler failure with its HTTP status
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<PlannerError> for ApiError {
    fn from(err: PlannerError) -> Self {
        Error::from(err).into()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err.category() {
            ErrorCategory::Validation => Self::bad_request(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "Request failed");
        } else {
            tracing::warn!(status = %self.status, error = %self.message, "Request rejected");
        }
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Run `work` on the blocking pool while holding the planner lock
async fn with_planner<T, F>(state: &AppState, work: F) -> ApiResult<T>
where
    F: FnOnce(&mut SchedulePlanner) -> T + Send + 'static,
    T: Send + 'static,
{
    let mut planner = state.planner.clone().lock_owned().await;
    tokio::task::spawn_blocking(move || work(&mut *planner))
        .await
        .map_err(|e| ApiError::internal(format!("Planner task failed: {e}")))
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/planer/health", get(health_check))
        // Generation endpoints
        .route("/planer/generate", post(generate_schedule))
        .route("/planer/pairs", post(generate_pairs))
        // Query endpoints
        .route("/planer/statistics", get(get_statistics))
        .route("/planer/pairings", get(get_pairings))
        .route("/planer/player-usage", get(get_player_usage))
        .route("/planer/download", get(download_last_plan))
        .with_state(state)
}

// ============================================================================
// Health Handlers
// ============================================================================

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "OK".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

// ============================================================================
// Generation Handlers
// ============================================================================

/// Generate a plan and keep it as the last plan
async fn generate_schedule(
    State(state): State<AppState>,
    payload: Result<Json<ScheduleConfigDto>, JsonRejection>,
) -> ApiResult<Json<PlanDto>> {
    let Json(request) = payload?;
    tracing::info!(
        players = request.player_names.len(),
        rounds = request.number_of_rounds,
        "Received schedule generation request"
    );

    let config = request.into_config(state.default_players_per_round);
    let plan = with_planner(&state, move |planner| planner.generate(&config)).await??;

    Ok(Json(PlanDto::from(&plan)))
}

/// Generate rounds of pairs covering every player
async fn generate_pairs(
    State(state): State<AppState>,
    payload: Result<Json<PairRoundsRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<PairRoundDto>>> {
    let Json(request) = payload?;
    let rounds = with_planner(&state, move |planner| {
        planner.generate_pair_rounds(&request.player_names, request.number_of_rounds)
    })
    .await??;

    Ok(Json(PairRoundDto::from_rounds(rounds)?))
}

// ============================================================================
// Query Handlers
// ============================================================================

async fn get_statistics(State(state): State<AppState>) -> Json<ScheduleStatsDto> {
    let planner = state.planner.lock().await;
    Json(ScheduleStatsDto::new(
        &planner.statistics(),
        planner.fallback_count(),
    ))
}

async fn get_pairings(State(state): State<AppState>) -> Json<Vec<PairingDto>> {
    let pairings = state.planner.lock().await.all_pairings_sorted_by_frequency();
    Json(pairings.into_iter().map(PairingDto::from).collect())
}

async fn get_player_usage(State(state): State<AppState>) -> Json<Vec<PlayerUsageDto>> {
    let usage = state.planner.lock().await.per_player_usage_counts();
    Json(usage.into_iter().map(PlayerUsageDto::from).collect())
}

/// Last plan as a CSV attachment, also saved to the export directory
async fn download_last_plan(State(state): State<AppState>) -> ApiResult<Response> {
    let plan = state
        .planner
        .lock()
        .await
        .last_plan()
        .cloned()
        .ok_or_else(|| ApiError::not_found("No generated plan available for download"))?;

    let exporter = state.exporter.clone();
    let exported = tokio::task::spawn_blocking(move || exporter.write(&plan))
        .await
        .map_err(|e| ApiError::internal(format!("Export task failed: {e}")))??;

    Ok((
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", exported.filename),
            ),
        ],
        exported.content,
    )
        .into_response())
}

// ============================================================================
// Tests
// ============================================================================
