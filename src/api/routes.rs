//! Route handlers.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::error::{ApiError, ApiResult};
use super::state::AppState;
use crate::auth::verify;
use crate::event::{normalize, LogBatch, RawLogEvent};
use crate::replay::ReplaySummary;
use crate::sink::{dispatch, DispatchOutcome};

/// Build the service router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/ingest", post(ingest))
        .route("/v1/replay", post(replay))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Ingest request body: exactly one of `event` / `events`.
#[derive(Debug, Deserialize)]
struct IngestRequest {
    #[serde(default)]
    event: Option<RawLogEvent>,
    #[serde(default)]
    events: Option<Vec<RawLogEvent>>,
}

/// Minimal ingest acknowledgement.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IngestAck {
    status: &'static str,
    request_id: String,
    events: usize,
}

/// Liveness response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: String,
}

/// `POST /v1/ingest` — verify, normalize, dispatch, dead-letter on failure.
///
/// Returns 200 even when the batch had to be dead-lettered: the data is
/// durably stored, which is the caller-visible contract. Only auth,
/// validation, and a failed DLQ write are hard failures.
async fn ingest(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<IngestAck>> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let identity = verify(authorization, &state.secret)?;

    let request: IngestRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {}", e)))?;

    let raw_events = match (request.event, request.events) {
        (Some(event), None) => vec![event],
        (None, Some(events)) if !events.is_empty() => events,
        (None, Some(_)) => {
            return Err(ApiError::BadRequest("events must be non-empty".into()))
        }
        (Some(_), Some(_)) => {
            return Err(ApiError::BadRequest(
                "exactly one of event/events must be set, not both".into(),
            ))
        }
        (None, None) => {
            return Err(ApiError::BadRequest(
                "one of event/events must be set".into(),
            ))
        }
    };

    // Normalization is total: nothing a client sends past this point can
    // fail the request except a DLQ outage.
    let events = raw_events
        .into_iter()
        .map(|raw| normalize(raw, &identity))
        .collect();
    let batch = LogBatch::new(events, identity);
    let request_id = batch.request_id.clone();
    let count = batch.events.len();

    if let DispatchOutcome::Failed { reason, undelivered } =
        dispatch(&batch, state.sink.as_ref()).await
    {
        let key = state
            .dlq
            .put(&undelivered)
            .await
            .map_err(|e| ApiError::Internal(format!("dead-letter write failed: {}", e)))?;
        warn!(%request_id, %key, %reason, "batch dead-lettered after sink failure");
    }

    Ok(Json(IngestAck { status: "accepted", request_id, events: count }))
}

/// `POST /v1/replay` — run one bounded replay pass.
async fn replay(State(state): State<AppState>) -> ApiResult<Json<ReplaySummary>> {
    let summary = state
        .replay
        .replay(state.replay_max_batch)
        .await
        .map_err(|e| ApiError::Internal(format!("replay failed: {}", e)))?;
    Ok(Json(summary))
}

/// `GET /healthz` — trivial liveness probe.
async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok", version: state.version })
}
