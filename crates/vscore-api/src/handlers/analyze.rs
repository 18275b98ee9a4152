//! Batch scoring handler.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{Extension, State};
use axum::Json;
use chrono::Utc;
use tracing::warn;
use uuid::Uuid;
use vscore_engine::BatchLogger;
use vscore_models::{AnalyzeRequest, AnalyzeResponse};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::middleware::RequestId;
use crate::state::AppState;

/// Score one channel's batch of videos.
///
/// The body is read raw so that an empty body, a non-object payload and a
/// missing `videos` field all score as an empty batch rather than being
/// rejected by an extractor.
pub async fn analyze(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    body: Bytes,
) -> ApiResult<Json<AnalyzeResponse>> {
    let request = AnalyzeRequest::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Rejected analyze request body");
        ApiError::invalid_json(e.to_string())
    })?;

    if request.is_empty() {
        return Ok(Json(AnalyzeResponse::empty()));
    }

    let batch_id = request_id
        .map(|Extension(RequestId(id))| id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let size = request.videos.len();
    let logger = BatchLogger::new(batch_id, size);

    let scorer = Arc::clone(&state.scorer);
    let task_logger = logger.clone();
    let now = Utc::now();
    let start = Instant::now();

    // Scoring is CPU-bound; a panic surfaces as a JoinError
    let outcome = tokio::task::spawn_blocking(move || {
        scorer.score_batch(request.videos, now, &task_logger)
    })
    .await;

    let batch = match outcome {
        Ok(Ok(batch)) => batch,
        Ok(Err(e)) => {
            metrics::record_scoring_failure("engine");
            return Err(e.into());
        }
        Err(e) => {
            logger.log_error(&e.to_string());
            metrics::record_scoring_failure(if e.is_panic() { "panic" } else { "cancelled" });
            return Err(ApiError::internal(e.to_string()));
        }
    };

    metrics::record_batch_scored(size, batch.summary.sustained, start.elapsed().as_secs_f64());

    Ok(Json(batch.into_response()))
}

/// Fallback for non-POST methods on the analyze route.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
