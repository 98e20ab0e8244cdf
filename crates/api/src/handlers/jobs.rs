//! Handlers for the job status / chunked result protocol.
//!
//! Every async submission funnels into these two endpoints. Unknown or
//! expired ids are a 404; a job that exists but is not `Done` answers 202 so
//! polling clients can tell "keep waiting" from "gone".

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use refscope_core::chunk;
use refscope_core::job::{JobId, JobStatus};

use crate::error::{AppError, AppResult};
use crate::query::{self, QueryMap};
use crate::response::{JobChunkResponse, JobStatusResponse};
use crate::state::AppState;

/// Parse the `id` query parameter into a [`JobId`].
///
/// Both the simple (32 hex digits) and hyphenated forms are accepted;
/// anything else is rejected before the registry is consulted.
fn parse_job_id(params: &QueryMap) -> AppResult<(JobId, String)> {
    let raw = query::required(params, "id")?;
    let id = Uuid::parse_str(raw).map_err(|_| AppError::bad_request("Invalid job id", raw))?;
    Ok((id, id.simple().to_string()))
}

/// GET /analysis/job/status?id=
pub async fn status(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> AppResult<impl IntoResponse> {
    let (id, id_str) = parse_job_id(&params)?;

    let snapshot = state
        .jobs
        .get(id)
        .ok_or_else(|| AppError::not_found("Job not found", id_str.clone()))?;

    let total_chars = (snapshot.status == JobStatus::Done).then_some(snapshot.total_chars);
    let error = match snapshot.status {
        JobStatus::Error => snapshot.error.clone(),
        _ => None,
    };

    Ok(Json(JobStatusResponse {
        ok: true,
        id: id_str,
        status: snapshot.status.as_str(),
        total_chars,
        error,
    }))
}

/// GET /analysis/job/result?id=&offset=&limit=
///
/// Offset and limit are clamped, never rejected; the response reports the
/// resolved values alongside `next_offset` and `done` so clients can loop
/// without any arithmetic of their own.
pub async fn result(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> AppResult<impl IntoResponse> {
    let (id, id_str) = parse_job_id(&params)?;
    let offset = query::optional_i64(&params, "offset", 0);
    let limit = query::optional_i64(&params, "limit", chunk::LIMIT_DEFAULT as i64);

    let snapshot = state
        .jobs
        .get(id)
        .ok_or_else(|| AppError::not_found("Job not found", id_str.clone()))?;

    if snapshot.status != JobStatus::Done {
        return Err(AppError::JobNotReady {
            status: snapshot.status.as_str().to_string(),
        });
    }

    let result = snapshot.result.as_deref().unwrap_or_default();
    let window = chunk::window(snapshot.total_chars, offset, limit);
    let piece = chunk::slice_chars(result, window.offset, window.len);

    Ok(Json(JobChunkResponse {
        ok: true,
        id: id_str,
        offset: window.offset,
        limit: window.len,
        total_chars: snapshot.total_chars,
        next_offset: window.next_offset,
        done: window.done,
        chunk: piece.to_string(),
    }))
}
