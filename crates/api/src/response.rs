//! Shared response envelope types for the job protocol.
//!
//! Per-endpoint payloads live next to their handlers; the job envelopes are
//! here because every submission endpoint that takes the async path returns
//! the same acknowledgment shape.

use serde::Serialize;

use refscope_core::job::JobId;

/// Acknowledgment returned when a submission takes the async path.
///
/// The client is expected to poll `status_url`, then page through
/// `result_url_template` with `offset`/`limit` until `done`.
#[derive(Debug, Serialize)]
pub struct JobAck {
    pub ok: bool,
    pub mode: &'static str,
    pub job_id: String,
    pub status_url: String,
    pub result_url_template: String,
    /// Size hint for submissions with a cheap pre-count (graph node count).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_nodes: Option<usize>,
}

impl JobAck {
    pub fn new(id: JobId, estimated_nodes: Option<usize>) -> Self {
        let id = id.simple().to_string();
        Self {
            ok: true,
            mode: "async",
            status_url: format!("/analysis/job/status?id={id}"),
            result_url_template: format!(
                "/analysis/job/result?id={id}&offset={{offset}}&limit={{limit}}"
            ),
            job_id: id,
            estimated_nodes,
        }
    }
}

/// Status poll response.
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub ok: bool,
    pub id: String,
    pub status: &'static str,
    /// Present once the job is `Done`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_chars: Option<usize>,
    /// Present once the job is `Error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One chunk of a completed job's payload.
#[derive(Debug, Serialize)]
pub struct JobChunkResponse {
    pub ok: bool,
    pub id: String,
    /// Offset actually used after clamping.
    pub offset: usize,
    /// Window length actually used after clamping.
    pub limit: usize,
    pub total_chars: usize,
    pub next_offset: usize,
    pub done: bool,
    pub chunk: String,
}
