//! Handlers for `/analysis` -- reference-chain traversal.
//!
//! Always served through the job protocol: chain size is unbounded by any
//! cheap pre-count, so the payload is produced through the registry and
//! fetched in chunks.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use refscope_core::graph::chain::{self, ChainNode, Direction};
use refscope_core::graph::normalize_package_path;
use refscope_core::job;

use crate::error::AppResult;
use crate::query::{self, QueryMap};
use crate::response::JobAck;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct ChainPayload {
    ok: bool,
    start: String,
    direction: &'static str,
    max_depth: u32,
    chain: ChainNode,
    unique_nodes: usize,
}

/// GET /analysis/reference-chain?start=&direction=&depth=
///
/// Depth is clamped into `[0, 10]` (default 3); direction is one of
/// `references | referencers | both` (default both).
pub async fn reference_chain(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> AppResult<impl IntoResponse> {
    let start_raw = query::required(&params, "start")?;
    let direction = Direction::parse(query::optional(&params, "direction", "both"));
    let depth = query::optional_i64(&params, "depth", chain::DEFAULT_CHAIN_DEPTH)
        .clamp(0, chain::MAX_CHAIN_DEPTH) as u32;
    let start = normalize_package_path(start_raw).to_string();

    let id = state.jobs.create();
    tracing::info!(
        job_id = %id.simple(),
        start = %start,
        direction = direction.as_str(),
        depth,
        "Reference chain job created",
    );

    let jobs = Arc::clone(&state.jobs);
    let store = Arc::clone(&state.graph);
    tokio::task::spawn_blocking(move || {
        job::execute(&jobs, id, || {
            let result = chain::reference_chain(&store, &start, direction, depth);
            let payload = ChainPayload {
                ok: true,
                start,
                direction: direction.as_str(),
                max_depth: depth,
                chain: result.chain,
                unique_nodes: result.unique_nodes,
            };
            serde_json::to_string(&payload).map_err(|err| err.to_string())
        });
    });

    Ok(Json(JobAck::new(id, None)))
}
