//! Route definitions for the `/analysis` resource, including the job
//! status/result protocol every async submission funnels into.

use axum::routing::get;
use axum::Router;

use crate::handlers::{analysis, jobs};
use crate::state::AppState;

/// Routes mounted at `/analysis`.
///
/// ```text
/// GET /analysis/reference-chain  -> reference_chain (always async)
/// GET /analysis/job/status       -> jobs::status
/// GET /analysis/job/result       -> jobs::result
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analysis/reference-chain", get(analysis::reference_chain))
        .route("/analysis/job/status", get(jobs::status))
        .route("/analysis/job/result", get(jobs::result))
}
