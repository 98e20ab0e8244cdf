//! Route definitions for the `/script` resource.
//!
//! Query-param based (script paths contain `/`, so they do not fit path
//! segments).

use axum::routing::get;
use axum::Router;

use crate::handlers::script;
use crate::state::AppState;

/// Routes mounted at `/script`.
///
/// ```text
/// GET /script/search        -> search
/// GET /script/hierarchy     -> hierarchy
/// GET /script/dependencies  -> dependencies
/// GET /script/referencers   -> referencers
/// GET /script/graph         -> graph (size-dispatched sync/async)
/// GET /script/details       -> details
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/script/search", get(script::search))
        .route("/script/hierarchy", get(script::hierarchy))
        .route("/script/dependencies", get(script::dependencies))
        .route("/script/referencers", get(script::referencers))
        .route("/script/graph", get(script::graph))
        .route("/script/details", get(script::details))
}
