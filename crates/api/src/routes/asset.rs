//! Route definitions for the `/asset` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::asset;
use crate::state::AppState;

/// Routes mounted at `/asset`.
///
/// ```text
/// GET /asset/search       -> search
/// GET /asset/references   -> references
/// GET /asset/referencers  -> referencers
/// GET /asset/metadata     -> metadata
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/asset/search", get(asset::search))
        .route("/asset/references", get(asset::references))
        .route("/asset/referencers", get(asset::referencers))
        .route("/asset/metadata", get(asset::metadata))
}
