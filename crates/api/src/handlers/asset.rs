//! Handlers for the `/asset` resource.
//!
//! Same path conventions as `/script`: package or object paths in, package
//! paths out.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use refscope_core::graph::normalize_package_path;

use crate::error::{AppError, AppResult};
use crate::query::{self, QueryMap};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AssetMatch {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub asset_type: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub ok: bool,
    pub matches: Vec<AssetMatch>,
    pub count: usize,
}

/// GET /asset/search?pattern=&type=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> AppResult<impl IntoResponse> {
    let pattern = query::optional(&params, "pattern", "*");
    let type_filter = query::optional(&params, "type", "");

    let matches: Vec<AssetMatch> = state
        .graph
        .search_assets(pattern, type_filter)
        .into_iter()
        .map(|asset| AssetMatch {
            name: asset.name.clone(),
            path: asset.path.clone(),
            asset_type: asset.asset_type.clone(),
        })
        .collect();

    Ok(Json(SearchResponse {
        ok: true,
        count: matches.len(),
        matches,
    }))
}

#[derive(Debug, Serialize)]
pub struct ReferencesResponse {
    pub ok: bool,
    pub asset: String,
    pub references: Vec<String>,
    pub count: usize,
}

/// GET /asset/references?path= -- outgoing dependency edges.
pub async fn references(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> AppResult<impl IntoResponse> {
    let raw = query::required(&params, "path")?;
    let path = normalize_package_path(raw).to_string();

    let references = state.graph.dependencies(&path).to_vec();

    Ok(Json(ReferencesResponse {
        ok: true,
        asset: path,
        count: references.len(),
        references,
    }))
}

#[derive(Debug, Serialize)]
pub struct ReferencersResponse {
    pub ok: bool,
    pub asset: String,
    pub referencers: Vec<String>,
    pub count: usize,
}

/// GET /asset/referencers?path= -- incoming dependency edges.
pub async fn referencers(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> AppResult<impl IntoResponse> {
    let raw = query::required(&params, "path")?;
    let path = normalize_package_path(raw).to_string();

    let referencers = state.graph.referencers(&path).to_vec();

    Ok(Json(ReferencersResponse {
        ok: true,
        asset: path,
        count: referencers.len(),
        referencers,
    }))
}

#[derive(Debug, Serialize)]
pub struct MetadataResponse {
    pub ok: bool,
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    pub object_path: String,
}

/// GET /asset/metadata?path=
pub async fn metadata(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> AppResult<impl IntoResponse> {
    let raw = query::required(&params, "path")?;
    let path = normalize_package_path(raw);

    let asset = state
        .graph
        .asset(path)
        .ok_or_else(|| AppError::not_found("Asset not found", path))?;

    Ok(Json(MetadataResponse {
        ok: true,
        name: asset.name.clone(),
        path: asset.path.clone(),
        asset_type: asset.asset_type.clone(),
        size: asset.size_bytes,
        object_path: format!("{}.{}", asset.path, asset.name),
    }))
}
