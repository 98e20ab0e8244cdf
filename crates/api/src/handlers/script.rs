//! Handlers for the `/script` resource.
//!
//! Script lookups accept either package paths (`/Game/A/B`) or object paths
//! (`/Game/A/B.B`); responses always report the canonical package path.
//! `graph` is the size-dispatched operation: small graphs are serialized
//! inline, large ones are handed to the job registry for chunked retrieval.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use refscope_core::dispatch;
use refscope_core::graph::model::{
    AssetRecord, GraphKind, NodeGraphDef, PinDirection, ScriptDef,
};
use refscope_core::graph::{normalize_package_path, ProjectGraph};
use refscope_core::job;

use crate::error::{AppError, AppResult};
use crate::query::{self, QueryMap};
use crate::response::JobAck;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Look up a script asset by normalized package path.
fn find_script<'a>(
    graph: &'a ProjectGraph,
    path: &str,
) -> AppResult<(&'a AssetRecord, &'a ScriptDef)> {
    let asset = graph
        .asset(path)
        .ok_or_else(|| AppError::not_found("Failed to load script", path))?;
    let script = asset
        .script
        .as_ref()
        .ok_or_else(|| AppError::not_found("Asset is not a script", path))?;
    Ok((asset, script))
}

fn find_graph<'a>(script: &'a ScriptDef, graph_name: &str) -> Option<&'a NodeGraphDef> {
    script
        .graphs
        .iter()
        .find(|graph| graph.name.eq_ignore_ascii_case(graph_name))
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SearchMatch {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub asset_type: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub ok: bool,
    pub matches: Vec<SearchMatch>,
    pub count: usize,
}

/// GET /script/search?pattern=&class=
///
/// Wildcard search over script assets. A pattern without `*`/`?` is wrapped
/// as `*pattern*`; `class` narrows by inheritance chain.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> AppResult<impl IntoResponse> {
    let pattern = query::optional(&params, "pattern", "*");
    let class_filter = query::optional(&params, "class", "");

    let matches: Vec<SearchMatch> = state
        .graph
        .search_scripts(pattern, class_filter)
        .into_iter()
        .map(|asset| SearchMatch {
            name: asset.name.clone(),
            path: asset.path.clone(),
            asset_type: "Script".to_string(),
        })
        .collect();

    Ok(Json(SearchResponse {
        ok: true,
        count: matches.len(),
        matches,
    }))
}

// ---------------------------------------------------------------------------
// Hierarchy
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ClassEntry {
    pub name: String,
    pub path: String,
    pub is_native: bool,
}

#[derive(Debug, Serialize)]
pub struct ScriptParent {
    pub class: String,
    pub script: String,
}

#[derive(Debug, Serialize)]
pub struct HierarchyResponse {
    pub ok: bool,
    pub script: String,
    /// Full inheritance chain, most derived first.
    pub hierarchy: Vec<ClassEntry>,
    /// First native class in the chain; empty when none is recorded.
    pub native_parent: String,
    /// Chain entries that were generated by another script.
    pub script_parents: Vec<ScriptParent>,
}

/// GET /script/hierarchy?path=
pub async fn hierarchy(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> AppResult<impl IntoResponse> {
    let raw = query::required(&params, "path")?;
    let path = normalize_package_path(raw);
    let (asset, script) = find_script(&state.graph, path)?;

    let hierarchy: Vec<ClassEntry> = script
        .class_chain
        .iter()
        .map(|link| ClassEntry {
            name: link.name.clone(),
            path: link.path.clone(),
            is_native: link.is_native,
        })
        .collect();

    let native_parent = script
        .class_chain
        .iter()
        .find(|link| link.is_native)
        .map(|link| link.name.clone())
        .unwrap_or_default();

    let script_parents: Vec<ScriptParent> = script
        .class_chain
        .iter()
        .filter_map(|link| {
            link.script_path.as_ref().map(|script_path| ScriptParent {
                class: link.name.clone(),
                script: script_path.clone(),
            })
        })
        .collect();

    Ok(Json(HierarchyResponse {
        ok: true,
        script: asset.path.clone(),
        hierarchy,
        native_parent,
        script_parents,
    }))
}

// ---------------------------------------------------------------------------
// Dependencies / referencers
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct DependenciesResponse {
    pub ok: bool,
    pub script: String,
    pub dependencies: Vec<String>,
    pub count: usize,
}

/// GET /script/dependencies?path=
///
/// Unknown paths yield an empty list rather than a 404, matching the edge
/// store's behavior for packages it has never seen.
pub async fn dependencies(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> AppResult<impl IntoResponse> {
    let raw = query::required(&params, "path")?;
    let path = normalize_package_path(raw).to_string();

    let dependencies = state.graph.dependencies(&path).to_vec();

    Ok(Json(DependenciesResponse {
        ok: true,
        script: path,
        count: dependencies.len(),
        dependencies,
    }))
}

#[derive(Debug, Serialize)]
pub struct ReferencersResponse {
    pub ok: bool,
    pub script: String,
    pub referencers: Vec<String>,
    pub count: usize,
}

/// GET /script/referencers?path=
pub async fn referencers(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> AppResult<impl IntoResponse> {
    let raw = query::required(&params, "path")?;
    let path = normalize_package_path(raw).to_string();

    let referencers = state.graph.referencers(&path).to_vec();

    Ok(Json(ReferencersResponse {
        ok: true,
        script: path,
        count: referencers.len(),
        referencers,
    }))
}

// ---------------------------------------------------------------------------
// Details
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct VariableEntry {
    pub name: String,
    pub category: String,
    pub sub_category: String,
    pub default: String,
}

#[derive(Debug, Serialize)]
pub struct ComponentEntry {
    pub name: String,
    pub class: String,
    pub attach_to: String,
}

#[derive(Debug, Serialize)]
pub struct DetailsResponse {
    pub ok: bool,
    pub script: String,
    pub variables: Vec<VariableEntry>,
    /// Names of function graphs.
    pub functions: Vec<String>,
    pub components: Vec<ComponentEntry>,
    /// Names of all graphs, whatever their kind.
    pub graphs: Vec<String>,
    pub parent_class: Option<ClassEntry>,
    pub variable_count: usize,
    pub function_count: usize,
    pub component_count: usize,
}

/// GET /script/details?path=
pub async fn details(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> AppResult<impl IntoResponse> {
    let raw = query::required(&params, "path")?;
    let path = normalize_package_path(raw);
    let (asset, script) = find_script(&state.graph, path)?;

    let variables: Vec<VariableEntry> = script
        .variables
        .iter()
        .map(|var| VariableEntry {
            name: var.name.clone(),
            category: var.category.clone(),
            sub_category: var.sub_category.clone(),
            default: var.default.clone(),
        })
        .collect();

    let functions: Vec<String> = script
        .graphs
        .iter()
        .filter(|graph| graph.kind == GraphKind::Function)
        .map(|graph| graph.name.clone())
        .collect();

    let components: Vec<ComponentEntry> = script
        .components
        .iter()
        .map(|component| ComponentEntry {
            name: component.name.clone(),
            class: component.class.clone(),
            attach_to: component.attach_to.clone(),
        })
        .collect();

    let graphs: Vec<String> = script.graphs.iter().map(|graph| graph.name.clone()).collect();

    // The chain starts at the script's own class; its parent sits next.
    let parent_class = script.class_chain.get(1).map(|link| ClassEntry {
        name: link.name.clone(),
        path: link.path.clone(),
        is_native: link.is_native,
    });

    Ok(Json(DetailsResponse {
        ok: true,
        script: asset.path.clone(),
        variable_count: variables.len(),
        function_count: functions.len(),
        component_count: components.len(),
        variables,
        functions,
        components,
        graphs,
        parent_class,
    }))
}

// ---------------------------------------------------------------------------
// Graph (size-dispatched)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct PinLinkEntry {
    pub node_id: String,
    pub pin_name: String,
}

#[derive(Debug, Serialize)]
pub struct PinEntry {
    pub name: String,
    pub direction: PinDirection,
    pub default: String,
    pub category: String,
    pub sub_category: String,
    pub linked_to: Vec<PinLinkEntry>,
}

#[derive(Debug, Serialize)]
pub struct NodeEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub title: String,
    pub pins: Vec<PinEntry>,
}

#[derive(Debug, Serialize)]
pub struct ConnectionEntry {
    pub from_node: String,
    pub from_pin: String,
    pub to_node: String,
    pub to_pin: String,
}

#[derive(Debug, Serialize)]
pub struct GraphPayload {
    pub ok: bool,
    pub script: String,
    pub graph: String,
    pub nodes: Vec<NodeEntry>,
    pub connections: Vec<ConnectionEntry>,
    pub node_count: usize,
    pub connection_count: usize,
}

/// Serialize one named node graph.
///
/// Used by both the inline path and the job runner; failures surface as
/// opaque strings so the job's error field can carry them verbatim.
fn build_graph_payload(
    graph: &ProjectGraph,
    path: &str,
    graph_name: &str,
) -> Result<GraphPayload, String> {
    let script = graph
        .asset(path)
        .and_then(|asset| asset.script.as_ref())
        .ok_or_else(|| format!("Script not found: {path}"))?;
    let node_graph =
        find_graph(script, graph_name).ok_or_else(|| format!("Graph not found: {graph_name}"))?;

    let mut nodes = Vec::with_capacity(node_graph.nodes.len());
    let mut connections = Vec::new();

    for node in &node_graph.nodes {
        let mut pins = Vec::with_capacity(node.pins.len());
        for pin in &node.pins {
            // The flat connection list is built from output pins only, so
            // each edge appears once.
            if pin.direction == PinDirection::Output {
                for link in &pin.linked_to {
                    connections.push(ConnectionEntry {
                        from_node: node.id.clone(),
                        from_pin: pin.name.clone(),
                        to_node: link.node_id.clone(),
                        to_pin: link.pin_name.clone(),
                    });
                }
            }

            pins.push(PinEntry {
                name: pin.name.clone(),
                direction: pin.direction,
                default: pin.default.clone(),
                category: pin.category.clone(),
                sub_category: pin.sub_category.clone(),
                linked_to: pin
                    .linked_to
                    .iter()
                    .map(|link| PinLinkEntry {
                        node_id: link.node_id.clone(),
                        pin_name: link.pin_name.clone(),
                    })
                    .collect(),
            });
        }

        nodes.push(NodeEntry {
            id: node.id.clone(),
            node_type: node.node_type.clone(),
            title: node.title.clone(),
            pins,
        });
    }

    Ok(GraphPayload {
        ok: true,
        script: path.to_string(),
        graph: graph_name.to_string(),
        node_count: nodes.len(),
        connection_count: connections.len(),
        nodes,
        connections,
    })
}

/// GET /script/graph?path=&graph_name=
///
/// Graphs under the node threshold are serialized inline. At or past it the
/// same payload is built through the job registry on the blocking pool and
/// the client follows the chunked retrieval protocol instead.
pub async fn graph(
    State(state): State<AppState>,
    Query(params): Query<QueryMap>,
) -> AppResult<Response> {
    let raw = query::required(&params, "path")?;
    let graph_name = query::optional(&params, "graph_name", "EventGraph").to_string();
    let path = normalize_package_path(raw).to_string();

    let node_count = {
        let (_, script) = find_script(&state.graph, &path)?;
        let node_graph = find_graph(script, &graph_name)
            .ok_or_else(|| AppError::not_found("Graph not found", graph_name.clone()))?;
        node_graph.nodes.len()
    };

    if dispatch::should_defer(node_count) {
        let id = state.jobs.create();
        tracing::info!(
            job_id = %id.simple(),
            script = %path,
            graph = %graph_name,
            node_count,
            "Deferring graph serialization to job",
        );

        let jobs = Arc::clone(&state.jobs);
        let store = Arc::clone(&state.graph);
        tokio::task::spawn_blocking(move || {
            job::execute(&jobs, id, || {
                let payload = build_graph_payload(&store, &path, &graph_name)?;
                serde_json::to_string(&payload).map_err(|err| err.to_string())
            });
        });

        return Ok(Json(JobAck::new(id, Some(node_count))).into_response());
    }

    let payload = build_graph_payload(&state.graph, &path, &graph_name)
        .map_err(AppError::Internal)?;

    Ok(Json(payload).into_response())
}
