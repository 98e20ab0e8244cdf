//! Shared fixtures and helpers for API integration tests.
//!
//! Builds the real application router over an in-memory fixture graph, so
//! tests exercise the same middleware stack (request ID, timeout, tracing,
//! panic recovery) that production uses.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use refscope_api::config::ServerConfig;
use refscope_api::router::build_app_router;
use refscope_api::state::AppState;
use refscope_core::graph::model::{
    AssetRecord, ClassLink, Component, GraphKind, Node, NodeGraphDef, Pin, PinDirection, PinLink,
    ProjectSnapshot, ScriptDef, Variable,
};
use refscope_core::graph::ProjectGraph;
use refscope_core::job::JobRegistry;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        job_ttl_secs: 600,
        snapshot_path: String::new(),
    }
}

/// Build the application router over the standard fixture graph.
///
/// Returns the state alongside the router so tests can reach the job
/// registry directly (e.g. to stage a pending job deterministically).
pub fn build_test_app() -> (Router, AppState) {
    build_test_app_with_ttl(Duration::from_secs(600))
}

/// Same as [`build_test_app`], with a caller-chosen job TTL. Expiry tests
/// pass `Duration::ZERO`.
pub fn build_test_app_with_ttl(ttl: Duration) -> (Router, AppState) {
    let config = test_config();
    let state = AppState {
        graph: Arc::new(ProjectGraph::from_snapshot(fixture_snapshot())),
        jobs: Arc::new(JobRegistry::with_ttl(ttl)),
        config: Arc::new(config.clone()),
    };
    (build_app_router(state.clone(), &config), state)
}

/// Issue a GET against the app and return the raw response.
pub async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Collect a response body into bytes.
pub async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Fixture graph
// ---------------------------------------------------------------------------

/// A chain of `count` nodes, each wired to the next through its `then` pin.
/// Produces `count - 1` connections.
fn linked_nodes(count: usize) -> Vec<Node> {
    (0..count)
        .map(|i| {
            let mut pins = vec![Pin {
                name: "exec".to_string(),
                direction: PinDirection::Input,
                default: String::new(),
                category: "exec".to_string(),
                sub_category: String::new(),
                linked_to: Vec::new(),
            }];
            if i + 1 < count {
                pins.push(Pin {
                    name: "then".to_string(),
                    direction: PinDirection::Output,
                    default: String::new(),
                    category: "exec".to_string(),
                    sub_category: String::new(),
                    linked_to: vec![PinLink {
                        node_id: format!("N{}", i + 1),
                        pin_name: "exec".to_string(),
                    }],
                });
            }
            Node {
                id: format!("N{i}"),
                node_type: "CallFunction".to_string(),
                title: format!("Step {i}"),
                pins,
            }
        })
        .collect()
}

fn event_graph(node_count: usize) -> NodeGraphDef {
    NodeGraphDef {
        name: "EventGraph".to_string(),
        kind: GraphKind::Event,
        nodes: linked_nodes(node_count),
    }
}

fn native_link(name: &str) -> ClassLink {
    ClassLink {
        name: name.to_string(),
        path: format!("/Native/{name}"),
        is_native: true,
        script_path: None,
    }
}

fn script_link(class: &str, path: &str) -> ClassLink {
    ClassLink {
        name: class.to_string(),
        path: format!("{path}.{class}"),
        is_native: false,
        script_path: Some(path.to_string()),
    }
}

fn arena(name: &str, node_count: usize) -> AssetRecord {
    let path = format!("/Game/Scripts/{name}");
    AssetRecord {
        name: name.to_string(),
        path: path.clone(),
        asset_type: "Script".to_string(),
        size_bytes: None,
        dependencies: Vec::new(),
        script: Some(ScriptDef {
            class_chain: vec![script_link(&format!("{name}_C"), &path), native_link("Actor")],
            variables: Vec::new(),
            components: Vec::new(),
            graphs: vec![event_graph(node_count)],
        }),
    }
}

/// The standard test project:
///
/// - `PlayerController` (script): depends on `BaseController` and
///   `Crosshair`; 3-node event graph plus an `UpdateHealth` function graph.
/// - `BaseController` (script): parent of `PlayerController`.
/// - `Arena49` / `Arena50` (scripts): event graphs sitting one on each side
///   of the async dispatch threshold.
/// - `Crosshair` (texture): plain asset with a known size.
pub fn fixture_snapshot() -> ProjectSnapshot {
    ProjectSnapshot {
        project_name: "SampleProject".to_string(),
        assets: vec![
            AssetRecord {
                name: "PlayerController".to_string(),
                path: "/Game/Scripts/PlayerController".to_string(),
                asset_type: "Script".to_string(),
                size_bytes: None,
                dependencies: vec![
                    "/Game/Scripts/BaseController".to_string(),
                    "/Game/Textures/Crosshair".to_string(),
                ],
                script: Some(ScriptDef {
                    class_chain: vec![
                        script_link("PlayerController_C", "/Game/Scripts/PlayerController"),
                        script_link("BaseController_C", "/Game/Scripts/BaseController"),
                        native_link("Controller"),
                    ],
                    variables: vec![Variable {
                        name: "Health".to_string(),
                        category: "float".to_string(),
                        sub_category: String::new(),
                        default: "100.0".to_string(),
                    }],
                    components: vec![Component {
                        name: "Mesh".to_string(),
                        class: "StaticMeshComponent".to_string(),
                        attach_to: "Root".to_string(),
                    }],
                    graphs: vec![
                        event_graph(3),
                        NodeGraphDef {
                            name: "UpdateHealth".to_string(),
                            kind: GraphKind::Function,
                            nodes: linked_nodes(2),
                        },
                    ],
                }),
            },
            AssetRecord {
                name: "BaseController".to_string(),
                path: "/Game/Scripts/BaseController".to_string(),
                asset_type: "Script".to_string(),
                size_bytes: None,
                dependencies: Vec::new(),
                script: Some(ScriptDef {
                    class_chain: vec![
                        script_link("BaseController_C", "/Game/Scripts/BaseController"),
                        native_link("Controller"),
                    ],
                    variables: Vec::new(),
                    components: Vec::new(),
                    graphs: vec![event_graph(1)],
                }),
            },
            arena("Arena49", 49),
            arena("Arena50", 50),
            AssetRecord {
                name: "Crosshair".to_string(),
                path: "/Game/Textures/Crosshair".to_string(),
                asset_type: "Texture2D".to_string(),
                size_bytes: Some(2048),
                dependencies: Vec::new(),
                script: None,
            },
        ],
    }
}
