use std::sync::Arc;

use refscope_core::graph::ProjectGraph;
use refscope_core::job::JobRegistry;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Immutable project graph, loaded once at startup.
    pub graph: Arc<ProjectGraph>,
    /// Asynchronous job registry backing the chunked retrieval protocol.
    pub jobs: Arc<JobRegistry>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
