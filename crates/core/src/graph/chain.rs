//! Bounded-depth traversal of the reference graph.
//!
//! Produces the tree the reference-chain endpoint serializes. A global
//! visited set guarantees each package appears at most once, so cyclic
//! dependency graphs terminate.

use std::collections::HashSet;

use serde::Serialize;

use super::ProjectGraph;

/// Upper bound on traversal depth; requests above are clamped, not rejected.
pub const MAX_CHAIN_DEPTH: i64 = 10;

/// Depth used when the client does not pass one.
pub const DEFAULT_CHAIN_DEPTH: i64 = 3;

/// Which edge direction(s) a traversal follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    References,
    Referencers,
    Both,
}

impl Direction {
    /// Case-insensitive; anything unrecognized falls back to `Both`.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "references" => Self::References,
            "referencers" => Self::Referencers,
            _ => Self::Both,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::References => "references",
            Self::Referencers => "referencers",
            Self::Both => "both",
        }
    }

    fn follows_references(&self) -> bool {
        matches!(self, Self::References | Self::Both)
    }

    fn follows_referencers(&self) -> bool {
        matches!(self, Self::Referencers | Self::Both)
    }
}

/// One node in a reference-chain tree.
#[derive(Debug, Serialize)]
pub struct ChainNode {
    pub path: String,
    pub depth: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
    pub children: Vec<ChainNode>,
}

/// A completed traversal: the tree plus how many unique packages it touched.
#[derive(Debug)]
pub struct ReferenceChain {
    pub chain: ChainNode,
    pub unique_nodes: usize,
}

/// Walk the graph from `start`, following `direction` edges down to
/// `max_depth` levels. `start` itself counts as visited.
pub fn reference_chain(
    graph: &ProjectGraph,
    start: &str,
    direction: Direction,
    max_depth: u32,
) -> ReferenceChain {
    let mut visited = HashSet::new();
    visited.insert(start.to_string());

    let chain = build_node(graph, start, 0, max_depth, direction, &mut visited);

    ReferenceChain {
        chain,
        unique_nodes: visited.len(),
    }
}

fn build_node(
    graph: &ProjectGraph,
    path: &str,
    depth: u32,
    max_depth: u32,
    direction: Direction,
    visited: &mut HashSet<String>,
) -> ChainNode {
    let (name, asset_type) = match graph.asset(path) {
        Some(asset) => (Some(asset.name.clone()), Some(asset.asset_type.clone())),
        None => (None, None),
    };

    let mut node = ChainNode {
        path: path.to_string(),
        depth,
        name,
        asset_type,
        children: Vec::new(),
    };

    if depth >= max_depth {
        return node;
    }

    let mut next_paths: Vec<&String> = Vec::new();
    if direction.follows_references() {
        next_paths.extend(graph.dependencies(path));
    }
    if direction.follows_referencers() {
        next_paths.extend(graph.referencers(path));
    }

    for next in next_paths {
        if visited.contains(next) {
            continue;
        }
        visited.insert(next.clone());
        node.children
            .push(build_node(graph, next, depth + 1, max_depth, direction, visited));
    }

    node
}
