//! Snapshot data model for the project graph store.
//!
//! A snapshot is produced by an exporter walking the host project and is the
//! only input the service needs at runtime. Records deserialize leniently:
//! absent collections default to empty so trimmed exports stay loadable.

use serde::{Deserialize, Serialize};

/// Root of a project snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub project_name: String,
    pub assets: Vec<AssetRecord>,
}

/// One asset in the project, keyed by its package path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRecord {
    pub name: String,
    /// Package path, e.g. `/Game/Scripts/PlayerController`.
    pub path: String,
    /// Asset type name, e.g. `Script`, `Texture2D`.
    pub asset_type: String,
    /// On-disk size, when the exporter could resolve one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// Outgoing dependency edges (package paths).
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Present when the asset is a visual-script document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<ScriptDef>,
}

/// Script-specific structure: class chain, variables, components, and the
/// node graphs the graph endpoint serializes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptDef {
    /// Inheritance chain from the script's own class to the root, in order.
    #[serde(default)]
    pub class_chain: Vec<ClassLink>,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub graphs: Vec<NodeGraphDef>,
}

/// One class in a script's inheritance chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassLink {
    pub name: String,
    pub path: String,
    pub is_native: bool,
    /// Package path of the script that generated this class, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_path: Option<String>,
}

/// A script variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub sub_category: String,
    #[serde(default)]
    pub default: String,
}

/// A construction-script component entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub class: String,
    #[serde(default)]
    pub attach_to: String,
}

/// What a named graph is for; drives the functions list in script details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    Event,
    Function,
    Macro,
}

impl Default for GraphKind {
    fn default() -> Self {
        Self::Event
    }
}

/// A named node graph inside a script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeGraphDef {
    pub name: String,
    #[serde(default)]
    pub kind: GraphKind,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// A single graph node with its pins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub node_type: String,
    pub title: String,
    #[serde(default)]
    pub pins: Vec<Pin>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinDirection {
    Input,
    Output,
}

/// A node pin; `linked_to` records the far end of every connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pin {
    pub name: String,
    pub direction: PinDirection,
    #[serde(default)]
    pub default: String,
    pub category: String,
    #[serde(default)]
    pub sub_category: String,
    #[serde(default)]
    pub linked_to: Vec<PinLink>,
}

/// The far end of a pin connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinLink {
    pub node_id: String,
    pub pin_name: String,
}
