use serde::{Deserialize, Serialize};

use crate::elements::{NodeKind, RelationKind};

/// Read-only per-tick view of a node, for the render layer.
///
/// Snapshots are values, not references: the render layer can never mutate
/// engine-owned records through them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub highlighted: bool,
    /// A highlight exists elsewhere and this node is outside it.
    pub dimmed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub source: String,
    pub target: String,
    pub kind: RelationKind,
    pub strength: f32,
    pub highlighted: bool,
    pub dimmed: bool,
}

/// Everything a renderer needs for one frame: visible (non-helper,
/// category-enabled) nodes and the active edges between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
    pub alpha: f32,
    pub settled: bool,
}
