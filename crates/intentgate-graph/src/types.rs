use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    File,
    Directory,
    Scope,
    Intent,
    Branch,
}

#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    ContainedIn,
    CoLocated,
    ScopeContains,
    ScopeTouches,
    DependsOn,
    MergeTarget,
    CoChange,
}

impl EdgeKind {
    /// Edges that "propagate" an Intent's reach beyond its immediate file
    /// set, consulted by the propagation/containment composites (§4.6).
    pub fn is_impact(self) -> bool {
        matches!(self, EdgeKind::DependsOn | EdgeKind::MergeTarget | EdgeKind::CoChange)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EdgeData {
    pub kind: EdgeKind,
    pub weight: f64,
}

impl EdgeData {
    pub fn new(kind: EdgeKind) -> Self {
        Self { kind, weight: 1.0 }
    }

    pub fn weighted(kind: EdgeKind, weight: f64) -> Self {
        Self { kind, weight }
    }
}
