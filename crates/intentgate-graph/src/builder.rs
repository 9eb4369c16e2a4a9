use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};

use crate::types::{EdgeData, EdgeKind, NodeData, NodeKind};

/// Everything needed to build one per-Intent dependency graph (§4.5).
#[derive(Debug, Clone, Default)]
pub struct GraphInput {
    pub intent_id: String,
    pub target: String,
    pub files_changed: Vec<String>,
    pub scope_hints: Vec<String>,
    pub dependencies: Vec<String>,
    /// Unordered file-pair co-change counts, if a history table is available.
    pub co_change_pairs: Vec<(String, String, u32)>,
}

/// The built per-run graph plus the index lookups needed to compute metrics
/// and to answer risk-engine queries ("which node is this file"). Never
/// persisted past one orchestrator run (§9 "never mint long-lived pointers").
pub struct DependencyGraph {
    pub graph: DiGraph<NodeData, EdgeData>,
    pub file_nodes: HashMap<String, NodeIndex>,
    pub scope_nodes: HashMap<String, NodeIndex>,
    pub intent_node: NodeIndex,
    pub branch_node: NodeIndex,
}

/// Parent directory of `path`, or `None` at the root (mirrors how the
/// teacher's path-prefix matching in `policy.rs` treats `/`-separated
/// scopes).
fn parent_dir(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(dir, _)| dir)
}

pub fn build_graph(input: &GraphInput) -> DependencyGraph {
    let mut graph: DiGraph<NodeData, EdgeData> = DiGraph::new();
    let mut file_nodes: HashMap<String, NodeIndex> = HashMap::new();
    let mut dir_nodes: HashMap<String, NodeIndex> = HashMap::new();
    let mut scope_nodes: HashMap<String, NodeIndex> = HashMap::new();
    let mut immediate_dir_of: HashMap<String, String> = HashMap::new();

    // 1. File + directory-ancestor chain nodes, `contained_in` edges.
    for file in &input.files_changed {
        let file_idx = *file_nodes.entry(file.clone()).or_insert_with(|| {
            graph.add_node(NodeData {
                kind: NodeKind::File,
                label: file.clone(),
            })
        });

        let mut child_idx = file_idx;
        let mut current = file.as_str();
        while let Some(dir) = parent_dir(current) {
            if current == file.as_str() {
                immediate_dir_of.insert(file.clone(), dir.to_string());
            }
            let dir_idx = *dir_nodes.entry(dir.to_string()).or_insert_with(|| {
                graph.add_node(NodeData {
                    kind: NodeKind::Directory,
                    label: dir.to_string(),
                })
            });
            graph.add_edge(child_idx, dir_idx, EdgeData::new(EdgeKind::ContainedIn));
            child_idx = dir_idx;
            current = dir;
        }
    }

    // 2. co_located edges, pairwise within each immediate directory.
    let mut by_dir: HashMap<&str, Vec<&str>> = HashMap::new();
    for (file, dir) in &immediate_dir_of {
        by_dir.entry(dir.as_str()).or_default().push(file.as_str());
    }
    for files in by_dir.values() {
        for i in 0..files.len() {
            for j in 0..files.len() {
                if i == j {
                    continue;
                }
                let a = file_nodes[files[i]];
                let b = file_nodes[files[j]];
                graph.add_edge(a, b, EdgeData::new(EdgeKind::CoLocated));
            }
        }
    }

    // 3. Scope nodes + scope_contains/scope_touches edges.
    for scope in &input.scope_hints {
        let scope_idx = *scope_nodes.entry(scope.clone()).or_insert_with(|| {
            graph.add_node(NodeData {
                kind: NodeKind::Scope,
                label: scope.clone(),
            })
        });
        let needle = scope.to_lowercase();
        for (file, &file_idx) in &file_nodes {
            let kind = if file.to_lowercase().contains(&needle) {
                EdgeKind::ScopeContains
            } else {
                EdgeKind::ScopeTouches
            };
            graph.add_edge(scope_idx, file_idx, EdgeData::new(kind));
        }
    }

    // 4. Intent + branch nodes, depends_on + merge_target edges.
    let intent_node = graph.add_node(NodeData {
        kind: NodeKind::Intent,
        label: input.intent_id.clone(),
    });
    let branch_node = graph.add_node(NodeData {
        kind: NodeKind::Branch,
        label: input.target.clone(),
    });
    graph.add_edge(intent_node, branch_node, EdgeData::new(EdgeKind::MergeTarget));
    for dep in &input.dependencies {
        let dep_idx = graph.add_node(NodeData {
            kind: NodeKind::Intent,
            label: dep.clone(),
        });
        graph.add_edge(intent_node, dep_idx, EdgeData::new(EdgeKind::DependsOn));
    }

    // 5. co_change edges, symmetric, weighted min(1.0, 0.1 * pairs).
    for (a, b, pairs) in &input.co_change_pairs {
        if let (Some(&a_idx), Some(&b_idx)) = (file_nodes.get(a), file_nodes.get(b)) {
            let weight = (0.1 * (*pairs as f64)).min(1.0);
            graph.add_edge(a_idx, b_idx, EdgeData::weighted(EdgeKind::CoChange, weight));
            graph.add_edge(b_idx, a_idx, EdgeData::weighted(EdgeKind::CoChange, weight));
        }
    }

    DependencyGraph {
        graph,
        file_nodes,
        scope_nodes,
        intent_node,
        branch_node,
    }
}
