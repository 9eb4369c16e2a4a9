use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::algo::{condensation, connected_components, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::builder::DependencyGraph;
use crate::types::{EdgeData, NodeData, NodeKind};

const PAGERANK_DAMPING: f64 = 0.85;
const PAGERANK_ITERATIONS: usize = 60;
const PAGERANK_EPSILON: f64 = 1e-9;
const MAX_CYCLES: usize = 10;

/// Aggregate structural metrics over one built [`DependencyGraph`] (§4.5
/// "Graph metrics"). Pure function of the graph; safe to recompute freely.
#[derive(Debug, Clone)]
pub struct GraphMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub components: usize,
    pub pagerank_by_file: HashMap<String, f64>,
    pub top_pagerank: Vec<(String, f64)>,
    pub cycles: Vec<Vec<String>>,
    pub longest_path: usize,
    pub cross_dir_edges: usize,
    pub scope_count: usize,
    pub avg_out_degree_files: f64,
    pub impact_edge_weight_sum: f64,
    pub impact_targets: HashSet<String>,
    pub reachable_by_file: HashMap<String, usize>,
    pub out_degree_by_file: HashMap<String, usize>,
}

pub fn compute_metrics(dg: &DependencyGraph) -> GraphMetrics {
    let graph = &dg.graph;
    let node_count = graph.node_count();
    let edge_count = graph.edge_count();

    let density = if node_count > 1 {
        edge_count as f64 / (node_count as f64 * (node_count as f64 - 1.0))
    } else {
        0.0
    };

    let components = connected_components(graph);

    let pagerank = weighted_pagerank(graph);
    let label_of = |idx: NodeIndex| graph[idx].label.clone();

    let pagerank_by_file: HashMap<String, f64> = dg
        .file_nodes
        .iter()
        .map(|(path, &idx)| (path.clone(), pagerank.get(&idx).copied().unwrap_or(0.0)))
        .collect();

    let mut top_pagerank: Vec<(String, f64)> = pagerank
        .iter()
        .map(|(&idx, &score)| (label_of(idx), score))
        .collect();
    top_pagerank.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    top_pagerank.truncate(10);

    let cycles = enumerate_simple_cycles(graph, MAX_CYCLES)
        .into_iter()
        .map(|cycle| cycle.into_iter().map(label_of).collect())
        .collect();

    let longest_path = longest_path_in_dag(graph);

    let mut cross_dir_edges = 0usize;
    let mut impact_edge_weight_sum = 0.0;
    let mut impact_targets = HashSet::new();
    for edge in graph.edge_references() {
        let data: &EdgeData = edge.weight();
        if data.kind == crate::types::EdgeKind::CoChange {
            let (src_dir, dst_dir) = (directory_of(&graph[edge.source()]), directory_of(&graph[edge.target()]));
            if src_dir != dst_dir {
                cross_dir_edges += 1;
            }
        }
        if data.kind.is_impact() {
            impact_edge_weight_sum += data.weight;
            impact_targets.insert(graph[edge.target()].label.clone());
        }
    }

    let scope_count = dg.scope_nodes.len();

    let out_degree_by_file: HashMap<String, usize> = dg
        .file_nodes
        .iter()
        .map(|(path, &idx)| (path.clone(), graph.edges_directed(idx, Direction::Outgoing).count()))
        .collect();
    let avg_out_degree_files = if out_degree_by_file.is_empty() {
        0.0
    } else {
        out_degree_by_file.values().sum::<usize>() as f64 / out_degree_by_file.len() as f64
    };

    let reachable_by_file: HashMap<String, usize> = dg
        .file_nodes
        .iter()
        .map(|(path, &idx)| (path.clone(), reachable_count(graph, idx)))
        .collect();

    GraphMetrics {
        node_count,
        edge_count,
        density,
        components,
        pagerank_by_file,
        top_pagerank,
        cycles,
        longest_path,
        cross_dir_edges,
        scope_count,
        avg_out_degree_files,
        impact_edge_weight_sum,
        impact_targets,
        reachable_by_file,
        out_degree_by_file,
    }
}

fn directory_of(node: &NodeData) -> String {
    if node.kind == NodeKind::File {
        node.label.rsplit_once('/').map(|(d, _)| d.to_string()).unwrap_or_default()
    } else {
        node.label.clone()
    }
}

/// Power-iteration PageRank over the weighted, directed graph. `petgraph`
/// has no built-in PageRank, so this follows the standard formulation:
/// `rank(v) = (1-d)/N + d * sum_{u -> v} rank(u) * w(u,v) / outweight(u)`.
fn weighted_pagerank(graph: &DiGraph<NodeData, EdgeData>) -> HashMap<NodeIndex, f64> {
    let n = graph.node_count();
    if n == 0 {
        return HashMap::new();
    }
    let indices: Vec<NodeIndex> = graph.node_indices().collect();
    let mut rank: HashMap<NodeIndex, f64> = indices.iter().map(|&i| (i, 1.0 / n as f64)).collect();

    let out_weight: HashMap<NodeIndex, f64> = indices
        .iter()
        .map(|&i| {
            let w: f64 = graph
                .edges_directed(i, Direction::Outgoing)
                .map(|e| e.weight().weight)
                .sum();
            (i, w)
        })
        .collect();

    for _ in 0..PAGERANK_ITERATIONS {
        let mut next: HashMap<NodeIndex, f64> = indices
            .iter()
            .map(|&i| (i, (1.0 - PAGERANK_DAMPING) / n as f64))
            .collect();

        for &v in &indices {
            for edge in graph.edges_directed(v, Direction::Incoming) {
                let u = edge.source();
                let w = edge.weight().weight;
                let denom = out_weight.get(&u).copied().unwrap_or(0.0);
                if denom > 0.0 {
                    *next.get_mut(&v).unwrap() += PAGERANK_DAMPING * rank[&u] * w / denom;
                }
            }
        }

        let delta: f64 = indices.iter().map(|i| (next[i] - rank[i]).abs()).sum();
        rank = next;
        if delta < PAGERANK_EPSILON {
            break;
        }
    }
    rank
}

/// Simple-cycle enumeration, capped at `cap`. Uses a bounded DFS rather than
/// full Johnson's algorithm: each start node only extends through
/// higher-or-equal-indexed nodes, so every simple cycle is discovered from
/// its lowest-indexed member exactly once.
fn enumerate_simple_cycles(graph: &DiGraph<NodeData, EdgeData>, cap: usize) -> Vec<Vec<NodeIndex>> {
    let mut cycles = Vec::new();
    for start in graph.node_indices() {
        if cycles.len() >= cap {
            break;
        }
        let mut path = vec![start];
        let mut on_path: HashSet<NodeIndex> = HashSet::from([start]);
        dfs_cycles(graph, start, start, &mut path, &mut on_path, &mut cycles, cap);
    }
    cycles.truncate(cap);
    cycles
}

fn dfs_cycles(
    graph: &DiGraph<NodeData, EdgeData>,
    start: NodeIndex,
    current: NodeIndex,
    path: &mut Vec<NodeIndex>,
    on_path: &mut HashSet<NodeIndex>,
    cycles: &mut Vec<Vec<NodeIndex>>,
    cap: usize,
) {
    if cycles.len() >= cap {
        return;
    }
    for edge in graph.edges_directed(current, Direction::Outgoing) {
        let next = edge.target();
        if next == start && path.len() >= 2 {
            cycles.push(path.clone());
            if cycles.len() >= cap {
                return;
            }
            continue;
        }
        if next.index() < start.index() || on_path.contains(&next) {
            continue;
        }
        path.push(next);
        on_path.insert(next);
        dfs_cycles(graph, start, next, path, on_path, cycles, cap);
        path.pop();
        on_path.remove(&next);
        if cycles.len() >= cap {
            return;
        }
    }
}

/// Longest path (edge count) in the graph's DAG view: cycles are contracted
/// into strongly-connected components first, then a topological DP finds
/// the longest chain of SCCs.
fn longest_path_in_dag(graph: &DiGraph<NodeData, EdgeData>) -> usize {
    if graph.node_count() == 0 {
        return 0;
    }
    let condensed = condensation(graph.clone(), true);
    let order = match toposort(&condensed, None) {
        Ok(order) => order,
        Err(_) => return 0,
    };
    let mut dist = vec![0usize; condensed.node_count()];
    for node in order {
        for edge in condensed.edges_directed(node, Direction::Outgoing) {
            let v = edge.target();
            let candidate = dist[node.index()] + 1;
            if candidate > dist[v.index()] {
                dist[v.index()] = candidate;
            }
        }
    }
    dist.into_iter().max().unwrap_or(0)
}

fn reachable_count(graph: &DiGraph<NodeData, EdgeData>, start: NodeIndex) -> usize {
    let mut visited: HashSet<NodeIndex> = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        for edge in graph.edges_directed(node, Direction::Outgoing) {
            let next = edge.target();
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    visited.len() - 1
}
