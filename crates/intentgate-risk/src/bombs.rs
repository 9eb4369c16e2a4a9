use intentgate_core::Severity;
use intentgate_graph::GraphMetrics;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BombKind {
    Cascade,
    Spiral,
    ThermalDeath,
}

impl BombKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BombKind::Cascade => "cascade",
            BombKind::Spiral => "spiral",
            BombKind::ThermalDeath => "thermal_death",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub kind: BombKind,
    pub severity: Severity,
    pub evidence: String,
}

/// §4.6 bomb detection. Each rule yields at most one finding per Intent.
pub fn detect_bombs(
    metrics: &GraphMetrics,
    files_changed: usize,
    conflicts: usize,
    deps: usize,
) -> Vec<Bomb> {
    let mut bombs = Vec::new();
    let n = metrics.node_count.max(1) as f64;

    if let Some((file, score)) = metrics
        .pagerank_by_file
        .iter()
        .find(|(file, &score)| {
            score > 1.5 / n
                && metrics.out_degree_by_file.get(*file).copied().unwrap_or(0) >= 3
                && metrics.reachable_by_file.get(*file).copied().unwrap_or(0) as f64
                    > 1.5 * files_changed as f64
        })
        .map(|(file, &score)| (file.clone(), score))
    {
        bombs.push(Bomb {
            kind: BombKind::Cascade,
            severity: Severity::High,
            evidence: format!("{file} pagerank={score:.4} exceeds cascade threshold"),
        });
    }

    let is_dag = metrics.cycles.is_empty();
    if !is_dag && metrics.cycles.len() >= 2 {
        bombs.push(Bomb {
            kind: BombKind::Spiral,
            severity: Severity::Medium,
            evidence: format!("{} simple cycles detected (capped at 10)", metrics.cycles.len()),
        });
    }

    let conditions = [
        files_changed > 10,
        conflicts > 0,
        deps > 3,
        metrics.components > 3,
        metrics.edge_count > 2 * metrics.node_count,
    ];
    if conditions.iter().filter(|c| **c).count() >= 3 {
        bombs.push(Bomb {
            kind: BombKind::ThermalDeath,
            severity: Severity::Critical,
            evidence: format!(
                "files={files_changed} conflicts={conflicts} deps={deps} components={} edges={} nodes={}",
                metrics.components, metrics.edge_count, metrics.node_count
            ),
        });
    }

    bombs
}
