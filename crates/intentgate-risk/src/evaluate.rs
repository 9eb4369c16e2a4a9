use std::collections::HashSet;

use intentgate_core::{Intent, RiskLevel};
use intentgate_graph::GraphMetrics;
use intentgate_scm::Simulation;
use serde::{Deserialize, Serialize};

use crate::bombs::{detect_bombs, Bomb};
use crate::config::RiskConfig;
use crate::signals;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskEvaluation {
    pub entropic_load: f64,
    pub contextual_value: f64,
    pub complexity_delta: f64,
    pub path_dependence: f64,
    pub risk_score: f64,
    pub damage_score: f64,
    pub entropy_score: f64,
    pub propagation_score: f64,
    pub containment_score: f64,
    pub risk_level: RiskLevel,
    #[serde(skip)]
    pub bombs: Vec<Bomb>,
}

/// Full risk evaluation (§4.6): four signals, five composites, bomb
/// detection. Pure given `(intent, simulation, metrics, config)`.
pub fn evaluate(
    intent: &Intent,
    simulation: &Simulation,
    metrics: &GraphMetrics,
    config: &RiskConfig,
) -> RiskEvaluation {
    let files = simulation.files_changed.len() as f64;
    let conflicts = simulation.conflicts.len() as f64;
    let deps = intent.dependencies.len() as f64;

    let dir_spread = simulation
        .files_changed
        .iter()
        .filter_map(|f| f.rsplit_once('/').map(|(d, _)| d.to_string()))
        .collect::<HashSet<_>>()
        .len() as f64;

    let entropic_load = signals::entropic_load(
        files,
        conflicts,
        deps,
        dir_spread,
        metrics.components as f64,
    );

    let n = metrics.node_count.max(1) as f64;
    let importance_sum: f64 = simulation
        .files_changed
        .iter()
        .filter_map(|f| metrics.pagerank_by_file.get(f))
        .sum();
    let importance_ratio = importance_sum / (1.0 / n);

    let core_ratio = ratio_matching_prefixes(&simulation.files_changed, &config.core_path_prefixes);
    let target_bonus = if config.core_targets.iter().any(|t| t == &intent.target) {
        10.0
    } else {
        0.0
    };
    let contextual_value = signals::contextual_value(
        importance_ratio,
        core_ratio,
        target_bonus,
        signals::risk_bonus(intent.risk_level),
    );

    let edge_node_ratio = metrics.edge_count as f64 / n;
    let complexity_delta = signals::complexity_delta(
        metrics.density,
        edge_node_ratio,
        metrics.cross_dir_edges as f64,
        metrics.scope_count as f64,
    );

    let core_touches = count_matching_prefixes(&simulation.files_changed, &config.core_path_prefixes) as f64;
    let path_dependence = signals::path_dependence(
        conflicts,
        core_touches,
        deps,
        metrics.cycles.len() as f64,
        metrics.longest_path as f64,
    );

    let risk_score = signals::risk_score(entropic_load, contextual_value, complexity_delta, path_dependence);
    let damage_score = signals::damage_score(contextual_value, entropic_load, path_dependence);
    let entropy_score = entropic_load;
    let propagation_score = signals::propagation_score(
        metrics.avg_out_degree_files,
        metrics.impact_edge_weight_sum,
        metrics.impact_targets.len() as f64,
    );

    let mut crossing_targets: HashSet<&str> = metrics.impact_targets.iter().map(String::as_str).collect();
    crossing_targets.extend(intent.dependencies.iter().map(String::as_str));
    crossing_targets.extend(intent.technical.scope_hint.iter().map(String::as_str));
    let containment_score =
        signals::containment_score(crossing_targets.len() as f64, metrics.components as f64);

    let risk_level = RiskLevel::classify(risk_score);
    let bombs = detect_bombs(metrics, simulation.files_changed.len(), simulation.conflicts.len(), intent.dependencies.len());

    RiskEvaluation {
        entropic_load,
        contextual_value,
        complexity_delta,
        path_dependence,
        risk_score,
        damage_score,
        entropy_score,
        propagation_score,
        containment_score,
        risk_level,
        bombs,
    }
}

fn ratio_matching_prefixes(files: &[String], prefixes: &[String]) -> f64 {
    if files.is_empty() {
        return 0.0;
    }
    count_matching_prefixes(files, prefixes) as f64 / files.len() as f64
}

fn count_matching_prefixes(files: &[String], prefixes: &[String]) -> usize {
    files
        .iter()
        .filter(|f| prefixes.iter().any(|p| f.starts_with(p.as_str())))
        .count()
}
