//! Risk Engine (§4.6): four orthogonal 0-100 signals, five composite
//! scores, and structural bomb detection. Pure functions over
//! `(Intent, Simulation, GraphMetrics)` — no I/O, fully unit-testable (P10).

pub mod bombs;
pub mod config;
pub mod evaluate;
pub mod signals;

pub use bombs::{Bomb, BombKind};
pub use config::RiskConfig;
pub use evaluate::{evaluate, RiskEvaluation};

#[cfg(test)]
mod tests {
    use super::*;
    use intentgate_core::{Intent, IntentStatus, OriginType, RiskLevel, Technical};
    use intentgate_graph::{build_graph, compute_metrics, GraphInput};
    use intentgate_scm::Simulation;

    fn sample_intent() -> Intent {
        Intent {
            id: "i1".into(),
            source: "feature/a".into(),
            target: "main".into(),
            status: IntentStatus::Ready,
            risk_level: RiskLevel::Low,
            priority: 3,
            origin_type: OriginType::Human,
            created_at: chrono::Utc::now(),
            created_by: "tester".into(),
            updated_at: chrono::Utc::now(),
            semantic: Default::default(),
            technical: Technical { scope_hint: vec!["auth".into()], ..Default::default() },
            checks_required: vec![],
            dependencies: vec![],
            retries: 0,
            tenant_id: None,
            plan_id: None,
        }
    }

    #[test]
    fn clean_small_change_is_low_risk() {
        let intent = sample_intent();
        let simulation = Simulation {
            mergeable: true,
            conflicts: vec![],
            files_changed: vec!["src/auth/login.rs".into(), "src/auth/session.rs".into()],
            base_commit: "base".into(),
            head_commit: "head".into(),
        };
        let dg = build_graph(&GraphInput {
            intent_id: intent.id.clone(),
            target: intent.target.clone(),
            files_changed: simulation.files_changed.clone(),
            scope_hints: intent.technical.scope_hint.clone(),
            dependencies: intent.dependencies.clone(),
            co_change_pairs: vec![],
        });
        let metrics = compute_metrics(&dg);
        let result = evaluate(&intent, &simulation, &metrics, &RiskConfig::default());
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert!(result.bombs.is_empty());
    }

    #[test]
    fn conflicts_push_up_entropic_load() {
        let intent = sample_intent();
        let simulation = Simulation {
            mergeable: false,
            conflicts: vec!["src/auth/login.rs".into(), "src/auth/session.rs".into()],
            files_changed: vec!["src/auth/login.rs".into(), "src/auth/session.rs".into()],
            base_commit: "base".into(),
            head_commit: "head".into(),
        };
        let dg = build_graph(&GraphInput {
            intent_id: intent.id.clone(),
            target: intent.target.clone(),
            files_changed: simulation.files_changed.clone(),
            scope_hints: vec![],
            dependencies: vec![],
            co_change_pairs: vec![],
        });
        let metrics = compute_metrics(&dg);
        let result = evaluate(&intent, &simulation, &metrics, &RiskConfig::default());
        assert!(result.entropic_load > 0.0);
        assert!(result.risk_score > 0.0);
    }
}
