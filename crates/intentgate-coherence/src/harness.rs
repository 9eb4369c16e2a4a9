//! Harness execution (§4.7): run enabled questions, score, and classify a
//! verdict relative to caller-supplied `pass`/`warn` thresholds. Thresholds
//! live on the policy profile (`intentgate-policy`); this crate stays
//! decoupled from policy and takes them as plain `f64` arguments.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::expr;
use crate::probe::ProbePort;
use crate::question::{HarnessConfig, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

impl Verdict {
    pub fn from_score(score: f64, pass: f64, warn: f64) -> Self {
        if score >= pass {
            Verdict::Pass
        } else if score >= warn {
            Verdict::Warn
        } else {
            Verdict::Fail
        }
    }

    /// One-step downgrade used by the orchestrator's cross-validation
    /// checks (§4.7 "PASS->WARN, WARN->FAIL").
    pub fn downgrade(self) -> Self {
        match self {
            Verdict::Pass => Verdict::Warn,
            Verdict::Warn => Verdict::Fail,
            Verdict::Fail => Verdict::Fail,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    pub category: String,
    pub result: Option<f64>,
    pub passed: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoherenceResult {
    pub score: f64,
    pub verdict: Verdict,
    pub outcomes: Vec<QuestionOutcome>,
}

/// Run every enabled question against `probes`, resolving `result OP
/// baseline` against `baselines` (question id -> last stored value).
/// Probe errors (timeout, non-numeric output) count the question as
/// failed, never abort the harness (§4.3-style "never crashes the
/// pipeline" posture extended to probes).
pub async fn run(
    config: &HarnessConfig,
    probes: &dyn ProbePort,
    baselines: &HashMap<String, f64>,
    pass_threshold: f64,
    warn_threshold: f64,
) -> CoherenceResult {
    let mut outcomes = Vec::new();
    let mut penalty = 0.0;

    for question in config.enabled_questions() {
        let outcome = evaluate_question(question, probes, baselines).await;
        if !outcome.passed {
            penalty += question.severity.weight();
        }
        outcomes.push(outcome);
    }

    let score = (100.0 - penalty).clamp(0.0, 100.0);
    let verdict = Verdict::from_score(score, pass_threshold, warn_threshold);

    CoherenceResult {
        score,
        verdict,
        outcomes,
    }
}

async fn evaluate_question(
    question: &Question,
    probes: &dyn ProbePort,
    baselines: &HashMap<String, f64>,
) -> QuestionOutcome {
    let expr = match expr::parse(&question.assertion) {
        Ok(expr) => expr,
        Err(e) => {
            return QuestionOutcome {
                question_id: question.id.clone(),
                category: question.category.clone(),
                result: None,
                passed: false,
                error: Some(e.to_string()),
            }
        }
    };

    match probes.run(&question.id, &question.check).await {
        Ok(result) => {
            let baseline = baselines.get(&question.id).copied();
            let passed = expr::evaluate(&expr, result, baseline);
            QuestionOutcome {
                question_id: question.id.clone(),
                category: question.category.clone(),
                result: Some(result),
                passed,
                error: None,
            }
        }
        Err(e) => QuestionOutcome {
            question_id: question.id.clone(),
            category: question.category.clone(),
            result: None,
            passed: false,
            error: Some(e.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProbeRunner;
    use crate::question::QuestionSeverity;

    fn config() -> HarnessConfig {
        HarnessConfig {
            version: 1,
            questions: vec![
                Question {
                    id: "q1".into(),
                    question: "latency regression?".into(),
                    check: "echo 10".into(),
                    assertion: "result < 100".into(),
                    severity: QuestionSeverity::High,
                    category: "perf".into(),
                    enabled: true,
                },
                Question {
                    id: "q2".into(),
                    question: "error rate?".into(),
                    check: "echo 5".into(),
                    assertion: "result < baseline".into(),
                    severity: QuestionSeverity::Critical,
                    category: "errors".into(),
                    enabled: true,
                },
            ],
        }
    }

    #[tokio::test]
    async fn all_pass_scores_one_hundred() {
        let probes = MockProbeRunner::new();
        probes.set_result("q1", 10.0);
        probes.set_result("q2", 1.0);
        let result = run(&config(), &probes, &HashMap::new(), 75.0, 60.0).await;
        assert_eq!(result.score, 100.0);
        assert_eq!(result.verdict, Verdict::Pass);
    }

    #[tokio::test]
    async fn failed_critical_question_drags_score_down() {
        let probes = MockProbeRunner::new();
        probes.set_result("q1", 10.0);
        probes.set_result("q2", 20.0);
        let baselines = HashMap::from([("q2".to_string(), 5.0)]);
        let result = run(&config(), &probes, &baselines, 75.0, 60.0).await;
        assert_eq!(result.score, 70.0);
        assert_eq!(result.verdict, Verdict::Warn);
    }

    #[tokio::test]
    async fn probe_timeout_counts_as_failure() {
        let probes = MockProbeRunner::new();
        probes.set_result("q1", 10.0);
        probes.set_timeout("q2");
        let result = run(&config(), &probes, &HashMap::new(), 75.0, 60.0).await;
        assert!(result.outcomes.iter().any(|o| o.question_id == "q2" && !o.passed));
    }

    #[test]
    fn downgrade_steps_verdict_down() {
        assert_eq!(Verdict::Pass.downgrade(), Verdict::Warn);
        assert_eq!(Verdict::Warn.downgrade(), Verdict::Fail);
        assert_eq!(Verdict::Fail.downgrade(), Verdict::Fail);
    }
}
