//! Prometheus-style metrics export for the server binary (ambient
//! observability; not excluded by any Non-goal). Grounded on
//! `packages/gate/src/metrics.rs`'s `GateMetricsExporter`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::RwLock;

/// Process-wide counters for one server instance.
pub struct ServerMetrics {
    intents_validated_total: AtomicU64,
    intents_blocked_total: AtomicU64,
    intents_merged_total: AtomicU64,
    gate_pass_total: AtomicU64,
    gate_fail_total: AtomicU64,
    queue_runs_total: AtomicU64,
    queue_run_duration_us: RwLock<Vec<u64>>,
}

impl ServerMetrics {
    pub fn new() -> Self {
        Self {
            intents_validated_total: AtomicU64::new(0),
            intents_blocked_total: AtomicU64::new(0),
            intents_merged_total: AtomicU64::new(0),
            gate_pass_total: AtomicU64::new(0),
            gate_fail_total: AtomicU64::new(0),
            queue_runs_total: AtomicU64::new(0),
            queue_run_duration_us: RwLock::new(Vec::new()),
        }
    }

    pub fn record_validated(&self) {
        self.intents_validated_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_blocked(&self) {
        self.intents_blocked_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_merged(&self) {
        self.intents_merged_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_merged_n(&self, count: u32) {
        self.intents_merged_total.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_gate(&self, passed: bool) {
        if passed {
            self.gate_pass_total.fetch_add(1, Ordering::Relaxed);
        } else {
            self.gate_fail_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_queue_run(&self, duration: Duration) {
        self.queue_runs_total.fetch_add(1, Ordering::Relaxed);
        let mut samples = self.queue_run_duration_us.write();
        samples.push(duration.as_micros() as u64);
        if samples.len() > 1000 {
            samples.remove(0);
        }
    }

    pub fn export_prometheus(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "# HELP intentgate_intents_validated_total Intents that completed validate() without blocking\n\
             # TYPE intentgate_intents_validated_total counter\n\
             intentgate_intents_validated_total {}\n\n",
            self.intents_validated_total.load(Ordering::Relaxed)
        ));
        out.push_str(&format!(
            "# HELP intentgate_intents_blocked_total Intents blocked by validate()\n\
             # TYPE intentgate_intents_blocked_total counter\n\
             intentgate_intents_blocked_total {}\n\n",
            self.intents_blocked_total.load(Ordering::Relaxed)
        ));
        out.push_str(&format!(
            "# HELP intentgate_intents_merged_total Intents merged by the queue processor\n\
             # TYPE intentgate_intents_merged_total counter\n\
             intentgate_intents_merged_total {}\n\n",
            self.intents_merged_total.load(Ordering::Relaxed)
        ));
        out.push_str(&format!(
            "# HELP intentgate_gate_pass_total Policy gate evaluations that passed\n\
             # TYPE intentgate_gate_pass_total counter\n\
             intentgate_gate_pass_total {}\n\n",
            self.gate_pass_total.load(Ordering::Relaxed)
        ));
        out.push_str(&format!(
            "# HELP intentgate_gate_fail_total Policy gate evaluations that failed\n\
             # TYPE intentgate_gate_fail_total counter\n\
             intentgate_gate_fail_total {}\n\n",
            self.gate_fail_total.load(Ordering::Relaxed)
        ));
        out.push_str(&format!(
            "# HELP intentgate_queue_runs_total Completed queue processor passes\n\
             # TYPE intentgate_queue_runs_total counter\n\
             intentgate_queue_runs_total {}\n\n",
            self.queue_runs_total.load(Ordering::Relaxed)
        ));

        let durations = self.queue_run_duration_us.read();
        if !durations.is_empty() {
            let avg = durations.iter().sum::<u64>() / durations.len() as u64;
            out.push_str(&format!(
                "# HELP intentgate_queue_run_duration_us Average queue processor pass duration\n\
                 # TYPE intentgate_queue_run_duration_us gauge\n\
                 intentgate_queue_run_duration_us {}\n\n",
                avg
            ));
        }

        out
    }
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_reflects_recorded_counts() {
        let metrics = ServerMetrics::new();
        metrics.record_validated();
        metrics.record_blocked();
        metrics.record_gate(true);
        metrics.record_gate(false);
        metrics.record_queue_run(Duration::from_millis(5));

        let output = metrics.export_prometheus();
        assert!(output.contains("intentgate_intents_validated_total 1"));
        assert!(output.contains("intentgate_intents_blocked_total 1"));
        assert!(output.contains("intentgate_gate_pass_total 1"));
        assert!(output.contains("intentgate_gate_fail_total 1"));
        assert!(output.contains("intentgate_queue_runs_total 1"));
    }
}
