//! Percentile calibration (§4.8): re-derives per-level `entropy_budget`
//! from a historical sequence of `entropy_score` values.

/// Nearest-rank percentile over a sorted slice. `p` is in `[0, 100]`.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let frac = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[derive(Debug, Clone, Copy)]
pub struct CalibratedBudgets {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

/// §4.8 "Percentile calibration": given a historical sequence of
/// `entropy_score` values (need not be pre-sorted), compute P75/P90/P95 and
/// derive the four entropy budgets.
pub fn calibrate_entropy_budgets(entropy_scores: &[f64]) -> CalibratedBudgets {
    let mut sorted: Vec<f64> = entropy_scores.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let p75 = percentile(&sorted, 75.0);
    let p90 = percentile(&sorted, 90.0);
    let p95 = percentile(&sorted, 95.0);

    CalibratedBudgets {
        low: (1.5 * p75).max(10.0),
        medium: p75.max(8.0),
        high: p90.max(5.0),
        critical: (0.8 * p95).max(3.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_falls_back_to_floors() {
        let budgets = calibrate_entropy_budgets(&[]);
        assert_eq!(budgets.low, 10.0);
        assert_eq!(budgets.medium, 8.0);
        assert_eq!(budgets.high, 5.0);
        assert_eq!(budgets.critical, 3.0);
    }

    #[test]
    fn unsorted_input_is_sorted_before_percentiles() {
        let scores = vec![50.0, 10.0, 30.0, 20.0, 40.0];
        let budgets = calibrate_entropy_budgets(&scores);
        // P75 of [10,20,30,40,50] via nearest-rank-interpolation = 40.0
        assert_eq!(budgets.medium, 40.0);
    }

    #[test]
    fn high_scores_raise_budgets_above_floor() {
        let scores: Vec<f64> = (1..=100).map(|i| i as f64).collect();
        let budgets = calibrate_entropy_budgets(&scores);
        assert!(budgets.low > 10.0);
        assert!(budgets.critical > 3.0);
        assert!(budgets.high >= budgets.medium);
    }
}
