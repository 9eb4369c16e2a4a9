//! Pure signal/composite functions (§4.6). No I/O; every function is
//! independently unit-testable and its range is checked by P10.

fn clamp(x: f64) -> f64 {
    x.max(0.0).min(100.0)
}

pub fn entropic_load(files: f64, conflicts: f64, deps: f64, dir_spread: f64, components: f64) -> f64 {
    clamp(2.0 * files + 15.0 * conflicts + 6.0 * deps + 3.0 * dir_spread + 5.0 * (components - 1.0).max(0.0))
}

pub fn contextual_value(importance_ratio: f64, core_ratio: f64, target_bonus: f64, risk_bonus: f64) -> f64 {
    clamp((30.0 * importance_ratio).min(60.0) + 20.0 * core_ratio + target_bonus + risk_bonus)
}

pub fn complexity_delta(density: f64, edge_node_ratio: f64, cross_dir_edges: f64, scope_count: f64) -> f64 {
    clamp(40.0 * density + (10.0 * edge_node_ratio).min(30.0) + 3.0 * cross_dir_edges + 5.0 * scope_count)
}

pub fn path_dependence(conflicts: f64, core_touches: f64, deps: f64, cycles: f64, longest_path: f64) -> f64 {
    clamp(20.0 * conflicts + 4.0 * core_touches + 8.0 * deps + 5.0 * cycles.min(20.0) + 2.0 * longest_path)
}

pub fn risk_score(e: f64, c: f64, d: f64, p: f64) -> f64 {
    0.30 * e + 0.25 * c + 0.20 * d + 0.25 * p
}

pub fn damage_score(c: f64, e: f64, p: f64) -> f64 {
    0.50 * c + 0.30 * e + 0.20 * p
}

pub fn propagation_score(avg_out_degree_files: f64, impact_weight_sum: f64, unique_targets: f64) -> f64 {
    let degree_term = (10.0 * avg_out_degree_files).min(50.0);
    let impact_term = (3.0 * impact_weight_sum + 2.0 * unique_targets).min(50.0);
    (degree_term + impact_term).min(100.0)
}

pub fn containment_score(crossings: f64, components: f64) -> f64 {
    (1.0 - 0.05 * crossings - 0.03 * (components - 1.0).max(0.0)).max(0.0)
}

/// Static table from §4.6's `risk_bonus` (current classification -> bonus).
pub fn risk_bonus(risk_level: intentgate_core::RiskLevel) -> f64 {
    use intentgate_core::RiskLevel::*;
    match risk_level {
        Low => 0.0,
        Medium => 5.0,
        High => 15.0,
        Critical => 30.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_stay_in_zero_to_hundred() {
        assert!((0.0..=100.0).contains(&entropic_load(1000.0, 1000.0, 1000.0, 1000.0, 1000.0)));
        assert!((0.0..=100.0).contains(&contextual_value(100.0, 100.0, 100.0, 100.0)));
        assert!((0.0..=100.0).contains(&complexity_delta(100.0, 100.0, 100.0, 100.0)));
        assert!((0.0..=100.0).contains(&path_dependence(100.0, 100.0, 100.0, 100.0, 100.0)));
    }

    #[test]
    fn entropic_load_zero_for_trivial_change() {
        assert_eq!(entropic_load(0.0, 0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn propagation_score_capped_at_hundred() {
        assert_eq!(propagation_score(1000.0, 1000.0, 1000.0), 100.0);
    }

    #[test]
    fn containment_score_never_negative() {
        assert_eq!(containment_score(1000.0, 1000.0), 0.0);
    }
}
