//! Shared percentage-rollout bucket hash, grounded on the teacher's
//! `FeatureFlags::hash_to_bucket` (`packages/gate/src/feature_flags.rs`),
//! but over SHA-256 rather than `DefaultHasher` so the bucket a given key
//! falls into is stable across processes and implementations — needed
//! since the policy engine's risk gate derives its canary decision from
//! this same bucket (§4.8) rather than a second, independently-defined
//! hash.

use sha2::{Digest, Sha256};

/// `bucket = uint32(SHA256(key)[0:4]) / 2^32 ∈ [0,1)`.
pub fn bucket(key: &str) -> f64 {
    let digest = Sha256::digest(key.as_bytes());
    let first_four = [digest[0], digest[1], digest[2], digest[3]];
    u32::from_be_bytes(first_four) as f64 / (u32::MAX as f64 + 1.0)
}

/// Convenience over [`bucket`] for percentage rollouts (0-100).
pub fn in_percentage_rollout(key: &str, pct: u8) -> bool {
    bucket(key) < (pct.min(100) as f64 / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_is_deterministic_and_in_unit_range() {
        let a = bucket("agent-1");
        let b = bucket("agent-1");
        assert_eq!(a, b);
        assert!((0.0..1.0).contains(&a));
    }

    #[test]
    fn zero_percent_never_rolls_out() {
        assert!(!in_percentage_rollout("any-key", 0));
    }

    #[test]
    fn hundred_percent_always_rolls_out() {
        for i in 0..50 {
            assert!(in_percentage_rollout(&format!("agent-{i}"), 100));
        }
    }
}
