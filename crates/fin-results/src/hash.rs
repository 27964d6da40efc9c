//! Content-based hashing for run IDs.

use fin_solver::FinParameters;
use sha2::{Digest, Sha256};

pub fn compute_run_id(params: &FinParameters, sample_count: usize, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let params_json = serde_json::to_string(params).unwrap_or_default();
    hasher.update(params_json.as_bytes());

    hasher.update(sample_count.to_le_bytes());
    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_stability() {
        let params = FinParameters::default();
        let hash1 = compute_run_id(&params, 300, "v1");
        let hash2 = compute_run_id(&params, 300, "v1");
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let base = FinParameters::default();
        let thicker = FinParameters {
            thickness: 0.005,
            ..base
        };
        assert_ne!(
            compute_run_id(&base, 300, "v1"),
            compute_run_id(&thicker, 300, "v1")
        );
        assert_ne!(
            compute_run_id(&base, 300, "v1"),
            compute_run_id(&base, 301, "v1")
        );
    }
}
