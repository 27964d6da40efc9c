//! Last successful result, paired with the parameters that produced it.

use crate::hash::compute_run_id;
use fin_solver::{FinParameters, SolveResult};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

pub const SOLVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Immutable bundle of a completed solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSnapshot {
    pub run_id: String,
    /// RFC 3339, UTC
    pub created_at: String,
    /// Parameters at solve time, not the current model values.
    pub params: FinParameters,
    pub result: SolveResult,
}

impl ResultSnapshot {
    pub fn new(params: FinParameters, result: SolveResult) -> Self {
        Self {
            run_id: compute_run_id(&params, result.len(), SOLVER_VERSION),
            created_at: chrono::Utc::now().to_rfc3339(),
            params,
            result,
        }
    }

    pub fn to_json(&self) -> crate::ResultsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Holder of the current snapshot. Readers get a shared handle to a fully
/// built value; replacement swaps the whole thing.
#[derive(Debug, Default)]
pub struct SnapshotCell {
    slot: RwLock<Option<Arc<ResultSnapshot>>>,
}

impl SnapshotCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `snapshot`, returning the one it superseded.
    pub fn replace(&self, snapshot: ResultSnapshot) -> Option<Arc<ResultSnapshot>> {
        let next = Arc::new(snapshot);
        tracing::debug!(run_id = %next.run_id, "result snapshot replaced");
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        slot.replace(next)
    }

    pub fn get(&self) -> Option<Arc<ResultSnapshot>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if slot.take().is_some() {
            tracing::debug!("result snapshot cleared");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}
