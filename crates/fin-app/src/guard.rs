//! Single-flight background execution of the fin solver.
//!
//! The guard is either `Idle` or `Running`. A submission while `Running` is
//! turned away with [`SubmitOutcome::AlreadyRunning`]; nothing is queued. An
//! accepted submission solves a private copy of the parameters on its own
//! thread and always delivers exactly one [`SolveEvent`] to the receiver
//! returned by [`ExecutionGuard::new`]. The guard goes back to `Idle` only
//! after that event has been sent.

use crate::error::{AppError, AppResult};
use fin_solver::{FinParameters, SolveResult, SolverResult};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};

/// Solver entry point used by the guard.
pub type SolveFn = Arc<dyn Fn(FinParameters, usize) -> SolverResult<SolveResult> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Idle,
    Running,
}

/// Synchronous answer to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Dispatched,
    /// A solve is still outstanding; this request was dropped.
    AlreadyRunning,
}

/// Completion of one accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveEvent {
    Completed {
        /// The copy that was actually solved.
        params: FinParameters,
        result: SolveResult,
    },
    Failed {
        params: FinParameters,
        message: String,
    },
}

pub struct ExecutionGuard {
    running: Arc<AtomicBool>,
    sample_count: usize,
    solver: SolveFn,
    events: Sender<SolveEvent>,
    worker: Option<JoinHandle<()>>,
    dispatched: u64,
}

/// Flips the guard back to idle when the worker finishes, even by unwinding.
struct IdleOnDrop(Arc<AtomicBool>);

impl Drop for IdleOnDrop {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ExecutionGuard {
    /// Guard running [`fin_solver::solve`] with `sample_count` samples, plus
    /// the only receiver of its events.
    pub fn new(sample_count: usize) -> (Self, Receiver<SolveEvent>) {
        Self::with_solver(sample_count, Arc::new(fin_solver::solve))
    }

    pub fn with_solver(sample_count: usize, solver: SolveFn) -> (Self, Receiver<SolveEvent>) {
        let (tx, rx) = channel();
        let guard = Self {
            running: Arc::new(AtomicBool::new(false)),
            sample_count,
            solver,
            events: tx,
            worker: None,
            dispatched: 0,
        };
        (guard, rx)
    }

    pub fn state(&self) -> GuardState {
        if self.running.load(Ordering::Acquire) {
            GuardState::Running
        } else {
            GuardState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == GuardState::Running
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Number of submissions accepted so far; each yields one event.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Start solving `params` in the background unless a run is outstanding.
    ///
    /// Returns `Err` only if the worker thread could not be started; the
    /// guard is `Idle` again in that case.
    pub fn submit(&mut self, params: FinParameters) -> AppResult<SubmitOutcome> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("solver already running; submission ignored");
            return Ok(SubmitOutcome::AlreadyRunning);
        }

        // The previous worker has already sent its event and is exiting.
        self.reap();

        let running = Arc::clone(&self.running);
        let events = self.events.clone();
        let solver = Arc::clone(&self.solver);
        let n = self.sample_count;

        let spawned = thread::Builder::new()
            .name("fin-solver".to_string())
            .spawn(move || {
                let _idle = IdleOnDrop(running);
                let event = run_solver(solver.as_ref(), params, n);
                // Nobody listening is not our problem.
                let _ = events.send(event);
            });

        match spawned {
            Ok(handle) => {
                tracing::debug!(%params, samples = n, "solver dispatched");
                self.worker = Some(handle);
                self.dispatched += 1;
                Ok(SubmitOutcome::Dispatched)
            }
            Err(e) => {
                self.running.store(false, Ordering::Release);
                Err(AppError::Spawn(e))
            }
        }
    }

    /// Block until the current worker, if any, has exited.
    pub fn wait_idle(&mut self) {
        self.reap();
    }

    fn reap(&mut self) {
        if let Some(handle) = self.worker.take() {
            // The worker never unwinds past IdleOnDrop; solver panics are caught.
            let _ = handle.join();
        }
    }
}

fn run_solver(
    solver: &(dyn Fn(FinParameters, usize) -> SolverResult<SolveResult> + Send + Sync),
    params: FinParameters,
    n: usize,
) -> SolveEvent {
    match panic::catch_unwind(AssertUnwindSafe(|| solver(params, n))) {
        Ok(Ok(result)) => {
            let m = &result.metrics;
            tracing::info!(m = m.m, q = m.q, eta = m.eta, eps = m.eps, "fin solved");
            SolveEvent::Completed { params, result }
        }
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "fin solve failed");
            SolveEvent::Failed {
                params,
                message: err.to_string(),
            }
        }
        Err(payload) => {
            let message = format!("Solver panicked: {}", panic_message(payload.as_ref()));
            tracing::warn!(%message, "fin solve aborted");
            SolveEvent::Failed { params, message }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
