//! Foreground session: parameter model + guarded solver + last result.

use crate::error::{AppError, AppResult};
use crate::guard::{ExecutionGuard, SolveEvent, SubmitOutcome};
use fin_results::{ResultSnapshot, SnapshotCell};
use fin_solver::{FinParameters, ParameterModel, ParameterUpdate};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};

pub struct Session {
    model: ParameterModel,
    guard: ExecutionGuard,
    events: Receiver<SolveEvent>,
    /// Events taken off the channel so far.
    settled: u64,
    snapshot: Arc<SnapshotCell>,
}

impl Session {
    pub fn new(sample_count: usize) -> Self {
        let (guard, events) = ExecutionGuard::new(sample_count);
        Self::with_guard(guard, events)
    }

    /// Session around a caller-built guard and its event receiver.
    pub fn with_guard(guard: ExecutionGuard, events: Receiver<SolveEvent>) -> Self {
        Self {
            model: ParameterModel::default(),
            guard,
            events,
            settled: 0,
            snapshot: Arc::new(SnapshotCell::new()),
        }
    }

    pub fn params(&self) -> &FinParameters {
        self.model.get()
    }

    pub fn apply(&mut self, update: &ParameterUpdate) {
        self.model.apply(update);
    }

    pub fn is_running(&self) -> bool {
        self.guard.is_running()
    }

    /// Submit a copy of the current parameters.
    pub fn run(&mut self) -> AppResult<SubmitOutcome> {
        let params = self.model.snapshot();
        self.guard.submit(params)
    }

    /// Handle the next completion if one has arrived, without blocking.
    pub fn poll(&mut self) -> Option<SolveEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(self.settle(event)),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block for the completion of the outstanding run.
    pub fn wait(&mut self) -> AppResult<SolveEvent> {
        if let Some(event) = self.poll() {
            return Ok(event);
        }
        if !self.guard.is_running() {
            // Events are sent before the guard goes idle.
            return self.poll().ok_or(AppError::NothingPending);
        }
        let event = self
            .events
            .recv()
            .map_err(|_| AppError::NothingPending)?;
        Ok(self.settle(event))
    }

    fn settle(&mut self, event: SolveEvent) -> SolveEvent {
        self.settled += 1;
        // Join only the worker that sent this event; it is past its send and
        // exiting. A newer run is left alone and reaped by the next submit.
        if self.settled == self.guard.dispatched() {
            self.guard.wait_idle();
        }
        match &event {
            SolveEvent::Completed { params, result } => {
                self.snapshot
                    .replace(ResultSnapshot::new(*params, result.clone()));
            }
            SolveEvent::Failed { message, .. } => {
                tracing::debug!(%message, "keeping previous snapshot");
            }
        }
        event
    }

    pub fn snapshot(&self) -> Option<Arc<ResultSnapshot>> {
        self.snapshot.get()
    }

    /// Shared handle for export and plotting collaborators.
    pub fn snapshot_cell(&self) -> Arc<SnapshotCell> {
        Arc::clone(&self.snapshot)
    }

    pub fn clear(&self) {
        self.snapshot.clear();
    }
}
