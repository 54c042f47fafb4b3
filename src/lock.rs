//! Exploration lock: a cancellable timer that keeps navigation disabled for
//! a fixed time after each accepted move.
//!
//! The timer runs as a Tokio task holding a handle to the owning explorer's
//! state. It is aborted when the lock is released, re-engaged or dropped, so
//! a torn-down explorer is never written to by a stale timer.

use log::debug;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::error::ExplorerError;
use crate::state::ExplorerState;

pub struct ExplorationLock {
    state: Arc<Mutex<ExplorerState>>,
    timer: Option<JoinHandle<()>>,
}

impl ExplorationLock {
    pub fn new(state: Arc<Mutex<ExplorerState>>) -> Self {
        Self { state, timer: None }
    }

    /// Set `is_exploring` now and clear it after `duration`.
    ///
    /// Fails with [`ExplorerError::Task`] outside a Tokio runtime, leaving
    /// the lock untouched.
    pub fn engage(&mut self, duration: Duration) -> Result<(), ExplorerError> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| ExplorerError::Task(format!("no Tokio runtime for lock timer: {}", e)))?;
        self.cancel_timer();

        let state = Arc::clone(&self.state);
        let deadline = tokio::time::Instant::now() + duration;
        // The task cannot take the mutex before we release it below.
        let mut guard = self.state.lock();
        self.timer = Some(handle.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            state.lock().is_exploring = false;
            debug!("Exploration lock released after {:?}", duration);
        }));
        guard.is_exploring = true;
        Ok(())
    }

    /// Cancel any pending timer and unlock immediately.
    pub fn release(&mut self) {
        self.cancel_timer();
        self.state.lock().is_exploring = false;
    }

    pub fn is_engaged(&self) -> bool {
        self.state.lock().is_exploring
    }

    /// True while a timer task exists and has not completed.
    pub fn is_pending(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for ExplorationLock {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
