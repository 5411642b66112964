//! Background composition builds.
//!
//! A build runs on its own thread against a snapshot of the timeline, so the
//! editing thread keeps mutating the live timeline meanwhile. The result
//! arrives on a channel; a cancelled build delivers `None`.

use crossbeam_channel::{Receiver, TryRecvError};
use doubleclips_core::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::debug;

use crate::composition::CompositionPlan;
use crate::timeline::Timeline;

/// Handle for cancelling an in-progress build.
#[derive(Debug, Clone)]
pub struct BuildCancel(Arc<AtomicBool>);

impl BuildCancel {
    /// Create a new cancel handle.
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check if cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for BuildCancel {
    fn default() -> Self {
        Self::new()
    }
}

/// A composition build running on a worker thread.
pub struct BuildWorker {
    cancel: BuildCancel,
    rx: Receiver<Option<CompositionPlan>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl BuildWorker {
    /// Snapshot `timeline` and start building its plan in the background.
    pub fn spawn(timeline: &Timeline) -> Result<Self> {
        let snapshot = timeline.snapshot();
        let cancel = BuildCancel::new();
        let (tx, rx) = crossbeam_channel::bounded(1);

        let worker_cancel = cancel.clone();
        let handle = thread::Builder::new()
            .name("composition-build".into())
            .spawn(move || {
                let plan = CompositionPlan::build_cancellable(&snapshot, &worker_cancel);
                debug!(complete = plan.is_some(), "composition build finished");
                // The receiver may already be gone if the worker was dropped.
                let _ = tx.send(plan);
            })?;

        Ok(Self {
            cancel,
            rx,
            handle: Some(handle),
        })
    }

    /// Handle that cancels this build.
    pub fn cancel_handle(&self) -> BuildCancel {
        self.cancel.clone()
    }

    /// Ask the build to stop at the next track boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Non-blocking check for the result. `Ok(None)` means the build was
    /// cancelled; `Err(TryRecvError::Empty)` means it is still running.
    pub fn poll_result(&self) -> std::result::Result<Option<CompositionPlan>, TryRecvError> {
        self.rx.try_recv()
    }

    /// Receiver delivering the single result, for use in `select!`.
    pub fn receiver(&self) -> &Receiver<Option<CompositionPlan>> {
        &self.rx
    }

    /// Block until the build finishes. `None` if it was cancelled.
    pub fn wait(mut self) -> Option<CompositionPlan> {
        let plan = self.rx.recv().ok().flatten();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        plan
    }
}

impl Drop for BuildWorker {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel.cancel();
        }
    }
}
