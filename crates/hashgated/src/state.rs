use crate::error::RelayError;
use hashgate_common::frame::ResultFrame;
use hashgate_common::mask::difficulty_mask;
use hashgate_common::types::{ResultUnit, WorkUnit, PREHASH_LEN};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

/// Shared state for the relay.
///
/// Owns the staleness reference (the current prehash), the result queue,
/// and the sending half of the work channel. One instance is created at
/// startup and shared as an `Arc` between the HTTP handlers and the device
/// link's inbound loop.
#[derive(Debug)]
pub struct RelayState {
    secret: String,
    work_tx: mpsc::UnboundedSender<WorkUnit>,
    inner: Mutex<Inner>,
}

/// The single mutual-exclusion domain of the relay: a publish must clear
/// stale results and move the staleness reference before the inbound loop
/// evaluates another frame, so both live under one lock.
#[derive(Debug, Default)]
struct Inner {
    current_prehash: String,
    results: VecDeque<ResultUnit>,
}

impl RelayState {
    /// Creates relay state with the given shared secret and work sender.
    #[must_use]
    pub fn new(secret: String, work_tx: mpsc::UnboundedSender<WorkUnit>) -> Self {
        Self {
            secret,
            work_tx,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn locked(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock means a panicking thread died mid-section; the
        // queue and prehash are plain values and remain coherent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Checks a publish request's token against the shared secret.
    #[must_use]
    pub fn authorize(&self, token: &str) -> bool {
        self.secret == token
    }

    /// Publishes a new work unit, superseding any previous one.
    ///
    /// Validation failures leave the current prehash and both queues
    /// untouched. On success, as one atomic step: pending results are
    /// cleared, the staleness reference moves to the new prehash, and the
    /// unit is queued for the outbound loop.
    ///
    /// # Errors
    ///
    /// [`RelayError::PrehashLength`] or [`RelayError::Difficulty`] on
    /// invalid input; [`RelayError::LinkDown`] if the device link has shut
    /// down and can no longer accept work.
    pub fn publish(&self, unit: WorkUnit) -> Result<(), RelayError> {
        if unit.prehash.len() != PREHASH_LEN {
            return Err(RelayError::PrehashLength {
                expected: PREHASH_LEN,
                actual: unit.prehash.len(),
            });
        }
        difficulty_mask(unit.difficulty)?;
        if self.work_tx.is_closed() {
            return Err(RelayError::LinkDown);
        }

        let mut inner = self.locked();
        inner.results.clear();
        inner.current_prehash.clone_from(&unit.prehash);
        self.work_tx.send(unit).map_err(|_| RelayError::LinkDown)?;
        Ok(())
    }

    /// Applies the staleness filter to a decoded result frame.
    ///
    /// The frame's prehash is compared byte-exact against the current
    /// prehash under the publish lock; only a match is admitted to the
    /// result queue. Returns whether the frame was admitted.
    pub fn admit_result(&self, frame: &ResultFrame) -> bool {
        let mut inner = self.locked();
        if inner.current_prehash.as_bytes() != frame.prehash() {
            return false;
        }
        let unit = ResultUnit {
            prehash: inner.current_prehash.clone(),
            nonce: frame.nonce(),
        };
        inner.results.push_back(unit);
        true
    }

    /// Pops the oldest accepted result, if any. Never blocks.
    #[must_use]
    pub fn pop_result(&self) -> Option<ResultUnit> {
        self.locked().results.pop_front()
    }

    /// The prehash results are currently matched against. Empty before the
    /// first publish.
    #[must_use]
    pub fn current_prehash(&self) -> String {
        self.locked().current_prehash.clone()
    }

    /// Number of results waiting to be popped.
    #[must_use]
    pub fn pending_results(&self) -> usize {
        self.locked().results.len()
    }
}
