//! Single-flight gate for the completion pipeline. Local models generate
//! one request at a time anyway, so instead of queueing we let exactly one
//! completion run and tell every other caller to come back later.

use std::sync::atomic::{AtomicBool, Ordering};

pub struct CompletionGate {
    busy: AtomicBool,
}

impl CompletionGate {
    pub fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    /// Hands out the guard when the gate is idle. `None` means another
    /// completion is in flight right now.
    pub fn try_acquire(&self) -> Option<GateGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GateGuard { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Holds the gate busy for as long as it lives. Dropping it releases the
/// gate on every exit path, unwinds included.
pub struct GateGuard<'a> {
    gate: &'a CompletionGate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}
