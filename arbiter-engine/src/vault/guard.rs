//! Re-entrancy guard around dispute resolution.
//!
//! A resolution in progress must fully complete (or fully fail) before any
//! other resolution may execute a value transfer. A transfer implementation
//! that calls back into the engine is refused instead of re-entering custody
//! bookkeeping.

use std::sync::atomic::{AtomicBool, Ordering};

use arbiter_core::errors::{ArbiterResult, VaultError};

/// Single global lock flag, checked and set atomically around the whole
/// resolve operation — not just the transfer call.
#[derive(Default)]
pub struct ResolutionGuard {
    locked: AtomicBool,
}

impl ResolutionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the critical section, failing when a resolution is already
    /// executing — including re-entrant calls from inside a transfer.
    pub fn enter(&self) -> ArbiterResult<ResolutionPermit<'_>> {
        if self
            .locked
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(VaultError::ReentrantResolution.into());
        }
        Ok(ResolutionPermit { guard: self })
    }
}

/// Releases the guard when dropped, whether the resolution committed or
/// failed.
pub struct ResolutionPermit<'a> {
    guard: &'a ResolutionGuard,
}

impl Drop for ResolutionPermit<'_> {
    fn drop(&mut self) {
        self.guard.locked.store(false, Ordering::Release);
    }
}
