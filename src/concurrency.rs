//! Single-flight publish gate
//!
//! At most one publish runs at a time. The gate is taken before the first
//! await of a publish attempt and released when the returned guard drops, so
//! every exit path (success, error, early return, panic) clears it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Re-entrancy flag shared by every clone of a publish session.
#[derive(Debug, Clone, Default)]
pub struct PublishGate {
    publishing: Arc<AtomicBool>,
}

impl PublishGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to start a publish.
    ///
    /// Returns `None` when another publish already holds the gate.
    pub fn try_acquire(&self) -> Option<PublishGuard> {
        self.publishing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PublishGuard {
                publishing: Arc::clone(&self.publishing),
            })
    }

    pub fn is_publishing(&self) -> bool {
        self.publishing.load(Ordering::Acquire)
    }
}

/// Held for the duration of one publish attempt.
#[derive(Debug)]
pub struct PublishGuard {
    publishing: Arc<AtomicBool>,
}

impl Drop for PublishGuard {
    fn drop(&mut self) {
        self.publishing.store(false, Ordering::Release);
    }
}
