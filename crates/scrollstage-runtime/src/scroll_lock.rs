#![forbid(unsafe_code)]

//! Reference-counted suspension of page scrolling.
//!
//! Exactly one process-wide "is background scroll disabled" flag exists, and
//! more than one overlay can want it at once: the boot gate may release just
//! as a menu overlay acquires. A boolean toggle would let one owner's
//! release clobber another's still-active acquisition, so the lock counts
//! holders instead.
//!
//! Acquisition is scoped: [`acquire`](ScrollLock::acquire) returns a
//! [`ScrollLockGuard`] whose `Drop` decrements the count. Release therefore
//! happens on every exit path — early teardown, panic unwind, or normal
//! completion — never only on the success path.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared handle to the page scroll-suspension flag.
///
/// Cheap to clone; all clones observe the same count. Scrolling is
/// suspended while any guard is alive.
#[derive(Debug, Clone, Default)]
pub struct ScrollLock {
    inner: Arc<AtomicUsize>,
}

impl ScrollLock {
    /// Create an unlocked handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Suspend scrolling until the returned guard drops.
    #[must_use]
    pub fn acquire(&self) -> ScrollLockGuard {
        let holders = self.inner.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(holders, "scroll lock acquired");
        ScrollLockGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Whether any holder is suspending scroll right now.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.inner.load(Ordering::Acquire) > 0
    }

    /// Number of live guards.
    #[must_use]
    pub fn holders(&self) -> usize {
        self.inner.load(Ordering::Acquire)
    }
}

/// Scoped hold on the scroll lock. Dropping releases exactly once.
#[derive(Debug)]
pub struct ScrollLockGuard {
    inner: Arc<AtomicUsize>,
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        let holders = self.inner.fetch_sub(1, Ordering::AcqRel) - 1;
        tracing::debug!(holders, "scroll lock released");
    }
}
