//! An abstract advisory-lock collaborator.
//!
//! Cross-process locking is explicitly out of scope for this crate (see
//! spec.md §1, §5); this module exists only so callers that need to
//! serialize access across handles have a capability to program against,
//! without it being embedded in [`crate::Store`] itself (spec.md §9).
use std::sync::{Mutex, TryLockError};

/// A lock that can be acquired, optionally non-blockingly, and is released
/// when its guard is dropped.
pub trait AdvisoryLock {
    /// The guard type returned by a successful acquisition.
    type Guard<'a>
    where
        Self: 'a;

    /// Blocks until the lock can be acquired.
    fn acquire(&self) -> Self::Guard<'_>;

    /// Attempts to acquire the lock without blocking, returning `None` if it
    /// is already held.
    fn try_acquire(&self) -> Option<Self::Guard<'_>>;
}

/// A single-process stand-in advisory lock, backed by a [`std::sync::Mutex`].
///
/// This does not coordinate across processes or hosts; it exists as the one
/// concrete, testable implementor of [`AdvisoryLock`] referenced by
/// SPEC_FULL.md, not as a production multi-process lock.
#[derive(Default)]
pub struct LocalLock(Mutex<()>);

impl LocalLock {
    /// Creates a new, unheld lock.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AdvisoryLock for LocalLock {
    type Guard<'a> = std::sync::MutexGuard<'a, ()>;

    fn acquire(&self) -> Self::Guard<'_> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn try_acquire(&self) -> Option<Self::Guard<'_>> {
        match self.0.try_lock() {
            Ok(guard) => Some(guard),
            Err(TryLockError::WouldBlock) => None,
            Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_acquire_fails_while_held() {
        let lock = LocalLock::new();
        let guard = lock.acquire();
        assert!(lock.try_acquire().is_none());
        drop(guard);
        assert!(lock.try_acquire().is_some());
    }
}
