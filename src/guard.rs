//! One-overlay-at-a-time guard.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Ensures a single overlay instance is open at a time.
#[derive(Debug, Clone, Default)]
pub struct ModalGuard {
    open: Arc<AtomicBool>,
}

impl ModalGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the guard. `None` when another lease is alive.
    pub fn try_acquire(&self) -> Option<ModalLease> {
        self.open
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| {
                tracing::debug!("modal guard acquired");
                ModalLease {
                    open: Arc::clone(&self.open),
                }
            })
    }

    pub fn is_held(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

/// Proof of holding a [`ModalGuard`]; releases it on drop.
#[derive(Debug)]
pub struct ModalLease {
    open: Arc<AtomicBool>,
}

impl Drop for ModalLease {
    fn drop(&mut self) {
        self.open.store(false, Ordering::SeqCst);
        tracing::debug!("modal guard released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_until_release() {
        let guard = ModalGuard::new();
        let lease = guard.try_acquire().unwrap();
        assert!(guard.is_held());
        assert!(guard.try_acquire().is_none());
        drop(lease);
        assert!(!guard.is_held());
        assert!(guard.try_acquire().is_some());
    }
}
