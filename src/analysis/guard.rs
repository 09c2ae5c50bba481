//! Latest-wins guard for in-flight analysis requests.
//!
//! A new submission invalidates every earlier one: the shell stamps each
//! request with [`RequestGuard::begin`] and applies a response only when
//! [`RequestGuard::accepts`] still holds for its stamp. A stale response is
//! dropped instead of overwriting the newer request's result.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RequestGuard {
    current: AtomicU64,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request and return its stamp. Any stamp issued earlier
    /// stops being accepted.
    pub fn begin(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether a response carrying this stamp may still be applied.
    pub fn accepts(&self, stamp: u64) -> bool {
        self.current.load(Ordering::SeqCst) == stamp
    }
}
