//! Process-wide mutual exclusion for read-modify-write sequences.

use std::time::Instant;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Serializes every todo operation in the process.
///
/// Waiters are admitted in FIFO order. A single gate covers all users, so
/// unrelated users queue behind each other; sharding per user would lift
/// that limit. Nothing here coordinates separate processes.
#[derive(Debug, Default)]
pub struct MutationGate {
    lock: Mutex<()>,
}

/// Exclusive access to the gate, released on drop.
#[derive(Debug)]
pub struct MutationGuard<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl MutationGate {
    /// Creates an open gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Suspends until the caller holds the gate.
    ///
    /// Not re-entrant: acquiring again while holding the guard deadlocks.
    pub async fn acquire(&self) -> MutationGuard<'_> {
        let started = Instant::now();
        let guard = self.lock.lock().await;
        debug!(waited_us = started.elapsed().as_micros() as u64, "Mutation gate acquired");
        MutationGuard { _guard: guard }
    }

    /// Returns true while some caller holds the gate.
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.lock.try_lock().is_err()
    }
}
