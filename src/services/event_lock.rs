//! Per-event single-flight guard
//!
//! Serializes generation runs for the same event inside one process. The
//! store-level unique constraint covers runs in different processes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

/// One event's mutex and the number of holders plus waiters on it
#[derive(Debug, Default)]
struct Slot {
    lock: Arc<AsyncMutex<()>>,
    users: usize,
}

type LockMap = HashMap<Uuid, Slot>;

#[derive(Debug, Clone, Default)]
pub struct EventLocks {
    inner: Arc<Mutex<LockMap>>,
}

/// Counts one user of an event's slot until dropped, whether the wait
/// completed or was cancelled.
#[derive(Debug)]
struct Registration {
    event_id: Uuid,
    locks: EventLocks,
}

/// Held for the duration of an operation on one event; released on drop
#[derive(Debug)]
pub struct EventLockGuard {
    // dropped before the registration so the mutex is free when the slot goes
    _guard: OwnedMutexGuard<()>,
    _registration: Registration,
}

impl EventLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, LockMap> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Wait until no other holder has `event_id`, then take it
    pub async fn acquire(&self, event_id: Uuid) -> EventLockGuard {
        let lock = {
            let mut map = self.map();
            let slot = map.entry(event_id).or_default();
            slot.users += 1;
            slot.lock.clone()
        };
        let registration = Registration {
            event_id,
            locks: self.clone(),
        };

        let guard = lock.lock_owned().await;
        debug!(event_id = %event_id, "Event lock acquired");

        EventLockGuard {
            _guard: guard,
            _registration: registration,
        }
    }

    /// Number of events with a holder or waiter
    pub fn active(&self) -> usize {
        self.map().len()
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        let mut map = self.locks.map();
        if let Some(slot) = map.get_mut(&self.event_id) {
            slot.users = slot.users.saturating_sub(1);
            if slot.users == 0 {
                map.remove(&self.event_id);
            }
        }
        debug!(event_id = %self.event_id, "Event lock released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_event_is_serialized() {
        let locks = EventLocks::new();
        let event_id = Uuid::new_v4();

        let first = locks.acquire(event_id).await;
        let blocked = tokio::time::timeout(Duration::from_millis(50), locks.acquire(event_id)).await;
        assert!(blocked.is_err());

        drop(first);
        let second = tokio::time::timeout(Duration::from_millis(50), locks.acquire(event_id)).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_different_events_do_not_block() {
        let locks = EventLocks::new();
        let _a = locks.acquire(Uuid::new_v4()).await;
        let b = tokio::time::timeout(Duration::from_millis(50), locks.acquire(Uuid::new_v4())).await;
        assert!(b.is_ok());
        assert_eq!(locks.active(), 2);
    }

    #[tokio::test]
    async fn test_released_locks_are_forgotten() {
        let locks = EventLocks::new();
        {
            let _guard = locks.acquire(Uuid::new_v4()).await;
            assert_eq!(locks.active(), 1);
        }
        assert_eq!(locks.active(), 0);
    }

    #[tokio::test]
    async fn test_waiter_cancelled_after_release_is_forgotten() {
        let locks = EventLocks::new();
        let event_id = Uuid::new_v4();

        let holder = locks.acquire(event_id).await;
        let mut waiter = Box::pin(locks.acquire(event_id));
        assert!(tokio::time::timeout(Duration::from_millis(20), waiter.as_mut())
            .await
            .is_err());

        // the waiter is woken but never polled again
        drop(holder);
        assert_eq!(locks.active(), 1);
        drop(waiter);

        assert_eq!(locks.active(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_waiter_does_not_free_holder_slot() {
        let locks = EventLocks::new();
        let event_id = Uuid::new_v4();

        let holder = locks.acquire(event_id).await;
        let cancelled = tokio::time::timeout(Duration::from_millis(20), locks.acquire(event_id)).await;
        assert!(cancelled.is_err());
        assert_eq!(locks.active(), 1);

        let blocked = tokio::time::timeout(Duration::from_millis(20), locks.acquire(event_id)).await;
        assert!(blocked.is_err());

        drop(holder);
        assert_eq!(locks.active(), 0);
    }
}
