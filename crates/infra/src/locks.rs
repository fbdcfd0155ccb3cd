//! Per-lead mutual exclusion.
//!
//! One slot per lead that currently has a caller in flight. Calls for the
//! same lead serialize on the slot; calls for different leads never contend
//! beyond the brief table lookup. Idle slots are reclaimed on release.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use dealroom_core::LeadId;

#[derive(Debug, Default)]
pub struct LeadLocks {
    slots: Mutex<HashMap<LeadId, Arc<Mutex<()>>>>,
}

impl LeadLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `lead_id`.
    ///
    /// Waiters are granted the lock after the current holder returns, so each
    /// observes everything the previous holder committed.
    pub fn with_lock<T>(&self, lead_id: LeadId, f: impl FnOnce() -> T) -> T {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.entry(lead_id).or_default().clone()
        };

        let result = {
            // A panicking holder leaves no partial state behind: saves are atomic.
            let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };

        // Clones are only taken and released under the table lock, so the
        // last releaser always sees the table as the sole owner.
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        drop(slot);
        if slots
            .get(&lead_id)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            slots.remove(&lead_id);
        }

        result
    }

    /// Number of leads with a caller holding or waiting for the lock.
    pub fn active(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn slots_are_reclaimed_after_release() {
        let locks = LeadLocks::new();
        let id = LeadId::new();

        let seen = locks.with_lock(id, || locks.active());
        assert_eq!(seen, 1);
        assert_eq!(locks.active(), 0);
    }

    #[test]
    fn same_lead_calls_never_overlap() {
        let locks = Arc::new(LeadLocks::new());
        let id = LeadId::new();
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = locks.clone();
                let inside = inside.clone();
                let max_inside = max_inside.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        locks.with_lock(id, || {
                            let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                            max_inside.fetch_max(now, Ordering::SeqCst);
                            thread::yield_now();
                            inside.fetch_sub(1, Ordering::SeqCst);
                        });
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert_eq!(locks.active(), 0);
    }

    #[test]
    fn different_leads_do_not_block_each_other() {
        let locks = Arc::new(LeadLocks::new());
        let first = LeadId::new();
        let second = LeadId::new();

        let nested = locks.with_lock(first, || locks.with_lock(second, || 42));
        assert_eq!(nested, 42);
    }
}
