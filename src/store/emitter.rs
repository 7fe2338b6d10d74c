//! EventEmitter<T> — typed pub/sub used by the store for change
//! notification.
//!
//! Snapshot-on-emit semantics:
//!   - A listener removed *during* emission still fires in that round.
//!   - A listener added *during* emission does not fire until the next round.
//!
//! The internal lock is released before any callback runs, so listeners may
//! call `on()`/`off()` reentrantly without deadlocking. Panics inside a
//! listener propagate to the emitting caller — isolation, where needed, is
//! the store's job.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Identifies a registered listener; pass to [`EventEmitter::off`] to remove it.
pub type ListenerId = u64;

type ListenerFn<T> = dyn Fn(&T) + Send + Sync;

/// Typed synchronous event emitter.
pub struct EventEmitter<T> {
    listeners: Mutex<Vec<(ListenerId, Arc<ListenerFn<T>>)>>,
    next_id: AtomicU64,
}

impl<T> EventEmitter<T> {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register `callback`, returning its [`ListenerId`].
    pub fn on(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> ListenerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, Arc::new(callback)));
        id
    }

    /// Remove the listener identified by `id`. Safe to call repeatedly.
    pub fn off(&self, id: ListenerId) {
        self.listeners.lock().retain(|(lid, _)| *lid != id);
    }

    /// Emit `event` to every listener registered at the start of this call.
    ///
    /// Listeners run in registration order, outside the internal lock.
    pub fn emit(&self, event: &T) {
        let snapshot: Vec<Arc<ListenerFn<T>>> = {
            let guard = self.listeners.lock();
            guard.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for cb in snapshot {
            cb(event);
        }
    }

    /// Number of currently registered listeners.
    pub fn size(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl<T> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn on_emit_delivers_in_registration_order() {
        let emitter = EventEmitter::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let s1 = Arc::clone(&seen);
        emitter.on(move |v| s1.lock().push(("first", *v)));
        let s2 = Arc::clone(&seen);
        emitter.on(move |v| s2.lock().push(("second", *v)));

        emitter.emit(&7);
        assert_eq!(*seen.lock(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn off_removes_listener() {
        let emitter = EventEmitter::<u32>::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&count);
        let id = emitter.on(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        emitter.emit(&1);
        emitter.off(id);
        emitter.emit(&2);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(emitter.size(), 0);
    }

    #[test]
    fn off_is_idempotent() {
        let emitter = EventEmitter::<()>::new();
        let id = emitter.on(|_| {});
        emitter.off(id);
        emitter.off(id);
        assert_eq!(emitter.size(), 0);
    }

    #[test]
    fn listener_removed_during_emit_still_fires_that_round() {
        let emitter = Arc::new(EventEmitter::<u32>::new());
        let count = Arc::new(AtomicUsize::new(0));

        // First listener removes the second mid-round.
        let victim_id = Arc::new(Mutex::new(None::<ListenerId>));
        let em = Arc::clone(&emitter);
        let vid = Arc::clone(&victim_id);
        emitter.on(move |_| {
            if let Some(id) = *vid.lock() {
                em.off(id);
            }
        });

        let c = Arc::clone(&count);
        let id = emitter.on(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        *victim_id.lock() = Some(id);

        emitter.emit(&1);
        assert_eq!(count.load(Ordering::SeqCst), 1, "snapshot round still fires");

        emitter.emit(&2);
        assert_eq!(count.load(Ordering::SeqCst), 1, "removed for later rounds");
    }

    #[test]
    fn listener_added_during_emit_waits_for_next_round() {
        let emitter = Arc::new(EventEmitter::<u32>::new());
        let count = Arc::new(AtomicUsize::new(0));

        let em = Arc::clone(&emitter);
        let c = Arc::clone(&count);
        emitter.on(move |_| {
            let c2 = Arc::clone(&c);
            em.on(move |_| {
                c2.fetch_add(1, Ordering::SeqCst);
            });
        });

        emitter.emit(&1);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        emitter.emit(&2);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
