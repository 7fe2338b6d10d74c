//! ContentStore — the shared client-side cache of collection records and
//! live subscriptions.
//!
//! The store owns two pieces of state: a collection → records map and the
//! set of collection names with an active subscription. Bindings read
//! snapshots; context implementations publish results through the mutation
//! API. Every mutation emits a [`StoreEvent`] after the state lock is
//! released.
//!
//! # Threading model
//!
//! `ContentStore` is `Send + Sync`. State lives behind an
//! `Arc<parking_lot::Mutex<..>>` (cloned into observer closures); the
//! emitter keeps its own internal lock. The state lock is never held while
//! listener callbacks run, so observers may re-enter the store freely.

pub mod emitter;
pub mod event;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;

use crate::error::{BindingError, Result};
use crate::types::Record;

pub use event::StoreEvent;

use emitter::EventEmitter;

/// An owned one-shot closure that removes an observer when called.
pub type Unsubscribe = Box<dyn FnOnce() + Send + Sync>;

// ============================================================================
// Store state
// ============================================================================

#[derive(Default)]
struct StoreState {
    /// Cached records keyed by collection name, in server order.
    records: HashMap<String, Vec<Record>>,
    /// Collection names with a live subscription.
    subscriptions: Vec<String>,
}

impl StoreState {
    fn records_for(&self, collection: &str) -> Vec<Record> {
        self.records.get(collection).cloned().unwrap_or_default()
    }
}

// ============================================================================
// ContentStore
// ============================================================================

/// Shared in-memory content state with change notification.
pub struct ContentStore {
    state: Arc<Mutex<StoreState>>,
    emitter: Arc<EventEmitter<StoreEvent>>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            emitter: Arc::new(EventEmitter::new()),
        }
    }

    // -----------------------------------------------------------------------
    // Snapshot reads
    // -----------------------------------------------------------------------

    /// The current record list for `collection` (empty if unknown).
    ///
    /// Returns a clone — the snapshot does not track later mutations.
    pub fn records_for(&self, collection: &str) -> Vec<Record> {
        self.state.lock().records_for(collection)
    }

    /// Typed view of [`records_for`]: deserializes each record's payload.
    ///
    /// Fails on the first record whose payload does not match `T`, naming
    /// the offending record.
    ///
    /// [`records_for`]: ContentStore::records_for
    pub fn records_as<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        let records = self.records_for(collection);
        let mut out = Vec::with_capacity(records.len());
        for record in records {
            match serde_json::from_value(record.data) {
                Ok(value) => out.push(value),
                Err(source) => {
                    return Err(BindingError::Decode {
                        collection: collection.to_string(),
                        id: record.id,
                        source,
                    }
                    .into())
                }
            }
        }
        Ok(out)
    }

    /// The current subscription set.
    pub fn subscriptions(&self) -> Vec<String> {
        self.state.lock().subscriptions.clone()
    }

    /// Whether `collection` is in the current subscription set.
    pub fn is_subscribed(&self, collection: &str) -> bool {
        self.state
            .lock()
            .subscriptions
            .iter()
            .any(|name| name == collection)
    }

    // -----------------------------------------------------------------------
    // Mutations — record cache
    // -----------------------------------------------------------------------

    /// Replace the record list for `collection`.
    pub fn set_records(&self, collection: impl Into<String>, records: Vec<Record>) {
        let collection = collection.into();
        {
            let mut st = self.state.lock();
            st.records.insert(collection.clone(), records);
        }
        self.emit(StoreEvent::RecordsChanged { collection });
    }

    /// Insert `record`, or replace the cached record with the same id.
    pub fn upsert_record(&self, collection: impl Into<String>, record: Record) {
        let collection = collection.into();
        {
            let mut st = self.state.lock();
            let list = st.records.entry(collection.clone()).or_default();
            match list.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record,
                None => list.push(record),
            }
        }
        self.emit(StoreEvent::RecordsChanged { collection });
    }

    /// Remove the record with `id` from `collection`.
    ///
    /// Returns whether a record was removed; emits only when it was.
    pub fn remove_record(&self, collection: &str, id: &str) -> bool {
        let removed = {
            let mut st = self.state.lock();
            match st.records.get_mut(collection) {
                Some(list) => {
                    let before = list.len();
                    list.retain(|r| r.id != id);
                    list.len() != before
                }
                None => false,
            }
        };
        if removed {
            self.emit(StoreEvent::RecordsChanged {
                collection: collection.to_string(),
            });
        }
        removed
    }

    /// Drop the cached record list for `collection`.
    ///
    /// Emits only if the collection had an entry.
    pub fn clear_records(&self, collection: &str) {
        let existed = self.state.lock().records.remove(collection).is_some();
        if existed {
            self.emit(StoreEvent::RecordsChanged {
                collection: collection.to_string(),
            });
        }
    }

    // -----------------------------------------------------------------------
    // Mutations — subscription set
    // -----------------------------------------------------------------------

    /// Replace the whole subscription set.
    pub fn set_subscriptions(&self, subscriptions: Vec<String>) {
        {
            let mut st = self.state.lock();
            st.subscriptions = subscriptions;
        }
        self.emit(StoreEvent::SubscriptionsChanged);
    }

    /// Add `collection` to the subscription set. Idempotent — emits only on
    /// an actual membership change.
    pub fn add_subscription(&self, collection: impl Into<String>) {
        let collection = collection.into();
        let changed = {
            let mut st = self.state.lock();
            if st.subscriptions.iter().any(|name| *name == collection) {
                false
            } else {
                st.subscriptions.push(collection);
                true
            }
        };
        if changed {
            self.emit(StoreEvent::SubscriptionsChanged);
        }
    }

    /// Remove `collection` from the subscription set. Idempotent.
    pub fn remove_subscription(&self, collection: &str) {
        let changed = {
            let mut st = self.state.lock();
            let before = st.subscriptions.len();
            st.subscriptions.retain(|name| name != collection);
            st.subscriptions.len() != before
        };
        if changed {
            self.emit(StoreEvent::SubscriptionsChanged);
        }
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    /// Register `callback` for every [`StoreEvent`].
    ///
    /// Returns an [`Unsubscribe`] closure that removes the observer.
    pub fn on_change(&self, callback: impl Fn(&StoreEvent) + Send + Sync + 'static) -> Unsubscribe {
        let listener_id = self.emitter.on(callback);
        let emitter = Arc::clone(&self.emitter);

        Box::new(move || {
            emitter.off(listener_id);
        })
    }

    /// Register `callback` to receive the fresh record snapshot whenever
    /// `collection`'s records change.
    ///
    /// Returns an [`Unsubscribe`] closure.
    pub fn observe_collection(
        &self,
        collection: impl Into<String>,
        callback: impl Fn(Vec<Record>) + Send + Sync + 'static,
    ) -> Unsubscribe {
        let collection = collection.into();
        let state = Arc::clone(&self.state);

        self.on_change(move |event| {
            if event.collection() == Some(collection.as_str()) {
                let snapshot = state.lock().records_for(&collection);
                callback(snapshot);
            }
        })
    }

    /// Number of registered observers. Mostly useful in tests.
    pub fn observer_count(&self) -> usize {
        self.emitter.size()
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    /// Emit `event` to all observers.
    ///
    /// Panics from observers are caught so that a misbehaving callback can
    /// never leave the store wedged after a committed mutation.
    fn emit(&self, event: StoreEvent) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.emitter.emit(&event);
        }));
    }
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::new()
    }
}
