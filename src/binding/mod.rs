//! ContentBinding — connects one collection in the shared [`ContentStore`]
//! to the injected [`ContentContext`].
//!
//! A binding yields three things for its collection: the live record
//! snapshot, a derived subscribed flag, and the [`Actions`] bundle of
//! collection-scoped context operations. Mounting runs the initial-load
//! protocol exactly once; [`rebind`] and [`set_initial_load`] re-run it when
//! the collection name or load mode actually changes.
//!
//! The binding never mutates the store — results flow back through whatever
//! the context implementation publishes, and the binding observes them as
//! snapshot changes.
//!
//! [`rebind`]: ContentBinding::rebind
//! [`set_initial_load`]: ContentBinding::set_initial_load

pub mod actions;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::context::ContentContext;
use crate::error::{BindingError, Result};
use crate::store::{ContentStore, StoreEvent, Unsubscribe};
use crate::types::{QueryDescriptor, Record};

pub use actions::Actions;

// ============================================================================
// InitialLoad
// ============================================================================

/// What the binding loads when it mounts (and after each rebind).
///
/// Exactly one behavior is requested: nothing, an unscoped fetch, or a
/// parameterized fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum InitialLoad {
    /// No load on mount — the cache is used as-is.
    None,
    /// One unscoped `fetch(collection)`.
    Fetch,
    /// One `fetch_with_options(collection, batch, opt)`.
    FetchWith(QueryDescriptor),
}

// ============================================================================
// ContentBinding
// ============================================================================

/// Adapter from one named collection to the store snapshot, the derived
/// subscribed flag, and the context-backed [`Actions`].
pub struct ContentBinding {
    store: Arc<ContentStore>,
    context: Arc<dyn ContentContext>,
    collection: String,
    load: InitialLoad,
    /// Derived flag — recomputed by the store observer on every
    /// subscriptions-changed event.
    subscribed: Arc<AtomicBool>,
    /// The name the observer tests membership against; shared so rebind can
    /// retarget the already-registered observer.
    watched: Arc<Mutex<String>>,
    unsubscribe: Option<Unsubscribe>,
}

impl ContentBinding {
    /// Mount a binding: validate the name, start observing the subscription
    /// set, and run the initial-load protocol once.
    ///
    /// A load failure is logged and propagated; the binding is not returned.
    pub async fn mount(
        store: Arc<ContentStore>,
        context: Arc<dyn ContentContext>,
        collection: impl Into<String>,
        load: InitialLoad,
    ) -> Result<Self> {
        let collection = collection.into();
        if collection.is_empty() {
            return Err(BindingError::EmptyCollectionName.into());
        }

        let subscribed = Arc::new(AtomicBool::new(store.is_subscribed(&collection)));
        let watched = Arc::new(Mutex::new(collection.clone()));

        let unsubscribe = {
            let observer_store = Arc::clone(&store);
            let subscribed = Arc::clone(&subscribed);
            let watched = Arc::clone(&watched);
            store.on_change(move |event| {
                if matches!(event, StoreEvent::SubscriptionsChanged) {
                    let name = watched.lock().clone();
                    subscribed.store(observer_store.is_subscribed(&name), Ordering::SeqCst);
                }
            })
        };

        let binding = Self {
            store,
            context,
            collection,
            load,
            subscribed,
            watched,
            unsubscribe: Some(unsubscribe),
        };
        binding.run_load().await?;
        Ok(binding)
    }

    // -----------------------------------------------------------------------
    // Outputs
    // -----------------------------------------------------------------------

    /// The live record snapshot for the bound collection — re-read from the
    /// store on every call.
    pub fn records(&self) -> Vec<Record> {
        self.store.records_for(&self.collection)
    }

    /// Typed view of [`records`](ContentBinding::records).
    pub fn records_as<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.store.records_as(&self.collection)
    }

    /// Whether the bound collection currently has a live subscription.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::SeqCst)
    }

    /// The context operations pre-bound to this collection.
    pub fn actions(&self) -> Actions {
        Actions::new(self.collection.clone(), Arc::clone(&self.context))
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn initial_load(&self) -> &InitialLoad {
        &self.load
    }

    // -----------------------------------------------------------------------
    // Re-execution surface
    // -----------------------------------------------------------------------

    /// Point the binding at a different collection.
    ///
    /// Re-seeds the subscribed flag from the live set and re-runs the load
    /// protocol for the new name under the current mode. Rebinding to the
    /// already-bound name is a no-op. An in-flight load for the previous
    /// name is not cancelled; its result is simply never read here.
    pub async fn rebind(&mut self, collection: impl Into<String>) -> Result<()> {
        let collection = collection.into();
        if collection.is_empty() {
            return Err(BindingError::EmptyCollectionName.into());
        }
        if collection == self.collection {
            return Ok(());
        }

        debug!(old = %self.collection, new = %collection, "rebind");
        self.collection = collection.clone();
        *self.watched.lock() = collection.clone();
        self.subscribed
            .store(self.store.is_subscribed(&collection), Ordering::SeqCst);
        self.run_load().await
    }

    /// Change the load mode, re-running the protocol for the bound
    /// collection. Setting the identical mode is a no-op.
    pub async fn set_initial_load(&mut self, load: InitialLoad) -> Result<()> {
        if load == self.load {
            return Ok(());
        }
        self.load = load;
        self.run_load().await
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    /// One round of the load protocol for the current collection and mode.
    async fn run_load(&self) -> Result<()> {
        let outcome = match &self.load {
            InitialLoad::None => return Ok(()),
            InitialLoad::Fetch => {
                debug!(collection = %self.collection, "initial load: fetch");
                self.context.fetch(&self.collection).await
            }
            InitialLoad::FetchWith(query) => {
                debug!(collection = %self.collection, "initial load: fetch with options");
                self.context
                    .fetch_with_options(&self.collection, query.batch.clone(), query.opt.clone())
                    .await
                    .map(|_| ())
            }
        };

        outcome.map_err(|e| {
            warn!(collection = %self.collection, error = %e, "initial load failed");
            e.into()
        })
    }
}

impl Drop for ContentBinding {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}
