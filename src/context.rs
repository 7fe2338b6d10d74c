//! ContentContext — the injected delegate that actually talks to the
//! backing content service.
//!
//! The binding layer never mutates the store itself; every operation is
//! forwarded here. Implementations own their transport (HTTP, WebSocket,
//! in-process) and are expected to publish results back into the shared
//! [`ContentStore`] so that bindings observe them as snapshot changes.
//!
//! [`ContentStore`]: crate::store::ContentStore

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ContextError;
use crate::types::Record;

/// User-implemented delegate for subscribe/fetch/CRUD against a backing
/// store. Consumed as `Arc<dyn ContentContext>`.
///
/// Operations that may or may not return an entity (the backend decides)
/// resolve to `Option<Record>`; `delete` resolves to whether a record was
/// actually removed.
#[async_trait]
pub trait ContentContext: Send + Sync {
    /// Open a live subscription for `collection`.
    async fn subscribe(&self, collection: &str) -> Result<(), ContextError>;

    /// Tear down the live subscription for `collection`.
    async fn unsubscribe(&self, collection: &str) -> Result<(), ContextError>;

    /// Fetch the full record list for `collection`.
    async fn fetch(&self, collection: &str) -> Result<(), ContextError>;

    /// Fetch with an opaque batching parameter and options bag.
    async fn fetch_with_options(
        &self,
        collection: &str,
        batch: Value,
        opt: Value,
    ) -> Result<Option<Record>, ContextError>;

    /// Create a record from `payload` in `collection`.
    async fn create(
        &self,
        collection: &str,
        payload: Value,
    ) -> Result<Option<Record>, ContextError>;

    /// Update record `id` in `collection` with `payload`.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        payload: Value,
    ) -> Result<Option<Record>, ContextError>;

    /// Delete record `id` from `collection`.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, ContextError>;
}
