//! Actions — the bundle of context operations pre-bound to one collection.

use std::sync::Arc;

use serde_json::Value;

use crate::context::ContentContext;
use crate::error::ContextError;
use crate::types::Record;

/// Collection-scoped handle over the injected [`ContentContext`].
///
/// Each method prepends the bound collection name and returns exactly what
/// the context resolves to — no retry, no classification, no caching.
/// Cloneable and independent of the binding that produced it, so it can be
/// handed to UI callbacks and outlive the binding.
#[derive(Clone)]
pub struct Actions {
    collection: String,
    context: Arc<dyn ContentContext>,
}

impl Actions {
    pub(crate) fn new(collection: String, context: Arc<dyn ContentContext>) -> Self {
        Self {
            collection,
            context,
        }
    }

    /// The collection every operation is scoped to.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub async fn subscribe(&self) -> Result<(), ContextError> {
        self.context.subscribe(&self.collection).await
    }

    pub async fn unsubscribe(&self) -> Result<(), ContextError> {
        self.context.unsubscribe(&self.collection).await
    }

    pub async fn fetch(&self) -> Result<(), ContextError> {
        self.context.fetch(&self.collection).await
    }

    pub async fn fetch_with_options(
        &self,
        batch: Value,
        opt: Value,
    ) -> Result<Option<Record>, ContextError> {
        self.context
            .fetch_with_options(&self.collection, batch, opt)
            .await
    }

    pub async fn create(&self, payload: Value) -> Result<Option<Record>, ContextError> {
        self.context.create(&self.collection, payload).await
    }

    pub async fn update(&self, id: &str, payload: Value) -> Result<Option<Record>, ContextError> {
        self.context.update(&self.collection, id, payload).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, ContextError> {
        self.context.delete(&self.collection, id).await
    }
}
