//! StoreEvent — emitted by `ContentStore` after each state change so that
//! bindings and other observers know what moved.

/// A change notification from the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The cached record list for a collection was replaced or edited.
    RecordsChanged { collection: String },
    /// The set of live collection subscriptions changed.
    SubscriptionsChanged,
}

impl StoreEvent {
    /// The affected collection, if the event is collection-scoped.
    pub fn collection(&self) -> Option<&str> {
        match self {
            Self::RecordsChanged { collection } => Some(collection),
            Self::SubscriptionsChanged => None,
        }
    }
}
