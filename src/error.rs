use thiserror::Error;

// ---------------------------------------------------------------------------
// ContextError
// ---------------------------------------------------------------------------

/// Failure classification for a context call.
///
/// Advisory only — the crate never retries. Callers that implement their own
/// retry can use the kind to decide whether another attempt is worthwhile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextErrorKind {
    /// The call may succeed if repeated (timeouts, connectivity).
    Transient,
    /// Repeating the call will not help (rejected payload, auth).
    Fatal,
}

/// A failed call to the injected [`ContentContext`].
///
/// The single error category the binding surfaces: the context said no.
/// Implementations stringify their own transport or server errors into
/// `message`.
///
/// [`ContentContext`]: crate::context::ContentContext
#[derive(Debug, Clone, Error)]
#[error("Context call failed: {message}")]
pub struct ContextError {
    pub message: String,
    pub kind: ContextErrorKind,
}

impl ContextError {
    /// A transient error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ContextErrorKind::Transient,
        }
    }

    /// An error with an explicit kind.
    pub fn with_kind(message: impl Into<String>, kind: ContextErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind == ContextErrorKind::Transient
    }
}

// ---------------------------------------------------------------------------
// BindingError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum BindingError {
    #[error("Collection name must be a non-empty string")]
    EmptyCollectionName,

    #[error("Failed to decode record \"{id}\" in collection \"{collection}\"")]
    Decode {
        collection: String,
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// ContentBindError — top-level rollup
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ContentBindError {
    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Binding(#[from] BindingError),
}

/// Convenience alias — the default error type is `ContentBindError`.
pub type Result<T, E = ContentBindError> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
