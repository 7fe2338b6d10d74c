use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A cached entity belonging to a named collection.
///
/// `data` is the consumer-defined payload, kept as opaque JSON so the store
/// can hold any collection shape. `meta` carries optional server-side
/// bookkeeping (timestamps, versions) that the binding forwards untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub data: Value,
    pub meta: Option<Value>,
}

impl Record {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
            meta: None,
        }
    }

    pub fn with_meta(id: impl Into<String>, data: Value, meta: Value) -> Self {
        Self {
            id: id.into(),
            data,
            meta: Some(meta),
        }
    }
}

/// The `{batch, opt}` pair requesting a parameterized fetch.
///
/// Both fields are opaque to the binding and forwarded verbatim to
/// `fetch_with_options` — `batch` is typically a page size, `opt` a bag of
/// backend-specific options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    pub batch: Value,
    pub opt: Value,
}

impl QueryDescriptor {
    pub fn new(batch: impl Into<Value>, opt: impl Into<Value>) -> Self {
        Self {
            batch: batch.into(),
            opt: opt.into(),
        }
    }
}
