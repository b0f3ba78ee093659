use std::sync::Arc;

use super::types::{ObjectStore, StoreError};

/// Handle to the object store, constructed once at process start.
///
/// When the store is unreachable or the bucket is missing at startup,
/// the handle is `Disabled` and every operation through it fails
/// immediately with `StoreError::Unavailable`, without network I/O.
#[derive(Clone)]
pub enum StoreHandle {
    Ready(Arc<dyn ObjectStore>),
    Disabled(String),
}

impl StoreHandle {
    pub fn ready(store: Arc<dyn ObjectStore>) -> Self {
        StoreHandle::Ready(store)
    }

    pub fn disabled(reason: impl Into<String>) -> Self {
        StoreHandle::Disabled(reason.into())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, StoreHandle::Ready(_))
    }

    /// Backend name, or "disabled".
    pub fn backend(&self) -> &str {
        match self {
            StoreHandle::Ready(store) => store.name(),
            StoreHandle::Disabled(_) => "disabled",
        }
    }

    /// The underlying store, or `Unavailable` with the startup reason.
    pub fn get(&self) -> Result<&Arc<dyn ObjectStore>, StoreError> {
        match self {
            StoreHandle::Ready(store) => Ok(store),
            StoreHandle::Disabled(reason) => Err(StoreError::Unavailable(reason.clone())),
        }
    }
}
