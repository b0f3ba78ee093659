//! User records, persisted as one JSON document in the object store.

mod store;
mod types;

pub use store::JsonUserStore;
pub use types::{User, UserRecord, UserStoreError};
