use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::StoreError;

/// Errors that can occur during user store operations.
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("User document corrupt: {0}")]
    Corrupt(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// One entry in the user document, keyed externally by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
}

/// A user with its id attached.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
}

impl User {
    pub(crate) fn from_record(id: String, record: UserRecord) -> Self {
        Self {
            id,
            username: record.username,
            password_hash: record.password_hash,
        }
    }
}
