//! Flat-JSON user store over the object store.
//!
//! All user records live in a single document at `users/users.json`,
//! a mapping of id string to record. Ids are monotonically increasing
//! decimal strings derived from the mapping size; deletion is
//! unsupported so ids are never reused.
//!
//! Writes are whole-document read-modify-write with no concurrency
//! control: two simultaneous registrations can lose one update. This
//! store is a stand-in collaborator, not a database.

use std::collections::HashMap;

use argon2::password_hash::{PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};
use rand_core::OsRng;
use tracing::debug;

use crate::storage::{StoreError, StoreHandle};

use super::types::{User, UserRecord, UserStoreError};

/// Object key of the user document, partitioned from media uploads.
pub const USERS_KEY: &str = "users/users.json";

pub struct JsonUserStore {
    store: StoreHandle,
    key: String,
}

impl JsonUserStore {
    pub fn new(store: StoreHandle) -> Self {
        Self {
            store,
            key: USERS_KEY.to_string(),
        }
    }

    /// Load the whole document. A missing object reads as empty.
    async fn load(&self) -> Result<HashMap<String, UserRecord>, UserStoreError> {
        let store = self.store.get()?;
        match store.get(&self.key).await {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| UserStoreError::Corrupt(e.to_string()))
            }
            Err(StoreError::NotFound(_)) => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, users: &HashMap<String, UserRecord>) -> Result<(), UserStoreError> {
        let store = self.store.get()?;
        let bytes =
            serde_json::to_vec(users).map_err(|e| UserStoreError::Corrupt(e.to_string()))?;
        store.put(&self.key, bytes).await?;
        Ok(())
    }

    /// Register a new user. Usernames are unique across the document.
    pub async fn create(&self, username: &str, password: &str) -> Result<User, UserStoreError> {
        let mut users = self.load().await?;

        if users.values().any(|record| record.username == username) {
            return Err(UserStoreError::DuplicateUsername(username.to_string()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| UserStoreError::Hash(e.to_string()))?
            .to_string();

        let id = (users.len() + 1).to_string();
        let record = UserRecord {
            username: username.to_string(),
            password_hash,
        };
        users.insert(id.clone(), record.clone());
        self.save(&users).await?;

        debug!(user_id = %id, username = %username, "user created");
        Ok(User::from_record(id, record))
    }

    pub async fn get(&self, id: &str) -> Result<Option<User>, UserStoreError> {
        let users = self.load().await?;
        Ok(users
            .get(id)
            .cloned()
            .map(|record| User::from_record(id.to_string(), record)))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserStoreError> {
        let users = self.load().await?;
        Ok(users
            .into_iter()
            .find(|(_, record)| record.username == username)
            .map(|(id, record)| User::from_record(id, record)))
    }

    /// Constant-time password check against the stored argon2 hash.
    pub fn verify_password(user: &User, password: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&user.password_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
