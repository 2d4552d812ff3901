use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::User;

/// In-memory user store shared by every handler of a service.
///
/// Clones share the same underlying map. Each write holds the lock for a
/// single insert, so readers only ever see whole entries.
#[derive(Clone, Debug, Default)]
pub struct UserRegistry {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl UserRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `user` under its username, replacing any existing entry.
    ///
    /// Returns the entry that was replaced, if any.
    pub async fn upsert(&self, user: User) -> Option<User> {
        let mut users = self.users.write().await;
        users.insert(user.username().to_string(), user)
    }

    /// Retrieves a copy of the user stored under `username`.
    pub async fn get(&self, username: &str) -> Option<User> {
        let users = self.users.read().await;
        users.get(username).cloned()
    }

    /// Returns the number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Returns `true` if no user has been stored yet.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}
