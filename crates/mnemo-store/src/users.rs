//! User repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use mnemo_core::{Error, Result, User, UserRepository};

/// In-memory implementation of [`UserRepository`].
///
/// One `RwLock` guards the collection; the duplicate-email check and the
/// insert happen under the same write guard, so two concurrent signups
/// for the same email cannot both succeed.
pub struct MemUserRepository {
    inner: RwLock<HashMap<Uuid, User>>,
}

impl MemUserRepository {
    /// Create an empty user repository.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Number of registered users.
    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }
}

impl Default for MemUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MemUserRepository {
    async fn insert(&self, user: User) -> Result<User> {
        let mut users = self.inner.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(Error::Conflict(format!(
                "email {} already registered",
                user.email
            )));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_lowercase();
        let users = self.inner.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.inner.read().await.get(&id).cloned())
    }

    async fn update(&self, user: User) -> Result<User> {
        let mut users = self.inner.write().await;
        if !users.contains_key(&user.id) {
            return Err(Error::NotFound(format!("user {}", user.id)));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }
}
