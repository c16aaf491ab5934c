use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::credential::errors::UserStoreError;
use crate::credential::models::RefreshToken;
use crate::credential::models::UserId;
use crate::credential::models::UserRecord;
use crate::credential::ports::UserStore;

/// Process-local user store for development and tests.
///
/// A single lock guards all records, so every operation is atomic.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, UserStoreError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| user.username.as_str() == username)
            .cloned())
    }

    async fn find_by_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<UserRecord>, UserStoreError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| {
                user.refresh_token
                    .as_ref()
                    .is_some_and(|active| active.value == token)
            })
            .cloned())
    }

    async fn save(&self, record: &UserRecord) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;

        let taken = users
            .values()
            .any(|user| user.id != record.id && user.username == record.username);
        if taken {
            return Err(UserStoreError::DuplicateUsername(record.username.to_string()));
        }

        users.insert(record.id, record.clone());
        Ok(())
    }

    async fn rotate_refresh_token(
        &self,
        user_id: &UserId,
        presented: &str,
        replacement: &RefreshToken,
    ) -> Result<bool, UserStoreError> {
        let mut users = self.users.write().await;

        let Some(user) = users.get_mut(user_id) else {
            return Ok(false);
        };

        let is_current = user
            .refresh_token
            .as_ref()
            .is_some_and(|active| active.value == presented);
        if !is_current {
            return Ok(false);
        }

        user.refresh_token = Some(replacement.clone());
        Ok(true)
    }
}
