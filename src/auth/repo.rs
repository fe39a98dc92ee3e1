use async_trait::async_trait;

use crate::auth::repo_types::User;
use crate::error::StoreError;

/// Access to the users collection.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Find a user by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Insert a new user. Fails with [`StoreError::Duplicate`] when the
    /// username is already taken.
    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, StoreError>;
}
