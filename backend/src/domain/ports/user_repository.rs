//! Driven port for the credential store.

use async_trait::async_trait;

use crate::domain::ports::StoreError;
use crate::domain::{NewUser, User, UserId};

/// Append-and-update access to user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Look up a user by unique login name.
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError>;

    /// Look up a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Insert a new user. Fails with [`StoreError::Duplicate`] when the name
    /// is already taken.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    /// Replace a user's password digest. Fails with
    /// [`StoreError::MissingRow`] when the user does not exist.
    async fn set_password_digest(&self, id: UserId, digest: String) -> Result<(), StoreError>;

    /// Number of stored users; drives bootstrap seeding.
    async fn count(&self) -> Result<u64, StoreError>;
}
