use async_trait::async_trait;

use super::User;
use crate::domain::DomainResult;

/// Persistence port for users.
///
/// `save` inserts when the user has no id yet and updates otherwise.
/// Looking up a missing user is `Ok(None)`, not an error.
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;
    async fn find_by_oib(&self, oib: &str) -> DomainResult<Option<User>>;

    async fn save(&self, user: User) -> DomainResult<User>;
    async fn delete_by_oib(&self, oib: &str) -> DomainResult<()>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> DomainResult<()> {
        Ok(())
    }
}
