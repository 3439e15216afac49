//! In-memory user store

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{DomainError, DomainResult, User, UserRepositoryInterface};

/// In-memory storage for development and testing
pub struct InMemoryUserRepository {
    users: DashMap<i32, User>,
    id_counter: AtomicI32,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            id_counter: AtomicI32::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUserRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_oib(&self, oib: &str) -> DomainResult<Option<User>> {
        // Lowest id wins when duplicates slipped past the API check.
        Ok(self
            .users
            .iter()
            .filter(|e| e.value().oib == oib)
            .min_by_key(|e| *e.key())
            .map(|e| e.value().clone()))
    }

    async fn save(&self, mut user: User) -> DomainResult<User> {
        if user.is_new() {
            user.id = self.id_counter.fetch_add(1, Ordering::SeqCst);
            self.users.insert(user.id, user.clone());
            return Ok(user);
        }

        match self.users.get_mut(&user.id) {
            Some(mut existing) => {
                *existing = user.clone();
                Ok(user)
            }
            None => Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: user.id.to_string(),
            }),
        }
    }

    async fn delete_by_oib(&self, oib: &str) -> DomainResult<()> {
        self.users.retain(|_, u| u.oib != oib);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let repo = InMemoryUserRepository::new();
        let a = repo.save(User::new("Ana", "Anic", "17748241351", "1")).await.unwrap();
        let b = repo.save(User::new("Ivan", "Horvat", "05552352140", "0")).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn update_replaces_stored_record() {
        let repo = InMemoryUserRepository::new();
        let mut user = repo.save(User::new("Ana", "Anic", "17748241351", "1")).await.unwrap();

        user.file_name = Some("export.txt".into());
        repo.save(user.clone()).await.unwrap();

        let stored = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.file_name.as_deref(), Some("export.txt"));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn update_of_unknown_id_fails() {
        let repo = InMemoryUserRepository::new();
        let mut user = User::new("Ana", "Anic", "17748241351", "1");
        user.id = 99;

        assert!(matches!(
            repo.save(user).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn delete_by_oib_only_touches_matching_users() {
        let repo = InMemoryUserRepository::new();
        repo.save(User::new("Ana", "Anic", "17748241351", "1")).await.unwrap();
        repo.save(User::new("Ivan", "Horvat", "05552352140", "0")).await.unwrap();

        repo.delete_by_oib("17748241351").await.unwrap();

        assert!(repo.find_by_oib("17748241351").await.unwrap().is_none());
        assert!(repo.find_by_oib("05552352140").await.unwrap().is_some());
    }
}
