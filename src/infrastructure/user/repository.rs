//! In-memory user repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{NewUser, RepositoryError, User, UserId, UserRepository};

const EMAIL_CONSTRAINT: &str = "users_email_key";

/// In-memory implementation of UserRepository
///
/// Emails are compared exactly, mirroring the unique index on the Postgres table.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    /// Users keyed by email
    users: Arc<RwLock<HashMap<String, User>>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicI64::new(1),
        }
    }

    /// Create a repository with initial users
    #[cfg(test)]
    pub(crate) fn with_users(users: Vec<User>) -> Self {
        let next_id = users.iter().map(|u| u.id().value()).max().unwrap_or(0) + 1;
        let users_map = users
            .into_iter()
            .map(|user| (user.email().to_string(), user))
            .collect();

        Self {
            users: Arc::new(RwLock::new(users_map)),
            next_id: AtomicI64::new(next_id),
        }
    }

    /// Number of stored users
    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_email(&self, email: &str) -> Result<User, RepositoryError> {
        let users = self.users.read().await;
        users.get(email).cloned().ok_or(RepositoryError::NotFound)
    }

    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.email) {
            return Err(RepositoryError::unique_violation(EMAIL_CONSTRAINT));
        }

        let id = UserId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let created = User::from_storage(
            id,
            user.email.clone(),
            user.password_hash,
            user.first_name,
            user.last_name,
            Utc::now(),
        );

        users.insert(user.email, created.clone());
        Ok(created)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hashed_password".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryUserRepository::new();

        let created = repo.create(new_user("a@x.com")).await.unwrap();
        assert_eq!(created.id().value(), 1);
        assert_eq!(created.password_hash(), "hashed_password");

        let fetched = repo.get_by_email("a@x.com").await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let repo = InMemoryUserRepository::new();

        let first = repo.create(new_user("a@x.com")).await.unwrap();
        let second = repo.create(new_user("b@x.com")).await.unwrap();

        assert!(second.id() > first.id());
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let repo = InMemoryUserRepository::new();

        let result = repo.get_by_email("nobody@x.com").await;
        assert_eq!(result.unwrap_err(), RepositoryError::NotFound);
    }

    #[tokio::test]
    async fn test_email_uniqueness() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("a@x.com")).await.unwrap();

        let result = repo.create(new_user("a@x.com")).await;

        assert!(matches!(
            result,
            Err(RepositoryError::UniqueViolation { .. })
        ));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_email_is_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("a@x.com")).await.unwrap();

        assert!(repo.create(new_user("A@x.com")).await.is_ok());
        assert!(repo.get_by_email("A@X.COM").await.is_err());
    }

    #[tokio::test]
    async fn test_with_users_continues_sequence() {
        let seeded = User::from_storage(UserId::new(41), "a@x.com", "h", "A", "B", Utc::now());
        let repo = InMemoryUserRepository::with_users(vec![seeded]);

        let created = repo.create(new_user("b@x.com")).await.unwrap();
        assert_eq!(created.id().value(), 42);
        assert_eq!(repo.len().await, 2);
    }
}
