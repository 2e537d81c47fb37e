// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! Emails are stored lower-cased by the service layer and are unique.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::super::{StorageError, StorageResult};
use crate::auth::Role;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique user identifier (UUID), used as the token `sub`
    pub id: String,
    /// Lower-cased email address
    pub email: String,
    /// Display name
    pub name: Option<String>,
    /// Argon2id PHC string
    pub password_hash: String,
    pub roles: BTreeSet<Role>,
    pub created_at: DateTime<Utc>,
}

/// Port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails if the id or email is taken.
    async fn insert(&self, user: StoredUser) -> StorageResult<()>;

    /// Get a user by ID.
    async fn get(&self, user_id: &str) -> StorageResult<StoredUser>;

    /// Find a user by (already normalized) email.
    async fn find_by_email(&self, email: &str) -> StorageResult<Option<StoredUser>>;

    /// List all users, oldest first.
    async fn list(&self) -> StorageResult<Vec<StoredUser>>;

    /// Delete a user, returning the removed record.
    async fn delete(&self, user_id: &str) -> StorageResult<StoredUser>;
}

/// In-memory user repository.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, StoredUser>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: StoredUser) -> StorageResult<()> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.id) {
            return Err(StorageError::AlreadyExists(format!("User {}", user.id)));
        }
        if users.values().any(|existing| existing.email == user.email) {
            return Err(StorageError::AlreadyExists(format!(
                "User with email {}",
                user.email
            )));
        }

        users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn get(&self, user_id: &str) -> StorageResult<StoredUser> {
        self.users
            .read()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("User {user_id}")))
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<StoredUser>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn list(&self) -> StorageResult<Vec<StoredUser>> {
        let mut users: Vec<StoredUser> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn delete(&self, user_id: &str) -> StorageResult<StoredUser> {
        self.users
            .write()
            .await
            .remove(user_id)
            .ok_or_else(|| StorageError::NotFound(format!("User {user_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_user(id: &str, email: &str) -> StoredUser {
        StoredUser {
            id: id.to_string(),
            email: email.to_string(),
            name: None,
            password_hash: "$argon2id$stub".to_string(),
            roles: BTreeSet::from([Role::User]),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_and_get_user() {
        let repo = InMemoryUserRepository::new();
        repo.insert(test_user("u-1", "ada@example.com")).await.unwrap();

        let loaded = repo.get("u-1").await.unwrap();
        assert_eq!(loaded.email, "ada@example.com");
        assert!(repo
            .find_by_email("ada@example.com")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.insert(test_user("u-1", "same@example.com")).await.unwrap();

        let result = repo.insert(test_user("u-2", "same@example.com")).await;
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn list_is_oldest_first() {
        let repo = InMemoryUserRepository::new();
        let mut older = test_user("u-old", "old@example.com");
        older.created_at = Utc::now() - Duration::hours(1);
        repo.insert(test_user("u-new", "new@example.com")).await.unwrap();
        repo.insert(older).await.unwrap();

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec!["u-old".to_string(), "u-new".to_string()]);
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found() {
        let repo = InMemoryUserRepository::new();
        repo.insert(test_user("u-1", "ada@example.com")).await.unwrap();

        assert!(repo.delete("u-1").await.is_ok());
        assert!(matches!(
            repo.delete("u-1").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(repo.get("u-1").await, Err(StorageError::NotFound(_))));
    }
}
