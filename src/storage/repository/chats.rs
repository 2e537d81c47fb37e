// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chat repository.
//!
//! A chat is a titled thread owned by one user, holding an ordered list of
//! messages.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use utoipa::ToSchema;

use super::super::{StorageError, StorageResult};

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MessageAuthor {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub id: String,
    pub author: MessageAuthor,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredChat {
    pub id: String,
    pub owner_user_id: String,
    pub title: String,
    pub messages: Vec<StoredMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Port for chat persistence.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn insert(&self, chat: StoredChat) -> StorageResult<()>;

    async fn get(&self, chat_id: &str) -> StorageResult<StoredChat>;

    /// Chats owned by a user, most recently updated first.
    async fn list_by_owner(&self, owner_user_id: &str) -> StorageResult<Vec<StoredChat>>;

    /// Append a message and bump `updated_at`. Returns the updated chat.
    async fn append_message(&self, chat_id: &str, message: StoredMessage)
        -> StorageResult<StoredChat>;

    /// Remove every chat of a user. Returns how many were removed.
    async fn delete_by_owner(&self, owner_user_id: &str) -> StorageResult<usize>;
}

/// In-memory chat repository.
#[derive(Default)]
pub struct InMemoryChatRepository {
    chats: RwLock<HashMap<String, StoredChat>>,
}

impl InMemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn insert(&self, chat: StoredChat) -> StorageResult<()> {
        let mut chats = self.chats.write().await;
        if chats.contains_key(&chat.id) {
            return Err(StorageError::AlreadyExists(format!("Chat {}", chat.id)));
        }
        chats.insert(chat.id.clone(), chat);
        Ok(())
    }

    async fn get(&self, chat_id: &str) -> StorageResult<StoredChat> {
        self.chats
            .read()
            .await
            .get(chat_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("Chat {chat_id}")))
    }

    async fn list_by_owner(&self, owner_user_id: &str) -> StorageResult<Vec<StoredChat>> {
        let mut chats: Vec<StoredChat> = self
            .chats
            .read()
            .await
            .values()
            .filter(|chat| chat.owner_user_id == owner_user_id)
            .cloned()
            .collect();
        chats.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        Ok(chats)
    }

    async fn append_message(
        &self,
        chat_id: &str,
        message: StoredMessage,
    ) -> StorageResult<StoredChat> {
        let mut chats = self.chats.write().await;
        let chat = chats
            .get_mut(chat_id)
            .ok_or_else(|| StorageError::NotFound(format!("Chat {chat_id}")))?;

        chat.updated_at = message.created_at;
        chat.messages.push(message);
        Ok(chat.clone())
    }

    async fn delete_by_owner(&self, owner_user_id: &str) -> StorageResult<usize> {
        let mut chats = self.chats.write().await;
        let before = chats.len();
        chats.retain(|_, chat| chat.owner_user_id != owner_user_id);
        Ok(before - chats.len())
    }
}
