// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chat use cases.
//!
//! A chat is visible to its owner and to admins. Only the owner may post.
//! Everyone else gets `NotFound`, so chat ids of other users are not
//! confirmed to exist.

use chrono::Utc;
use uuid::Uuid;

use super::{accounts, ServiceError};
use crate::auth::SessionClaims;
use crate::models::{CreateChatRequest, PostMessageRequest};
use crate::storage::{
    ChatRepository, MessageAuthor, StorageError, StoredChat, StoredMessage, UserRepository,
};

pub const DEFAULT_CHAT_TITLE: &str = "New chat";
pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_MESSAGE_CHARS: usize = 8000;

fn chat_title(title: Option<String>) -> Result<String, ServiceError> {
    let Some(title) = title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) else {
        return Ok(DEFAULT_CHAT_TITLE.to_string());
    };
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ServiceError::Validation(format!(
            "Title must be at most {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(title)
}

fn message_content(content: String) -> Result<String, ServiceError> {
    let content = content.trim().to_string();
    if content.is_empty() {
        return Err(ServiceError::Validation("Message content is required".into()));
    }
    if content.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ServiceError::Validation(format!(
            "Message must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }
    Ok(content)
}

fn not_found(chat_id: &str) -> ServiceError {
    StorageError::NotFound(format!("Chat {chat_id}")).into()
}

/// Open a new, empty chat owned by the caller.
///
/// Fails with `InvalidToken` once the caller's account has been deleted.
pub async fn create_chat(
    users: &dyn UserRepository,
    chats: &dyn ChatRepository,
    owner: &SessionClaims,
    request: CreateChatRequest,
) -> Result<StoredChat, ServiceError> {
    let title = chat_title(request.title)?;
    accounts::current_user(users, owner).await?;

    let now = Utc::now();
    let chat = StoredChat {
        id: Uuid::new_v4().to_string(),
        owner_user_id: owner.subject().to_string(),
        title,
        messages: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    chats.insert(chat.clone()).await?;
    tracing::info!(chat_id = %chat.id, user_id = owner.subject(), "chat created");
    Ok(chat)
}

/// The caller's chats, most recently updated first.
pub async fn list_chats(
    chats: &dyn ChatRepository,
    owner: &SessionClaims,
) -> Result<Vec<StoredChat>, ServiceError> {
    Ok(chats.list_by_owner(owner.subject()).await?)
}

/// A chat with its messages, for its owner or an admin.
pub async fn get_chat(
    chats: &dyn ChatRepository,
    viewer: &SessionClaims,
    chat_id: &str,
) -> Result<StoredChat, ServiceError> {
    let chat = chats.get(chat_id).await?;
    if chat.owner_user_id != viewer.subject() && !viewer.is_admin() {
        tracing::debug!(chat_id, user_id = viewer.subject(), "chat access denied");
        return Err(not_found(chat_id));
    }
    Ok(chat)
}

/// Append a user message to one of the caller's chats.
pub async fn post_message(
    chats: &dyn ChatRepository,
    author: &SessionClaims,
    chat_id: &str,
    request: PostMessageRequest,
) -> Result<StoredMessage, ServiceError> {
    let content = message_content(request.content)?;

    let chat = chats.get(chat_id).await?;
    if chat.owner_user_id != author.subject() {
        return Err(not_found(chat_id));
    }

    let message = StoredMessage {
        id: Uuid::new_v4().to_string(),
        author: MessageAuthor::User,
        content,
        created_at: Utc::now(),
    };
    chats.append_message(chat_id, message.clone()).await?;
    tracing::debug!(chat_id, message_id = %message.id, "message posted");
    Ok(message)
}
