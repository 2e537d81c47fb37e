// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. All types derive
//! `ToSchema` for the OpenAPI document; requests derive `Deserialize`,
//! responses derive `Serialize`.
//!
//! ## Model Categories
//!
//! - **Auth**: registration, login and the issued token
//! - **Users**: the current user and the admin user grid
//! - **Chats**: chat threads and their messages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{IssuedToken, Role, SessionClaims};
use crate::storage::{MessageAuthor, StoredChat, StoredMessage, StoredUser};

// =============================================================================
// Auth Models
// =============================================================================

/// Request to create an account.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Email address, used as the login name.
    pub email: String,
    /// Plain-text password (8 to 128 characters).
    pub password: String,
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Request to log in.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Session token returned by login.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Signed session token, sent back as `Authorization: Bearer <token>`.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            access_token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
        }
    }
}

// =============================================================================
// User Models
// =============================================================================

/// Public view of an account. Never includes the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

impl From<StoredUser> for UserResponse {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            roles: user.roles.into_iter().collect(),
            created_at: user.created_at,
        }
    }
}

/// Response for the admin user grid.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub total: usize,
}

/// Response for GET /v1/users/me
#[derive(Debug, Serialize, ToSchema)]
pub struct UserMeResponse {
    /// User's unique ID (token `sub`)
    pub user_id: String,
    pub email: String,
    /// Display name from the stored account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub roles: Vec<Role>,
    /// Token issue time (unix seconds)
    pub issued_at: i64,
    /// Token expiry (unix seconds)
    pub expires_at: i64,
}

impl UserMeResponse {
    /// Identity and roles come from the token; the name from the account.
    pub fn new(claims: SessionClaims, user: StoredUser) -> Self {
        Self {
            user_id: claims.subject().to_string(),
            email: claims.email().to_string(),
            name: user.name,
            roles: claims.roles().iter().copied().collect(),
            issued_at: claims.issued_at(),
            expires_at: claims.expires_at(),
        }
    }
}

// =============================================================================
// Chat Models
// =============================================================================

/// Request to open a chat thread.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateChatRequest {
    /// Thread title (defaults to "New chat").
    #[serde(default)]
    pub title: Option<String>,
}

/// Request to post a message into a chat.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PostMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatMessageResponse {
    pub id: String,
    pub author: MessageAuthor,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<StoredMessage> for ChatMessageResponse {
    fn from(message: StoredMessage) -> Self {
        Self {
            id: message.id,
            author: message.author,
            content: message.content,
            created_at: message.created_at,
        }
    }
}

/// A chat thread with its messages.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub id: String,
    pub owner_user_id: String,
    pub title: String,
    pub messages: Vec<ChatMessageResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredChat> for ChatResponse {
    fn from(chat: StoredChat) -> Self {
        Self {
            id: chat.id,
            owner_user_id: chat.owner_user_id,
            title: chat.title,
            messages: chat.messages.into_iter().map(Into::into).collect(),
            created_at: chat.created_at,
            updated_at: chat.updated_at,
        }
    }
}

/// Chat list item (no messages).
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatSummary {
    pub id: String,
    pub title: String,
    pub message_count: usize,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredChat> for ChatSummary {
    fn from(chat: StoredChat) -> Self {
        Self {
            id: chat.id,
            title: chat.title,
            message_count: chat.messages.len(),
            updated_at: chat.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatListResponse {
    pub chats: Vec<ChatSummary>,
    pub total: usize,
}
