// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{TokenIssuer, TokenVerifier};
use crate::config::AuthSettings;
use crate::storage::{ChatRepository, InMemoryChatRepository, InMemoryUserRepository, UserRepository};

/// Shared handler state. Cloned per request; every field is an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub issuer: Arc<TokenIssuer>,
    pub verifier: Arc<TokenVerifier>,
    pub users: Arc<dyn UserRepository>,
    pub chats: Arc<dyn ChatRepository>,
}

impl AppState {
    pub fn new(
        settings: &AuthSettings,
        users: Arc<dyn UserRepository>,
        chats: Arc<dyn ChatRepository>,
    ) -> Self {
        Self {
            issuer: Arc::new(TokenIssuer::new(settings)),
            verifier: Arc::new(TokenVerifier::new(settings)),
            users,
            chats,
        }
    }

    /// State backed by the in-memory repositories.
    pub fn in_memory(settings: &AuthSettings) -> Self {
        Self::new(
            settings,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryChatRepository::new()),
        )
    }
}
