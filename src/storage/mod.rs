// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Repository ports used by the service layer, with in-memory adapters.
//!
//! Services only see the traits ([`UserRepository`], [`ChatRepository`]),
//! held as `Arc<dyn …>` in the application state, so a database-backed
//! adapter can replace the in-memory one without touching handlers or
//! services.

pub mod repository;

pub use repository::{
    ChatRepository, InMemoryChatRepository, InMemoryUserRepository, MessageAuthor, StoredChat,
    StoredMessage, StoredUser, UserRepository,
};

/// Error type for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),
    /// Entity already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
