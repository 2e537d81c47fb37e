// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to stored entities.
//!
//! Each repository is an async port plus an in-memory adapter.

pub mod chats;
pub mod users;

pub use chats::{ChatRepository, InMemoryChatRepository, MessageAuthor, StoredChat, StoredMessage};
pub use users::{InMemoryUserRepository, StoredUser, UserRepository};
