// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Portal Server - account, session and chat backend
//!
//! Users register and log in with email and password, receive a signed
//! session token, and use it to manage their chat threads.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Session tokens, the authentication gate and roles
//! - `services` - Account and chat use cases
//! - `storage` - Repository ports and in-memory adapters

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod telemetry;
