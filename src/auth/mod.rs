// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Session-token authentication for the portal API.
//!
//! ## Auth Flow
//!
//! 1. A user logs in with email and password (`POST /v1/auth/login`)
//! 2. The server issues an HS256 JWT carrying `sub`, `email`, `roles`,
//!    `iss`, `iat`, `exp`
//! 3. The frontend sends `Authorization: Bearer <token>` on every call
//! 4. The gate:
//!    - Verifies signature, expiry and issuer
//!    - Extracts `sub`, `email` and `roles` into [`SessionClaims`]
//!    - Attaches the claims to the request or answers 401
//!
//! ## Security
//!
//! - All `/v1` routes except register and login require authentication
//! - Only HS256 is accepted; the secret is loaded once at startup
//! - Passwords are stored as Argon2id hashes
//! - No clock-skew tolerance unless configured
//! - Clients never learn why a token was rejected

pub mod claims;
pub mod error;
pub mod extractor;
pub mod issuer;
pub mod middleware;
pub mod password;
pub mod roles;
pub mod verifier;

pub use claims::{Principal, SessionClaims};
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth};
pub use issuer::{IssuedToken, TokenIssuer};
pub use middleware::require_auth;
pub use roles::Role;
pub use verifier::TokenVerifier;
