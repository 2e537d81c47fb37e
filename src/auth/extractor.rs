// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(claims): Auth) -> impl IntoResponse {
//!     // claims is SessionClaims
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{middleware::authenticate, AuthError, SessionClaims};
use crate::state::AppState;

/// Extractor for authenticated users.
///
/// Reads the claims placed in the request extensions by
/// [`require_auth`](super::middleware::require_auth). When a route is not
/// behind the middleware, the header is verified here instead, so each
/// request is still authenticated exactly once.
pub struct Auth(pub SessionClaims);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<SessionClaims>().cloned() {
            return Ok(Auth(claims));
        }

        let claims = authenticate(&parts.headers, &state.verifier).inspect_err(|err| {
            tracing::warn!(
                error_code = err.error_code(),
                error = %err,
                path = parts.uri.path(),
                "authentication rejected"
            );
        })?;
        parts.extensions.insert(claims.clone());
        Ok(Auth(claims))
    }
}

/// Extractor that requires admin role.
pub struct AdminOnly(pub SessionClaims);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Auth(claims) = Auth::from_request_parts(parts, state).await?;

        if !claims.is_admin() {
            tracing::warn!(
                user_id = claims.subject(),
                path = parts.uri.path(),
                "admin route refused"
            );
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(AdminOnly(claims))
    }
}
