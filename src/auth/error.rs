// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! The variants are distinct so rejections can be told apart in logs, but
//! the client only ever sees one of two 401 messages: `No token provided` or
//! `Invalid or expired token`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Client-visible message when no bearer token was presented.
pub const NO_TOKEN_MESSAGE: &str = "No token provided";

/// Client-visible message for every token that failed verification.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";

/// Authentication error type.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization: Bearer <token>` header present
    #[error("no bearer token in Authorization header")]
    MissingToken,
    /// Bad signature, bad encoding, wrong algorithm, issuer or audience
    #[error("token is invalid")]
    InvalidToken,
    /// Token `exp` is in the past
    #[error("token has expired")]
    ExpiredToken,
    /// Signature is valid but the payload lacks required claims
    #[error("token claims are malformed: {0}")]
    MalformedClaims(String),
    /// Authenticated, but the role is too weak
    #[error("insufficient permissions for this operation")]
    InsufficientPermissions,
    /// Token could not be produced
    #[error("internal authentication error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
}

impl AuthError {
    /// Stable identifier used in logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidToken => "invalid_token",
            AuthError::ExpiredToken => "expired_token",
            AuthError::MalformedClaims(_) => "malformed_claims",
            AuthError::InsufficientPermissions => "insufficient_permissions",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::MalformedClaims(_) => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => NO_TOKEN_MESSAGE,
            AuthError::InvalidToken | AuthError::ExpiredToken | AuthError::MalformedClaims(_) => {
                INVALID_TOKEN_MESSAGE
            }
            AuthError::InsufficientPermissions => "Insufficient permissions",
            AuthError::Internal(_) => "Internal server error",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.public_message(),
        });
        (status, body).into_response()
    }
}
