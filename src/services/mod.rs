// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Use cases.
//!
//! Handlers parse the request, call one function here, and map the result.
//! Services depend only on the repository ports, the token issuer and the
//! caller's [`SessionClaims`](crate::auth::SessionClaims).

pub mod accounts;
pub mod chats;

use crate::auth::{password::PasswordError, AuthError};
use crate::error::ApiError;
use crate::storage::StorageError;

/// Error type for use cases.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input failed validation
    #[error("{0}")]
    Validation(String),
    /// Request is well-formed but not allowed in the current state
    #[error("{0}")]
    Unprocessable(String),
    /// Unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => ApiError::bad_request(msg),
            ServiceError::Unprocessable(msg) => ApiError::unprocessable(msg),
            ServiceError::InvalidCredentials => ApiError::unauthorized(err.to_string()),
            ServiceError::Auth(auth) => auth.into(),
            ServiceError::Storage(StorageError::NotFound(what)) => {
                ApiError::not_found(format!("{what} not found"))
            }
            ServiceError::Storage(StorageError::AlreadyExists(what)) => {
                ApiError::conflict(format!("{what} already exists"))
            }
            ServiceError::Password(e) => {
                tracing::error!(error = %e, "password backend failure");
                ApiError::internal("Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (
                ServiceError::Unprocessable("no".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (ServiceError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                ServiceError::Auth(AuthError::InsufficientPermissions),
                StatusCode::FORBIDDEN,
            ),
            (
                ServiceError::Storage(StorageError::NotFound("Chat c-1".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                ServiceError::Storage(StorageError::AlreadyExists("User u-1".into())),
                StatusCode::CONFLICT,
            ),
            (
                ServiceError::Password(PasswordError::HashingFailed),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn not_found_message_names_the_entity() {
        let err = ApiError::from(ServiceError::Storage(StorageError::NotFound("Chat c-9".into())));
        assert_eq!(err.message, "Chat c-9 not found");
    }
}
