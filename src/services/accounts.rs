// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account use cases: registration, login, the admin grid and deletion.

use std::collections::BTreeSet;

use chrono::Utc;
use uuid::Uuid;

use super::ServiceError;
use crate::auth::{
    password::{hash_password, verify_password, PasswordError},
    AuthError, IssuedToken, Principal, Role, SessionClaims, TokenIssuer,
};
use crate::models::{LoginRequest, RegisterRequest};
use crate::storage::{ChatRepository, StorageError, StoredUser, UserRepository};

pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MAX_PASSWORD_CHARS: usize = 128;
pub const MAX_NAME_CHARS: usize = 100;
const MAX_EMAIL_CHARS: usize = 254;

/// Trim and lower-case an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<(), ServiceError> {
    let invalid = || ServiceError::Validation("A valid email address is required".into());

    if email.is_empty() || email.len() > MAX_EMAIL_CHARS || email.contains(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@');
    if local.is_empty() || !domain_ok {
        return Err(invalid());
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ServiceError> {
    let chars = password.chars().count();
    if !(MIN_PASSWORD_CHARS..=MAX_PASSWORD_CHARS).contains(&chars) {
        return Err(ServiceError::Validation(format!(
            "Password must be between {MIN_PASSWORD_CHARS} and {MAX_PASSWORD_CHARS} characters"
        )));
    }
    Ok(())
}

fn normalize_name(name: Option<String>) -> Result<Option<String>, ServiceError> {
    let Some(name) = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(ServiceError::Validation(format!(
            "Name must be at most {MAX_NAME_CHARS} characters"
        )));
    }
    Ok(Some(name))
}

// Argon2 runs on the blocking pool.
async fn hash_blocking(password: &str) -> Result<String, ServiceError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing task failed");
            PasswordError::HashingFailed
        })?
        .map_err(Into::into)
}

async fn verify_blocking(password: &str, hash: &str) -> Result<bool, ServiceError> {
    let (password, hash) = (password.to_string(), hash.to_string());
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password verification task failed");
            PasswordError::HashingFailed
        })?
        .map_err(Into::into)
}

async fn create_user(
    users: &dyn UserRepository,
    email: &str,
    password: &str,
    name: Option<String>,
    roles: BTreeSet<Role>,
) -> Result<StoredUser, ServiceError> {
    let email = normalize_email(email);
    validate_email(&email)?;
    validate_password(password)?;
    let name = normalize_name(name)?;

    if users.find_by_email(&email).await?.is_some() {
        return Err(StorageError::AlreadyExists("An account with this email".into()).into());
    }

    let user = StoredUser {
        id: Uuid::new_v4().to_string(),
        email,
        name,
        password_hash: hash_blocking(password).await?,
        roles,
        created_at: Utc::now(),
    };
    users.insert(user.clone()).await?;
    Ok(user)
}

/// Register a regular account.
pub async fn register(
    users: &dyn UserRepository,
    request: RegisterRequest,
) -> Result<StoredUser, ServiceError> {
    let user = create_user(
        users,
        &request.email,
        &request.password,
        request.name,
        BTreeSet::from([Role::User]),
    )
    .await?;
    tracing::info!(user_id = %user.id, "user registered");
    Ok(user)
}

/// Create the configured admin account unless its email is already taken.
pub async fn seed_admin(
    users: &dyn UserRepository,
    email: &str,
    password: &str,
) -> Result<StoredUser, ServiceError> {
    if let Some(existing) = users.find_by_email(&normalize_email(email)).await? {
        tracing::info!(user_id = %existing.id, "admin seed already present");
        return Ok(existing);
    }
    let user = create_user(users, email, password, None, BTreeSet::from([Role::Admin])).await?;
    tracing::info!(user_id = %user.id, "admin account seeded");
    Ok(user)
}

/// Check credentials and issue a session token.
///
/// Unknown email and wrong password produce the same error.
pub async fn login(
    users: &dyn UserRepository,
    issuer: &TokenIssuer,
    request: LoginRequest,
) -> Result<IssuedToken, ServiceError> {
    let email = normalize_email(&request.email);

    let Some(user) = users.find_by_email(&email).await? else {
        tracing::info!("login for unknown email");
        return Err(ServiceError::InvalidCredentials);
    };
    if !verify_blocking(&request.password, &user.password_hash).await? {
        tracing::info!(user_id = %user.id, "login with wrong password");
        return Err(ServiceError::InvalidCredentials);
    }

    let principal = Principal::new(&user.id, &user.email, user.roles.iter().copied())?;
    let issued = issuer.issue(&principal)?;
    tracing::info!(user_id = %user.id, expires_at = issued.claims.expires_at(), "session issued");
    Ok(issued)
}

/// The stored account behind a session.
///
/// A token outlives the account it was issued for; once the account is gone
/// the token is treated as invalid.
pub async fn current_user(
    users: &dyn UserRepository,
    claims: &SessionClaims,
) -> Result<StoredUser, ServiceError> {
    match users.get(claims.subject()).await {
        Ok(user) => Ok(user),
        Err(StorageError::NotFound(_)) => {
            tracing::info!(user_id = claims.subject(), "token for deleted account");
            Err(AuthError::InvalidToken.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Users for the admin grid, oldest first. Moderators and admins only.
pub async fn list_users(
    users: &dyn UserRepository,
    actor: &SessionClaims,
) -> Result<Vec<StoredUser>, ServiceError> {
    actor.require(Role::Moderator)?;
    Ok(users.list().await?)
}

/// Delete an account and its chats. Admins only; never the caller's own.
pub async fn delete_user(
    users: &dyn UserRepository,
    chats: &dyn ChatRepository,
    actor: &SessionClaims,
    user_id: &str,
) -> Result<StoredUser, ServiceError> {
    actor.require(Role::Admin)?;
    if actor.subject() == user_id {
        return Err(ServiceError::Unprocessable(
            "Administrators cannot delete their own account".into(),
        ));
    }

    let removed = users.delete(user_id).await?;
    let chats_removed = chats.delete_by_owner(user_id).await?;
    tracing::info!(
        user_id,
        deleted_by = actor.subject(),
        chats_removed,
        "user deleted"
    );
    Ok(removed)
}
