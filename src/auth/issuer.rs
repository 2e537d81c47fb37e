// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuance (HS256).

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use uuid::Uuid;

use super::{claims::Principal, AuthError, SessionClaims};
use crate::config::AuthSettings;

/// Payload written into every session token.
#[derive(Debug, Serialize)]
struct TokenPayload<'a> {
    sub: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    roles: Vec<&'static str>,
    iss: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    aud: Option<&'a str>,
    iat: i64,
    exp: i64,
    jti: String,
}

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: SessionClaims,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// Signs session tokens with the configured secret.
pub struct TokenIssuer {
    key: EncodingKey,
    issuer: String,
    audience: Option<String>,
    ttl_secs: i64,
}

impl TokenIssuer {
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            key: EncodingKey::from_secret(settings.secret()),
            issuer: settings.issuer().to_string(),
            audience: settings.audience().map(str::to_string),
            ttl_secs: settings.token_ttl_secs(),
        }
    }

    /// Sign a token for `principal`, valid from now for the configured TTL.
    pub fn issue(&self, principal: &Principal) -> Result<IssuedToken, AuthError> {
        self.issue_at(principal, Utc::now().timestamp())
    }

    /// Sign a token as if issued at `issued_at` (unix seconds).
    pub fn issue_at(&self, principal: &Principal, issued_at: i64) -> Result<IssuedToken, AuthError> {
        let expires_at = issued_at
            .checked_add(self.ttl_secs)
            .ok_or_else(|| AuthError::Internal("token expiry overflows".to_string()))?;

        let payload = TokenPayload {
            sub: principal.subject(),
            email: principal.email(),
            roles: principal.roles().iter().map(|role| role.as_str()).collect(),
            iss: &self.issuer,
            aud: self.audience.as_deref(),
            iat: issued_at,
            exp: expires_at,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &payload, &self.key)
            .map_err(|e| AuthError::Internal(format!("failed to sign token: {e}")))?;

        Ok(IssuedToken {
            token,
            claims: SessionClaims::new(
                principal.clone(),
                issued_at,
                expires_at,
                self.issuer.clone(),
            ),
            expires_in: self.ttl_secs,
        })
    }
}
