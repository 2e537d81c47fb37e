// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session claims and the principal they are issued for.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use super::{error::AuthError, roles::Role};

/// Identity handed to the issuer at login time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    subject: String,
    email: String,
    roles: BTreeSet<Role>,
}

impl Principal {
    /// Fails with `MalformedClaims` when `subject` or `email` is blank.
    pub fn new(
        subject: impl Into<String>,
        email: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Result<Self, AuthError> {
        let subject = subject.into();
        let email = email.into();
        ensure_present("sub", &subject)?;
        ensure_present("email", &email)?;
        Ok(Self {
            subject,
            email,
            roles: roles.into_iter().collect(),
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }
}

/// Claims of an authenticated request.
///
/// Built by the issuer when signing and rebuilt by the verifier on every
/// request. There are no setters; a value is never modified after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    subject: String,
    email: String,
    roles: BTreeSet<Role>,
    issued_at: i64,
    expires_at: i64,
    issuer: String,
}

impl SessionClaims {
    pub(crate) fn new(principal: Principal, issued_at: i64, expires_at: i64, issuer: String) -> Self {
        Self {
            subject: principal.subject,
            email: principal.email,
            roles: principal.roles,
            issued_at,
            expires_at,
            issuer,
        }
    }

    /// Extract claims from a verified token payload.
    ///
    /// Only `sub`, `email`, `roles`, `iat`, `exp` and `iss` are read. Any
    /// other member of the payload is ignored.
    pub(crate) fn from_payload(payload: &Value) -> Result<Self, AuthError> {
        let object = payload
            .as_object()
            .ok_or_else(|| AuthError::MalformedClaims("payload is not an object".into()))?;

        let subject = required_string(object, "sub")?;
        let email = required_string(object, "email")?;
        let roles = extract_roles(object.get("roles"))?;
        let issued_at = required_timestamp(object, "iat")?;
        let expires_at = required_timestamp(object, "exp")?;
        let issuer = object
            .get("iss")
            .and_then(Value::as_str)
            .ok_or_else(|| AuthError::MalformedClaims("iss missing".into()))?
            .to_string();

        Ok(Self {
            subject,
            email,
            roles,
            issued_at,
            expires_at,
            issuer,
        })
    }

    /// Canonical user identifier (`sub`).
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    /// Issued-at, unix seconds.
    pub fn issued_at(&self) -> i64 {
        self.issued_at
    }

    /// Expiry, unix seconds.
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// The identity part of the claims, without timing or issuer.
    pub fn principal(&self) -> Principal {
        Principal {
            subject: self.subject.clone(),
            email: self.email.clone(),
            roles: self.roles.clone(),
        }
    }

    /// Check if any held role grants the required privilege.
    pub fn has_role(&self, required: Role) -> bool {
        self.roles.iter().any(|role| role.has_privilege(required))
    }

    /// Check if this user is an admin.
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    /// Fail with `InsufficientPermissions` unless `required` is granted.
    pub fn require(&self, required: Role) -> Result<(), AuthError> {
        if self.has_role(required) {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermissions)
        }
    }
}

fn ensure_present(name: &str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        Err(AuthError::MalformedClaims(format!("{name} is empty")))
    } else {
        Ok(())
    }
}

fn required_string(object: &Map<String, Value>, name: &str) -> Result<String, AuthError> {
    let value = object
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| AuthError::MalformedClaims(format!("{name} missing")))?;
    ensure_present(name, value)?;
    Ok(value.to_string())
}

fn required_timestamp(object: &Map<String, Value>, name: &str) -> Result<i64, AuthError> {
    object
        .get(name)
        .and_then(Value::as_i64)
        .ok_or_else(|| AuthError::MalformedClaims(format!("{name} missing or not an integer")))
}

/// `null`, absent and `[]` all mean "no roles". Anything that is not an
/// array of strings is malformed. Unknown role names are dropped.
fn extract_roles(value: Option<&Value>) -> Result<BTreeSet<Role>, AuthError> {
    let items = match value {
        None | Some(Value::Null) => return Ok(BTreeSet::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(AuthError::MalformedClaims("roles is not an array".into())),
    };

    let mut roles = BTreeSet::new();
    for item in items {
        let name = item
            .as_str()
            .ok_or_else(|| AuthError::MalformedClaims("roles contains a non-string".into()))?;
        match Role::parse(name) {
            Some(role) => {
                roles.insert(role);
            }
            None => tracing::debug!(role = name, "ignoring unknown role in token"),
        }
    }
    Ok(roles)
}
