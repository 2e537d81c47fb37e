// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token verification.
//!
//! Verification is a pure CPU computation over read-only keys: it never does
//! I/O and never awaits, so one verifier is shared by every request.

use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde_json::Value;

use super::{AuthError, SessionClaims};
use crate::config::AuthSettings;

/// Verifies HS256 session tokens against the configured secret and issuer.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(settings: &AuthSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.set_issuer(&[settings.issuer()]);
        validation.leeway = settings.leeway_secs();
        validation.validate_exp = true;

        match settings.audience() {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            key: DecodingKey::from_secret(settings.secret()),
            validation,
        }
    }

    /// Verify `token` and extract its claims.
    ///
    /// - bad signature, encoding, algorithm, issuer or audience: `InvalidToken`
    /// - `exp` in the past: `ExpiredToken`
    /// - valid signature but missing or ill-typed claims: `MalformedClaims`
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let data = decode::<Value>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(kind = ?e.kind(), "token rejected by decoder");
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                ErrorKind::MissingRequiredClaim(claim) => {
                    AuthError::MalformedClaims(format!("{claim} missing"))
                }
                _ => AuthError::InvalidToken,
            }
        })?;

        SessionClaims::from_payload(&data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Principal, Role, TokenIssuer};
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "verifier-test-secret-0123456789abcdef";
    const OTHER_SECRET: &str = "another-secret-entirely-0123456789abcd";
    const ISSUER: &str = "portal-server";

    fn settings() -> AuthSettings {
        AuthSettings::new(SECRET, ISSUER).unwrap()
    }

    fn sign_raw(payload: &Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            payload,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn valid_payload() -> Value {
        let now = Utc::now().timestamp();
        json!({
            "sub": "user_1",
            "email": "ada@example.com",
            "roles": ["user"],
            "iss": ISSUER,
            "iat": now,
            "exp": now + 600,
        })
    }

    #[test]
    fn verify_returns_issued_claims() {
        let issuer = TokenIssuer::new(&settings());
        let verifier = TokenVerifier::new(&settings());

        for roles in [vec![], vec![Role::User], vec![Role::Admin, Role::Moderator]] {
            let principal = Principal::new("user_42", "ada@example.com", roles).unwrap();
            let issued = issuer.issue(&principal).unwrap();

            let claims = verifier.verify(&issued.token).unwrap();
            assert_eq!(claims, issued.claims);
            assert_eq!(claims.principal(), principal);
        }
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let other = AuthSettings::new(OTHER_SECRET, ISSUER).unwrap();
        let principal = Principal::new("user_1", "ada@example.com", []).unwrap();
        let token = TokenIssuer::new(&other).issue(&principal).unwrap().token;

        let result = TokenVerifier::new(&settings()).verify(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        let principal = Principal::new("user_1", "ada@example.com", []).unwrap();
        let issued_at = Utc::now().timestamp() - 7200;
        let token = TokenIssuer::new(&settings())
            .issue_at(&principal, issued_at)
            .unwrap()
            .token;

        let result = TokenVerifier::new(&settings()).verify(&token);
        assert!(matches!(result, Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn just_expired_token_is_rejected_without_leeway() {
        let mut payload = valid_payload();
        payload["exp"] = json!(Utc::now().timestamp() - 5);
        let token = sign_raw(&payload, SECRET);

        let result = TokenVerifier::new(&settings()).verify(&token);
        assert!(matches!(result, Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn leeway_tolerates_small_clock_skew() {
        let mut payload = valid_payload();
        payload["exp"] = json!(Utc::now().timestamp() - 5);
        let token = sign_raw(&payload, SECRET);

        let verifier = TokenVerifier::new(&settings().with_leeway_secs(60));
        assert!(verifier.verify(&token).is_ok());
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let foreign = AuthSettings::new(SECRET, "https://evil.example.com").unwrap();
        let principal = Principal::new("user_1", "ada@example.com", []).unwrap();
        let token = TokenIssuer::new(&foreign).issue(&principal).unwrap().token;

        let result = TokenVerifier::new(&settings()).verify(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn missing_email_is_malformed_even_with_valid_signature() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("email");
        let token = sign_raw(&payload, SECRET);

        let result = TokenVerifier::new(&settings()).verify(&token);
        assert!(matches!(result, Err(AuthError::MalformedClaims(_))));
    }

    #[test]
    fn missing_subject_is_malformed() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("sub");
        let token = sign_raw(&payload, SECRET);

        let result = TokenVerifier::new(&settings()).verify(&token);
        assert!(matches!(result, Err(AuthError::MalformedClaims(_))));
    }

    #[test]
    fn missing_expiry_is_malformed() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("exp");
        let token = sign_raw(&payload, SECRET);

        let result = TokenVerifier::new(&settings()).verify(&token);
        assert!(matches!(result, Err(AuthError::MalformedClaims(_))));
    }

    #[test]
    fn string_roles_are_malformed() {
        let mut payload = valid_payload();
        payload["roles"] = json!("admin");
        let token = sign_raw(&payload, SECRET);

        let result = TokenVerifier::new(&settings()).verify(&token);
        assert!(matches!(result, Err(AuthError::MalformedClaims(_))));
    }

    #[test]
    fn extra_payload_fields_do_not_leak_into_claims() {
        let mut payload = valid_payload();
        payload["roles"] = json!(["user"]);
        payload["is_admin"] = json!(true);
        payload["role"] = json!("admin");
        let token = sign_raw(&payload, SECRET);

        let claims = TokenVerifier::new(&settings()).verify(&token).unwrap();
        assert!(!claims.is_admin());
    }

    #[test]
    fn garbage_is_invalid() {
        let verifier = TokenVerifier::new(&settings());
        for token in ["", "garbage", "a.b.c", "not.a.jwt.at.all"] {
            assert!(matches!(verifier.verify(token), Err(AuthError::InvalidToken)));
        }
    }

    #[test]
    fn unsigned_token_is_invalid() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(valid_payload().to_string());
        let token = format!("{header}.{body}.");

        let result = TokenVerifier::new(&settings()).verify(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn tampered_payload_is_invalid() {
        let token = sign_raw(&valid_payload(), SECRET);
        let mut parts: Vec<&str> = token.split('.').collect();
        let mut forged = valid_payload();
        forged["roles"] = json!(["admin"]);
        let forged_body = URL_SAFE_NO_PAD.encode(forged.to_string());
        parts[1] = &forged_body;

        let result = TokenVerifier::new(&settings()).verify(&parts.join("."));
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn audience_is_enforced_when_configured() {
        let with_audience = settings().with_audience("portal-web");
        let principal = Principal::new("user_1", "ada@example.com", []).unwrap();

        let good = TokenIssuer::new(&with_audience).issue(&principal).unwrap().token;
        let missing = TokenIssuer::new(&settings()).issue(&principal).unwrap().token;

        let verifier = TokenVerifier::new(&with_audience);
        assert!(verifier.verify(&good).is_ok());
        assert!(verifier.verify(&missing).is_err());
    }
}
